//! Cross-cutting step hooks
//!
//! Behavior shared by several states (polling interaction input in every
//! Idle/Move-family state) runs as a hook around the active state's step
//! instead of being copied into each state.

use crate::fsm::state::{BehaviorStateId, Transition};

pub trait StepHook<C> {
    /// Runs before the active state's step. A transition here pre-empts
    /// the state's own step for this tick.
    fn before_step(&mut self, _current: BehaviorStateId, _ctx: &mut C) -> Transition {
        Transition::Stay
    }

    /// Runs after the active state's step when it asked to stay.
    fn after_step(&mut self, _current: BehaviorStateId, _ctx: &mut C) -> Transition {
        Transition::Stay
    }
}
