//! Behavior state contract
//!
//! A behavior state is one mode of conduct (idle, chasing, swinging a
//! sword). Every entity is always in exactly one of them.

use crate::capability::Signal;
use crate::core::types::EntityId;
use serde::{Deserialize, Serialize};

/// Tag identifying a behavior state variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorStateId {
    Idle,
    /// Free movement for players, patrol stepping for enemies
    Move,
    Chase,
    MeleeAttack,
    /// Normal and scatter ranged attacks
    RangedAttack,
    /// Hold-to-charge, release-to-fire
    ChargedAttack,
    /// Charge, burst, recover
    DashAttack,
    Roll,
    Hurt,
    Death,
    ReturnHome,
    OpenInteraction,
}

impl BehaviorStateId {
    /// Terminal states have no outgoing transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, BehaviorStateId::Death)
    }

    /// Is this one of the attack states?
    pub fn is_attack(&self) -> bool {
        matches!(
            self,
            BehaviorStateId::MeleeAttack
                | BehaviorStateId::RangedAttack
                | BehaviorStateId::ChargedAttack
                | BehaviorStateId::DashAttack
        )
    }

    /// Idle/Move family: the states that poll interaction input
    pub fn is_locomotion(&self) -> bool {
        matches!(self, BehaviorStateId::Idle | BehaviorStateId::Move)
    }
}

/// What a state asks the machine to do once it returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Stay,
    To(BehaviorStateId),
}

impl Transition {
    pub fn target(&self) -> Option<BehaviorStateId> {
        match self {
            Transition::Stay => None,
            Transition::To(id) => Some(*id),
        }
    }
}

/// The entity side of a state machine: whatever the states operate on.
///
/// The machine only needs to know who owns it and where to send
/// activation signals.
pub trait StateHost {
    fn owner(&self) -> EntityId;
    fn signal(&mut self, signal: Signal);
}

/// One mode of conduct.
///
/// `step` is decision logic only: read predicates, set intent, and return
/// the transition it wants. The machine applies that transition after
/// `step` returns, so a state never changes state from inside itself.
pub trait BehaviorState<C> {
    fn id(&self) -> BehaviorStateId;

    /// Initialize per-activation data.
    ///
    /// Returning `Transition::To` redirects immediately (for example when a
    /// required capability is missing). The redirect runs this state's
    /// `exit` like any other transition.
    fn enter(&mut self, _ctx: &mut C) -> Transition {
        Transition::Stay
    }

    fn step(&mut self, ctx: &mut C, dt: f32) -> Transition;

    /// Release whatever `enter` acquired.
    ///
    /// Must tolerate an `enter` that bailed out early.
    fn exit(&mut self, _ctx: &mut C) {}
}
