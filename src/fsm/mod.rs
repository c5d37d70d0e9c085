//! Behavior state machine engine

pub mod hook;
pub mod machine;
pub mod state;

pub use hook::StepHook;
pub use machine::StateMachine;
pub use state::{BehaviorState, BehaviorStateId, StateHost, Transition};
