//! Capability contracts consumed from collaborators
//!
//! Movement, input, feedback and lifecycle are owned outside the core.
//! The core only depends on these narrow traits.

pub mod feedback;
pub mod input;
pub mod lifecycle;
pub mod movement;

pub use feedback::{FeedbackSink, NullFeedback, Signal, SignalLog};
pub use input::{InteractionSource, Interactables, PlayerInput, MOVE_DEADZONE};
pub use lifecycle::{LifecycleLog, LifecycleSink, NullLifecycle};
pub use movement::{Locomotion, LocomotionParams, Movement};
