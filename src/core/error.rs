use crate::core::types::EntityId;
use crate::fsm::BehaviorStateId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkirmishError {
    #[error("Entity not found: {0:?}")]
    EntityNotFound(EntityId),

    #[error("State {0:?} is not in this machine's catalog")]
    UnknownState(BehaviorStateId),

    #[error("Transition to {requested:?} requested while {current:?} is mid-transition")]
    ReentrantTransition {
        current: Option<BehaviorStateId>,
        requested: BehaviorStateId,
    },

    #[error("State {0:?} is terminal and has no outgoing transitions")]
    TerminalState(BehaviorStateId),

    #[error("Entry redirects did not settle, last redirect to {0:?}")]
    TransitionLoop(BehaviorStateId),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Configuration is rejected when it is built, never when it is evaluated.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Max health must be positive and finite, got {0}")]
    InvalidMaxHealth(f32),

    #[error("{field} must be a percentage in [0, 100], got {value}")]
    ChanceOutOfRange { field: &'static str, value: f32 },

    #[error("{field} must not be negative, got {value}")]
    NegativeDuration { field: &'static str, value: f32 },

    #[error("{field} is invalid: {value}")]
    InvalidRadius { field: &'static str, value: f32 },

    #[error("{field} must be at least 1.0, got {value}")]
    InvalidMultiplier { field: &'static str, value: f32 },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SkirmishError>;
