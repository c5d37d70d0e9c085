pub mod config;
pub mod error;
pub mod types;

pub use config::{CombatConfig, EnemyConfig, HealthConfig, MaxHealthPolicy, PlayerConfig, SkirmishConfig};
pub use error::{ConfigError, Result, SkirmishError};
pub use types::{EntityId, Faction, InteractableId, Tick, Vec2};
