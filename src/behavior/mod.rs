//! Behavior catalogs
//!
//! A body is the context a state machine steps against: it owns the
//! entity's capabilities, its health record and its outboxes. States read
//! predicates from the body and write intent back into it.

pub mod enemy;
pub mod player;

use crate::capability::{Movement, PlayerInput, Signal};
use crate::combat::Strike;
use crate::core::types::Faction;
use crate::fsm::StateHost;
use crate::health::HealthRecord;

pub use enemy::{enemy_catalog, EnemyBody};
pub use player::{player_catalog, InteractionHook, PlayerBody};

/// Capabilities every state-machine context exposes to its owning entity
pub trait Body: StateHost {
    fn faction(&self) -> Faction;

    fn health(&self) -> &HealthRecord;
    fn health_mut(&mut self) -> &mut HealthRecord;

    fn movement(&self) -> &dyn Movement;
    fn movement_mut(&mut self) -> &mut dyn Movement;

    /// Per-tick countdowns that run regardless of state (cooldowns, windows)
    fn tick_timers(&mut self, dt: f32);

    /// Seconds between death and teardown when death bypasses the machine
    fn despawn_delay(&self) -> f32 {
        0.0
    }

    /// Set by a Death state once the entity may be torn down
    fn death_finished(&self) -> bool {
        false
    }

    fn set_input(&mut self, _input: PlayerInput) {}

    fn take_strikes(&mut self) -> Vec<Strike>;
    fn take_signals(&mut self) -> Vec<Signal>;
}
