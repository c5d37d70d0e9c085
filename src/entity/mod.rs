//! Entities: bodies bound to their state machines

pub mod actor;
pub mod death;

pub use actor::{Actor, EnemyActor, Entity, PlayerActor};
pub use death::{DeathRoute, Teardown};
