//! Enemy behavior catalog
//!
//! Idle and patrol until something wanders into aggro range, chase it,
//! swing when in range, give up past the leash or chase window and walk
//! home. Death never enters this machine: the owner finalizes enemies
//! directly.

pub mod body;
pub mod states;

pub use body::EnemyBody;
pub use states::{Chase, Idle, MeleeAttack, Patrol, ReturnHome};

use crate::core::types::EntityId;
use crate::fsm::StateMachine;

pub fn enemy_catalog(owner: EntityId) -> StateMachine<EnemyBody> {
    StateMachine::new(owner)
        .with_state(Idle)
        .with_state(Patrol)
        .with_state(Chase)
        .with_state(MeleeAttack::default())
        .with_state(ReturnHome)
}
