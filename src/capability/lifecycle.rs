//! External lifecycle contract
//!
//! "Entity death finished" is raised once teardown is safe. What happens
//! next (despawn, score recording, respawn scheduling) is up to the sink.

use crate::core::types::{EntityId, Faction};

pub trait LifecycleSink {
    fn entity_death_finished(&mut self, entity: EntityId, faction: Faction);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullLifecycle;

impl LifecycleSink for NullLifecycle {
    fn entity_death_finished(&mut self, _entity: EntityId, _faction: Faction) {}
}

/// Records finished deaths, in order
#[derive(Debug, Default, Clone)]
pub struct LifecycleLog {
    pub finished: Vec<(EntityId, Faction)>,
}

impl LifecycleLog {
    pub fn count(&self, faction: Faction) -> usize {
        self.finished.iter().filter(|(_, f)| *f == faction).count()
    }
}

impl LifecycleSink for LifecycleLog {
    fn entity_death_finished(&mut self, entity: EntityId, faction: Faction) {
        self.finished.push((entity, faction));
    }
}
