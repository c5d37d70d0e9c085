//! The simulation world: every live actor plus the sinks they report to

use ahash::AHashMap;

use crate::capability::{FeedbackSink, LifecycleSink, NullFeedback, NullLifecycle, PlayerInput};
use crate::combat::{HitCandidate, HitDetector, ReachHitDetector};
use crate::core::error::{Result, SkirmishError};
use crate::core::types::{EntityId, Tick};
use crate::entity::Actor;
use crate::health::{DamageEvent, DamageOutcome};

pub struct Simulation<F = NullFeedback, L = NullLifecycle> {
    pub(crate) entities: AHashMap<EntityId, Box<dyn Actor>>,
    /// Spawn order; entities step in this order every tick
    pub(crate) order: Vec<EntityId>,
    pub(crate) detector: Box<dyn HitDetector>,
    pub(crate) feedback: F,
    pub(crate) lifecycle: L,
    pub(crate) current_tick: Tick,
}

impl Simulation {
    pub fn new() -> Self {
        Self::with_sinks(NullFeedback, NullLifecycle)
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FeedbackSink, L: LifecycleSink> Simulation<F, L> {
    pub fn with_sinks(feedback: F, lifecycle: L) -> Self {
        Self {
            entities: AHashMap::new(),
            order: Vec::new(),
            detector: Box::new(ReachHitDetector),
            feedback,
            lifecycle,
            current_tick: 0,
        }
    }

    pub fn with_detector(mut self, detector: impl HitDetector + 'static) -> Self {
        self.detector = Box::new(detector);
        self
    }

    pub fn spawn(&mut self, actor: impl Actor + 'static) -> EntityId {
        let id = actor.id();
        tracing::debug!("spawned {} ({:?})", id, actor.faction());
        self.order.push(id);
        self.entities.insert(id, Box::new(actor));
        id
    }

    /// Remove an entity without raising "death finished"
    pub fn despawn(&mut self, id: EntityId) -> Option<Box<dyn Actor>> {
        self.order.retain(|other| *other != id);
        self.entities.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&dyn Actor> {
        self.entities.get(&id).map(|actor| actor.as_ref())
    }

    /// Live actors in step order
    pub fn actors(&self) -> impl Iterator<Item = &dyn Actor> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.entities.get(id))
            .map(|actor| actor.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn lifecycle(&self) -> &L {
        &self.lifecycle
    }

    pub fn set_input(&mut self, id: EntityId, input: PlayerInput) -> Result<()> {
        let actor = self
            .entities
            .get_mut(&id)
            .ok_or(SkirmishError::EntityNotFound(id))?;
        actor.set_input(input);
        Ok(())
    }

    /// Resolve a hit from outside the strike loop (traps, scripted damage)
    pub fn apply_damage(&mut self, id: EntityId, event: &DamageEvent) -> Result<DamageOutcome> {
        let actor = self
            .entities
            .get_mut(&id)
            .ok_or(SkirmishError::EntityNotFound(id))?;
        Ok(actor.receive(event))
    }

    pub fn heal(&mut self, id: EntityId, amount: f32) -> Result<f32> {
        let actor = self
            .entities
            .get_mut(&id)
            .ok_or(SkirmishError::EntityNotFound(id))?;
        Ok(actor.heal(amount))
    }

    pub(crate) fn candidates(&self) -> Vec<HitCandidate> {
        self.actors().map(|actor| actor.hit_candidate()).collect()
    }
}
