//! Animation / VFX / audio notification contract
//!
//! Signals are fire-and-forget. Nothing in the core waits on a sink.

use crate::combat::AttackKind;
use crate::core::types::{EntityId, InteractableId};
use crate::fsm::BehaviorStateId;
use crate::health::HealthNotice;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    StateEntered(BehaviorStateId),
    StateExited(BehaviorStateId),
    Health(HealthNotice),
    AttackStarted(AttackKind),
    StrikeReleased { amount: f32, critical: bool },
    /// Charge progress, 0.0 to 1.0
    Charging(f32),
    InteractionStarted(InteractableId),
    /// Non-player death: teardown countdown has begun
    TeardownStarted,
}

pub trait FeedbackSink {
    fn notify(&mut self, entity: EntityId, signal: &Signal);
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn notify(&mut self, _entity: EntityId, _signal: &Signal) {}
}

/// Sink that keeps every signal, in order
#[derive(Debug, Default, Clone)]
pub struct SignalLog {
    pub entries: Vec<(EntityId, Signal)>,
}

impl SignalLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_entity(&self, entity: EntityId) -> impl Iterator<Item = &Signal> + '_ {
        self.entries
            .iter()
            .filter(move |(id, _)| *id == entity)
            .map(|(_, signal)| signal)
    }

    /// States entered by `entity`, in order
    pub fn entered(&self, entity: EntityId) -> Vec<BehaviorStateId> {
        self.for_entity(entity)
            .filter_map(|signal| match signal {
                Signal::StateEntered(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// States exited by `entity`, in order
    pub fn exited(&self, entity: EntityId) -> Vec<BehaviorStateId> {
        self.for_entity(entity)
            .filter_map(|signal| match signal {
                Signal::StateExited(id) => Some(*id),
                _ => None,
            })
            .collect()
    }
}

impl FeedbackSink for SignalLog {
    fn notify(&mut self, entity: EntityId, signal: &Signal) {
        self.entries.push((entity, *signal));
    }
}
