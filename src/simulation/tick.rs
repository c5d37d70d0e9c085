//! Tick system - one pass over every entity
//!
//! sense -> decide -> resolve strikes -> physics -> finalize deaths
//!
//! Strikes released during an entity's decide step are resolved before the
//! next entity steps, so no hit from this tick ever lands on an entity
//! that is already dead but not yet marked terminal.

use crate::capability::{FeedbackSink, LifecycleSink, Signal};
use crate::combat::Strike;
use crate::core::types::{EntityId, Faction, Tick};
use crate::health::DamageOutcome;
use crate::simulation::perception::nearest_hostile;
use crate::simulation::world::Simulation;

/// Events generated during a simulation tick
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    /// A strike reached a target's health record
    Hit {
        source: EntityId,
        target: EntityId,
        outcome: DamageOutcome,
        critical: bool,
    },
    /// Feedback signal raised by an entity
    Signal { entity: EntityId, signal: Signal },
    /// Teardown complete, entity removed
    DeathFinished { entity: EntityId, faction: Faction },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick: Tick,
    pub events: Vec<SimulationEvent>,
}

impl TickReport {
    pub fn outcomes(&self) -> impl Iterator<Item = &DamageOutcome> + '_ {
        self.events.iter().filter_map(|event| match event {
            SimulationEvent::Hit { outcome, .. } => Some(outcome),
            _ => None,
        })
    }

    pub fn signals_for(&self, entity: EntityId) -> impl Iterator<Item = &Signal> + '_ {
        self.events.iter().filter_map(move |event| match event {
            SimulationEvent::Signal { entity: e, signal } if *e == entity => Some(signal),
            _ => None,
        })
    }

    pub fn deaths(&self) -> impl Iterator<Item = (EntityId, Faction)> + '_ {
        self.events.iter().filter_map(|event| match event {
            SimulationEvent::DeathFinished { entity, faction } => Some((*entity, *faction)),
            _ => None,
        })
    }
}

impl<F: FeedbackSink, L: LifecycleSink> Simulation<F, L> {
    /// Advance every entity by `dt` seconds
    pub fn run_tick(&mut self, dt: f32) -> TickReport {
        let mut report = TickReport {
            tick: self.current_tick,
            events: Vec::new(),
        };

        self.sense();

        let order = self.order.clone();
        for id in &order {
            let strikes = match self.entities.get_mut(id) {
                Some(actor) => {
                    actor.step(dt);
                    actor.drain_strikes()
                }
                None => continue,
            };
            for strike in &strikes {
                self.resolve(strike, &mut report);
            }
        }

        for id in &order {
            if let Some(actor) = self.entities.get_mut(id) {
                actor.integrate(dt);
            }
        }

        for id in &order {
            let Some(actor) = self.entities.get_mut(id) else {
                continue;
            };
            for signal in actor.drain_signals() {
                self.feedback.notify(*id, &signal);
                report.events.push(SimulationEvent::Signal {
                    entity: *id,
                    signal,
                });
            }
        }

        self.finalize(&mut report);
        self.current_tick += 1;
        report
    }

    fn sense(&mut self) {
        let candidates = self.candidates();
        for observer in &candidates {
            let seen = nearest_hostile(observer, &candidates);
            if let Some(actor) = self.entities.get_mut(&observer.id) {
                actor.observe_target(seen);
            }
        }
    }

    fn resolve(&mut self, strike: &Strike, report: &mut TickReport) {
        let candidates = self.candidates();
        for target in self.detector.detect(strike, &candidates) {
            let Some(actor) = self.entities.get_mut(&target) else {
                continue;
            };
            let event = strike.damage_event(actor.position());
            let outcome = actor.receive(&event);
            tracing::debug!("{} hit {}: {:?}", strike.source, target, outcome);
            report.events.push(SimulationEvent::Hit {
                source: strike.source,
                target,
                outcome,
                critical: strike.critical,
            });
        }
    }

    fn finalize(&mut self, report: &mut TickReport) {
        let finished: Vec<(EntityId, Faction)> = self
            .actors()
            .filter(|actor| actor.death_finished())
            .map(|actor| (actor.id(), actor.faction()))
            .collect();

        for (entity, faction) in finished {
            self.lifecycle.entity_death_finished(entity, faction);
            self.despawn(entity);
            tracing::info!("{}: death finished ({:?})", entity, faction);
            report
                .events
                .push(SimulationEvent::DeathFinished { entity, faction });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{LifecycleLog, SignalLog};
    use crate::core::config::SkirmishConfig;
    use crate::core::types::Vec2;
    use crate::entity::{EnemyActor, PlayerActor};
    use crate::fsm::BehaviorStateId;
    use crate::health::DamageEvent;

    #[test]
    fn test_empty_tick_advances_clock() {
        let mut sim = Simulation::new();
        let report = sim.run_tick(0.1);
        assert_eq!(report.tick, 0);
        assert!(report.events.is_empty());
        assert_eq!(sim.current_tick(), 1);
    }

    #[test]
    fn test_enemy_aggroes_on_nearby_player() {
        let config = SkirmishConfig::default();
        let mut sim = Simulation::new();
        sim.spawn(PlayerActor::spawn(Vec2::ZERO, &config, 1).unwrap());
        let enemy = sim.spawn(EnemyActor::spawn(Vec2::new(5.0, 0.0), Vec::new(), &config, 2).unwrap());

        sim.run_tick(0.1);
        assert_eq!(
            sim.get(enemy).and_then(|a| a.current_state()),
            Some(BehaviorStateId::Chase)
        );
    }

    #[test]
    fn test_dead_enemy_is_finalized_once() {
        let mut config = SkirmishConfig::default();
        config.enemy.despawn_delay = 0.15;
        let mut sim = Simulation::with_sinks(SignalLog::new(), LifecycleLog::default());
        let enemy = sim.spawn(EnemyActor::spawn(Vec2::ZERO, Vec::new(), &config, 2).unwrap());

        let outcome = sim.apply_damage(enemy, &DamageEvent::new(500.0)).unwrap();
        assert!(outcome.is_lethal());

        let first = sim.run_tick(0.1);
        assert_eq!(first.deaths().count(), 0);
        let second = sim.run_tick(0.1);
        assert_eq!(second.deaths().collect::<Vec<_>>(), vec![(enemy, Faction::Enemy)]);
        sim.run_tick(0.1);

        assert_eq!(sim.lifecycle().count(Faction::Enemy), 1);
        assert!(sim.get(enemy).is_none());
        assert!(sim
            .feedback()
            .for_entity(enemy)
            .any(|s| *s == Signal::TeardownStarted));
    }

    #[test]
    fn test_unknown_entity_is_an_error() {
        let mut sim = Simulation::new();
        assert!(sim.heal(EntityId::new(), 5.0).is_err());
    }
}
