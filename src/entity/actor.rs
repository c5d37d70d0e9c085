//! Actors: a body, its state machine and the death hand-off
//!
//! The machine never lives inside the body it steps, so a state can borrow
//! the body mutably while the machine keeps its own bookkeeping.

use crate::behavior::{enemy_catalog, player_catalog, Body, EnemyBody, PlayerBody};
use crate::capability::{Locomotion, LocomotionParams, PlayerInput, Signal};
use crate::combat::{AttackSpec, HitCandidate, Loadout, Strike};
use crate::core::config::SkirmishConfig;
use crate::core::error::Result;
use crate::core::types::{EntityId, Faction, Vec2};
use crate::entity::death::{DeathRoute, Teardown};
use crate::fsm::{BehaviorStateId, StateMachine};
use crate::health::{ArmorAbsorption, CritTable, DamageEvent, DamageOutcome, HealthRecord};

/// What the simulation needs from any entity
pub trait Actor {
    fn id(&self) -> EntityId;
    fn faction(&self) -> Faction;
    fn current_state(&self) -> Option<BehaviorStateId>;
    fn position(&self) -> Vec2;
    fn health(&self) -> &HealthRecord;

    fn is_alive(&self) -> bool {
        self.health().is_alive()
    }

    /// Snapshot for hit detection
    fn hit_candidate(&self) -> HitCandidate;

    fn observe_target(&mut self, target: Option<(EntityId, Vec2)>);
    fn set_input(&mut self, input: PlayerInput);

    /// Decision phase
    fn step(&mut self, dt: f32);
    /// Physics phase
    fn integrate(&mut self, dt: f32);

    /// Run a hit through the health record and route any death
    fn receive(&mut self, event: &DamageEvent) -> DamageOutcome;
    fn heal(&mut self, amount: f32) -> f32;

    fn drain_strikes(&mut self) -> Vec<Strike>;
    fn drain_signals(&mut self) -> Vec<Signal>;

    /// Teardown is safe
    fn death_finished(&self) -> bool;

    /// (enter calls, exit calls) on this actor's machine
    fn transition_counts(&self) -> (u64, u64);
}

pub struct Entity<B> {
    body: B,
    machine: StateMachine<B>,
    route: DeathRoute,
    teardown: Option<Teardown>,
}

pub type PlayerActor = Entity<PlayerBody>;
pub type EnemyActor = Entity<EnemyBody>;

impl<B: Body> Entity<B> {
    /// Wire a body to its catalog and enter `initial`
    pub fn new(mut body: B, mut machine: StateMachine<B>, initial: BehaviorStateId) -> Result<Self> {
        machine.start(initial, &mut body)?;
        let route = DeathRoute::for_machine(&machine);
        Ok(Self {
            body,
            machine,
            route,
            teardown: None,
        })
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    pub fn machine(&self) -> &StateMachine<B> {
        &self.machine
    }

    pub fn route(&self) -> DeathRoute {
        self.route
    }

    pub fn teardown(&self) -> Option<&Teardown> {
        self.teardown.as_ref()
    }

    fn flush_health(&mut self) {
        for notice in self.body.health_mut().drain_notices() {
            self.body.signal(Signal::Health(notice));
        }
    }

    fn hand_off_death(&mut self) {
        let id = self.body.owner();
        match self.route {
            DeathRoute::StateTransition => {
                tracing::debug!("{}: lethal hit, requesting Death", id);
                if let Err(err) = self
                    .machine
                    .request_state_change(BehaviorStateId::Death, &mut self.body)
                {
                    tracing::warn!("{}: death transition refused: {}", id, err);
                }
            }
            DeathRoute::Finalize => {
                let movement = self.body.movement_mut();
                movement.stop();
                movement.set_locked(true);
                movement.set_collisions_enabled(false);
                let delay = self.body.despawn_delay();
                self.teardown = Some(Teardown::new(delay));
                self.body.signal(Signal::TeardownStarted);
                tracing::debug!("{}: lethal hit, teardown in {:.2}s", id, delay);
            }
        }
    }
}

impl PlayerActor {
    /// Player with the default loadout, sword selected
    pub fn spawn(position: Vec2, config: &SkirmishConfig, seed: u64) -> Result<Self> {
        let id = EntityId::new();
        let health = HealthRecord::from_config(&config.player.health, seed)?;
        let movement = Locomotion::new(position, LocomotionParams::player(&config.player));
        let loadout = Loadout::new(CritTable::from_config(&config.combat)?, seed.wrapping_add(1))
            .with_attack(AttackSpec::sword())
            .with_attack(AttackSpec::bow())
            .with_attack(AttackSpec::blunderbuss())
            .with_attack(AttackSpec::longbow())
            .with_attack(AttackSpec::blink());
        let body = PlayerBody::new(id, Box::new(movement), health, config.player.clone())
            .with_combat(loadout);
        Self::new(body, player_catalog(id), BehaviorStateId::Idle)
    }
}

impl EnemyActor {
    /// Clawed melee enemy patrolling `patrol`, home at `position`
    pub fn spawn(
        position: Vec2,
        patrol: Vec<Vec2>,
        config: &SkirmishConfig,
        seed: u64,
    ) -> Result<Self> {
        let id = EntityId::new();
        let mut health = HealthRecord::from_config(&config.enemy.health, seed)?;
        if config.enemy.armor > 0.0 {
            health = health.with_absorption(ArmorAbsorption {
                armor: config.enemy.armor,
            });
        }
        let movement =
            Locomotion::new(position, LocomotionParams::enemy(&config.enemy)).with_patrol(patrol);
        let loadout = Loadout::new(CritTable::from_config(&config.combat)?, seed.wrapping_add(1))
            .with_attack(AttackSpec::claws());
        let body = EnemyBody::new(id, Box::new(movement), health, config.enemy.clone())
            .with_combat(loadout);
        Self::new(body, enemy_catalog(id), BehaviorStateId::Idle)
    }
}

impl<B: Body> Actor for Entity<B> {
    fn id(&self) -> EntityId {
        self.body.owner()
    }

    fn faction(&self) -> Faction {
        self.body.faction()
    }

    fn current_state(&self) -> Option<BehaviorStateId> {
        self.machine.current()
    }

    fn position(&self) -> Vec2 {
        self.body.movement().position()
    }

    fn health(&self) -> &HealthRecord {
        self.body.health()
    }

    fn hit_candidate(&self) -> HitCandidate {
        HitCandidate {
            id: self.id(),
            faction: self.faction(),
            position: self.position(),
            collidable: self.body.movement().collisions_enabled() && self.is_alive(),
        }
    }

    fn observe_target(&mut self, target: Option<(EntityId, Vec2)>) {
        self.body.movement_mut().observe_target(target);
    }

    fn set_input(&mut self, input: PlayerInput) {
        self.body.set_input(input);
    }

    fn step(&mut self, dt: f32) {
        if let Some(teardown) = self.teardown.as_mut() {
            teardown.tick(dt);
            return;
        }
        self.body.tick_timers(dt);
        if let Err(err) = self.machine.step(&mut self.body, dt) {
            tracing::warn!("{}: step failed: {}", self.body.owner(), err);
        }
        self.flush_health();
    }

    fn integrate(&mut self, dt: f32) {
        self.body.movement_mut().integrate(dt);
    }

    fn receive(&mut self, event: &DamageEvent) -> DamageOutcome {
        let outcome = self.body.health_mut().take_damage(event);
        self.flush_health();

        if outcome.is_lethal() {
            self.hand_off_death();
        } else if outcome.landed()
            && self.machine.contains(BehaviorStateId::Hurt)
            && !self.machine.is_terminal()
        {
            if let Err(err) = self
                .machine
                .request_state_change(BehaviorStateId::Hurt, &mut self.body)
            {
                tracing::warn!("{}: hurt transition refused: {}", self.body.owner(), err);
            }
        }
        outcome
    }

    fn heal(&mut self, amount: f32) -> f32 {
        let healed = self.body.health_mut().heal(amount);
        self.flush_health();
        healed
    }

    fn drain_strikes(&mut self) -> Vec<Strike> {
        self.body.take_strikes()
    }

    fn drain_signals(&mut self) -> Vec<Signal> {
        self.body.take_signals()
    }

    fn death_finished(&self) -> bool {
        match self.route {
            DeathRoute::StateTransition => self.body.death_finished(),
            DeathRoute::Finalize => self.teardown.is_some_and(|t| t.is_complete()),
        }
    }

    fn transition_counts(&self) -> (u64, u64) {
        self.machine.transition_counts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SkirmishConfig {
        SkirmishConfig::default()
    }

    #[test]
    fn test_routes_follow_catalog() {
        let player = PlayerActor::spawn(Vec2::ZERO, &config(), 1).unwrap();
        let enemy = EnemyActor::spawn(Vec2::ZERO, Vec::new(), &config(), 2).unwrap();
        assert_eq!(player.route(), DeathRoute::StateTransition);
        assert_eq!(enemy.route(), DeathRoute::Finalize);
        assert_eq!(player.current_state(), Some(BehaviorStateId::Idle));
        assert_eq!(enemy.current_state(), Some(BehaviorStateId::Idle));
    }

    #[test]
    fn test_player_hurt_on_non_lethal_hit() {
        let mut player = PlayerActor::spawn(Vec2::ZERO, &config(), 1).unwrap();
        let outcome = player.receive(&DamageEvent::new(10.0));
        assert!(outcome.landed());
        assert_eq!(player.current_state(), Some(BehaviorStateId::Hurt));
    }

    #[test]
    fn test_enemy_death_starts_teardown() {
        let mut cfg = config();
        cfg.enemy.despawn_delay = 0.5;
        let mut enemy = EnemyActor::spawn(Vec2::ZERO, Vec::new(), &cfg, 2).unwrap();
        let outcome = enemy.receive(&DamageEvent::new(1000.0));
        assert!(outcome.is_lethal());
        assert!(enemy.teardown().is_some());
        assert!(!enemy.hit_candidate().collidable);
        assert!(!enemy.death_finished());

        enemy.step(0.3);
        assert!(!enemy.death_finished());
        enemy.step(0.3);
        assert!(enemy.death_finished());
        assert!(enemy
            .drain_signals()
            .contains(&Signal::TeardownStarted));
    }

    #[test]
    fn test_health_notices_become_signals() {
        let mut enemy = EnemyActor::spawn(Vec2::ZERO, Vec::new(), &config(), 2).unwrap();
        enemy.receive(&DamageEvent::new(10.0));
        let signals = enemy.drain_signals();
        assert!(signals
            .iter()
            .any(|s| matches!(s, Signal::Health(crate::health::HealthNotice::DamageApplied { .. }))));
    }
}
