//! Simulation integration tests
//!
//! Whole-world ticks: sensing, strike resolution, death hand-off and the
//! lifecycle notification that ends every entity.

use skirmish::capability::{LifecycleLog, PlayerInput, Signal, SignalLog};
use skirmish::core::config::SkirmishConfig;
use skirmish::core::types::{EntityId, Faction, Vec2};
use skirmish::entity::{EnemyActor, PlayerActor};
use skirmish::fsm::BehaviorStateId;
use skirmish::health::{DamageEvent, DamageOutcome};
use skirmish::simulation::{Simulation, SimulationEvent, TickReport};

fn config() -> SkirmishConfig {
    let mut config = SkirmishConfig::default();
    config.combat.crit_chance = 0.0;
    config
}

fn swing() -> PlayerInput {
    PlayerInput {
        attack_pressed: true,
        ..PlayerInput::default()
    }
}

fn hits_on(report: &TickReport, target: EntityId) -> Vec<DamageOutcome> {
    report
        .events
        .iter()
        .filter_map(|event| match event {
            SimulationEvent::Hit {
                target: t, outcome, ..
            } if *t == target => Some(*outcome),
            _ => None,
        })
        .collect()
}

#[test]
fn test_strike_resolves_within_the_releasing_tick() {
    let config = config();
    let mut sim = Simulation::new();
    let player = sim.spawn(PlayerActor::spawn(Vec2::ZERO, &config, 1).unwrap());
    let enemy = sim.spawn(EnemyActor::spawn(Vec2::new(1.0, 0.0), Vec::new(), &config, 2).unwrap());

    sim.set_input(player, swing()).unwrap();
    sim.run_tick(0.05);
    assert_eq!(
        sim.get(player).and_then(|a| a.current_state()),
        Some(BehaviorStateId::MeleeAttack)
    );

    let report = sim.run_tick(0.5);
    let hits = hits_on(&report, enemy);
    assert_eq!(hits.len(), 1);
    assert!(hits[0].landed());
    assert_eq!(sim.get(enemy).map(|a| a.health().current()), Some(40.0));
    assert!(report
        .signals_for(player)
        .any(|s| matches!(s, Signal::StrikeReleased { .. })));
}

#[test]
fn test_fight_ends_with_one_lifecycle_notice() {
    let mut config = config();
    config.enemy.health.max_health = 35.0;
    config.enemy.despawn_delay = 0.3;

    let mut sim = Simulation::with_sinks(SignalLog::new(), LifecycleLog::default());
    let player = sim.spawn(PlayerActor::spawn(Vec2::ZERO, &config, 1).unwrap());
    let enemy = sim.spawn(EnemyActor::spawn(Vec2::new(1.0, 0.0), Vec::new(), &config, 2).unwrap());

    let mut reports = Vec::new();
    for _ in 0..200 {
        sim.set_input(player, swing()).unwrap();
        reports.push(sim.run_tick(0.1));
        if sim.get(enemy).is_none() {
            break;
        }
    }

    assert!(sim.get(enemy).is_none());
    assert_eq!(sim.lifecycle().count(Faction::Enemy), 1);
    assert_eq!(sim.lifecycle().count(Faction::Player), 0);

    let lethal_hits = reports
        .iter()
        .flat_map(|r| hits_on(r, enemy))
        .filter(|o| o.is_lethal())
        .count();
    assert_eq!(lethal_hits, 1);

    let finished: Vec<_> = reports.iter().flat_map(|r| r.deaths()).collect();
    assert_eq!(finished, vec![(enemy, Faction::Enemy)]);

    let enemy_signals: Vec<_> = sim.feedback().for_entity(enemy).cloned().collect();
    assert_eq!(
        enemy_signals
            .iter()
            .filter(|s| **s == Signal::TeardownStarted)
            .count(),
        1
    );

    // Nothing is left to hit, so further ticks are quiet
    sim.set_input(player, swing()).unwrap();
    let after = sim.run_tick(1.0);
    assert_eq!(after.deaths().count(), 0);
}

#[test]
fn test_dying_enemy_is_not_hit_again() {
    let mut config = config();
    config.enemy.despawn_delay = 5.0;
    let mut sim = Simulation::new();
    let player = sim.spawn(PlayerActor::spawn(Vec2::ZERO, &config, 1).unwrap());
    let enemy = sim.spawn(EnemyActor::spawn(Vec2::new(1.0, 0.0), Vec::new(), &config, 2).unwrap());

    assert!(sim
        .apply_damage(enemy, &DamageEvent::new(500.0))
        .unwrap()
        .is_lethal());

    for _ in 0..20 {
        sim.set_input(player, swing()).unwrap();
        let report = sim.run_tick(0.1);
        assert!(hits_on(&report, enemy).is_empty());
    }
    assert!(sim.get(enemy).is_some());
}

#[test]
fn test_player_death_lingers_then_finishes() {
    let config = config();
    let mut sim = Simulation::with_sinks(SignalLog::new(), LifecycleLog::default());
    let player = sim.spawn(PlayerActor::spawn(Vec2::ZERO, &config, 1).unwrap());

    sim.apply_damage(player, &DamageEvent::new(1000.0)).unwrap();
    assert_eq!(
        sim.get(player).and_then(|a| a.current_state()),
        Some(BehaviorStateId::Death)
    );

    // Linger is 2s by default
    for _ in 0..19 {
        let report = sim.run_tick(0.1);
        assert_eq!(report.deaths().count(), 0);
    }
    let mut finished = 0;
    for _ in 0..5 {
        finished += sim.run_tick(0.1).deaths().count();
    }
    assert_eq!(finished, 1);
    assert_eq!(sim.lifecycle().count(Faction::Player), 1);
    assert!(sim.is_empty());

    assert_eq!(
        sim.feedback().entered(player),
        vec![BehaviorStateId::Idle, BehaviorStateId::Death]
    );
    assert!(!sim
        .feedback()
        .for_entity(player)
        .any(|s| *s == Signal::TeardownStarted));
}

#[test]
fn test_enemies_ignore_each_other() {
    let config = config();
    let mut sim = Simulation::new();
    let a = sim.spawn(EnemyActor::spawn(Vec2::ZERO, Vec::new(), &config, 1).unwrap());
    let b = sim.spawn(EnemyActor::spawn(Vec2::new(1.0, 0.0), Vec::new(), &config, 2).unwrap());

    for _ in 0..10 {
        sim.run_tick(0.1);
    }
    for id in [a, b] {
        assert_eq!(
            sim.get(id).and_then(|actor| actor.current_state()),
            Some(BehaviorStateId::Idle)
        );
    }
}

#[test]
fn test_unknown_entity_errors() {
    let mut sim = Simulation::new();
    let ghost = EntityId::new();
    assert!(sim.set_input(ghost, PlayerInput::default()).is_err());
    assert!(sim.apply_damage(ghost, &DamageEvent::new(1.0)).is_err());
}
