//! Full simulation tick with one player and a crowd of enemies, plus the
//! mitigation pipeline on its own.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use skirmish::core::config::SkirmishConfig;
use skirmish::core::types::Vec2;
use skirmish::entity::{EnemyActor, PlayerActor};
use skirmish::health::{ArmorAbsorption, DamageEvent, HealthRecord};
use skirmish::simulation::Simulation;

fn make_sim(n: usize) -> Simulation {
    let config = SkirmishConfig::default();
    let mut sim = Simulation::new();
    if let Ok(player) = PlayerActor::spawn(Vec2::ZERO, &config, 7) {
        sim.spawn(player);
    }
    for i in 0..n {
        let home = Vec2::new((i % 40) as f32 * 3.0 - 60.0, (i / 40) as f32 * 3.0 - 15.0);
        let patrol = vec![home + Vec2::new(2.0, 0.0), home];
        if let Ok(enemy) = EnemyActor::spawn(home, patrol, &config, i as u64) {
            sim.spawn(enemy);
        }
    }
    // Let aggro settle so the measured tick has chases and swings in flight
    for _ in 0..20 {
        sim.run_tick(0.05);
    }
    sim
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_tick");
    for &n in &[10usize, 100, 500] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || make_sim(n),
                |mut sim| black_box(sim.run_tick(0.016)),
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_mitigation(c: &mut Criterion) {
    c.bench_function("take_damage_with_armor", |b| {
        b.iter_batched(
            || {
                HealthRecord::new(1.0e9)
                    .map(|record| record.with_absorption(ArmorAbsorption { armor: 2.0 }))
            },
            |record| {
                if let Ok(mut record) = record {
                    for _ in 0..100 {
                        black_box(record.take_damage(&DamageEvent::new(10.0)));
                    }
                }
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_tick, bench_mitigation);
criterion_main!(benches);
