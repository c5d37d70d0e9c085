//! Headless Skirmish Runner
//!
//! One autopiloted player against a ring of patrolling enemies. Prints a
//! JSON (or text) summary of the fight.

use std::path::PathBuf;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use skirmish::capability::{LifecycleLog, NullFeedback, PlayerInput};
use skirmish::core::config::SkirmishConfig;
use skirmish::core::error::Result;
use skirmish::core::types::{EntityId, Faction, Vec2};
use skirmish::entity::{Actor, EnemyActor, PlayerActor};
use skirmish::health::DamageOutcome;
use skirmish::simulation::{Simulation, SimulationEvent};

/// Headless Skirmish Runner - player vs enemies, no rendering
#[derive(Parser, Debug)]
#[command(name = "skirmish_runner")]
#[command(about = "Run a headless skirmish and print a summary")]
struct Args {
    /// Maximum ticks to simulate
    #[arg(long, default_value_t = 2000)]
    ticks: u64,

    /// Seconds per tick
    #[arg(long, default_value_t = 0.05)]
    dt: f32,

    /// Number of enemies in the ring
    #[arg(long, default_value_t = 6)]
    enemies: usize,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Debug-level logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Serialize, Default)]
struct SkirmishSummary {
    seed: u64,
    ticks: u64,
    enemies: usize,
    enemy_deaths: usize,
    player_deaths: usize,
    hits: usize,
    criticals: usize,
    evasions: usize,
    absorptions: usize,
    rejections: usize,
    damage_dealt: f32,
    player_state: Option<String>,
    player_health: Option<f32>,
}

/// Distance at which the autopilot swings instead of walking
const SWING_DISTANCE: f32 = 1.6;
const ENEMY_RING_RADIUS: f32 = 10.0;

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    let summary = match run(&args, seed) {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("skirmish failed: {}", err);
            std::process::exit(1);
        }
    };

    match args.format.as_str() {
        "text" => print_text(&summary),
        "json" => print_json(&summary),
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            print_json(&summary);
        }
    }
}

fn run(args: &Args, seed: u64) -> Result<SkirmishSummary> {
    let config = match &args.config {
        Some(path) => SkirmishConfig::load(path)?,
        None => SkirmishConfig::default(),
    };
    config.validate()?;

    tracing::info!(
        "Starting skirmish: {} enemies, {} ticks, seed {}",
        args.enemies,
        args.ticks,
        seed
    );

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut sim = Simulation::with_sinks(NullFeedback, LifecycleLog::default());
    let player = sim.spawn(PlayerActor::spawn(Vec2::ZERO, &config, rng.gen())?);

    for i in 0..args.enemies {
        let angle = std::f32::consts::TAU * i as f32 / args.enemies.max(1) as f32
            + rng.gen_range(-0.2..0.2);
        let home = Vec2::new(angle.cos(), angle.sin()) * ENEMY_RING_RADIUS;
        let patrol = vec![
            home + Vec2::new(2.0, 0.0),
            home + Vec2::new(0.0, 2.0),
            home,
        ];
        sim.spawn(EnemyActor::spawn(home, patrol, &config, rng.gen())?);
    }

    let mut summary = SkirmishSummary {
        seed,
        enemies: args.enemies,
        ..SkirmishSummary::default()
    };

    for _ in 0..args.ticks {
        if let Some(input) = autopilot(&sim, player) {
            sim.set_input(player, input)?;
        }

        let report = sim.run_tick(args.dt);
        summary.ticks += 1;
        for event in &report.events {
            if let SimulationEvent::Hit {
                outcome, critical, ..
            } = event
            {
                tally(&mut summary, outcome, *critical);
            }
        }

        if sim.get(player).is_none() || sim.len() == 1 {
            break;
        }
    }

    summary.enemy_deaths = sim.lifecycle().count(Faction::Enemy);
    summary.player_deaths = sim.lifecycle().count(Faction::Player);
    if let Some(actor) = sim.get(player) {
        summary.player_state = actor.current_state().map(|state| format!("{:?}", state));
        summary.player_health = Some(actor.health().current());
    }

    tracing::info!(
        "Skirmish finished after {} ticks: {} enemies down",
        summary.ticks,
        summary.enemy_deaths
    );
    Ok(summary)
}

/// Walk at the nearest living enemy, swing when close, roll when hurt
fn autopilot<F, L>(sim: &Simulation<F, L>, player: EntityId) -> Option<PlayerInput>
where
    F: skirmish::capability::FeedbackSink,
    L: skirmish::capability::LifecycleSink,
{
    let me = sim.get(player)?;
    if !me.is_alive() {
        return None;
    }
    let position = me.position();
    let (target, distance) = sim
        .actors()
        .filter(|actor| actor.faction() == Faction::Enemy && actor.is_alive())
        .map(|actor| (actor.position(), actor.position().distance(&position)))
        .min_by(|a, b| a.1.total_cmp(&b.1))?;

    let toward = (target - position).normalize();
    Some(PlayerInput {
        move_axis: toward,
        attack_pressed: distance <= SWING_DISTANCE,
        roll_pressed: me.health().fraction() < 0.3 && distance <= SWING_DISTANCE,
        ..PlayerInput::default()
    })
}

fn tally(summary: &mut SkirmishSummary, outcome: &DamageOutcome, critical: bool) {
    match outcome {
        DamageOutcome::Applied { net, .. } => {
            summary.hits += 1;
            summary.damage_dealt += net;
            if critical {
                summary.criticals += 1;
            }
        }
        DamageOutcome::Evaded => summary.evasions += 1,
        DamageOutcome::Absorbed => summary.absorptions += 1,
        DamageOutcome::Rejected(_) => summary.rejections += 1,
    }
}

fn print_json(summary: &SkirmishSummary) {
    match serde_json::to_string_pretty(summary) {
        Ok(json) => println!("{}", json),
        Err(err) => eprintln!("failed to serialize summary: {}", err),
    }
}

fn print_text(summary: &SkirmishSummary) {
    println!("Skirmish Result");
    println!("===============");
    println!("Ticks: {}", summary.ticks);
    println!("Enemies down: {}/{}", summary.enemy_deaths, summary.enemies);
    println!("Player deaths: {}", summary.player_deaths);
    println!(
        "Hits: {} ({} critical), evaded: {}, absorbed: {}, rejected: {}",
        summary.hits, summary.criticals, summary.evasions, summary.absorptions, summary.rejections
    );
    println!("Damage dealt: {:.1}", summary.damage_dealt);
    if let (Some(state), Some(health)) = (&summary.player_state, summary.player_health) {
        println!("Player: {} at {:.1} health", state, health);
    }
    println!("Seed: {}", summary.seed);
}
