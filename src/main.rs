//! Creature Mind - headless sandbox runner
//!
//! Spawns a handful of creatures in a world of fruit trees and water, runs
//! the simulation for a fixed number of ticks and prints what they did.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use creature_mind::agent::Agent;
use creature_mind::behavior::state::StateKind;
use creature_mind::cognition::feelings::DriveKind;
use creature_mind::core::config::CognitionConfig;
use creature_mind::core::error::Result;
use creature_mind::core::types::{EntityId, Vec2};
use creature_mind::simulation::tick::{run_simulation_tick, AgentEvent};
use creature_mind::world::World;

#[derive(Parser, Debug)]
#[command(name = "creature-mind")]
#[command(about = "Run the creature cognition sandbox and report what happened")]
struct Args {
    /// Number of creatures to spawn
    #[arg(long, default_value_t = 6)]
    agents: usize,

    /// Number of ticks to run
    #[arg(long, default_value_t = 3000)]
    ticks: u64,

    /// Seconds per tick
    #[arg(long, default_value_t = 0.1)]
    dt: f32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// TOML config file overriding the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,

    /// Log drive and state changes as they happen
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Serialize)]
struct AgentSummary {
    id: EntityId,
    position: Vec2,
    state: StateKind,
    drive: DriveKind,
    hunger: f32,
    thirst: f32,
    memories: usize,
    known_peers: usize,
    recent_thoughts: Vec<String>,
}

#[derive(Serialize)]
struct RunReport {
    seed: u64,
    ticks: u64,
    time: f32,
    event_counts: BTreeMap<String, usize>,
    agents: Vec<AgentSummary>,
}

/// How many of the latest thoughts to print per agent
const RECENT_THOUGHTS: usize = 5;

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "creature_mind=debug" } else { "creature_mind=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => CognitionConfig::load(path)?,
        None => CognitionConfig::default(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, agents = args.agents, ticks = args.ticks, "creature mind starting");

    let mut world = World::new(config, seed)?;
    world.populate();
    spawn_initial_population(&mut world, args.agents, seed);

    let mut event_counts: BTreeMap<String, usize> = BTreeMap::new();
    for _ in 0..args.ticks {
        for event in run_simulation_tick(&mut world, args.dt) {
            *event_counts.entry(event_name(&event)).or_default() += 1;
        }
    }

    let report = RunReport {
        seed,
        ticks: args.ticks,
        time: world.time(),
        event_counts,
        agents: world.agents().iter().map(summarize).collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn spawn_initial_population(world: &mut World, count: usize, seed: u64) {
    let size = world.config().sandbox.world_size;
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
    for _ in 0..count {
        let position = Vec2::new(rng.gen_range(0.0..size), rng.gen_range(0.0..size));
        world.spawn_agent(position);
    }
}

fn event_name(event: &AgentEvent) -> String {
    serde_json::to_value(&event.event)
        .ok()
        .and_then(|v| v.get("event").and_then(|n| n.as_str()).map(str::to_owned))
        .unwrap_or_else(|| "Unknown".to_owned())
}

fn summarize(agent: &Agent) -> AgentSummary {
    let needs = agent.need_levels();
    let thoughts: Vec<_> = agent.thoughts().iter().collect();
    let start = thoughts.len().saturating_sub(RECENT_THOUGHTS);
    let recent = thoughts[start..]
        .iter()
        .map(|t| format!("[{:.1}s] {}", t.time, t.event))
        .collect();

    AgentSummary {
        id: agent.id(),
        position: agent.position,
        state: agent.state(),
        drive: agent.dominant_drive(),
        hunger: needs.hunger,
        thirst: needs.thirst,
        memories: agent.memory().len(),
        known_peers: agent.social().known_peers().count(),
        recent_thoughts: recent,
    }
}

fn print_report(report: &RunReport) {
    println!("\n=== CREATURE MIND ===");
    println!("seed {} | {} ticks | {:.1}s simulated", report.seed, report.ticks, report.time);
    println!();
    println!("Events:");
    for (name, count) in &report.event_counts {
        println!("  {:<18} {}", name, count);
    }
    for agent in &report.agents {
        println!();
        println!(
            "{} at ({:.0}, {:.0}) - {:?}, {:?}, hunger {:.2}, thirst {:.2}, {} memories, knows {}",
            agent.id,
            agent.position.x,
            agent.position.y,
            agent.state,
            agent.drive,
            agent.hunger,
            agent.thirst,
            agent.memories,
            agent.known_peers,
        );
        for thought in &agent.recent_thoughts {
            println!("    {}", thought);
        }
    }
}
