#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plans turns for a scenario file.

mod scenario;

use std::path::PathBuf;

use anyhow::{Context, Result};
use breach_planner_core::Event;
use breach_planner_system_turn::{TurnPlan, TurnReport, TurnStrategy};
use breach_planner_world::World;
use clap::Parser;
use scenario::Scenario;

/// Plans deployments for one or more turns of a tower-defense match.
#[derive(Debug, Parser)]
#[command(name = "breach-planner", version, long_about = None)]
struct Cli {
    /// Scenario TOML describing the board, resources, and recent breaches.
    #[arg(long)]
    scenario: Option<PathBuf>,
    /// Strategy TOML overriding the scenario's `[strategy]` table.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Zero-based number of the first turn to plan.
    #[arg(long, default_value_t = 0)]
    turn: u32,
    /// Number of consecutive turns to plan.
    #[arg(long, default_value_t = 1)]
    turns: u32,
    /// Overrides the seed used for stalling placements.
    #[arg(long)]
    seed: Option<u64>,
}

/// Entry point for the breach planner command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let scenario = match &cli.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };

    let mut config = match &cli.config {
        Some(path) => scenario::load_strategy(path)?,
        None => scenario.strategy.clone(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let mut world =
        World::from_layout(&scenario.layout).context("scenario layout is not playable")?;
    let mut strategy = TurnStrategy::new(config);
    for breach in scenario.breaches {
        strategy.record_breach(breach);
    }

    for turn in cli.turn..cli.turn.saturating_add(cli.turns) {
        let report = strategy.play_turn(&mut world, turn);
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &TurnReport) {
    let plan = match report.plan {
        TurnPlan::Stall => "stall".to_owned(),
        TurnPlan::DemolisherLine => "demolisher line".to_owned(),
        TurnPlan::Attack(decision) => format!("attack {decision:?}"),
    };
    println!("turn {}: {plan}", report.turn);
    if let Some(spawn) = report.safest_spawn {
        println!("  safest spawn ({}, {})", spawn.x(), spawn.y());
    }

    for event in &report.events {
        match event {
            Event::UnitsDeployed {
                kind,
                location,
                count,
            } => println!(
                "  deploy {} x{count} at ({}, {})",
                kind.shorthand(),
                location.x(),
                location.y()
            ),
            Event::DeploymentRejected {
                kind,
                location,
                reason,
            } => println!(
                "  reject {} at ({}, {}): {reason}",
                kind.shorthand(),
                location.x(),
                location.y()
            ),
            Event::UnitUpgraded { kind, location } => println!(
                "  upgrade {} at ({}, {})",
                kind.shorthand(),
                location.x(),
                location.y()
            ),
            Event::UpgradeRejected { location, reason } => println!(
                "  reject upgrade at ({}, {}): {reason}",
                location.x(),
                location.y()
            ),
        }
    }
}
