#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Sinking Hotel simulation.

mod config;
mod simulation;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::{config::Scenario, simulation::Simulation};

/// Runs a scripted Sinking Hotel scenario and prints a summary.
#[derive(Debug, Parser)]
#[command(name = "sinking-hotel", version)]
struct Cli {
    /// Scenario file to run; the built-in scenario is used when omitted.
    #[arg(long, value_name = "PATH")]
    scenario: Option<PathBuf>,
    /// Simulated seconds to run for.
    #[arg(long, value_name = "SECS")]
    duration: Option<f64>,
    /// Length of a single tick in milliseconds.
    #[arg(long, value_name = "MS")]
    tick_ms: Option<u64>,
    /// Seed for both the world and the guest spawner.
    #[arg(long)]
    seed: Option<u64>,
    /// Keeps the hotel from sinking.
    #[arg(long)]
    no_sinking: bool,
}

impl Cli {
    fn scenario(&self) -> Result<Scenario> {
        let mut scenario = match &self.scenario {
            Some(path) => Scenario::load(path)?,
            None => Scenario::builtin()?,
        };
        if let Some(duration) = self.duration {
            scenario.run.duration_secs = duration;
        }
        if let Some(tick_ms) = self.tick_ms {
            if tick_ms == 0 {
                bail!("--tick-ms must be positive");
            }
            scenario.run.tick_ms = tick_ms;
        }
        if let Some(seed) = self.seed {
            scenario.hotel.seed = seed;
            scenario.spawning.seed = seed;
        }
        if self.no_sinking {
            scenario.sinking.enabled = false;
        }
        Ok(scenario)
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::fmt()
        .without_time()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install the tracing subscriber")
}

/// Entry point for the Sinking Hotel command-line interface.
fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();
    let scenario = cli.scenario()?;
    let duration = scenario.duration()?;

    let mut simulation = Simulation::new(&scenario)?;
    let summary = simulation.run(duration);
    println!("{summary}");
    Ok(())
}
