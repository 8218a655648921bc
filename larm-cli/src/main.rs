//! ## larm-cli
//! **Operational interface for the alert arbitration engine**
//!
//! ### Subcommands:
//! - `simulate`: replay a YAML scenario, optionally verifying its state hash
//! - `fuzz`: run seeded random scenarios and check they replay identically
//! - `catalog`: list every event with the categories it maps to

use clap::Parser;
use larm_config::LarmConfig;
use larm_telemetry::EventLogger;

mod commands;

use commands::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => LarmConfig::load_from_path(path)?,
        None => LarmConfig::load()?,
    };
    EventLogger::init(&config.telemetry.log_level)?;
    EventLogger::route_panics();

    match cli.command {
        Commands::Simulate(args) => commands::simulate(args, &config),
        Commands::Fuzz(args) => commands::fuzz(args, &config),
        Commands::Catalog => commands::list_catalog(&config),
    }
}
