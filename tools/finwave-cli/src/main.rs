//! Finwave CLI - headless driver for the fish simulation
//!
//! # Commands
//!
//! - `finwave simulate` - Step the simulation and write a JSON trace
//! - `finwave snapshot` - Render one frame to SVG
//! - `finwave config` - Print the effective configuration as TOML
//!
//! # Usage
//!
//! ```bash
//! # Five seconds at 60 fps, touching twice
//! finwave simulate --frames 300 --touch 0:540,900 --touch 1500:200,300
//!
//! # Frame at 800 ms with the swim path overlaid
//! finwave snapshot --at-ms 800 --touch 0:540,900 --show-path -o fish.svg
//! ```

mod config;
mod script;
mod simulate;
mod snapshot;
mod svg;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Finwave CLI - headless driver for the fish simulation
#[derive(Parser)]
#[command(name = "finwave")]
#[command(about = "Drive the procedural fish without a display")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Step the simulation and write per-frame state as JSON
    Simulate(simulate::SimulateArgs),

    /// Render a single frame to SVG
    Snapshot(snapshot::SnapshotArgs),

    /// Print the effective configuration as TOML
    Config(config::ConfigArgs),
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate(args) => simulate::execute(args),
        Commands::Snapshot(args) => snapshot::execute(args),
        Commands::Config(args) => config::execute(args),
    }
}
