//! Vehicle CLI - Hybrid PID, fuzzy and Q-learning heading controller
//!
//! This CLI provides a unified interface for:
//! - Running simulations and exporting pose snapshots
//! - Inspecting saved agents
//! - Writing a default configuration to start from

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "vehicle")]
#[command(version, about = "Simulate a vehicle steered by a hybrid learning controller", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation
    Run(Box<vehicle_control::cli::commands::run::RunArgs>),

    /// Show a saved agent's schedule and Q-table
    Inspect(vehicle_control::cli::commands::inspect::InspectArgs),

    /// Write the default simulation config
    Config(vehicle_control::cli::commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run(args) => vehicle_control::cli::commands::run::execute(*args),
        Commands::Inspect(args) => vehicle_control::cli::commands::inspect::execute(args),
        Commands::Config(args) => vehicle_control::cli::commands::config::execute(args),
    }
}
