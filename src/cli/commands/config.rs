//! Config command - Write a default simulation config to edit

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::app::SimulationConfig;

#[derive(Parser, Debug)]
#[command(about = "Write the default simulation config as JSON")]
pub struct ConfigArgs {
    /// Destination file
    #[arg(default_value = "vehicle_config.json")]
    pub output: PathBuf,

    /// Seed to record in the config
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn execute(args: ConfigArgs) -> Result<()> {
    let mut config = SimulationConfig::default();
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    config
        .save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("Default config written to {}", args.output.display());
    Ok(())
}
