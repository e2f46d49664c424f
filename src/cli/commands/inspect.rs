//! Inspect command - Show what a saved agent has learned

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use crate::{
    cli::output::{print_kv, print_section, print_subsection},
    q_learning::{Action, SavedAgent, StateDiscretizer},
};

#[derive(Parser, Debug)]
#[command(about = "Show a saved agent's schedule and Q-table")]
pub struct InspectArgs {
    /// Saved agent file
    pub agent: PathBuf,

    /// Maximum number of table rows to print (0 prints all)
    #[arg(long, default_value_t = 0)]
    pub limit: usize,

    /// Print the table as JSON rows instead of text
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct TableRow {
    state: String,
    decelerate: f64,
    accelerate: f64,
    greedy: Action,
}

fn table_rows(saved: &SavedAgent) -> Vec<TableRow> {
    let table = saved.q_table();
    table
        .iter()
        .map(|(key, values)| TableRow {
            state: key.to_string(),
            decelerate: values[Action::Decelerate.index()],
            accelerate: values[Action::Accelerate.index()],
            greedy: table.greedy_action(key),
        })
        .collect()
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let saved = SavedAgent::load_from_file(&args.agent)
        .with_context(|| format!("failed to load agent {}", args.agent.display()))?;
    let mut rows = table_rows(&saved);
    if args.limit > 0 {
        rows.truncate(args.limit);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let config = saved.config();
    let hp = &config.hyperparameters;
    print_section(&format!("Agent {}", args.agent.display()));
    print_kv("Format version", &saved.version.to_string());
    print_kv("Updates", &saved.updates().to_string());
    print_kv(
        "Epsilon",
        &format!(
            "{:.4} (start {}, floor {}, decay {})",
            saved.epsilon(),
            hp.initial_epsilon,
            hp.min_epsilon,
            hp.decay_factor
        ),
    );
    print_kv(
        "Alpha",
        &format!(
            "{:.4} (start {}, floor {}, decay {})",
            saved.alpha(),
            hp.initial_alpha,
            hp.min_alpha,
            hp.decay_alpha
        ),
    );
    print_kv("Gamma", &hp.initial_gamma.to_string());
    let discretizer = match config.discretizer {
        StateDiscretizer::Binned { width } => format!("binned (width {width})"),
        StateDiscretizer::Exact => "exact".to_string(),
    };
    print_kv("Discretizer", &discretizer);
    print_kv("Bootstrap", &format!("{:?}", config.bootstrap));

    print_subsection(&format!("Q-table ({} states)", saved.q_table().states()));
    println!("  {:>16} {:>12} {:>12}  greedy", "state", "decelerate", "accelerate");
    for row in &rows {
        println!(
            "  {:>16} {:>12.4} {:>12.4}  {:?}",
            row.state, row.decelerate, row.accelerate, row.greedy
        );
    }
    Ok(())
}
