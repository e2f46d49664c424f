//! Run command - Simulate the vehicle and export its trajectory

use std::{cell::RefCell, path::PathBuf, rc::Rc};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::{
    adapters::CsvPoseSink,
    app::SimulationConfig,
    cli::output::{print_kv, print_metrics, print_run_summary, print_subsection},
    pipeline::{
        JsonlObserver, MetricsObserver, ProgressObserver, RunConfig, SettlingObserver,
        SimulationRun, SnapshotPolicy, TargetSchedule,
    },
    q_learning::SavedAgent,
    simulator::VehicleSimulator,
    types::{ControlTargets, Pose},
};

#[derive(Parser, Debug)]
#[command(about = "Simulate the vehicle", allow_negative_numbers = true)]
pub struct RunArgs {
    /// JSON simulation config (controller gains, agent, rewards)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(long, short = 't', default_value_t = 100)]
    pub ticks: u64,

    /// Time step per tick, in seconds
    #[arg(long, default_value_t = 0.1)]
    pub dt: f64,

    /// Initial x position
    #[arg(long, default_value_t = 0.0)]
    pub x: f64,

    /// Initial y position
    #[arg(long, default_value_t = 0.0)]
    pub y: f64,

    /// Initial heading, in radians
    #[arg(long, default_value_t = 0.0)]
    pub heading: f64,

    /// Velocity set-point
    #[arg(long, default_value_t = 1.0)]
    pub target_velocity: f64,

    /// Heading set-point, in radians
    #[arg(long, default_value_t = 0.0)]
    pub target_angle: f64,

    /// Set-point changes as tick:velocity:angle entries (e.g., 50:1.0:0.5,120:0.5:0.0)
    #[arg(long)]
    pub schedule: Option<String>,

    /// Random seed for reproducibility (overrides the config file)
    #[arg(long)]
    pub seed: Option<u64>,

    /// CSV file receiving pose snapshots
    #[arg(long, short = 'o', default_value = "vehicle_data.csv")]
    pub output: PathBuf,

    /// Write a snapshot every N ticks instead of only after the last one
    #[arg(long)]
    pub every: Option<u64>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional file for JSONL tick reports
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Show progress bar
    #[arg(long, default_value_t = false)]
    pub progress: bool,

    /// Continue from a previously saved agent
    #[arg(long)]
    pub load_agent: Option<PathBuf>,

    /// Save the agent after the run
    #[arg(long)]
    pub save_agent: Option<PathBuf>,
}

impl RunArgs {
    fn run_config(&self) -> Result<RunConfig> {
        let schedule = match &self.schedule {
            Some(raw) => raw.parse::<TargetSchedule>()?,
            None => TargetSchedule::default(),
        };
        let snapshots = match self.every {
            Some(stride) => SnapshotPolicy::EveryTick { stride },
            None => SnapshotPolicy::Final,
        };
        let config = RunConfig {
            ticks: self.ticks,
            dt: self.dt,
            targets: ControlTargets::new(self.target_velocity, self.target_angle),
            schedule,
            snapshots,
        };
        config.validate()?;
        Ok(config)
    }
}

pub fn execute(args: RunArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let run_config = args.run_config()?;
    let initial_pose = Pose::new(args.x, args.y, args.heading);

    let mut simulator = match &args.load_agent {
        Some(path) => {
            let saved = SavedAgent::load_from_file(path)
                .with_context(|| format!("failed to load agent {}", path.display()))?;
            let mut agent = saved.to_agent()?;
            if let Some(seed) = config.seed {
                agent = agent.with_seed(seed);
            }
            info!(
                path = %path.display(),
                states = agent.q_table().states(),
                epsilon = agent.epsilon(),
                "loaded agent"
            );
            VehicleSimulator::with_agent(initial_pose, &config, agent)?
        }
        None => VehicleSimulator::new(initial_pose, &config)?,
    };

    let metrics = Rc::new(RefCell::new(MetricsObserver::new()));
    let settling = Rc::new(RefCell::new(SettlingObserver::new()));
    let mut run = SimulationRun::new(run_config)
        .with_observer(Box::new(Rc::clone(&metrics)))
        .with_observer(Box::new(Rc::clone(&settling)));
    if args.progress {
        run = run.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        run = run.with_observer(Box::new(JsonlObserver::create(path)?));
    }

    let mut sink = CsvPoseSink::create(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    let summary = run.run(&mut simulator, &mut sink)?;

    print_run_summary(&summary);
    print_metrics(&metrics.borrow().summary());

    let settling = settling.borrow();
    print_subsection("Heading");
    let describe = |tick: Option<u64>| tick.map_or_else(|| "never".to_string(), |t| t.to_string());
    print_kv("First on target", &describe(settling.first_on_target()));
    print_kv("Last off target", &describe(settling.last_off_target()));
    print_kv("Settled at", &describe(settling.settled_at()));

    println!("\nPose snapshots written to {}", args.output.display());

    if let Some(path) = &args.summary {
        summary
            .save(path)
            .with_context(|| format!("failed to write summary {}", path.display()))?;
        println!("Summary written to {}", path.display());
    }

    if let Some(path) = &args.save_agent {
        let agent = simulator.agent();
        SavedAgent::from_agent(agent, agent.seed())
            .save_to_file(path)
            .with_context(|| format!("failed to save agent {}", path.display()))?;
        println!("Agent saved to {}", path.display());
    }

    Ok(())
}
