//! Multi-tick simulation runs

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::schedule::TargetSchedule;
use crate::{
    Error, Result,
    ports::{PoseSink, TickObserver},
    simulator::VehicleSimulator,
    types::{ControlTargets, Pose},
};

/// When snapshots are handed to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotPolicy {
    /// One snapshot after the last tick.
    #[default]
    Final,
    /// A snapshot after every `stride`-th tick.
    EveryTick { stride: u64 },
}

/// Run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of ticks to simulate
    pub ticks: u64,

    /// Time step per tick, in seconds
    pub dt: f64,

    /// Set-points in force from the first tick
    pub targets: ControlTargets,

    /// Later set-point changes
    pub schedule: TargetSchedule,

    pub snapshots: SnapshotPolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ticks: 100,
            dt: 0.1,
            targets: ControlTargets::new(1.0, 0.0),
            schedule: TargetSchedule::default(),
            snapshots: SnapshotPolicy::Final,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(Error::InvalidTimeStep { dt: self.dt });
        }
        if let SnapshotPolicy::EveryTick { stride: 0 } = self.snapshots {
            return Err(Error::config("snapshot stride must be at least 1"));
        }
        self.schedule.validate()
    }
}

/// Result of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Ticks completed in this run
    pub ticks: u64,

    pub dt: f64,

    pub final_pose: Pose,

    pub final_velocity: f64,

    /// Sum of rewards handed to the agent
    pub total_reward: f64,

    /// Ticks whose heading error was within the reward tolerance
    pub on_target_ticks: u64,

    /// Ticks whose action came from exploration
    pub explored_ticks: u64,

    /// Snapshots written to the sink
    pub snapshots: u64,

    pub final_epsilon: f64,

    pub final_alpha: f64,

    /// States with a row in the agent's table
    pub table_states: usize,
}

impl RunSummary {
    /// Fraction of ticks spent on target.
    pub fn on_target_rate(&self) -> f64 {
        if self.ticks == 0 {
            0.0
        } else {
            self.on_target_ticks as f64 / self.ticks as f64
        }
    }

    /// Save summary to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|source| Error::Io {
            operation: format!("create summary {path:?}"),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load summary from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let summary = serde_json::from_reader(file)?;
        Ok(summary)
    }
}

/// Drives a simulator through a configured run.
pub struct SimulationRun {
    config: RunConfig,
    observers: Vec<Box<dyn TickObserver>>,
}

impl SimulationRun {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the run
    pub fn with_observer(mut self, observer: Box<dyn TickObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run all ticks, exporting snapshots to `sink`.
    ///
    /// Tick indices in the schedule are relative to the start of this run.
    /// On error the simulator keeps every tick completed so far and rows
    /// already handed to the sink stay written.
    pub fn run<R: Rng>(
        &mut self,
        simulator: &mut VehicleSimulator<R>,
        sink: &mut dyn PoseSink,
    ) -> Result<RunSummary> {
        self.config.validate()?;
        let RunConfig {
            ticks,
            dt,
            targets,
            ref schedule,
            snapshots,
        } = self.config;

        simulator.set_controls(targets)?;
        info!(ticks, dt, ?targets, "starting run");
        for observer in &mut self.observers {
            observer.on_run_start(ticks)?;
        }

        let mut total_reward = 0.0;
        let mut on_target_ticks = 0;
        let mut explored_ticks = 0;
        let mut written = 0;

        for tick in 0..ticks {
            for change in schedule.changes_at(tick) {
                info!(tick, target = ?change.targets(), "retargeting");
                simulator.set_controls(change.targets())?;
            }

            let report = simulator.step(dt)?;
            total_reward += report.reward;
            if report.on_target {
                on_target_ticks += 1;
            }
            if report.explored {
                explored_ticks += 1;
            }

            for observer in &mut self.observers {
                observer.on_tick(&report)?;
            }

            if let SnapshotPolicy::EveryTick { stride } = snapshots
                && (tick + 1) % stride == 0
            {
                sink.write(&simulator.snapshot())?;
                written += 1;
            }
        }

        if snapshots == SnapshotPolicy::Final {
            sink.write(&simulator.snapshot())?;
            written += 1;
        }
        sink.finish()?;

        let agent = simulator.agent();
        let summary = RunSummary {
            ticks,
            dt,
            final_pose: *simulator.pose(),
            final_velocity: simulator.velocity(),
            total_reward,
            on_target_ticks,
            explored_ticks,
            snapshots: written,
            final_epsilon: agent.epsilon(),
            final_alpha: agent.alpha(),
            table_states: agent.q_table().states(),
        };

        for observer in &mut self.observers {
            observer.on_run_end(&summary)?;
        }
        info!(
            total_reward,
            on_target_ticks,
            explored_ticks,
            x = summary.final_pose.x,
            y = summary.final_pose.y,
            heading = summary.final_pose.heading,
            "run finished"
        );

        Ok(summary)
    }
}
