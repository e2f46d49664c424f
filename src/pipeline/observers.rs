//! Observer pattern for simulation runs
//!
//! Observers allow composable data collection during a run without coupling
//! the run loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    pipeline::RunSummary,
    ports::TickObserver,
    q_learning::Action,
    simulator::TickReport,
};

/// Progress bar observer - Shows run progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    total_reward: f64,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            total_reward: 0.0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl TickObserver for ProgressObserver {
    fn on_run_start(&mut self, total_ticks: u64) -> Result<()> {
        let pb = ProgressBar::new(total_ticks);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ticks (reward {msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        self.total_reward = 0.0;
        Ok(())
    }

    fn on_tick(&mut self, report: &TickReport) -> Result<()> {
        self.total_reward += report.reward;
        if let Some(pb) = &self.progress_bar {
            pb.inc(1);
            pb.set_message(format!("{:.1}", self.total_reward));
        }
        Ok(())
    }

    fn on_run_end(&mut self, summary: &RunSummary) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("{:.1}", summary.total_reward));
        }
        Ok(())
    }
}

/// Metrics observer - Tracks reward and action statistics
#[derive(Debug, Default)]
pub struct MetricsObserver {
    ticks: u64,
    on_target: u64,
    explored: u64,
    accelerations: u64,
    decelerations: u64,
    total_reward: f64,
    max_abs_angle_error: f64,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mean reward per tick
    pub fn mean_reward(&self) -> f64 {
        if self.ticks == 0 {
            0.0
        } else {
            self.total_reward / self.ticks as f64
        }
    }

    /// Fraction of ticks whose action was drawn at random
    pub fn exploration_rate(&self) -> f64 {
        if self.ticks == 0 {
            0.0
        } else {
            self.explored as f64 / self.ticks as f64
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            ticks: self.ticks,
            on_target: self.on_target,
            explored: self.explored,
            accelerations: self.accelerations,
            decelerations: self.decelerations,
            mean_reward: self.mean_reward(),
            exploration_rate: self.exploration_rate(),
            max_abs_angle_error: self.max_abs_angle_error,
        }
    }
}

/// Summary of run metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub ticks: u64,
    pub on_target: u64,
    pub explored: u64,
    pub accelerations: u64,
    pub decelerations: u64,
    pub mean_reward: f64,
    pub exploration_rate: f64,
    pub max_abs_angle_error: f64,
}

impl TickObserver for MetricsObserver {
    fn on_tick(&mut self, report: &TickReport) -> Result<()> {
        self.ticks += 1;
        self.total_reward += report.reward;
        if report.on_target {
            self.on_target += 1;
        }
        if report.explored {
            self.explored += 1;
        }
        match report.action {
            Action::Accelerate => self.accelerations += 1,
            Action::Decelerate => self.decelerations += 1,
        }
        self.max_abs_angle_error = self.max_abs_angle_error.max(report.angle_error.abs());
        Ok(())
    }
}

/// JSONL observer - Exports one tick report per line
pub struct JsonlObserver<W: Write = BufWriter<File>> {
    writer: W,
    lines: u64,
}

impl JsonlObserver {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create observations {path:?}"),
            source,
        })?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }
}

impl<W: Write> JsonlObserver<W> {
    pub fn from_writer(writer: W) -> Self {
        Self { writer, lines: 0 }
    }

    pub fn lines(&self) -> u64 {
        self.lines
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TickObserver for JsonlObserver<W> {
    fn on_tick(&mut self, report: &TickReport) -> Result<()> {
        serde_json::to_writer(&mut self.writer, report)?;
        writeln!(&mut self.writer)?;
        self.lines += 1;
        Ok(())
    }

    fn on_run_end(&mut self, _summary: &RunSummary) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Settling observer - Tracks when the heading locked onto its target
///
/// Records the first tick spent on target and the last tick spent off
/// target. A run has settled when every tick after `last_off_target` was on
/// target. All ticks are the simulator's absolute tick numbers, so a run that
/// continues an earlier one reports ticks past its own start.
#[derive(Debug, Default)]
pub struct SettlingObserver {
    first_on_target: Option<u64>,
    last_off_target: Option<u64>,
    first_tick: Option<u64>,
    last_tick: Option<u64>,
}

impl SettlingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_on_target(&self) -> Option<u64> {
        self.first_on_target
    }

    pub fn last_off_target(&self) -> Option<u64> {
        self.last_off_target
    }

    /// Tick from which the heading stayed on target, if it ever did.
    pub fn settled_at(&self) -> Option<u64> {
        let last_tick = self.last_tick?;
        match self.last_off_target {
            None => self.first_tick,
            Some(last) if last < last_tick => Some(last + 1),
            Some(_) => None,
        }
    }
}

impl TickObserver for SettlingObserver {
    fn on_run_start(&mut self, _total_ticks: u64) -> Result<()> {
        *self = Self::default();
        Ok(())
    }

    fn on_tick(&mut self, report: &TickReport) -> Result<()> {
        self.first_tick.get_or_insert(report.tick);
        self.last_tick = Some(report.tick);
        if report.on_target {
            self.first_on_target.get_or_insert(report.tick);
        } else {
            self.last_off_target = Some(report.tick);
        }
        Ok(())
    }
}
