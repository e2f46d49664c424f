//! Run pipeline for driving a simulator over many ticks
//!
//! This module provides:
//! - A run loop that applies a target schedule and exports snapshots
//! - Observers for progress, metrics, per-tick traces and settling milestones

pub mod observers;
pub mod run;
pub mod schedule;

// Re-export observer implementations (adapters)
pub use observers::{
    JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver, SettlingObserver,
};
pub use run::{RunConfig, RunSummary, SimulationRun, SnapshotPolicy};
pub use schedule::{TargetChange, TargetSchedule};

pub use crate::ports::{PoseSink, TickObserver};
