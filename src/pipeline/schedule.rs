//! Target schedules
//!
//! A schedule changes the vehicle's set-points at given ticks of a run,
//! standing in for an external controller that retargets between ticks.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, types::ControlTargets};

/// New set-points applied before the tick with index `at_tick`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetChange {
    pub at_tick: u64,
    pub target_velocity: f64,
    pub target_angle: f64,
}

impl TargetChange {
    pub fn new(at_tick: u64, targets: ControlTargets) -> Self {
        Self {
            at_tick,
            target_velocity: targets.target_velocity,
            target_angle: targets.target_angle,
        }
    }

    pub fn targets(&self) -> ControlTargets {
        ControlTargets::new(self.target_velocity, self.target_angle)
    }
}

/// Ordered list of target changes.
///
/// When several changes share a tick the last one listed wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<TargetChange>", into = "Vec<TargetChange>")]
pub struct TargetSchedule {
    changes: Vec<TargetChange>,
}

impl TargetSchedule {
    pub fn new(mut changes: Vec<TargetChange>) -> Self {
        // Stable sort keeps the listed order within a tick.
        changes.sort_by_key(|change| change.at_tick);
        Self { changes }
    }

    /// Changes that take effect at `tick`, in application order.
    pub fn changes_at(&self, tick: u64) -> impl Iterator<Item = &TargetChange> {
        self.changes
            .iter()
            .skip_while(move |change| change.at_tick < tick)
            .take_while(move |change| change.at_tick == tick)
    }

    pub fn changes(&self) -> &[TargetChange] {
        &self.changes
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        for change in &self.changes {
            if !change.target_velocity.is_finite() || !change.target_angle.is_finite() {
                return Err(Error::config(format!(
                    "target change at tick {} must have finite targets",
                    change.at_tick
                )));
            }
        }
        Ok(())
    }
}

impl From<Vec<TargetChange>> for TargetSchedule {
    fn from(changes: Vec<TargetChange>) -> Self {
        Self::new(changes)
    }
}

impl From<TargetSchedule> for Vec<TargetChange> {
    fn from(schedule: TargetSchedule) -> Self {
        schedule.changes
    }
}

impl FromStr for TargetSchedule {
    type Err = Error;

    /// Parse `tick:velocity:angle` entries separated by commas,
    /// e.g. `50:1.0:0.5,120:0.5:0.0`.
    fn from_str(input: &str) -> Result<Self> {
        let parse_error = |reason: String| Error::config(format!("schedule '{input}': {reason}"));

        let mut changes = Vec::new();
        for entry in input.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let parts: Vec<&str> = entry.split(':').map(str::trim).collect();
            let [tick, velocity, angle] = parts.as_slice() else {
                return Err(parse_error(format!(
                    "entry '{entry}' must have the form tick:velocity:angle"
                )));
            };
            let at_tick = tick
                .parse::<u64>()
                .map_err(|e| parse_error(format!("bad tick '{tick}': {e}")))?;
            let target_velocity = velocity
                .parse::<f64>()
                .map_err(|e| parse_error(format!("bad velocity '{velocity}': {e}")))?;
            let target_angle = angle
                .parse::<f64>()
                .map_err(|e| parse_error(format!("bad angle '{angle}': {e}")))?;
            changes.push(TargetChange {
                at_tick,
                target_velocity,
                target_angle,
            });
        }

        let schedule = Self::new(changes);
        schedule.validate()?;
        Ok(schedule)
    }
}
