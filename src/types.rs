//! Shared data types for the vehicle model

use serde::{Deserialize, Serialize};

/// Position and orientation of the vehicle in the plane.
///
/// `heading` is measured in radians from the positive x axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self { x, y, heading }
    }

    /// Returns the name of the first non-finite component, if any.
    pub fn non_finite_component(&self) -> Option<&'static str> {
        if !self.x.is_finite() {
            Some("x")
        } else if !self.y.is_finite() {
            Some("y")
        } else if !self.heading.is_finite() {
            Some("heading")
        } else {
            None
        }
    }
}

/// Set-points the controllers track.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlTargets {
    pub target_velocity: f64,
    pub target_angle: f64,
}

impl ControlTargets {
    pub fn new(target_velocity: f64, target_angle: f64) -> Self {
        Self {
            target_velocity,
            target_angle,
        }
    }
}

/// One exported pose snapshot.
///
/// Consumers of the textual export only see `x`, `y` and `theta`; `tick`
/// identifies the snapshot for in-memory sinks and observers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseRecord {
    pub tick: u64,
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

impl PoseRecord {
    pub fn from_pose(tick: u64, pose: &Pose) -> Self {
        Self {
            tick,
            x: pose.x,
            y: pose.y,
            theta: pose.heading,
        }
    }
}
