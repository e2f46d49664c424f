//! Binary action set of the steering agent

use serde::{Deserialize, Serialize};

/// Velocity nudge applied by the agent.
///
/// The declaration order is the canonical index order used for tie-breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Decelerate,
    Accelerate,
}

impl Action {
    /// All actions in canonical index order.
    pub const ALL: [Action; 2] = [Action::Decelerate, Action::Accelerate];

    /// Signed velocity change contributed by this action.
    pub fn value(self) -> f64 {
        match self {
            Action::Decelerate => -1.0,
            Action::Accelerate => 1.0,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}
