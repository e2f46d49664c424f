//! Mapping from continuous heading error to finite table keys

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Key of one row in the action-value table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StateKey {
    /// Index of a fixed-width bin.
    Bin(i64),
    /// Raw bit pattern of the state value.
    Exact(u64),
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateKey::Bin(index) => write!(f, "bin {index}"),
            StateKey::Exact(bits) => write!(f, "{}", f64::from_bits(*bits)),
        }
    }
}

/// Strategy for turning a continuous state into a [`StateKey`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StateDiscretizer {
    /// `floor(state / width)`; every value in `[k·width, (k+1)·width)` shares bin `k`.
    Binned { width: f64 },
    /// One row per distinct floating-point value.
    ///
    /// Only nearly-identical errors ever share a row, so the table grows with
    /// every tick; kept for reproducing the continuous-key behaviour.
    Exact,
}

impl StateDiscretizer {
    pub fn binned(width: f64) -> Self {
        StateDiscretizer::Binned { width }
    }

    pub fn key(&self, state: f64) -> Result<StateKey> {
        if !state.is_finite() {
            return Err(Error::NonFiniteState { value: state });
        }
        Ok(match *self {
            // Saturating cast; absurdly large errors collapse onto the edge bins.
            StateDiscretizer::Binned { width } => StateKey::Bin((state / width).floor() as i64),
            // +0.0 and -0.0 compare equal and must share a row.
            StateDiscretizer::Exact => StateKey::Exact((state + 0.0).to_bits()),
        })
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if let StateDiscretizer::Binned { width } = *self
            && !(width.is_finite() && width > 0.0)
        {
            return Err(Error::config(format!(
                "bin width must be positive and finite, got {width}"
            )));
        }
        Ok(())
    }
}

impl Default for StateDiscretizer {
    fn default() -> Self {
        StateDiscretizer::Binned { width: 0.1 }
    }
}
