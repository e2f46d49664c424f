//! Rule-based fuzzy corrector

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Thresholds for the three-rule corrector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyConfig {
    pub upper_threshold: f64,
    pub lower_threshold: f64,
}

impl FuzzyConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if !self.upper_threshold.is_finite() || !self.lower_threshold.is_finite() {
            return Err(Error::config("fuzzy thresholds must be finite"));
        }
        if self.lower_threshold > self.upper_threshold {
            return Err(Error::config(format!(
                "fuzzy lower threshold {} exceeds upper threshold {}",
                self.lower_threshold, self.upper_threshold
            )));
        }
        Ok(())
    }
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self {
            upper_threshold: 0.1,
            lower_threshold: -0.1,
        }
    }
}

/// Stateless corrector mapping an error to `+1.0`, `0.0` or `-1.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FuzzyCorrector {
    config: FuzzyConfig,
}

impl FuzzyCorrector {
    pub fn new(config: FuzzyConfig) -> Self {
        Self { config }
    }

    /// Both thresholds are strict: an error exactly on a threshold yields `0.0`.
    pub fn control(&self, error: f64) -> f64 {
        if error > self.config.upper_threshold {
            1.0
        } else if error < self.config.lower_threshold {
            -1.0
        } else {
            0.0
        }
    }

    pub fn config(&self) -> &FuzzyConfig {
        &self.config
    }
}
