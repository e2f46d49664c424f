//! Hyperparameters and learning options for the Q-learning agent

use serde::{Deserialize, Serialize};

use super::discretizer::StateDiscretizer;
use crate::{Error, Result};

/// Exploration and learning-rate schedule.
///
/// `epsilon` and `alpha` start at their initial values and are multiplied by
/// their decay factors after every update, never dropping below the floors.
/// `gamma` stays fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    pub initial_epsilon: f64,
    pub min_epsilon: f64,
    pub decay_factor: f64,
    pub initial_alpha: f64,
    pub min_alpha: f64,
    pub decay_alpha: f64,
    pub initial_gamma: f64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            initial_epsilon: 1.0,
            min_epsilon: 0.05,
            decay_factor: 0.99,
            initial_alpha: 0.1,
            min_alpha: 0.01,
            decay_alpha: 0.99,
            initial_gamma: 0.9,
        }
    }
}

impl Hyperparameters {
    pub fn validate(&self) -> Result<()> {
        let unit_interval = [
            ("initial_epsilon", self.initial_epsilon),
            ("min_epsilon", self.min_epsilon),
            ("initial_alpha", self.initial_alpha),
            ("min_alpha", self.min_alpha),
            ("initial_gamma", self.initial_gamma),
        ];
        for (name, value) in unit_interval {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::config(format!(
                    "{name} must lie in [0, 1], got {value}"
                )));
            }
        }

        for (name, value) in [
            ("decay_factor", self.decay_factor),
            ("decay_alpha", self.decay_alpha),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(Error::config(format!(
                    "{name} must lie in (0, 1], got {value}"
                )));
            }
        }

        // A floor above the start would make the clamp raise the value.
        if self.min_epsilon > self.initial_epsilon {
            return Err(Error::config(format!(
                "min_epsilon {} exceeds initial_epsilon {}",
                self.min_epsilon, self.initial_epsilon
            )));
        }
        if self.min_alpha > self.initial_alpha {
            return Err(Error::config(format!(
                "min_alpha {} exceeds initial_alpha {}",
                self.min_alpha, self.initial_alpha
            )));
        }

        Ok(())
    }
}

/// Which state the TD target bootstraps from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapMode {
    /// Bootstrap from the state being updated: `r + γ·max_a Q(s, a)`.
    #[default]
    SameState,
    /// Canonical Q-learning: `r + γ·max_a Q(s', a)` on the successor state.
    NextState,
}

/// Everything needed to build a [`QLearningAgent`](super::QLearningAgent).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub hyperparameters: Hyperparameters,
    pub discretizer: StateDiscretizer,
    pub bootstrap: BootstrapMode,
    /// Value of table entries that have never been updated.
    pub q_init: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            hyperparameters: Hyperparameters::default(),
            discretizer: StateDiscretizer::default(),
            bootstrap: BootstrapMode::default(),
            q_init: 0.0,
        }
    }
}

impl AgentConfig {
    pub fn with_hyperparameters(mut self, hyperparameters: Hyperparameters) -> Self {
        self.hyperparameters = hyperparameters;
        self
    }

    pub fn with_discretizer(mut self, discretizer: StateDiscretizer) -> Self {
        self.discretizer = discretizer;
        self
    }

    pub fn with_bootstrap(mut self, bootstrap: BootstrapMode) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.hyperparameters.validate()?;
        self.discretizer.validate()?;
        if !self.q_init.is_finite() {
            return Err(Error::config(format!(
                "q_init must be finite, got {}",
                self.q_init
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(AgentConfig::default().validate().is_ok());
        let h = Hyperparameters::default();
        assert_eq!(h.initial_epsilon, 1.0);
        assert_eq!(h.min_epsilon, 0.05);
        assert_eq!(h.decay_factor, 0.99);
        assert_eq!(h.initial_alpha, 0.1);
        assert_eq!(h.min_alpha, 0.01);
        assert_eq!(h.decay_alpha, 0.99);
        assert_eq!(h.initial_gamma, 0.9);
    }

    #[test]
    fn test_rejects_negative_rates() {
        for h in [
            Hyperparameters {
                initial_epsilon: -0.1,
                ..Hyperparameters::default()
            },
            Hyperparameters {
                initial_alpha: -0.5,
                min_alpha: 0.0,
                ..Hyperparameters::default()
            },
            Hyperparameters {
                initial_gamma: -1.0,
                ..Hyperparameters::default()
            },
        ] {
            assert!(matches!(
                h.validate(),
                Err(Error::InvalidConfiguration { .. })
            ));
        }
    }

    #[test]
    fn test_rejects_bad_decay_and_floors() {
        let zero_decay = Hyperparameters {
            decay_factor: 0.0,
            ..Hyperparameters::default()
        };
        assert!(zero_decay.validate().is_err());

        let growth = Hyperparameters {
            decay_alpha: 1.01,
            ..Hyperparameters::default()
        };
        assert!(growth.validate().is_err());

        let floor_above_start = Hyperparameters {
            initial_epsilon: 0.01,
            ..Hyperparameters::default()
        };
        assert!(floor_above_start.validate().is_err());

        let nan = Hyperparameters {
            initial_gamma: f64::NAN,
            ..Hyperparameters::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_zero_rates_are_allowed() {
        let frozen = Hyperparameters {
            initial_epsilon: 0.0,
            min_epsilon: 0.0,
            initial_alpha: 0.0,
            min_alpha: 0.0,
            ..Hyperparameters::default()
        };
        assert!(frozen.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AgentConfig =
            serde_json::from_str(r#"{"bootstrap":"next_state","hyperparameters":{"min_alpha":0.02}}"#)
                .unwrap();
        assert_eq!(config.bootstrap, BootstrapMode::NextState);
        assert_eq!(config.hyperparameters.min_alpha, 0.02);
        assert_eq!(config.hyperparameters.initial_alpha, 0.1);
        assert_eq!(config.discretizer, StateDiscretizer::default());
    }
}
