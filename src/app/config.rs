//! Configuration types for building a simulator.

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    control::{FuzzyConfig, PidGains},
    q_learning::{AgentConfig, BootstrapMode, Hyperparameters, StateDiscretizer},
    simulator::RewardConfig,
};

/// Controller, learning and reward settings for one vehicle.
///
/// Every field has a default, so a JSON file only needs the values it
/// overrides:
///
/// ```json
/// {
///   "seed": 7,
///   "agent": { "hyperparameters": { "initial_epsilon": 0.5 } },
///   "heading_pid": { "kp": 2.0, "integral_limit": 3.0 }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub agent: AgentConfig,
    pub velocity_pid: PidGains,
    pub heading_pid: PidGains,
    pub fuzzy: FuzzyConfig,
    pub reward: RewardConfig,
    /// Seed for the agent's random source; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl SimulationConfig {
    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_hyperparameters(mut self, hyperparameters: Hyperparameters) -> Self {
        self.agent.hyperparameters = hyperparameters;
        self
    }

    pub fn with_discretizer(mut self, discretizer: StateDiscretizer) -> Self {
        self.agent.discretizer = discretizer;
        self
    }

    pub fn with_bootstrap(mut self, bootstrap: BootstrapMode) -> Self {
        self.agent.bootstrap = bootstrap;
        self
    }

    pub fn with_velocity_pid(mut self, gains: PidGains) -> Self {
        self.velocity_pid = gains;
        self
    }

    pub fn with_heading_pid(mut self, gains: PidGains) -> Self {
        self.heading_pid = gains;
        self
    }

    pub fn with_fuzzy(mut self, fuzzy: FuzzyConfig) -> Self {
        self.fuzzy = fuzzy;
        self
    }

    pub fn with_reward(mut self, reward: RewardConfig) -> Self {
        self.reward = reward;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.agent.validate()?;
        self.velocity_pid.validate("velocity")?;
        self.heading_pid.validate("heading")?;
        self.fuzzy.validate()?;
        self.reward.validate()?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open config {path:?}"),
            source,
        })?;
        let config: Self =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| {
                if e.is_io() {
                    Error::Serialization(e)
                } else {
                    Error::config(format!("malformed config {path:?}: {e}"))
                }
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create config {path:?}"),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
