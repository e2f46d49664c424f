//! Persistence for trained agents.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{agent::QLearningAgent, config::AgentConfig, q_table::QTable};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct AgentState {
    config: AgentConfig,
    q_table: QTable,
    epsilon: f64,
    alpha: f64,
    updates: u64,
    rng_seed: Option<u64>,
}

/// Snapshot of an agent's learned table and current schedule position.
///
/// The random source itself is not stored; a restored agent is reseeded
/// from the recorded seed (or from entropy when none was given).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedAgent {
    pub version: u32,
    state: AgentState,
}

impl SavedAgent {
    pub const VERSION: u32 = 1;

    pub fn from_agent<R: Rng>(agent: &QLearningAgent<R>, rng_seed: Option<u64>) -> Self {
        Self {
            version: Self::VERSION,
            state: AgentState {
                config: *agent.config(),
                q_table: agent.q_table().clone(),
                epsilon: agent.epsilon(),
                alpha: agent.alpha(),
                updates: agent.updates(),
                rng_seed,
            },
        }
    }

    pub fn to_agent(&self) -> Result<QLearningAgent> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }
        let state = self.state.clone();
        QLearningAgent::restore(
            state.config,
            state.q_table,
            state.epsilon,
            state.alpha,
            state.updates,
            state.rng_seed,
        )
    }

    pub fn config(&self) -> &AgentConfig {
        &self.state.config
    }

    pub fn q_table(&self) -> &QTable {
        &self.state.q_table
    }

    pub fn epsilon(&self) -> f64 {
        self.state.epsilon
    }

    pub fn alpha(&self) -> f64 {
        self.state.alpha
    }

    pub fn updates(&self) -> u64 {
        self.state.updates
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write_named(&mut writer, self).map_err(|e| Error::SerializationContext {
            operation: "serialize agent to MessagePack".to_string(),
            message: e.to_string(),
        })?;

        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;
        let reader = BufReader::new(file);

        rmp_serde::decode::from_read(reader).map_err(|e| Error::SerializationContext {
            operation: "deserialize agent from MessagePack".to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::q_learning::{BootstrapMode, StateDiscretizer};

    fn trained_agent() -> QLearningAgent {
        let config = AgentConfig::default()
            .with_discretizer(StateDiscretizer::binned(0.05))
            .with_bootstrap(BootstrapMode::NextState);
        let mut agent = QLearningAgent::new(config).unwrap().with_seed(7);
        for i in 0..40 {
            let state = (i as f64 * 0.21).cos() * 0.4;
            agent.choose_action(state).unwrap();
            agent
                .update_transition(state, if state.abs() < 0.1 { 10.0 } else { -1.0 }, state * 0.9)
                .unwrap();
        }
        agent
    }

    #[test]
    fn test_roundtrip_bytes() {
        let agent = trained_agent();
        let saved = SavedAgent::from_agent(&agent, agent.seed());
        let bytes = rmp_serde::to_vec_named(&saved).unwrap();
        let loaded: SavedAgent = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(loaded, saved);

        let restored = loaded.to_agent().unwrap();
        assert_eq!(restored.q_table(), agent.q_table());
        assert_eq!(restored.epsilon(), agent.epsilon());
        assert_eq!(restored.alpha(), agent.alpha());
        assert_eq!(restored.updates(), 40);
        assert_eq!(restored.bootstrap(), BootstrapMode::NextState);
        assert_eq!(restored.seed(), Some(7));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("agent.msgpack");
        let agent = trained_agent();

        SavedAgent::from_agent(&agent, agent.seed())
            .save_to_file(&path)
            .unwrap();
        let loaded = SavedAgent::load_from_file(&path).unwrap();
        assert_eq!(loaded.q_table().states(), agent.q_table().states());
    }

    #[test]
    fn test_version_mismatch() {
        let agent = trained_agent();
        let mut saved = SavedAgent::from_agent(&agent, None);
        saved.version = 99;
        assert!(matches!(
            saved.to_agent(),
            Err(Error::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_missing_file_is_resource_error() {
        let dir = TempDir::new().unwrap();
        let err = SavedAgent::load_from_file(dir.path().join("nope.msgpack")).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Resource);
    }
}
