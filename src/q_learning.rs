//! Tabular Q-learning for the steering correction
//!
//! The agent picks one of two velocity nudges each tick and learns their
//! value from a scalar reward:
//!
//! | Piece | Role |
//! |-------|------|
//! | [`StateDiscretizer`] | Maps the continuous heading error to a table key |
//! | [`QTable`] | Lazily populated action-value table |
//! | [`QLearningAgent`] | ε-greedy selection, TD update, hyperparameter decay |
//! | [`SavedAgent`] | MessagePack persistence of a trained agent |
//!
//! ## Usage Example
//!
//! ```
//! use vehicle_control::q_learning::{AgentConfig, QLearningAgent};
//!
//! let mut agent = QLearningAgent::new(AgentConfig::default())?.with_seed(42);
//! let action = agent.choose_action(0.3)?;
//! agent.update(0.3, -1.0)?;
//! assert_eq!(agent.action(), Some(action));
//! # Ok::<(), vehicle_control::Error>(())
//! ```

pub mod action;
pub mod agent;
pub mod config;
pub mod discretizer;
pub mod q_table;
pub mod serialization;

pub use action::Action;
pub use agent::{AgentPhase, QLearningAgent};
pub use config::{AgentConfig, BootstrapMode, Hyperparameters};
pub use discretizer::{StateDiscretizer, StateKey};
pub use q_table::QTable;
pub use serialization::SavedAgent;
