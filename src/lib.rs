//! Hybrid steering controller for a simulated 2D vehicle
//!
//! This crate provides:
//! - PID and fuzzy controllers for velocity and heading
//! - An ε-greedy Q-learning agent that nudges the velocity each tick
//! - A kinematic simulator combining the controllers and the agent
//! - A run pipeline with target schedules, observers and pose export
//! - Agent persistence and a JSON configuration layer
//!
//! # Example
//!
//! ```
//! use vehicle_control::{
//!     SimulationConfig, VehicleSimulator,
//!     types::{ControlTargets, Pose},
//! };
//!
//! let config = SimulationConfig::default().with_seed(7);
//! let mut simulator = VehicleSimulator::new(Pose::default(), &config)?;
//! simulator.set_controls(ControlTargets::new(1.0, 0.0))?;
//! for _ in 0..10 {
//!     simulator.step(0.1)?;
//! }
//! assert_eq!(simulator.ticks(), 10);
//! # Ok::<(), vehicle_control::Error>(())
//! ```

pub mod adapters;
pub mod app;
pub mod cli;
pub mod control;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod simulator;
pub mod types;

pub use app::SimulationConfig;
pub use error::{Error, ErrorKind, Result};
pub use q_learning::{Action, QLearningAgent, SavedAgent};
pub use simulator::{RewardConfig, TickReport, VehicleSimulator};
