//! Classical control elements
//!
//! This module provides the feedback controllers the simulator combines each
//! tick: a PID controller per axis and a stateless fuzzy corrector.

pub mod fuzzy;
pub mod pid;

pub use fuzzy::{FuzzyConfig, FuzzyCorrector};
pub use pid::{PidController, PidGains};
