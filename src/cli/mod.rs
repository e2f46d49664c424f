//! CLI infrastructure for the vehicle controller
//!
//! This module provides the command-line interface for running simulations
//! and inspecting saved agents.

pub mod commands;
pub mod output;
