//! Adapters implementing domain ports.
//!
//! This module contains infrastructure implementations of the traits defined
//! in the ports module.

pub mod csv_sink;
pub mod in_memory_sink;

pub use csv_sink::CsvPoseSink;
pub use in_memory_sink::InMemoryPoseSink;
