//! Subcommands of the `vehicle` binary

pub mod config;
pub mod inspect;
pub mod run;
