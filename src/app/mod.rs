//! Application layer: configuration shared by the library and the CLI.
//!
//! # Usage
//!
//! ```
//! use vehicle_control::app::SimulationConfig;
//! use vehicle_control::control::PidGains;
//!
//! let config = SimulationConfig::default()
//!     .with_seed(42)
//!     .with_heading_pid(PidGains::new(2.0, 0.0, 0.1).with_integral_limit(5.0));
//! config.validate()?;
//! # Ok::<(), vehicle_control::Error>(())
//! ```

pub mod config;

pub use config::SimulationConfig;
