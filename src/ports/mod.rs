//! Ports (trait boundaries) for external collaborators.
//!
//! The simulation core only talks to the outside world through these traits;
//! concrete implementations live in [`adapters`](crate::adapters) and
//! [`pipeline`](crate::pipeline).

pub mod observer;
pub mod sink;

pub use observer::TickObserver;
pub use sink::PoseSink;
