//! Error types for the vehicle control crate

use thiserror::Error;

/// Main error type for the vehicle control crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid time step {dt}: must be positive and finite")]
    InvalidTimeStep { dt: f64 },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("state {value} is not finite and cannot be mapped to a table key")]
    NonFiniteState { value: f64 },

    #[error("update requested without a pending action; choose an action first")]
    NoActionChosen,

    #[error("reward {reward} is not finite")]
    NonFiniteReward { reward: f64 },

    #[error("numeric divergence at tick {tick}: {quantity} is not finite")]
    Divergence { tick: u64, quantity: &'static str },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("unsupported save format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected input: bad time step, bad configuration, unusable state.
    InvalidInput,
    /// An external collaborator (file, sink) could not be opened or written.
    Resource,
    /// The simulation produced non-finite values.
    Divergence,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidTimeStep { .. }
            | Error::InvalidConfiguration { .. }
            | Error::NonFiniteState { .. }
            | Error::NoActionChosen
            | Error::NonFiniteReward { .. }
            | Error::UnsupportedVersion { .. } => ErrorKind::InvalidInput,
            Error::Divergence { .. } => ErrorKind::Divergence,
            Error::Io { .. }
            | Error::Csv(_)
            | Error::Serialization(_)
            | Error::SerializationContext { .. }
            | Error::ProgressBarTemplate { .. } => ErrorKind::Resource,
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            Error::InvalidTimeStep { dt: 0.0 }.kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(Error::config("bad").kind(), ErrorKind::InvalidInput);
        assert_eq!(
            Error::Divergence {
                tick: 3,
                quantity: "velocity"
            }
            .kind(),
            ErrorKind::Divergence
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert_eq!(Error::from(io).kind(), ErrorKind::Resource);
    }

    #[test]
    fn test_display_includes_context() {
        let err = Error::Divergence {
            tick: 12,
            quantity: "heading",
        };
        assert_eq!(
            err.to_string(),
            "numeric divergence at tick 12: heading is not finite"
        );
    }
}
