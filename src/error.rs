//! Error types for the burst engine.
//!
//! Every failure is a local precondition violation surfaced synchronously to
//! the host, which decides whether to skip the tick or stop. Capacity
//! exhaustion is deliberately absent: it is a truncation policy, not an error
//! (see [`crate::compactor`]).

use std::time::Duration;
use thiserror::Error;

/// Errors returned by [`crate::BurstEngine`] and [`crate::EngineConfig`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// An argument was rejected, e.g. a non-finite spawn origin.
    #[error("invalid argument `{what}`: {detail}")]
    InvalidArgument {
        /// Name of the offending argument.
        what: &'static str,
        /// Human-readable reason.
        detail: String,
    },

    /// The particle buffer is not allocated (released and not re-allocated).
    #[error("particle buffer is not initialized; call `allocate()` first")]
    NotInitialized,

    /// `advance` was called with a timestamp earlier than the previous one.
    #[error("time went backwards: last tick at {last:?}, requested {now:?}")]
    NonMonotonicTime {
        /// Timestamp of the previous tick.
        last: Duration,
        /// Timestamp passed to this tick.
        now: Duration,
    },

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration file could not be read.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub(crate) fn invalid_argument(what: &'static str, detail: impl Into<String>) -> Self {
        EngineError::InvalidArgument {
            what,
            detail: detail.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_message() {
        let err = EngineError::invalid_argument("origin", "x is NaN");
        assert_eq!(err.to_string(), "invalid argument `origin`: x is NaN");
    }

    #[test]
    fn test_toml_error_converts() {
        let parse_err = toml::from_str::<toml::Value>("capacity = ").unwrap_err();
        let err: EngineError = parse_err.into();
        assert!(matches!(err, EngineError::ConfigParse(_)));
    }
}
