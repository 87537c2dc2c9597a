//! This module defines all error types used throughout the application.

use crate::state_machine::StateId;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV decoding errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A state or transition table that cannot be turned into a machine
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// No direct transition between the current state and the requested one
    #[error("No transition defined between {from} and {to}")]
    InvalidTransition { from: String, to: String },

    /// A state id outside of the machine's state sequence
    #[error("Invalid state id: {0}")]
    InvalidStateId(StateId),

    /// The requested state cannot be reached from the current one
    #[error("State '{to}' is not reachable from state '{from}'")]
    Unreachable { from: String, to: String },

    /// A listener callback failed
    #[error("Listener error: {0}")]
    Listener(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file parsing errors
    #[error("Configuration parsing error in {file:?}: {message}")]
    ConfigParse { file: PathBuf, message: String },

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),

    /// Wrapped anyhow errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a custom error with a message
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create a malformed input error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    /// Create a listener error
    pub fn listener(msg: impl Into<String>) -> Self {
        Self::Listener(msg.into())
    }

    /// Check if the error leaves the machine usable, i.e. the caller may retry
    /// with another target
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::InvalidTransition { .. } | Error::Unreachable { .. } | Error::InvalidStateId(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Custom(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::custom("test error");
        assert_eq!(err.to_string(), "test error");

        let err = Error::malformed("unknown state 'foo'");
        assert_eq!(err.to_string(), "Malformed input: unknown state 'foo'");
    }

    #[test]
    fn test_invalid_transition_names_both_states() {
        let err = Error::InvalidTransition {
            from: "start".to_string(),
            to: "end".to_string(),
        };
        assert_eq!(err.to_string(), "No transition defined between start and end");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_recoverable() {
        assert!(Error::InvalidStateId(7).is_recoverable());
        assert!(!Error::malformed("bad row").is_recoverable());
        assert!(!Error::listener("boom").is_recoverable());
    }
}
