//! # Error Types
//!
//! Structured error types for pi_core. Every failure of a computation surfaces
//! as one of these variants; nothing is retried or replaced with a partial
//! value.
//!
//! ## Example
//!
//! ```rust
//! use pi_core::errors::{PiError, PiResult};
//!
//! fn validate_workers(workers: i64) -> PiResult<usize> {
//!     if workers <= 0 {
//!         return Err(PiError::invalid_input(
//!             "workers",
//!             workers.to_string(),
//!             "Worker count must be positive",
//!         ));
//!     }
//!     Ok(workers as usize)
//! }
//!
//! assert!(validate_workers(0).unwrap_err().is_configuration_error());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for pi_core operations
pub type PiResult<T> = Result<T, PiError>;

/// Structured error type for pi computations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum PiError {
    /// An argument is out of its domain (precision, worker count, range bounds)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// An arithmetic primitive failed, or a worker was lost
    #[error("Computation failed: {operation} - {reason}")]
    ComputationFailed { operation: String, reason: String },

    /// The parallel path did not finish before its deadline
    #[error("Timed out after {deadline_ms} ms with {completed}/{total} ranges complete")]
    Timeout {
        deadline_ms: u64,
        completed: usize,
        total: usize,
    },

    /// A worker stopped because the computation was abandoned
    #[error("Computation cancelled")]
    Cancelled,

    /// A configuration file could not be read or parsed
    #[error("Config error in '{path}': {reason}")]
    ConfigError { path: String, reason: String },
}

impl PiError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        PiError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a ComputationFailed error
    pub fn computation_failed(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        PiError::ComputationFailed {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create a ConfigError
    pub fn config_error(path: impl Into<String>, reason: impl Into<String>) -> Self {
        PiError::ConfigError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the caller's arguments or configuration
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, PiError::InvalidInput { .. } | PiError::ConfigError { .. })
    }

    /// True when the computation ran out of time
    pub fn is_timeout(&self) -> bool {
        matches!(self, PiError::Timeout { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            PiError::InvalidInput { .. } => "INVALID_INPUT",
            PiError::ComputationFailed { .. } => "COMPUTATION_FAILED",
            PiError::Timeout { .. } => "TIMEOUT",
            PiError::Cancelled => "CANCELLED",
            PiError::ConfigError { .. } => "CONFIG_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = PiError::invalid_input("workers", "-1", "Worker count must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: PiError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            PiError::computation_failed("divide", "division by zero").error_code(),
            "COMPUTATION_FAILED"
        );
        assert_eq!(PiError::Cancelled.error_code(), "CANCELLED");
        let timeout = PiError::Timeout {
            deadline_ms: 10,
            completed: 1,
            total: 4,
        };
        assert_eq!(timeout.error_code(), "TIMEOUT");
    }

    #[test]
    fn test_error_kinds_are_distinct() {
        let timeout = PiError::Timeout {
            deadline_ms: 10,
            completed: 0,
            total: 2,
        };
        assert!(timeout.is_timeout());
        assert!(!timeout.is_configuration_error());

        let failed = PiError::computation_failed("sqrt", "negative operand");
        assert!(!failed.is_timeout());
        assert!(!failed.is_configuration_error());

        assert!(PiError::config_error("pi.toml", "bad key").is_configuration_error());
    }

    #[test]
    fn test_timeout_message() {
        let timeout = PiError::Timeout {
            deadline_ms: 1500,
            completed: 3,
            total: 8,
        };
        assert_eq!(
            timeout.to_string(),
            "Timed out after 1500 ms with 3/8 ranges complete"
        );
    }
}
