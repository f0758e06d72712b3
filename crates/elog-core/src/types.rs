//! Validation errors for raw log input.

use thiserror::Error;

/// Why a raw event or option was rejected.
///
/// These never escape the log or the engine: malformed elements are dropped
/// (or defaulted) and the reason is logged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was absent.
    #[error("{field} is missing")]
    MissingField { field: &'static str },

    /// The status was not one of the codes 1-4 or their labels.
    #[error("invalid duty status: {value}")]
    InvalidStatus { value: String },

    /// The timestamp could not be parsed into an instant.
    #[error("invalid timestamp: {value}")]
    InvalidTimestamp { value: String },
}
