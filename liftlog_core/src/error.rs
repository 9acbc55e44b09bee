//! Error types for the liftlog_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for liftlog_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backing workout file is structurally unusable
    #[error("Workout store error: {0}")]
    Store(String),

    /// A sets-notation segment did not match the grammar
    #[error("malformed sets entry {segment:?}: {reason}")]
    MalformedEntry { segment: String, reason: String },

    /// A workout row failed validation
    #[error("invalid workout entry: {0}")]
    InvalidEntry(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for a [`Error::MalformedEntry`] over the given segment
    pub(crate) fn malformed(segment: &str, reason: impl Into<String>) -> Self {
        Error::MalformedEntry {
            segment: segment.to_string(),
            reason: reason.into(),
        }
    }
}
