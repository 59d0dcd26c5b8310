//! Core error types for workday-core.
//!
//! Validation errors surface to the caller; sink errors are recovered
//! locally by the reconciler and only logged.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for workday-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The lunch offset fell outside the allowed domain
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An alert sink interaction failed
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Lunch offset domain violations.
///
/// Detected before any sink mutation; never retried automatically.
/// The messages match the user-facing wording of the mobile app.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Offset was zero or negative
    #[error("Lunch must start after you have worked at least 1 minute.")]
    TooEarly,

    /// Offset reached the 4 h 30 m cap
    #[error("Lunch must start before 4 h 30 m of work.")]
    TooLate,
}

/// Alert sink failures.
///
/// The reconciler treats all of these as recoverable: submissions are
/// best-effort, queries fall back to "no change this round."
#[derive(Error, Debug)]
pub enum SinkError {
    /// A single trigger failed to register
    #[error("Failed to submit trigger '{id}': {message}")]
    Submit { id: String, message: String },

    /// Outstanding triggers could not be retrieved
    #[error("Failed to query outstanding triggers: {0}")]
    Query(String),

    /// One or more triggers could not be canceled
    #[error("Failed to cancel triggers: {0}")]
    Cancel(String),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Data directory could not be resolved or created
    #[error("Failed to resolve data directory: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        DatabaseError::QueryFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
