//! Core error types for alarmroom-core.
//!
//! Only validation errors ever reach the user. Storage corruption is
//! recovered locally and feedback failures are logged and swallowed, so
//! their types exist mainly for the boundaries that report them.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for alarmroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Rejected user input
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Storage slot errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

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

/// Errors raised synchronously by `submit`. No state is mutated when one
/// of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Neither or both of the scheduling inputs were given
    #[error("provide either a relative time or a clock time")]
    MissingSchedule,

    /// Relative minutes not a positive whole number
    #[error("invalid minutes '{0}': expected a positive whole number")]
    InvalidMinutes(String),

    /// Clock time not in HH:MM form
    #[error("invalid clock time '{0}': expected HH:MM")]
    InvalidClockTime(String),

    /// Pre-alarm lead time not a whole number
    #[error("invalid pre-alarm minutes '{0}': expected a whole number")]
    InvalidPreAlarm(String),
}

/// Storage slot errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open storage at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(#[from] rusqlite::Error),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(#[source] std::io::Error),
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

    /// Key does not exist
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
