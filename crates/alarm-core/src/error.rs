//! Core error types for alarm-core.
//!
//! Every fallible operation in the library returns one of these via
//! the [`Result`] alias. The CLI boundary boxes them.

use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Core error type for alarm-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Credential check failures
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Alarm store failures
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration failures
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rejected input values
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Due time would fall outside the representable range
    #[error("Alarm offset of {offset_secs} seconds is out of range")]
    OffsetOutOfRange { offset_secs: i64 },
}

/// Credential check errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    /// Password did not match the expected value
    #[error("invalid credentials for '{username}'")]
    InvalidCredentials { username: String },
}

/// Alarm store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backing file exists but is not an array of alarms
    #[error("alarm file {path} is not readable as an alarm list: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serializing the in-memory sequence failed
    #[error("Failed to serialize alarms: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Per-user index does not address one of the user's alarms
    #[error("Invalid alarm index {index} for '{username}' (alarms: {len})")]
    IndexOutOfRange {
        username: String,
        index: usize,
        len: usize,
    },

    /// No alarm with this id in the store
    #[error("Alarm {0} not found")]
    NotFound(Uuid),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to write configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// No platform config directory
    #[error("Could not determine the configuration directory")]
    NoConfigDir,
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
