//! Error types for the bootstrap settings resolver.

use thiserror::Error;

/// Resolution and coercion errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Unknown option '{name}' (expected one of {})", known.join(", "))]
    UnknownOption { name: String, known: Vec<String> },

    #[error("Unsupported value for '{name}': {reason}")]
    UnsupportedValue { name: String, reason: String },

    #[error("Invalid value '{value}' for '{name}' (allowed: {})", allowed.join(", "))]
    InvalidEnumValue {
        name: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("Invalid language tag: {0}")]
    InvalidLocale(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Source error: {0}")]
    Source(String),
}

impl ConfigError {
    pub(crate) fn unsupported(name: &str, reason: impl Into<String>) -> Self {
        ConfigError::UnsupportedValue {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Persistent store errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid entry for key '{key}': {reason}")]
    InvalidEntry { key: String, reason: String },

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::Unavailable(err.to_string())
    }
}

/// Errors surfaced by the command-line tool
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Settings error: {0}")]
    Settings(#[from] ConfigError),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Watch failed: {0}")]
    WatchFailed(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Serialization(err.to_string())
    }
}
