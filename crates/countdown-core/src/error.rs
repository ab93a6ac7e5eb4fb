//! Core error types for countdown-core.
//!
//! This module defines the error hierarchy using thiserror. Each subsystem
//! has its own enum; [`CoreError`] wraps them for callers that cross
//! subsystem boundaries.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for countdown-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Event store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Timestamp errors
    #[error("Time error: {0}")]
    Time(#[from] TimeError),

    /// Image export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Could not resolve or create the data directory
    #[error("Failed to access data directory {path}: {message}")]
    DataDir { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration at {path}: {message}")]
    ParseFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Timestamp parsing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    #[error("cannot parse '{0}' as a timestamp")]
    Unparseable(String),

    /// A local wall-clock time that does not exist (DST gap)
    #[error("'{0}' does not exist in the local time zone")]
    NonexistentLocalTime(String),
}

/// Event store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("an event with id '{0}' already exists")]
    DuplicateId(String),

    #[error("Failed to write events to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize events: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Image export errors.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    #[error("JPEG encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("unknown theme '{0}'")]
    UnknownTheme(String),

    #[error("unknown typeface '{0}'")]
    UnknownTypeface(String),

    #[error(transparent)]
    Time(#[from] TimeError),

    #[error("Failed to write image to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Required field left blank
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
