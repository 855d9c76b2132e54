//! Core error types for lasttime-core.
//!
//! This module defines the error hierarchy using thiserror. Task-level
//! failures (unknown or duplicate names) are kept in their own enum so the
//! CLI can report them without treating them as storage faults.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for lasttime-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Task lifecycle errors
    #[error("{0}")]
    Task(#[from] TaskError),

    /// Store-specific errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

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

/// Errors reported by task lifecycle operations.
///
/// None of these mutate the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// A task with this name already exists
    #[error("Task '{0}' already exists.")]
    AlreadyExists(String),

    /// No task with this name
    #[error("Task '{0}' not found. You can add it first.")]
    NotFound(String),

    /// Name was empty after trimming
    #[error("Task name cannot be empty.")]
    EmptyName,
}

/// Store-specific errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to write the store file
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
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

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Home/data directory could not be resolved
    #[error("Could not determine data directory: {0}")]
    DataDir(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
