//! Error types for Stagehand

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Stagehand operations
pub type Result<T> = std::result::Result<T, StagehandError>;

/// Main error type for Stagehand
#[derive(Error, Debug)]
pub enum StagehandError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Task execution errors
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Plan file discovery, parsing and registration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to locate a plan file (searched: {0})")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid task name '{0}': names must be non-empty and must not contain ':'")]
    InvalidTaskName(String),

    #[error("Task '{0}' must define exactly one of 'run' or 'tasks'")]
    AmbiguousTask(String),

    #[error("Failed to read task folder '{path}': {error}")]
    LoadFolder { path: PathBuf, error: String },

    #[error("Failed to load task file '{path}': {error}")]
    LoadFile { path: PathBuf, error: String },
}

/// Task execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command failed with exit code {0:?}")]
    CommandFailed(Option<i32>),

    #[error("Failed to start '{program}': {error}")]
    Spawn { program: String, error: String },

    #[error("Task '{name}' failed: {source:#}")]
    TaskFailed {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("{0} task(s) failed")]
    Incomplete(usize),

    #[error("Failed to write manifest '{path}': {error}")]
    Manifest { path: PathBuf, error: String },
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;
