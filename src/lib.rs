//! Stagehand - a small YAML-driven task orchestrator
//!
//! A plan file (`stagehand.yml`) registers named tasks: shell actions or
//! ordered lists of other tasks. The runner executes a requested list of
//! tasks in order, and tasks can resolve include/exclude glob patterns
//! against the project tree to build deployment manifests.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod expand;
pub mod runner;
pub mod ui;

// Re-export commonly used types
pub use error::{Result, StagehandError};
pub use expand::{expand, ExpandOptions, Patterns};
pub use runner::{Context, Registry, Runner};

/// Current version of Stagehand
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
