//! CLI interface and argument parsing
//!
//! This module locates the plan file, turns the command line into a task
//! list and hands it to the runner.

pub mod app;

// Re-export main types
pub use app::*;
