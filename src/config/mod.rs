//! Plan files and task registration
//!
//! This module handles discovery and parsing of stagehand.yml plan files,
//! the task folders they load, and registering their tasks.

pub mod parse;
pub mod plugin;
pub mod schema;
pub mod types;

// Re-export main types
pub use parse::*;
pub use plugin::*;
pub use schema::*;
pub use types::*;
