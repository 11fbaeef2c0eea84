//! Task registration and execution
//!
//! Tasks live in a [`Registry`] as either actions or ordered lists of other
//! task references. A [`Runner`] executes a list of references in order,
//! threading one [`Context`] through the whole run.

pub mod action;
pub mod command;
pub mod context;
pub mod interpolate;
pub mod registry;
pub mod task;

// Re-export main types
pub use action::*;
pub use command::*;
pub use context::*;
pub use interpolate::*;
pub use registry::*;
pub use task::*;
