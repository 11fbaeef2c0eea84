//! Run context shared by every task in one invocation
//!
//! A fresh context is created per top-level run and passed by mutable
//! reference into every task and every nested composite, so earlier tasks
//! can leave values for later ones.

use std::collections::HashMap;

/// Mutable key/value state threaded through a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    /// Variables written and read by tasks
    pub vars: HashMap<String, String>,
}

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set variables
    pub fn with_vars(mut self, vars: HashMap<String, String>) -> Self {
        self.vars = vars;
        self
    }

    /// Set a single variable
    pub fn set_var(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Get a variable value
    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Remove a variable, returning its previous value
    pub fn remove_var(&mut self, key: &str) -> Option<String> {
        self.vars.remove(key)
    }

    /// Append a line to a variable, creating it if needed
    pub fn append_line(&mut self, key: &str, line: &str) {
        let entry = self.vars.entry(key.to_string()).or_default();
        if !entry.is_empty() {
            entry.push('\n');
        }
        entry.push_str(line);
    }

    /// Variables visible to an action invoked with `target`
    ///
    /// The target is exposed as `target` (empty when absent) on top of the
    /// context's own variables.
    pub fn scope(&self, target: Option<&str>) -> HashMap<String, String> {
        let mut vars = self.vars.clone();
        vars.insert("target".to_string(), target.unwrap_or_default().to_string());
        vars
    }
}
