//! Variable interpolation for strings
//!
//! Replaces `${var}` references with values from the run context, falling
//! back to the process environment.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::env;
use std::sync::OnceLock;

fn var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("variable pattern is valid"))
}

/// Interpolate variables in a string
///
/// Supports:
/// - `${var}` - variable from the given map
/// - Environment variables (when not found in the map)
///
/// Unknown variables are left untouched. Substituted values are inserted
/// as-is and never scanned for further references, so file names and other
/// data containing `${...}` survive intact.
pub fn interpolate(s: &str, vars: &HashMap<String, String>) -> String {
    var_pattern()
        .replace_all(s, |caps: &Captures| {
            let var_name = &caps[1];

            if let Some(value) = vars.get(var_name) {
                return value.clone();
            }

            env::var(var_name).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

/// Interpolate a list of strings
pub fn interpolate_list(list: &[String], vars: &HashMap<String, String>) -> Vec<String> {
    list.iter().map(|s| interpolate(s, vars)).collect()
}
