//! Core configuration types
//!
//! This module defines the data structures that represent a stagehand.yml
//! plan file and the task files it loads.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Top-level plan file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Plan {
    /// Application name (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Application usage description (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Interpreter for shell commands (e.g., ["bash", "-c"])
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<Vec<String>>,

    /// Task folders, relative to the plan file, loaded before `tasks`
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_one_or_many"
    )]
    pub load: Vec<String>,

    /// Tasks defined in the plan
    #[serde(default)]
    pub tasks: BTreeMap<String, TaskSpec>,
}

/// A task definition
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TaskSpec {
    /// Ordered list of task references
    Composite(Vec<String>),

    /// A single shell command
    Command(String),

    /// Full form with a description and either `run` or `tasks`
    Detailed(TaskDetail),
}

impl TaskSpec {
    pub fn description(&self) -> Option<&str> {
        match self {
            TaskSpec::Detailed(detail) => detail.description.as_deref(),
            _ => None,
        }
    }
}

/// Full task definition
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TaskDetail {
    /// Description shown by --list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Steps of an action task
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_list"
    )]
    pub run: Option<Vec<Step>>,

    /// Members of a composite task
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_list"
    )]
    pub tasks: Option<Vec<String>>,
}

/// A run step - a command string or a mapping of actions
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Step {
    /// Simple string command
    SimpleCommand(String),

    /// Step with several kinds of work
    Complex(StepDetail),
}

/// A step with file finding, commands, subtasks and context updates
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StepDetail {
    /// Files to find before running commands
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub find: Option<Find>,

    /// Commands to execute
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_one_or_many"
    )]
    pub command: Vec<CommandSpec>,

    /// Task references to run
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_one_or_many"
    )]
    pub task: Vec<String>,

    /// Context variables to set; `null` removes the variable
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub set: BTreeMap<String, Option<String>>,
}

/// A command to execute
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CommandSpec {
    /// Simple string command
    Simple(String),

    /// Complex command with additional options
    Complex(CommandDetail),
}

/// Detailed command specification
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CommandDetail {
    /// The command to execute
    pub exec: String,

    /// What to print when running (defaults to exec)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print: Option<String>,

    /// Whether to suppress the command echo
    #[serde(default)]
    pub quiet: bool,

    /// Working directory, relative to the plan directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

/// A file search against the project tree
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Find {
    /// Glob patterns; a leading `!` excludes
    #[serde(deserialize_with = "deserialize_one_or_many")]
    pub patterns: Vec<String>,

    /// Directory to start in, relative to the plan directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,

    /// Context variable receiving the newline-separated paths
    #[serde(default = "default_find_var")]
    pub into: String,

    /// Manifest file to write the paths to, relative to the plan directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

fn default_find_var() -> String {
    "files".to_string()
}

/// Deserialize a single value or a sequence into a list
fn deserialize_one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        // Null or not present
        Value::Null => Ok(Vec::new()),
        Value::Sequence(seq) => seq
            .into_iter()
            .map(|item| T::deserialize(item).map_err(D::Error::custom))
            .collect(),
        single => T::deserialize(single)
            .map(|item| vec![item])
            .map_err(D::Error::custom),
    }
}

/// Like `deserialize_one_or_many`, keeping track of whether the key was present
fn deserialize_optional_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    deserialize_one_or_many(deserializer).map(Some)
}
