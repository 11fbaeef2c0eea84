//! Plan validation
//!
//! Checks the parts of a plan serde cannot express: task names that can be
//! referenced, exactly one body per task, and a usable interpreter.

use crate::config::types::{Plan, TaskSpec};
use crate::error::{ConfigError, ConfigResult};
use std::collections::BTreeMap;

/// Validate a complete plan
pub fn validate_plan(plan: &Plan) -> ConfigResult<()> {
    if let Some(interpreter) = &plan.interpreter {
        if interpreter.is_empty() {
            return Err(ConfigError::Invalid(
                "interpreter must name a program".to_string(),
            ));
        }
    }

    validate_tasks(&plan.tasks)
}

/// Validate a set of task definitions
pub fn validate_tasks(tasks: &BTreeMap<String, TaskSpec>) -> ConfigResult<()> {
    for (name, task) in tasks {
        validate_task(name, task)?;
    }
    Ok(())
}

/// Validate a single task
pub fn validate_task(name: &str, task: &TaskSpec) -> ConfigResult<()> {
    validate_task_name(name)?;

    if let TaskSpec::Detailed(detail) = task {
        if detail.run.is_some() == detail.tasks.is_some() {
            return Err(ConfigError::AmbiguousTask(name.to_string()));
        }
    }

    Ok(())
}

/// Task names are referenced as `name` or `name:target`, so they cannot contain `:`
pub fn validate_task_name(name: &str) -> ConfigResult<()> {
    if name.trim().is_empty() || name.contains(':') {
        return Err(ConfigError::InvalidTaskName(name.to_string()));
    }
    Ok(())
}
