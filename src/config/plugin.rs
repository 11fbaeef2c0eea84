//! Task registration plugins
//!
//! Anything that contributes tasks implements [`Plugin`]. Plan files and
//! task files are plugins, and so is any closure over a [`Registry`], which
//! is how native Rust tasks are added next to plan-defined ones.

use crate::config::parse::{load_task_folder, TaskFile};
use crate::config::schema::{validate_plan, validate_task};
use crate::config::types::{Plan, TaskSpec};
use crate::error::Result;
use crate::runner::{Registry, ShellAction, TaskKind};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A unit that registers tasks
pub trait Plugin {
    fn register(&self, registry: &mut Registry) -> Result<()>;
}

impl<F> Plugin for F
where
    F: Fn(&mut Registry) -> Result<()>,
{
    fn register(&self, registry: &mut Registry) -> Result<()> {
        self(registry)
    }
}

/// A parsed plan together with where it was loaded from
#[derive(Debug, Clone)]
pub struct LoadedPlan {
    pub path: PathBuf,
    pub plan: Plan,
}

impl LoadedPlan {
    pub fn new(path: impl Into<PathBuf>, plan: Plan) -> Self {
        LoadedPlan {
            path: path.into(),
            plan,
        }
    }

    /// Directory containing the plan file; task folders resolve against it
    pub fn home(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl Plugin for LoadedPlan {
    /// Task folders register first, in the order listed, then the plan's own
    /// tasks, so a plan can override a loaded definition.
    fn register(&self, registry: &mut Registry) -> Result<()> {
        validate_plan(&self.plan)?;

        for folder in &self.plan.load {
            let dir = self.home().join(folder);
            debug!(dir = %dir.display(), "loading task folder");
            for task_file in load_task_folder(&dir)? {
                task_file.register(registry)?;
            }
        }

        for (name, spec) in &self.plan.tasks {
            define_task(registry, name, spec);
        }
        Ok(())
    }
}

impl Plugin for TaskFile {
    fn register(&self, registry: &mut Registry) -> Result<()> {
        for (name, spec) in &self.tasks {
            validate_task(name, spec)?;
        }
        for (name, spec) in &self.tasks {
            define_task(registry, name, spec);
        }
        Ok(())
    }
}

/// Define one validated task spec in the registry
fn define_task(registry: &mut Registry, name: &str, spec: &TaskSpec) {
    let kind = match spec {
        TaskSpec::Composite(members) => TaskKind::Composite(members.clone()),
        TaskSpec::Command(command) => TaskKind::Action(Box::new(ShellAction::from_command(command.clone()))),
        TaskSpec::Detailed(detail) => match (&detail.run, &detail.tasks) {
            (_, Some(members)) => TaskKind::Composite(members.clone()),
            (steps, None) => TaskKind::Action(Box::new(ShellAction::from_config(
                steps.clone().unwrap_or_default(),
            ))),
        },
    };

    let replaced = match spec.description() {
        Some(description) => registry.define_with_description(name, description, kind),
        None => registry.define(name, kind),
    };
    if replaced.is_some() {
        debug!(task = name, "task redefined");
    }
}
