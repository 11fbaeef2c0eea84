//! Task registry
//!
//! Maps unique task names to their definitions. Defining a name twice
//! replaces the earlier definition.

use crate::runner::{Context, Runner};
use std::collections::BTreeMap;
use std::fmt;

/// Name of the task run when no task list is given
pub const DEFAULT_TASK: &str = "default";

/// Separator used for the synthesized description of a composite task
pub const COMPOSITE_SEPARATOR: &str = " -> ";

/// An invokable unit of work
///
/// Receives the optional target from a `name:target` reference, the shared
/// run context, and the runner itself so it can run further tasks.
pub trait Action {
    fn call(&self, target: Option<&str>, ctx: &mut Context, runner: &Runner) -> anyhow::Result<()>;
}

impl<F> Action for F
where
    F: Fn(Option<&str>, &mut Context, &Runner) -> anyhow::Result<()>,
{
    fn call(&self, target: Option<&str>, ctx: &mut Context, runner: &Runner) -> anyhow::Result<()> {
        self(target, ctx, runner)
    }
}

/// What a task does when run
pub enum TaskKind {
    /// Run an action
    Action(Box<dyn Action>),

    /// Run other tasks, in order
    Composite(Vec<String>),
}

impl TaskKind {
    /// Wrap a closure as an action
    pub fn action<F>(action: F) -> Self
    where
        F: Fn(Option<&str>, &mut Context, &Runner) -> anyhow::Result<()> + 'static,
    {
        TaskKind::Action(Box::new(action))
    }

    /// Build a composite from task references
    pub fn composite<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TaskKind::Composite(members.into_iter().map(Into::into).collect())
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, TaskKind::Composite(_))
    }
}

impl fmt::Debug for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Action(_) => f.write_str("Action(..)"),
            TaskKind::Composite(members) => f.debug_tuple("Composite").field(members).finish(),
        }
    }
}

/// A registered task
#[derive(Debug)]
pub struct TaskEntry {
    pub name: String,
    pub description: Option<String>,
    pub kind: TaskKind,
}

/// Named task definitions
#[derive(Debug, Default)]
pub struct Registry {
    tasks: BTreeMap<String, TaskEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a task without an explicit description
    ///
    /// Composites get a description made of their members. Returns the
    /// definition this one replaced, if any.
    pub fn define(&mut self, name: impl Into<String>, kind: TaskKind) -> Option<TaskEntry> {
        self.insert(name.into(), None, kind)
    }

    /// Define a task with a description
    pub fn define_with_description(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        kind: TaskKind,
    ) -> Option<TaskEntry> {
        self.insert(name.into(), Some(description.into()), kind)
    }

    /// Define an action task from a closure
    pub fn define_action<F>(&mut self, name: impl Into<String>, action: F) -> Option<TaskEntry>
    where
        F: Fn(Option<&str>, &mut Context, &Runner) -> anyhow::Result<()> + 'static,
    {
        self.define(name, TaskKind::action(action))
    }

    /// Define a composite task from task references
    pub fn define_composite<I, S>(&mut self, name: impl Into<String>, members: I) -> Option<TaskEntry>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.define(name, TaskKind::composite(members))
    }

    fn insert(&mut self, name: String, description: Option<String>, kind: TaskKind) -> Option<TaskEntry> {
        let description = description.or_else(|| match &kind {
            TaskKind::Composite(members) => Some(members.join(COMPOSITE_SEPARATOR)),
            TaskKind::Action(_) => None,
        });

        self.tasks.insert(
            name.clone(),
            TaskEntry {
                name,
                description,
                kind,
            },
        )
    }

    /// Look up a task by name
    pub fn lookup(&self, name: &str) -> Option<&TaskEntry> {
        self.tasks.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Registered names except the default task, sorted, with descriptions
    pub fn listing(&self) -> Vec<(&str, Option<&str>)> {
        self.tasks
            .values()
            .filter(|entry| entry.name != DEFAULT_TASK)
            .map(|entry| (entry.name.as_str(), entry.description.as_deref()))
            .collect()
    }
}
