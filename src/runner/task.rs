//! Task execution
//!
//! The [`Runner`] walks a list of task references strictly in order. Lists
//! registered as composite tasks are run recursively with the same context.

use crate::error::{ExecutionError, ExecutionResult};
use crate::expand::{expand, ExpandOptions, Patterns};
use crate::runner::{Context, Registry, TaskKind, DEFAULT_TASK};
use crate::ui::{Printer, Verbosity};
use std::fmt;
use std::path::{Path, PathBuf};

/// A parsed `name` or `name:target` reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRef<'a> {
    pub name: &'a str,
    pub target: Option<&'a str>,
}

impl<'a> TaskRef<'a> {
    /// Split at the first `:`; anything after it, colons included, is the target
    pub fn parse(reference: &'a str) -> Self {
        match reference.split_once(':') {
            Some((name, target)) => TaskRef {
                name,
                target: Some(target),
            },
            None => TaskRef {
                name: reference,
                target: None,
            },
        }
    }
}

impl fmt::Display for TaskRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            Some(target) => write!(f, "{}:{}", self.name, target),
            None => f.write_str(self.name),
        }
    }
}

/// Where task failures stop propagating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Isolation {
    /// Failures inside a composite are reported at the composite and the
    /// list continues; a failing action listed directly ends the run.
    #[default]
    Composite,

    /// Every top-level entry is isolated. The run continues past any failed
    /// entry and reports how many failed at the end. A composite still stops
    /// at its first failing member.
    EveryEntry,
}

/// Executes task lists against a registry
pub struct Runner {
    registry: Registry,
    root: PathBuf,
    interpreter: Vec<String>,
    isolation: Isolation,
    printer: Printer,
}

impl Runner {
    /// Create a runner for a project rooted at `root`
    pub fn new(registry: Registry, root: impl Into<PathBuf>) -> Self {
        Runner {
            registry,
            root: root.into(),
            interpreter: vec!["sh".to_string(), "-c".to_string()],
            isolation: Isolation::default(),
            printer: Printer::default(),
        }
    }

    /// Set the interpreter used for shell commands
    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Set the failure isolation policy
    pub fn with_isolation(mut self, isolation: Isolation) -> Self {
        self.isolation = isolation;
        self
    }

    /// Set verbosity level
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.printer = Printer::new(verbosity);
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Project root; shell commands run here and file searches start here
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn interpreter(&self) -> &[String] {
        &self.interpreter
    }

    pub fn printer(&self) -> &Printer {
        &self.printer
    }

    /// Run a list of task references in order
    ///
    /// An empty list runs the `default` task. Unknown tasks are reported and
    /// skipped. See [`Isolation`] for how failures propagate.
    pub fn run<S: AsRef<str>>(&self, tasks: &[S], ctx: &mut Context) -> ExecutionResult<()> {
        if tasks.is_empty() {
            return self.run_default(ctx);
        }
        self.run_list(tasks, ctx, self.isolation)
    }

    /// Run the `default` task
    pub fn run_default(&self, ctx: &mut Context) -> ExecutionResult<()> {
        self.run_list(&[DEFAULT_TASK], ctx, self.isolation)
    }

    // Composite members always run under `Isolation::Composite`: the first
    // failing member stops the composite.
    fn run_list<S: AsRef<str>>(
        &self,
        tasks: &[S],
        ctx: &mut Context,
        isolation: Isolation,
    ) -> ExecutionResult<()> {
        let mut failed = 0;

        for reference in tasks {
            let task_ref = TaskRef::parse(reference.as_ref());

            let Some(entry) = self.registry.lookup(task_ref.name) else {
                self.printer
                    .error(&format!("Task not found: {}", task_ref.name));
                continue;
            };

            match &entry.kind {
                TaskKind::Composite(members) => {
                    self.printer.debug(&format!(
                        "Running task list '{}': {}",
                        entry.name,
                        members.join(", ")
                    ));

                    if let Err(e) = self.run_list(members.as_slice(), ctx, Isolation::Composite) {
                        self.printer
                            .error(&format!("Task '{}' stopped: {}", entry.name, e));
                        if isolation == Isolation::EveryEntry {
                            failed += 1;
                        }
                    }
                }
                TaskKind::Action(action) => {
                    self.printer.task_header(&task_ref.to_string());

                    let result = action.call(task_ref.target, ctx, self).map_err(|source| {
                        ExecutionError::TaskFailed {
                            name: entry.name.clone(),
                            source,
                        }
                    });

                    match result {
                        Ok(()) => self.printer.debug(&format!("Task completed: {}", entry.name)),
                        Err(e) if isolation == Isolation::EveryEntry => {
                            self.printer.error(&e.to_string());
                            failed += 1;
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
        }

        if failed > 0 {
            return Err(ExecutionError::Incomplete(failed));
        }
        Ok(())
    }

    /// Files under the project root matching `patterns`, relative to the root
    pub fn find(&self, patterns: impl Into<Patterns>) -> Vec<PathBuf> {
        self.find_in(patterns, ExpandOptions::default())
    }

    /// Like [`Runner::find`] with explicit walk options
    pub fn find_in(&self, patterns: impl Into<Patterns>, options: impl Into<ExpandOptions>) -> Vec<PathBuf> {
        expand(&self.root, patterns, options)
            .into_iter()
            .filter_map(|path| path.strip_prefix(&self.root).ok().map(Path::to_path_buf))
            .collect()
    }
}

impl fmt::Debug for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("root", &self.root)
            .field("tasks", &self.registry.len())
            .field("isolation", &self.isolation)
            .finish()
    }
}
