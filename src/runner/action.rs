//! Actions defined in plan files
//!
//! A [`ShellAction`] is a list of steps. Each step may find files, run
//! shell commands, run other tasks and update the run context.

use crate::config;
use crate::error::{ExecutionError, ExecutionResult};
use crate::expand::ExpandOptions;
use crate::runner::{execute_command, interpolate, interpolate_list, Action, Command, Context, Runner};
use std::fs;
use std::path::PathBuf;

/// Runtime representation of a plan-defined action
#[derive(Debug, Clone, Default)]
pub struct ShellAction {
    pub steps: Vec<Step>,
}

impl ShellAction {
    /// Create from config
    pub fn from_config(steps: Vec<config::Step>) -> Self {
        ShellAction {
            steps: steps.into_iter().map(Step::from_config).collect(),
        }
    }

    /// An action running one command
    pub fn from_command(command: impl Into<String>) -> Self {
        ShellAction {
            steps: vec![Step {
                commands: vec![Command::Simple(command.into())],
                ..Step::default()
            }],
        }
    }
}

impl Action for ShellAction {
    fn call(&self, target: Option<&str>, ctx: &mut Context, runner: &Runner) -> anyhow::Result<()> {
        for step in &self.steps {
            step.execute(target, ctx, runner)?;
        }
        Ok(())
    }
}

/// Runtime representation of a run step
#[derive(Debug, Clone, Default)]
pub struct Step {
    /// File search to run first
    pub find: Option<Find>,

    /// Commands to execute
    pub commands: Vec<Command>,

    /// Task references to run
    pub tasks: Vec<String>,

    /// Context variables to set or remove
    pub set: Vec<(String, Option<String>)>,
}

impl Step {
    /// Create from config
    pub fn from_config(config: config::Step) -> Self {
        match config {
            config::Step::SimpleCommand(cmd) => Step {
                commands: vec![Command::Simple(cmd)],
                ..Step::default()
            },
            config::Step::Complex(item) => Step {
                find: item.find.map(Find::from_config),
                commands: item.command.into_iter().map(command_from_config).collect(),
                tasks: item.task,
                set: item.set.into_iter().collect(),
            },
        }
    }

    /// Execute this step: find, then commands, then tasks, then set
    pub fn execute(&self, target: Option<&str>, ctx: &mut Context, runner: &Runner) -> anyhow::Result<()> {
        if let Some(find) = &self.find {
            find.execute(target, ctx, runner)?;
        }

        for cmd in &self.commands {
            execute_command(cmd, &ctx.scope(target), runner)?;
        }

        if !self.tasks.is_empty() {
            let tasks = interpolate_list(&self.tasks, &ctx.scope(target));
            runner.run(tasks.as_slice(), ctx)?;
        }

        for (key, value) in &self.set {
            match value {
                Some(value) => {
                    let value = interpolate(value, &ctx.scope(target));
                    ctx.set_var(key.clone(), value);
                }
                None => {
                    ctx.remove_var(key);
                }
            }
        }

        Ok(())
    }
}

fn command_from_config(config: config::CommandSpec) -> Command {
    match config {
        config::CommandSpec::Simple(cmd) => Command::Simple(cmd),
        config::CommandSpec::Complex(detail) => Command::Complex {
            print: detail.print.clone().unwrap_or_else(|| detail.exec.clone()),
            exec: detail.exec,
            quiet: detail.quiet,
            dir: detail.dir,
        },
    }
}

/// Runtime representation of a file search
#[derive(Debug, Clone)]
pub struct Find {
    pub patterns: Vec<String>,
    pub dir: Option<String>,
    pub into: String,
    pub output: Option<String>,
}

impl Find {
    /// Create from config
    pub fn from_config(config: config::Find) -> Self {
        Find {
            patterns: config.patterns,
            dir: config.dir,
            into: config.into,
            output: config.output,
        }
    }

    /// Resolve the patterns against the project root
    ///
    /// Stores the root-relative paths, one per line, in the context and
    /// optionally writes them to a manifest file.
    pub fn execute(&self, target: Option<&str>, ctx: &mut Context, runner: &Runner) -> ExecutionResult<Vec<PathBuf>> {
        let vars = ctx.scope(target);
        let patterns = interpolate_list(&self.patterns, &vars);
        let options = match &self.dir {
            Some(dir) => ExpandOptions::from(interpolate(dir, &vars)),
            None => ExpandOptions::default(),
        };

        let files = runner.find_in(patterns, options);
        let listing: Vec<String> = files
            .iter()
            .map(|path| path.to_string_lossy().replace('\\', "/"))
            .collect();

        runner
            .printer()
            .info(&format!("Found {} file(s) for '{}'", files.len(), self.into));
        ctx.set_var(self.into.clone(), listing.join("\n"));

        if let Some(output) = &self.output {
            let path = runner.root().join(interpolate(output, &vars));
            let mut contents = listing.join("\n");
            if !contents.is_empty() {
                contents.push('\n');
            }
            fs::write(&path, contents).map_err(|e| ExecutionError::Manifest {
                path: path.clone(),
                error: e.to_string(),
            })?;
            runner
                .printer()
                .debug(&format!("Wrote manifest {}", path.display()));
        }

        Ok(files)
    }
}
