//! Command execution
//!
//! This module handles executing shell commands for plan-defined actions.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{interpolate, Runner};
use std::collections::HashMap;
use std::process::{Command as StdCommand, Stdio};

/// A shell command step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Simple command string
    Simple(String),

    /// Complex command with options
    Complex {
        exec: String,
        print: String,
        quiet: bool,
        dir: Option<String>,
    },
}

impl Command {
    /// Get the command to execute
    pub fn exec(&self) -> &str {
        match self {
            Command::Simple(cmd) => cmd,
            Command::Complex { exec, .. } => exec,
        }
    }

    /// Get what to print
    pub fn print(&self) -> &str {
        match self {
            Command::Simple(cmd) => cmd,
            Command::Complex { print, .. } => print,
        }
    }

    /// Check if this command is quiet
    pub fn is_quiet(&self) -> bool {
        match self {
            Command::Simple(_) => false,
            Command::Complex { quiet, .. } => *quiet,
        }
    }

    /// Get the working directory, relative to the project root
    pub fn dir(&self) -> Option<&str> {
        match self {
            Command::Simple(_) => None,
            Command::Complex { dir, .. } => dir.as_deref(),
        }
    }
}

/// Execute a command with the given variables
///
/// Runs through the runner's interpreter in the project root (or `dir`
/// below it) with `vars` exported to the environment.
pub fn execute_command(
    cmd: &Command,
    vars: &HashMap<String, String>,
    runner: &Runner,
) -> ExecutionResult<()> {
    let exec_str = interpolate(cmd.exec(), vars);

    if !cmd.is_quiet() {
        let print_str = interpolate(cmd.print(), vars);
        runner.printer().command(&print_str);
    }

    let working_dir = match cmd.dir() {
        Some(dir) => runner.root().join(interpolate(dir, vars)),
        None => runner.root().to_path_buf(),
    };

    let Some((program, interpreter_args)) = runner.interpreter().split_first() else {
        return Err(ExecutionError::Spawn {
            program: String::new(),
            error: "interpreter is empty".to_string(),
        });
    };

    let mut command = StdCommand::new(program);
    command.args(interpreter_args);
    command.arg(&exec_str);
    command.current_dir(&working_dir);

    command.stdin(Stdio::inherit());
    command.stdout(Stdio::inherit());
    command.stderr(Stdio::inherit());

    for (key, value) in vars {
        command.env(key, value);
    }

    let status = command.status().map_err(|e| ExecutionError::Spawn {
        program: program.clone(),
        error: e.to_string(),
    })?;

    if !status.success() {
        return Err(ExecutionError::CommandFailed(status.code()));
    }

    Ok(())
}
