//! Console output
//!
//! Human-facing messages go to stderr, gated by a verbosity level. Library
//! diagnostics use `tracing` instead and are configured in `cli`.

use colored::Colorize;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    #[default]
    Normal = 2,
    Verbose = 3,
}

/// Verbosity-aware console printer
#[derive(Debug, Clone, Copy, Default)]
pub struct Printer {
    pub verbosity: Verbosity,
}

impl Printer {
    pub fn new(verbosity: Verbosity) -> Self {
        Printer { verbosity }
    }

    /// Print info message
    pub fn info(&self, message: &str) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("{} {}", "[INFO]".green(), message);
        }
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        if self.verbosity >= Verbosity::Quiet {
            eprintln!("{} {}", "[ERROR]".red().bold(), message);
        }
    }

    /// Print debug message (only in verbose mode)
    pub fn debug(&self, message: &str) {
        if self.verbosity >= Verbosity::Verbose {
            eprintln!("{} {}", "[DEBUG]".dimmed(), message);
        }
    }

    /// Print a command before it runs
    pub fn command(&self, command: &str) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("{} {}", "[RUN]".cyan(), command);
        }
    }

    /// Print the banner shown before an action runs
    pub fn task_header(&self, task_name: &str) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("\n{}", task_header(task_name).bold());
        }
    }
}

/// Banner text for a task: the title underlined with dashes
pub fn task_header(task_name: &str) -> String {
    let title = format!("Executing task: {}", task_name);
    let rule = "-".repeat(title.chars().count());
    format!("{}\n{}", title, rule)
}

/// Render the task listing printed by `--list`
pub fn format_listing<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let entries: Vec<_> = entries.into_iter().collect();
    let width = entries.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    let mut out = String::new();
    for (name, description) in entries {
        match description {
            Some(desc) => out.push_str(&format!("  {:<width$}  {}\n", name, desc, width = width)),
            None => out.push_str(&format!("  {}\n", name)),
        }
    }
    out
}
