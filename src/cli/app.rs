//! Main CLI application

use crate::config::{parse_plan_auto, parse_plan_file, LoadedPlan, Plugin};
use crate::error::StagehandError;
use crate::runner::{Context, Isolation, Registry, Runner};
use crate::ui::{format_listing, Verbosity};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// CLI application
pub struct App {
    /// The clap command
    command: Command,
    /// Loaded plan
    plan: LoadedPlan,
    /// Tasks registered by the plan
    registry: Registry,
}

impl App {
    /// Create a new app by discovering the plan file
    pub fn new() -> Result<Self, StagehandError> {
        let (plan, plan_path) = parse_plan_auto()?;
        Self::from_plan(LoadedPlan::new(plan_path, plan))
    }

    /// Create app with a specific plan file
    pub fn with_plan_file(path: PathBuf) -> Result<Self, StagehandError> {
        let plan = parse_plan_file(&path)?;
        Self::from_plan(LoadedPlan::new(path, plan))
    }

    fn from_plan(plan: LoadedPlan) -> Result<Self, StagehandError> {
        let mut registry = Registry::new();
        plan.register(&mut registry)?;

        let command = build_command(&plan, &registry);

        Ok(App {
            command,
            plan,
            registry,
        })
    }

    /// Run the application with the process arguments
    pub fn run(self) -> Result<(), StagehandError> {
        self.run_from(std::env::args_os())
    }

    /// Run the application with the given arguments
    pub fn run_from<I, T>(self, args: I) -> Result<(), StagehandError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.clone().get_matches_from(args);

        if matches.get_flag("list") {
            print!("{}", format_listing(self.registry.listing()));
            return Ok(());
        }

        let tasks: Vec<String> = matches
            .get_many::<String>("tasks")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        let root = fs::canonicalize(self.plan.home())?;
        let isolation = if matches.get_flag("keep-going") {
            Isolation::EveryEntry
        } else {
            Isolation::Composite
        };

        let mut runner = Runner::new(self.registry, root)
            .with_verbosity(get_verbosity(&matches))
            .with_isolation(isolation);

        if let Some(interpreter) = &self.plan.plan.interpreter {
            runner = runner.with_interpreter(interpreter.clone());
        }

        tracing::debug!(?runner, tasks = ?tasks, "starting run");

        // Each invocation gets a fresh context
        let mut ctx = Context::new();
        runner.run(tasks.as_slice(), &mut ctx)?;

        Ok(())
    }
}

/// Build the clap command for a loaded plan
fn build_command(plan: &LoadedPlan, registry: &Registry) -> Command {
    let name = plan.plan.name.clone().unwrap_or_else(|| "stagehand".to_string());
    let about = plan
        .plan
        .usage
        .clone()
        .unwrap_or_else(|| "A small YAML-driven task orchestrator".to_string());

    Command::new(name)
        .version(clap::crate_version!())
        .about(about)
        .after_help(format!("Tasks:\n{}", format_listing(registry.listing())))
        .arg(
            Arg::new("tasks")
                .value_name("TASK[:TARGET]")
                .help("Tasks to run, in order (defaults to 'default')")
                .num_args(0..)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Path to stagehand.yml plan file"),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .help("List available tasks and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("keep-going")
                .short('k')
                .long("keep-going")
                .help("Keep running after any task fails")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print command output and errors")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue),
        )
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Install the stderr diagnostics subscriber
///
/// `RUST_LOG` wins when set; otherwise warnings, or debug output with `--verbose`.
fn init_logging(verbose: bool) {
    let fallback_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI application with the process arguments
pub fn run() -> Result<(), StagehandError> {
    // The plan decides the command's help text, so --file and --verbose
    // have to be read before clap parses anything
    let args: Vec<String> = std::env::args().collect();
    init_logging(has_flag(&args, "--verbose", "-v"));

    let app = if let Some(path) = extract_file_arg(&args) {
        App::with_plan_file(path)?
    } else {
        App::new()?
    };

    app.run_from(args)
}

/// Extract --file argument before clap parsing
fn extract_file_arg(args: &[String]) -> Option<PathBuf> {
    for (i, arg) in args.iter().enumerate() {
        if (arg == "--file" || arg == "-f") && i + 1 < args.len() {
            return Some(PathBuf::from(&args[i + 1]));
        }
        if let Some(path) = arg.strip_prefix("--file=") {
            return Some(PathBuf::from(path));
        }
        // Short form with the value attached, as in `-fplan.yml`
        if let Some(path) = arg.strip_prefix("-f").filter(|rest| !rest.is_empty()) {
            if !arg.starts_with("--") {
                return Some(PathBuf::from(path.strip_prefix('=').unwrap_or(path)));
            }
        }
    }
    None
}

/// Whether a boolean flag appears before clap parsing
fn has_flag(args: &[String], long: &str, short: &str) -> bool {
    args.iter().any(|arg| arg == long || arg == short)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Plan;

    fn empty_command() -> Command {
        build_command(
            &LoadedPlan::new("stagehand.yml", Plan::default()),
            &Registry::new(),
        )
    }

    #[test]
    fn test_get_verbosity_normal() {
        let matches = empty_command().get_matches_from(vec!["stagehand"]);
        assert_eq!(get_verbosity(&matches), Verbosity::Normal);
    }

    #[test]
    fn test_get_verbosity_silent_wins() {
        let matches = empty_command().get_matches_from(vec!["stagehand", "-v", "-s"]);
        assert_eq!(get_verbosity(&matches), Verbosity::Silent);
    }

    #[test]
    fn test_task_arguments_keep_order() {
        let matches =
            empty_command().get_matches_from(vec!["stagehand", "build", "deploy:staging", "build"]);
        let tasks: Vec<&String> = matches.get_many::<String>("tasks").unwrap().collect();
        assert_eq!(tasks, vec!["build", "deploy:staging", "build"]);
    }

    #[test]
    fn test_extract_file_arg() {
        let args = vec![
            "stagehand".to_string(),
            "--file".to_string(),
            "plan.yml".to_string(),
        ];
        let path = extract_file_arg(&args);
        assert_eq!(path, Some(PathBuf::from("plan.yml")));
    }

    #[test]
    fn test_extract_file_arg_short() {
        let args = vec!["stagehand".to_string(), "-f".to_string(), "plan.yml".to_string()];
        let path = extract_file_arg(&args);
        assert_eq!(path, Some(PathBuf::from("plan.yml")));
    }

    #[test]
    fn test_extract_file_arg_equals() {
        let args = vec!["stagehand".to_string(), "--file=plan.yml".to_string()];
        assert_eq!(extract_file_arg(&args), Some(PathBuf::from("plan.yml")));
    }

    #[test]
    fn test_extract_file_arg_attached_short() {
        let args = vec!["stagehand".to_string(), "-fplan.yml".to_string()];
        assert_eq!(extract_file_arg(&args), Some(PathBuf::from("plan.yml")));

        let args = vec!["stagehand".to_string(), "-f=plan.yml".to_string()];
        assert_eq!(extract_file_arg(&args), Some(PathBuf::from("plan.yml")));

        let args = vec!["stagehand".to_string(), "--fast".to_string()];
        assert_eq!(extract_file_arg(&args), None);
    }

    #[test]
    fn test_has_flag() {
        let args = vec!["stagehand".to_string(), "-v".to_string(), "build".to_string()];
        assert!(has_flag(&args, "--verbose", "-v"));
        assert!(!has_flag(&args, "--quiet", "-q"));
    }
}
