//! Plan file discovery and parsing

use crate::config::types::{Plan, TaskSpec};
use crate::error::{ConfigError, ConfigResult, StagehandError};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Plan file names to search for, in order of preference
pub const PLAN_FILE_NAMES: &[&str] = &["stagehand.yml", "stagehand.yaml"];

/// A file of task definitions loaded from a task folder
#[derive(Debug, Clone)]
pub struct TaskFile {
    pub path: PathBuf,
    pub tasks: BTreeMap<String, TaskSpec>,
}

/// Find the plan file by searching current and parent directories
pub fn find_plan_file() -> ConfigResult<PathBuf> {
    find_plan_file_from(env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("Failed to get current directory: {}", e))
    })?)
}

/// Find the plan file starting from a specific directory
pub fn find_plan_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in PLAN_FILE_NAMES {
            let plan_path = current_dir.join(file_name);
            searched_paths.push(plan_path.display().to_string());

            if plan_path.is_file() {
                return Ok(plan_path);
            }
        }

        // Try parent directory
        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => {
                // Reached root without finding a plan
                return Err(ConfigError::NotFound(searched_paths.join(", ")));
            }
        }
    }
}

/// Parse a plan file from a path
pub fn parse_plan_file(path: &Path) -> Result<Plan, StagehandError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ConfigError::Invalid(format!("Failed to read {}: {}", path.display(), e)))?;

    parse_plan(&contents)
}

/// Parse a plan from a string
pub fn parse_plan(yaml: &str) -> Result<Plan, StagehandError> {
    // An empty file is an empty plan
    if yaml.trim().is_empty() {
        return Ok(Plan::default());
    }
    Ok(serde_yaml::from_str(yaml)?)
}

/// Load a single task file: a mapping of task names to definitions
pub fn parse_task_file(path: &Path) -> ConfigResult<TaskFile> {
    let load_error = |error: String| ConfigError::LoadFile {
        path: path.to_path_buf(),
        error,
    };

    let contents = fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
    let tasks = if contents.trim().is_empty() {
        BTreeMap::new()
    } else {
        serde_yaml::from_str(&contents).map_err(|e| load_error(e.to_string()))?
    };

    Ok(TaskFile {
        path: path.to_path_buf(),
        tasks,
    })
}

/// Load every task file directly inside `dir`
///
/// Subdirectories and hidden files are skipped. Files load in name order.
pub fn load_task_folder(dir: &Path) -> ConfigResult<Vec<TaskFile>> {
    let folder_error = |error: String| ConfigError::LoadFolder {
        path: dir.to_path_buf(),
        error,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| folder_error(e.to_string()))? {
        let entry = entry.map_err(|e| folder_error(e.to_string()))?;
        let path = entry.path();

        if entry.file_name().to_string_lossy().starts_with('.') || path.is_dir() {
            continue;
        }
        paths.push(path);
    }
    paths.sort();

    paths
        .iter()
        .map(|path| {
            debug!(path = %path.display(), "loading task file");
            parse_task_file(path)
        })
        .collect()
}

/// Discover and parse the plan file
pub fn parse_plan_auto() -> Result<(Plan, PathBuf), StagehandError> {
    let plan_path = find_plan_file()?;
    let plan = parse_plan_file(&plan_path)?;
    Ok((plan, plan_path))
}
