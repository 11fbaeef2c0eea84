//! Common test utilities

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temporary directory with a stagehand.yml file
pub fn create_test_plan(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let plan_path = temp_dir.path().join("stagehand.yml");
    fs::write(&plan_path, content).unwrap();
    (temp_dir, plan_path)
}

/// Create a test plan with an empty subdirectory to run from
pub fn create_test_plan_in_subdir(content: &str) -> (TempDir, PathBuf, PathBuf) {
    let (temp_dir, plan_path) = create_test_plan(content);
    let sub_dir = temp_dir.path().join("subdir");
    fs::create_dir(&sub_dir).unwrap();
    (temp_dir, plan_path, sub_dir)
}

/// Write files (with parent directories) below `root`
pub fn write_files(root: &Path, files: &[&str]) {
    for file in files {
        let path = root.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, file).unwrap();
    }
}

/// Read a file below `root`, trimming trailing whitespace
pub fn read_trimmed(root: &Path, file: &str) -> String {
    fs::read_to_string(root.join(file)).unwrap().trim_end().to_string()
}
