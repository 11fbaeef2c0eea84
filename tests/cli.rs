//! End-to-end tests for the stagehand binary

mod common;

use assert_cmd::Command;
use common::{create_test_plan, create_test_plan_in_subdir, read_trimmed};
use predicates::prelude::*;
use tempfile::TempDir;

const PLAN: &str = r#"
tasks:
  default: [build]
  build:
    description: Build it
    run: "echo build >> order.txt"
  deploy:
    run: "echo deploy ${target} >> order.txt"
  ci: [build, deploy]
  broken: [fail, build]
  fail: "false"
"#;

fn stagehand() -> Command {
    Command::cargo_bin("stagehand").unwrap()
}

#[test]
fn test_list_is_sorted_without_default() {
    let (temp_dir, _) = create_test_plan(PLAN);

    stagehand()
        .current_dir(temp_dir.path())
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::eq(
            "  broken  fail -> build\n  build   Build it\n  ci      build -> deploy\n  deploy\n  fail\n",
        ));

    assert!(!temp_dir.path().join("order.txt").exists());
}

#[test]
fn test_runs_default_without_arguments() {
    let (temp_dir, _) = create_test_plan(PLAN);

    stagehand().current_dir(temp_dir.path()).assert().success();

    assert_eq!(read_trimmed(temp_dir.path(), "order.txt"), "build");
}

#[test]
fn test_runs_tasks_in_order_with_target() {
    let (temp_dir, _) = create_test_plan(PLAN);

    stagehand()
        .current_dir(temp_dir.path())
        .args(["deploy:staging", "build"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Executing task: deploy:staging"));

    assert_eq!(
        read_trimmed(temp_dir.path(), "order.txt"),
        "deploy staging\nbuild"
    );
}

#[test]
fn test_runs_from_subdirectory_in_plan_home() {
    let (temp_dir, _, sub_dir) = create_test_plan_in_subdir(PLAN);

    stagehand().current_dir(&sub_dir).arg("build").assert().success();

    assert!(temp_dir.path().join("order.txt").exists());
    assert!(!sub_dir.join("order.txt").exists());
}

#[test]
fn test_composite_failure_is_contained() {
    let (temp_dir, _) = create_test_plan(PLAN);

    stagehand()
        .current_dir(temp_dir.path())
        .args(["broken", "deploy:prod"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Task 'broken' stopped"));

    assert_eq!(read_trimmed(temp_dir.path(), "order.txt"), "deploy prod");
}

#[test]
fn test_bare_failure_exits_non_zero() {
    let (temp_dir, _) = create_test_plan(PLAN);

    stagehand()
        .current_dir(temp_dir.path())
        .args(["fail", "build"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Task 'fail' failed"));

    assert!(!temp_dir.path().join("order.txt").exists());
}

#[test]
fn test_keep_going() {
    let (temp_dir, _) = create_test_plan(PLAN);

    stagehand()
        .current_dir(temp_dir.path())
        .args(["--keep-going", "fail", "build"])
        .assert()
        .failure();

    assert_eq!(read_trimmed(temp_dir.path(), "order.txt"), "build");
}

#[test]
fn test_unknown_task_is_reported() {
    let (temp_dir, _) = create_test_plan(PLAN);

    stagehand()
        .current_dir(temp_dir.path())
        .args(["nope", "build"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Task not found: nope"));

    assert_eq!(read_trimmed(temp_dir.path(), "order.txt"), "build");
}

#[test]
fn test_explicit_plan_file() {
    let (temp_dir, plan_path) = create_test_plan(PLAN);
    let elsewhere = TempDir::new().unwrap();

    stagehand()
        .current_dir(elsewhere.path())
        .arg("--file")
        .arg(&plan_path)
        .arg("build")
        .assert()
        .success();

    assert!(temp_dir.path().join("order.txt").exists());
}

#[test]
fn test_explicit_plan_file_attached_short_flag() {
    let (temp_dir, plan_path) = create_test_plan(PLAN);
    let elsewhere = TempDir::new().unwrap();

    stagehand()
        .current_dir(elsewhere.path())
        .arg(format!("-f{}", plan_path.display()))
        .arg("build")
        .assert()
        .success();

    assert_eq!(read_trimmed(temp_dir.path(), "order.txt"), "build");
}

#[test]
fn test_missing_plan_is_fatal() {
    let temp_dir = TempDir::new().unwrap();

    stagehand()
        .current_dir(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unable to locate a plan file"));
}
