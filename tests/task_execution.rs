//! Integration tests for task execution

mod common;

use common::{create_test_plan, read_trimmed, write_files};
use stagehand::config::{parse_plan, LoadedPlan, Plugin};
use stagehand::error::ExecutionError;
use stagehand::runner::{Context, Isolation, Registry, Runner};
use stagehand::ui::Verbosity;
use std::path::Path;

fn runner_for(root: &Path, yaml: &str) -> Runner {
    let plan = parse_plan(yaml).unwrap();
    let mut registry = Registry::new();
    LoadedPlan::new(root.join("stagehand.yml"), plan)
        .register(&mut registry)
        .unwrap();
    Runner::new(registry, root).with_verbosity(Verbosity::Silent)
}

#[test]
fn test_composite_order_and_isolation() {
    let (temp_dir, _) = create_test_plan("");
    let runner = runner_for(
        temp_dir.path(),
        r#"
tasks:
  a: [x, y]
  x: "echo x >> order.txt && false"
  y: "echo y >> order.txt"
  b: "echo b >> order.txt"
"#,
    );

    let mut ctx = Context::new();
    runner.run(&["a", "b"], &mut ctx).unwrap();

    assert_eq!(read_trimmed(temp_dir.path(), "order.txt"), "x\nb");
}

#[test]
fn test_composite_runs_members_in_order() {
    let (temp_dir, _) = create_test_plan("");
    let runner = runner_for(
        temp_dir.path(),
        r#"
tasks:
  a: [x, y]
  x: "echo x >> order.txt"
  y: "echo y >> order.txt"
  b: "echo b >> order.txt"
"#,
    );

    let mut ctx = Context::new();
    runner.run(&["a", "b"], &mut ctx).unwrap();

    assert_eq!(read_trimmed(temp_dir.path(), "order.txt"), "x\ny\nb");
}

#[test]
fn test_bare_failure_stops_run() {
    let (temp_dir, _) = create_test_plan("");
    let runner = runner_for(
        temp_dir.path(),
        r#"
tasks:
  fail: "false"
  after: "touch after.txt"
"#,
    );

    let mut ctx = Context::new();
    let result = runner.run(&["fail", "after"], &mut ctx);

    assert!(matches!(result, Err(ExecutionError::TaskFailed { .. })));
    assert!(!temp_dir.path().join("after.txt").exists());
}

#[test]
fn test_keep_going_runs_everything() {
    let (temp_dir, _) = create_test_plan("");
    let runner = runner_for(
        temp_dir.path(),
        r#"
tasks:
  fail: "false"
  after: "touch after.txt"
"#,
    )
    .with_isolation(Isolation::EveryEntry);

    let mut ctx = Context::new();
    let result = runner.run(&["fail", "after"], &mut ctx);

    assert!(matches!(result, Err(ExecutionError::Incomplete(1))));
    assert!(temp_dir.path().join("after.txt").exists());
}

#[test]
fn test_target_reaches_shell() {
    let (temp_dir, _) = create_test_plan("");
    let runner = runner_for(
        temp_dir.path(),
        r#"
tasks:
  deploy:
    run: "echo deploying ${target} > deploy.txt"
"#,
    );

    let mut ctx = Context::new();
    runner.run(&["deploy:staging"], &mut ctx).unwrap();

    assert_eq!(read_trimmed(temp_dir.path(), "deploy.txt"), "deploying staging");
}

#[test]
fn test_context_flows_between_tasks() {
    let (temp_dir, _) = create_test_plan("");
    let runner = runner_for(
        temp_dir.path(),
        r#"
tasks:
  default: [configure, report]
  configure:
    run:
      - set:
          channel: "release-${target}"
  report:
    run: "echo ${channel} > channel.txt"
"#,
    );

    let mut ctx = Context::new();
    runner.run(&["configure:beta", "report"], &mut ctx).unwrap();

    assert_eq!(ctx.get_var("channel"), Some("release-beta"));
    assert_eq!(read_trimmed(temp_dir.path(), "channel.txt"), "release-beta");
}

#[test]
fn test_unknown_task_does_not_stop_run() {
    let (temp_dir, _) = create_test_plan("");
    let runner = runner_for(
        temp_dir.path(),
        r#"
tasks:
  known: "touch known.txt"
"#,
    );

    let mut ctx = Context::new();
    runner.run(&["unknown", "known"], &mut ctx).unwrap();
    assert!(temp_dir.path().join("known.txt").exists());
}

#[test]
fn test_manifest_from_plan() {
    let (temp_dir, _) = create_test_plan("");
    write_files(
        temp_dir.path(),
        &["a.txt", ".hidden", "node_modules/x.js", "sub/b.txt", "sub/c.md"],
    );
    let runner = runner_for(
        temp_dir.path(),
        r#"
tasks:
  manifest:
    run:
      - find:
          patterns: ["**/*.txt"]
          output: manifest.txt
"#,
    );

    let mut ctx = Context::new();
    runner.run(&["manifest"], &mut ctx).unwrap();

    let mut listed: Vec<String> = read_trimmed(temp_dir.path(), "manifest.txt")
        .lines()
        .map(str::to_string)
        .collect();
    listed.sort();
    assert_eq!(listed, vec!["a.txt", "sub/b.txt"]);
    assert!(ctx.get_var("files").is_some());
}

#[test]
fn test_runner_find_is_root_relative() {
    let (temp_dir, _) = create_test_plan("");
    write_files(temp_dir.path(), &["public/index.html", "public/drafts/wip.html"]);
    let runner = Runner::new(Registry::new(), temp_dir.path());

    let found = runner.find(["*.html", "!public/drafts/**"]);
    assert_eq!(found, vec![Path::new("public/index.html").to_path_buf()]);
}

#[test]
fn test_native_and_plan_tasks_mix() {
    let (temp_dir, _) = create_test_plan("");
    let plan = parse_plan(
        r#"
tasks:
  default: [stamp, check]
  stamp:
    run:
      - set:
          stamped: "yes"
"#,
    )
    .unwrap();

    let mut registry = Registry::new();
    LoadedPlan::new(temp_dir.path().join("stagehand.yml"), plan)
        .register(&mut registry)
        .unwrap();
    registry.define_action("check", |_, ctx, _| {
        anyhow::ensure!(ctx.get_var("stamped") == Some("yes"), "not stamped");
        ctx.set_var("checked", "true");
        Ok(())
    });

    let runner = Runner::new(registry, temp_dir.path()).with_verbosity(Verbosity::Silent);
    let mut ctx = Context::new();
    runner.run::<&str>(&[], &mut ctx).unwrap();
    assert_eq!(ctx.get_var("checked"), Some("true"));
}
