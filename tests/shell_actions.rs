// tests/shell_actions.rs
//
// These spawn real processes through `sh`, so they only run on Unix.
#![cfg(unix)]

use std::fs;
use std::time::{Duration, Instant};

use clap::Parser;
use tforder::cli::CliArgs;
use tforder::errors::TfOrderError;
use tforder::exec::{ActionInvoker, ActionStatus, CancelSignal, CancelToken, ShellInvoker, run_shell_action};
use tforder_test_utils::{init_tracing, with_timeout, write_stack};

#[tokio::test]
async fn success_captures_stdout_and_stderr() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();

    let outcome = with_timeout(run_shell_action(
        "echo out; echo err 1>&2",
        None,
        dir.path(),
        CancelToken::never(),
    ))
    .await;

    assert_eq!(outcome.status, ActionStatus::Success);
    assert!(outcome.output.contains("out\n"));
    assert!(outcome.output.contains("err\n"));
}

#[tokio::test]
async fn invalid_utf8_and_bulk_output_do_not_break_the_action() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();

    // One latin-1 byte, then enough output to overflow the pipe buffer.
    let cmd = r"printf 'caf\351\n'; sleep 0.2; i=0; while [ $i -lt 20000 ]; do echo line $i; i=$((i+1)); done; echo DONE";
    let outcome = with_timeout(run_shell_action(cmd, None, dir.path(), CancelToken::never())).await;

    assert_eq!(outcome.status, ActionStatus::Success);
    assert_eq!(outcome.output.lines().next(), Some("caf\u{FFFD}"));
    assert!(outcome.output.contains("line 19999\n"));
    assert!(outcome.output.ends_with("DONE\n"));
    assert_eq!(outcome.output.lines().count(), 20002);
}

#[tokio::test]
async fn runs_in_the_node_directory() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("marker.txt"), "here").unwrap();

    let outcome = with_timeout(run_shell_action("cat marker.txt", None, dir.path(), CancelToken::never())).await;
    assert_eq!(outcome.status, ActionStatus::Success);
    assert_eq!(outcome.output, "here\n");
}

#[tokio::test]
async fn non_zero_exit_is_a_failure() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();

    let outcome = with_timeout(run_shell_action("exit 3", None, dir.path(), CancelToken::never())).await;
    assert_eq!(outcome.status, ActionStatus::Failed("exit status 3".to_string()));
}

#[tokio::test]
async fn missing_directory_is_a_failure() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();

    let outcome = with_timeout(run_shell_action(
        "true",
        None,
        &dir.path().join("gone"),
        CancelToken::never(),
    ))
    .await;
    assert!(matches!(outcome.status, ActionStatus::Failed(_)));
}

#[tokio::test]
async fn cancellation_kills_the_process() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let signal = CancelSignal::new();
    let token = signal.token();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        signal.cancel();
    });

    let started = Instant::now();
    let outcome = with_timeout(run_shell_action("sleep 30", None, dir.path(), token)).await;

    assert_eq!(outcome.status, ActionStatus::Cancelled);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn shell_invoker_uses_node_as_working_directory() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let node = dir.path().to_string_lossy().into_owned();

    let invoker = ShellInvoker::new("pwd").with_echo_output(false);
    let outcome = with_timeout(invoker.invoke(&node, CancelToken::never())).await;

    assert!(outcome.is_success());
    let reported = fs::canonicalize(outcome.output.trim()).unwrap();
    assert_eq!(reported, fs::canonicalize(dir.path()).unwrap());
}

fn args(argv: &[&str]) -> CliArgs {
    let mut full = vec!["tforder"];
    full.extend_from_slice(argv);
    CliArgs::try_parse_from(full).unwrap()
}

#[tokio::test]
async fn end_to_end_runs_dependencies_first_in_both_directions() {
    init_tracing();
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write_stack(root, "vpc", &[]);
    write_stack(root, "eks", &[("vpc", "../vpc")]);
    write_stack(root, "app", &[("eks", "../eks")]);

    let log = root.join("log.txt");
    let cmd = format!("basename \"$PWD\" >> '{}'", log.display());
    let root_str = root.to_string_lossy().into_owned();

    with_timeout(tforder::run(args(&["-d", &root_str, "-r", "-x", &cmd, "--max-parallel", "2"])))
        .await
        .unwrap();
    assert_eq!(fs::read_to_string(&log).unwrap(), "vpc\neks\napp\n");

    fs::remove_file(&log).unwrap();
    with_timeout(tforder::run(args(&["-d", &root_str, "-r", "-x", &cmd, "--reverse"])))
        .await
        .unwrap();
    assert_eq!(fs::read_to_string(&log).unwrap(), "vpc\neks\napp\n");
}

#[tokio::test]
async fn end_to_end_failure_is_reported_once() {
    init_tracing();
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write_stack(root, "vpc", &[]);
    write_stack(root, "eks", &[("vpc", "../vpc")]);
    let root_str = root.to_string_lossy().into_owned();

    let err = with_timeout(tforder::run(args(&["-d", &root_str, "-r", "-x", "exit 7"])))
        .await
        .unwrap_err();

    match err {
        TfOrderError::ActionFailed { node, cause } => {
            assert!(node.ends_with("vpc"), "{node}");
            assert_eq!(cause, "exit status 7");
        }
        other => panic!("expected ActionFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn end_to_end_cycle_runs_nothing() {
    init_tracing();
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write_stack(root, "a", &[("b", "../b")]);
    write_stack(root, "b", &[("a", "../a")]);

    let log = root.join("log.txt");
    let cmd = format!("echo ran >> '{}'", log.display());
    let root_str = root.to_string_lossy().into_owned();

    let err = with_timeout(tforder::run(args(&["-d", &root_str, "-r", "-x", &cmd])))
        .await
        .unwrap_err();

    assert!(matches!(err, TfOrderError::DagCycle { ref nodes } if nodes.len() == 2));
    assert!(!log.exists());
}
