use std::process::{Command, Output};

use crate::common::write_data_dir;

fn enumsynth(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_enumsynth"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute enumsynth")
}

fn stdout_of(output: &Output) -> String {
    if !output.status.success() {
        panic!(
            "Command failed with status: {:?}\nstderr: {}\nstdout: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr),
            String::from_utf8_lossy(&output.stdout)
        );
    }
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_search_solves_with_prior() {
    let dir = tempfile::tempdir().unwrap();
    write_data_dir(dir.path());
    let data = dir.path().to_str().unwrap();

    let stdout = stdout_of(&enumsynth(&[
        "search", data, "--problem", "0", "--examples", "2", "--max-length", "2",
    ]));

    assert!(stdout.starts_with("Solved!\n"), "unexpected output:\n{}", stdout);
    assert!(stdout.contains("Nodes explored: 1\n"));
    assert!(stdout.contains("%1 <- sort %0"));
}

#[test]
fn test_search_with_predictions_ordering() {
    let dir = tempfile::tempdir().unwrap();
    write_data_dir(dir.path());
    let data = dir.path().to_str().unwrap();

    let stdout = stdout_of(&enumsynth(&[
        "search",
        data,
        "--examples",
        "2",
        "--max-length",
        "2",
        "--ordering",
        "predictions",
    ]));

    // reverse is tried first and descended into before sort solves
    assert!(stdout.contains("Solved!"));
    assert!(stdout.contains("Nodes explored: 4\n"));
    assert!(stdout.contains("%1 <- reverse %0"));
    assert!(stdout.contains("%2 <- sort %0"));
}

#[test]
fn test_search_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    write_data_dir(dir.path());
    let data = dir.path().to_str().unwrap();

    // Problem 1 needs increment, which the standard registry leaves out
    let stdout = stdout_of(&enumsynth(&[
        "search", data, "--problem", "1", "--examples", "2", "--max-length", "1",
    ]));
    assert!(stdout.starts_with("Failed!\n"));

    let stdout = stdout_of(&enumsynth(&[
        "search",
        data,
        "--problem",
        "1",
        "--examples",
        "2",
        "--max-length",
        "2",
        "--with-int-ops",
        "--access-sentinel",
        "--ordering",
        "none",
    ]));
    assert!(stdout.starts_with("Solved!\n"));
}

#[test]
fn test_strict_access_error_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    write_data_dir(dir.path());
    let data = dir.path().to_str().unwrap();

    let output = enumsynth(&[
        "search", data, "--problem", "2", "--examples", "2", "--max-length", "2",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--access-sentinel"), "stderr: {}", stderr);

    let stdout = stdout_of(&enumsynth(&[
        "search",
        data,
        "--problem",
        "2",
        "--examples",
        "2",
        "--max-length",
        "2",
        "--access-sentinel",
    ]));
    assert!(stdout.starts_with("Solved!\n"));
}

#[test]
fn test_multiple_problems_summary() {
    let dir = tempfile::tempdir().unwrap();
    write_data_dir(dir.path());
    let data = dir.path().to_str().unwrap();

    let stdout = stdout_of(&enumsynth(&[
        "search",
        data,
        "--num-problems",
        "2",
        "--examples",
        "2",
        "--max-length",
        "1",
        "--cutoff",
        "-1",
    ]));
    assert!(stdout.contains("Problem 0:\nSolved!"));
    assert!(stdout.contains("Problem 1:\nFailed!"));
    assert!(stdout.contains("Solved: 1/2"));
}

#[test]
fn test_node_limit() {
    let dir = tempfile::tempdir().unwrap();
    write_data_dir(dir.path());
    let data = dir.path().to_str().unwrap();

    let stdout = stdout_of(&enumsynth(&[
        "search",
        data,
        "--problem",
        "3",
        "--examples",
        "2",
        "--max-length",
        "4",
        "--ordering",
        "shuffle:3",
        "--node-limit",
        "25",
        "--access-sentinel",
    ]));
    assert!(stdout.starts_with("Failed!\nNodes explored: 25\n"));
    assert!(stdout.contains("budget exceeded"));
}

#[test]
fn test_missing_data_dir() {
    let output = enumsynth(&["search", "/nonexistent/enumsynth-data", "--examples", "1"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load problem 0"));
}

#[test]
fn test_ops_listing() {
    let dir = tempfile::tempdir().unwrap();
    write_data_dir(dir.path());
    let data = dir.path().to_str().unwrap();

    let stdout = stdout_of(&enumsynth(&["ops", data, "--cutoff", "2"]));
    assert!(stdout.starts_with("Operators (2, ordering prior):\n"));
    let lines: Vec<&str> = stdout.lines().skip(1).collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("sort") && lines[0].contains("0.9000"));
    assert!(lines[1].contains("reverse") && lines[1].contains("0.5000"));

    let stdout = stdout_of(&enumsynth(&["ops", "--ordering", "none", "--with-int-ops"]));
    assert!(stdout.starts_with("Operators (48, ordering none):\n"));
    assert!(stdout.contains("increment"));
}

#[test]
fn test_cutoff_below_minus_one_rejected() {
    let output = enumsynth(&["ops", "--ordering", "none", "--cutoff", "-2"]);
    assert!(!output.status.success());

    let stdout = stdout_of(&enumsynth(&["ops", "--ordering", "none", "--cutoff", "0"]));
    assert!(stdout.starts_with("Operators (0, ordering none):\n"));
}

#[test]
fn test_ops_needs_data_dir_for_prior() {
    let output = enumsynth(&["ops"]);
    assert!(!output.status.success());
}
