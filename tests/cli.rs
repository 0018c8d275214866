//! Exit codes and output streams of the `line-guard` binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_line-guard"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run line-guard")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn clean_tree_prints_total_and_exits_zero() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("src")).unwrap();
    fs::write(temp_dir.path().join("src/lib.rs"), "a\nb\nc\n").unwrap();

    let output = run_in(temp_dir.path(), &[]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output).trim_end(), "3 lines checked");
}

#[test]
fn long_line_exits_one_with_diagnostic() {
    let temp_dir = TempDir::new().unwrap();
    let long = "y".repeat(120);
    fs::write(temp_dir.path().join("main.rs"), format!("fn main() {{}}\n{long}\n")).unwrap();

    let output = run_in(temp_dir.path(), &["--no-color"]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("line too long: "), "{err}");
    assert!(err.contains("main.rs: 2 "), "{err}");
    assert!(err.contains(&long), "{err}");
    assert!(stdout(&output).is_empty());
}

#[test]
fn stale_exception_from_config_file_exits_one() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("lib.rs"), "short\n").unwrap();
    fs::write(
        temp_dir.path().join("line-guard.yaml"),
        "exceptions:\n  - file: ./lib.rs\n    line: 1\n",
    )
    .unwrap();

    let output = run_in(temp_dir.path(), &["--no-color"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("line not too long: "));
}

#[test]
fn missing_root_exits_two() {
    let temp_dir = TempDir::new().unwrap();

    let output = run_in(temp_dir.path(), &["does-not-exist"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Discovery error"));
}

#[test]
fn collect_all_json_lists_every_violation() {
    let temp_dir = TempDir::new().unwrap();
    let long = "z".repeat(101);
    fs::write(temp_dir.path().join("a.rs"), format!("{long}\n{long}\n")).unwrap();

    let output = run_in(temp_dir.path(), &["--all", "--format", "json"]);

    assert_eq!(output.status.code(), Some(1));
    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["status"], "failed");
    assert_eq!(parsed["violations"].as_array().map(Vec::len), Some(2));
    assert_eq!(parsed["lines_checked"], 2);
}

#[test]
fn max_line_length_flag_overrides_default() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.rs"), "x".repeat(90)).unwrap();

    assert_eq!(run_in(temp_dir.path(), &[]).status.code(), Some(0));
    let output = run_in(temp_dir.path(), &["--max-line-length", "80"]);
    assert_eq!(output.status.code(), Some(1));
}
