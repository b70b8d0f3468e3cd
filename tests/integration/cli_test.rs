//! Integration tests for the promptr CLI.
//!
//! Only paths that do not acquire the terminal are exercised here; the
//! interactive session itself is covered by unit tests on the engine.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn promptr() -> Command {
    Command::cargo_bin("promptr").expect("binary exists")
}

#[test]
fn help_shows_usage() {
    promptr()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("teleprompter"))
        .stdout(predicate::str::contains("--speed"))
        .stdout(predicate::str::contains("--auto-start"));
}

#[test]
fn version_matches_package() {
    promptr()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn empty_script_file_is_fatal() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "   \n\t  ").unwrap();

    promptr()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("script is empty"));
}

#[test]
fn empty_stdin_is_fatal() {
    promptr()
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("script is empty"));
}

#[test]
fn missing_file_reports_path() {
    promptr()
        .arg("/definitely/not/a/real/script.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn completions_subcommand_emits_script() {
    promptr()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("promptr"));
}
