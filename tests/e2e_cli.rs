//! CLI end-to-end tests
//!
//! Exercise the mediaconv binary's argument surface and failure exit codes.
//! Paths that need a working ffmpeg are covered by unit tests against the
//! engine contract instead.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn mediaconv_cmd() -> Command {
    Command::cargo_bin("mediaconv").unwrap()
}

#[test]
fn no_args_prints_usage_and_fails() {
    let mut cmd = mediaconv_cmd();
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("usage error"))
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_flag_succeeds() {
    let mut cmd = mediaconv_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("mediaconv"))
        .stdout(predicate::str::contains("--format"));
}

#[test]
fn version_flag_succeeds() {
    let mut cmd = mediaconv_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mediaconv"));
}

#[test]
fn missing_input_flag_is_a_usage_error() {
    let mut cmd = mediaconv_cmd();
    cmd.args(["--output", "b.mp3", "--format", "mp3"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("usage error"))
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn unsupported_format_fails_and_lists_formats() {
    let mut cmd = mediaconv_cmd();
    cmd.args(["--input", "a.wav", "--output", "b.xyz", "--format", "xyz"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unsupported format: xyz"))
        .stderr(predicate::str::contains("Supported formats"));
}

#[test]
fn unsupported_format_leaves_existing_destination_untouched() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("a.wav");
    let output = dir.path().join("b.xyz");
    fs::write(&input, b"data").unwrap();
    fs::write(&output, b"keep me").unwrap();

    let mut cmd = mediaconv_cmd();
    cmd.args([
        "--input",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "--format",
        "xyz",
    ])
    .assert()
    .failure()
    .code(1);

    assert_eq!(fs::read(&output).unwrap(), b"keep me");
}

#[test]
fn missing_input_file_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("does-not-exist.wav");
    let output = dir.path().join("b.mp3");

    let mut cmd = mediaconv_cmd();
    cmd.args([
        "--input",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "--format",
        "mp3",
    ])
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("does not exist"));

    assert!(!output.exists());
}

#[test]
fn format_token_is_case_insensitive() {
    // An uppercase token must get past format resolution; with a missing
    // input file the failure is the input check, not the format table.
    let dir = tempdir().unwrap();
    let input = dir.path().join("missing.mkv");

    let mut cmd = mediaconv_cmd();
    cmd.args([
        "--input",
        input.to_str().unwrap(),
        "--output",
        dir.path().join("out.mp4").to_str().unwrap(),
        "--format",
        "MP4",
    ])
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("does not exist"));
}
