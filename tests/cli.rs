//! Command line tests for the pdf-breaker binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn breaker() -> Command {
    let mut cmd = Command::cargo_bin("pdf-breaker").unwrap();
    cmd.env_remove("PDF_BREAKER_LENGTH")
        .env_remove("PDF_BREAKER_TIMEOUT_SECS")
        .env_remove("PDF_BREAKER_STRATEGY");
    cmd
}

#[test]
fn test_help_lists_flags() {
    breaker()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--file"))
        .stdout(predicate::str::contains("--length"))
        .stdout(predicate::str::contains("--timeout"));
}

#[test]
fn test_file_flag_is_required() {
    breaker().assert().failure();
}

#[test]
fn test_missing_file() {
    breaker()
        .args(["-f", "/definitely/not/here.pdf", "-l", "4", "-t", "5"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_not_a_pdf() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "plain text, no PDF header here").unwrap();

    breaker()
        .arg("-f")
        .arg(file.path())
        .args(["-l", "4"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load PDF"));
}

#[test]
fn test_zero_length_rejected() {
    breaker()
        .args(["-f", "whatever.pdf", "-l", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration problem"));
}

#[test]
fn test_unknown_strategy_rejected() {
    breaker()
        .args(["-f", "whatever.pdf", "--strategy", "sideways"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sideways"));
}
