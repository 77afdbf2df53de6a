// SPDX-License-Identifier: GPL-3.0-or-later

use super::CC2CE_BIN;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_exit_code_for_empty_arguments() {
    Command::cargo_bin(CC2CE_BIN)
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage: cc2ce"));
}

#[test]
fn test_exit_code_for_help() {
    for subcommand in ["local", "options", "nightly", "collect"] {
        Command::cargo_bin(CC2CE_BIN)
            .unwrap()
            .arg(subcommand)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage: cc2ce"));
    }
}

#[test]
fn test_exit_code_for_invalid_command() {
    Command::cargo_bin(CC2CE_BIN)
        .unwrap()
        .arg("invalid_command")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error: unrecognized subcommand"));
}

#[test]
fn test_exit_code_for_missing_database() {
    let work_dir = tempdir().unwrap();

    Command::cargo_bin(CC2CE_BIN)
        .unwrap()
        .current_dir(work_dir.path())
        .arg("local")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Compilation database does not exist"));
}

#[test]
fn test_exit_code_for_missing_config_file() {
    let work_dir = tempdir().unwrap();

    Command::cargo_bin(CC2CE_BIN)
        .unwrap()
        .current_dir(work_dir.path())
        .args(["-c", "missing.yml", "local"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to access configuration file"));
}

#[test]
fn test_exit_code_for_invalid_config_file() {
    let work_dir = tempdir().unwrap();
    std::fs::write(work_dir.path().join("cc2ce.yml"), "schema: \"0.1\"\n").unwrap();

    Command::cargo_bin(CC2CE_BIN)
        .unwrap()
        .current_dir(work_dir.path())
        .arg("local")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported schema version"));
}
