// SPDX-License-Identifier: GPL-3.0-or-later

use super::{CC2CE_BIN, OUTPUT_FILE, write_database};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_local_with_defaults() {
    let work_dir = tempdir().unwrap();
    write_database(
        work_dir.path(),
        json!([
            { "directory": "/build", "command": "g++ -I../inc -isystem /opt/sys -O2 -c t.cpp", "file": "t.cpp" },
            { "directory": "/build", "arguments": ["g++", "-I/usr/include", "-c", "u.cpp"], "file": "u.cpp" }
        ]),
    );

    Command::cargo_bin(CC2CE_BIN)
        .unwrap()
        .current_dir(work_dir.path())
        .arg("local")
        .assert()
        .success();

    let content = fs::read_to_string(work_dir.path().join(OUTPUT_FILE)).unwrap();
    assert_eq!(
        content,
        "libs=local\n\
         libs.local.name=local\n\
         libs.local.versions=master\n\
         libs.local.versions.master.version=master\n\
         libs.local.versions.master.path=/build/../inc:/opt/sys:/usr/include\n"
    );
}

#[test]
fn test_local_with_arguments() {
    let work_dir = tempdir().unwrap();
    let build_dir = work_dir.path().join("build");
    write_database(
        &build_dir,
        json!([{ "directory": "/build", "command": "g++ -I../inc -c t.cpp", "file": "t.cpp" }]),
    );

    Command::cargo_bin(CC2CE_BIN)
        .unwrap()
        .current_dir(work_dir.path())
        .args([
            "local",
            "-p",
            "build/compile_commands.json",
            "-l",
            "MyLib",
            "-u",
            "https://example.com/mylib",
            "--lib-version",
            "v2",
            "-o",
            "mylib.properties",
            "--relative",
        ])
        .assert()
        .success();

    let content = fs::read_to_string(work_dir.path().join("mylib.properties")).unwrap();
    assert!(content.starts_with("libs=mylib\n"));
    assert!(content.contains("libs.mylib.name=MyLib\n"));
    assert!(content.contains("libs.mylib.url=https://example.com/mylib\n"));
    assert!(content.contains("libs.mylib.versions.v2.path=../inc\n"));
}

#[test]
fn test_local_malformed_database_keeps_previous_output() {
    let work_dir = tempdir().unwrap();
    fs::write(work_dir.path().join("compile_commands.json"), "{ \"not\": \"an array\" }").unwrap();
    fs::write(work_dir.path().join(OUTPUT_FILE), "libs=old\n").unwrap();

    Command::cargo_bin(CC2CE_BIN)
        .unwrap()
        .current_dir(work_dir.path())
        .arg("local")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed compilation database"));

    let content = fs::read_to_string(work_dir.path().join(OUTPUT_FILE)).unwrap();
    assert_eq!(content, "libs=old\n");
}

#[test]
fn test_options() {
    let work_dir = tempdir().unwrap();
    write_database(
        work_dir.path(),
        json!([{
            "directory": "/build",
            "command": r#"g++ -I../inc -isystem /opt/sys -DPACKAGE_NAME -DFOO=\"bar\" -O2 -Wall t.cpp"#,
            "file": "t.cpp"
        }]),
    );

    Command::cargo_bin(CC2CE_BIN)
        .unwrap()
        .current_dir(work_dir.path())
        .arg("options")
        .assert()
        .success()
        .stdout(concat!(r#"-DPACKAGE_NAME="CompilerExplorer" -DFOO="bar" -O2 -Wall"#, "\n"));
}

#[test]
fn test_options_skip_package_name_version() {
    let work_dir = tempdir().unwrap();
    write_database(
        work_dir.path(),
        json!([{
            "directory": "/build",
            "command": "g++ -DPACKAGE_NAME=x -DPACKAGE_VERSION=y -std=c++17 t.cpp",
            "file": "t.cpp"
        }]),
    );

    Command::cargo_bin(CC2CE_BIN)
        .unwrap()
        .current_dir(work_dir.path())
        .args(["options", "--skip-package-name-version"])
        .assert()
        .success()
        .stdout("-std=c++17\n");
}

#[test]
fn test_options_from_configuration() {
    let work_dir = tempdir().unwrap();
    write_database(
        work_dir.path(),
        json!([{ "directory": "/build", "command": "g++ -DPACKAGE_VERSION -DMARKER -O3 t.cpp", "file": "t.cpp" }]),
    );
    fs::write(
        work_dir.path().join("cc2ce.yml"),
        "schema: \"1.0\"\noptions:\n  package_version: v9\n  dropped_defines: [-DMARKER]\n",
    )
    .unwrap();

    Command::cargo_bin(CC2CE_BIN)
        .unwrap()
        .current_dir(work_dir.path())
        .arg("options")
        .assert()
        .success()
        .stdout("-DPACKAGE_VERSION=\"v9\" -O3\n");
}

#[test]
fn test_options_empty_database() {
    let work_dir = tempdir().unwrap();
    write_database(work_dir.path(), json!([]));

    Command::cargo_bin(CC2CE_BIN)
        .unwrap()
        .current_dir(work_dir.path())
        .arg("options")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No translation units"));
}
