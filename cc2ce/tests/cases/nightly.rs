// SPDX-License-Identifier: GPL-3.0-or-later

use super::{CC2CE_BIN, OUTPUT_FILE, write_database};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const PLATFORM: &str = "x86_64-centos7-gcc7-opt";

fn install_area(root: &Path, slot: &str, day: &str, project: &str) -> PathBuf {
    root.join(slot).join(day).join(project).join("InstallArea").join(PLATFORM)
}

fn nightly_build(project: &str, includes: &[&str]) -> Value {
    let flags: Vec<String> = includes.iter().map(|include| format!("-I{include}")).collect();
    json!([{
        "directory": format!("/workspace/build/{project}/build.{PLATFORM}"),
        "command": format!("/usr/bin/g++ {} -O3 -c source.cpp", flags.join(" ")),
        "file": "source.cpp"
    }])
}

#[test]
fn test_nightly() {
    let work_dir = tempdir().unwrap();
    let nightlies = work_dir.path().join("nightlies");
    write_database(
        &install_area(&nightlies, "lhcb-head", "Today", "Brunel"),
        nightly_build(
            "Brunel",
            &[
                "/cvmfs/sft.cern.ch/lcg/releases/Boost/1.66.0/include",
                "/workspace/build/GAUDI/GAUDI_HEAD/InstallArea/x86_64-centos7-gcc7-opt/include",
                "/workspace/build/Brunel/Rec/BrunelCache",
            ],
        ),
    );

    let install_include = install_area(&nightlies, "lhcb-head", "Today", "Brunel").join("include");
    let dependency = nightlies.join("lhcb-head/Today/GAUDI/GAUDI_HEAD/InstallArea/x86_64-centos7-gcc7-opt/include");

    Command::cargo_bin(CC2CE_BIN)
        .unwrap()
        .current_dir(work_dir.path())
        .args(["nightly", "--platform", PLATFORM, "--nightly-base", nightlies.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("/cvmfs/sft.cern.ch/lcg/releases/Boost/1.66.0/include"))
        .stdout(predicate::str::contains(install_include.display().to_string()))
        .stdout(predicate::str::contains(dependency.display().to_string()))
        .stdout(predicate::str::contains("BrunelCache").not());

    let content = fs::read_to_string(work_dir.path().join(OUTPUT_FILE)).unwrap();
    assert!(content.starts_with("libs=brunel\n"));
    assert!(content.contains("libs.brunel.name=brunel\n"));
    assert!(content.contains("libs.brunel.url=https://lhcb-nightlies.cern.ch/nightly/summary/\n"));
    assert!(content.contains("libs.brunel.versions=lhcb-head/Today/HEAD\n"));
    assert!(content.contains("libs.brunel.versions.lhcb-head/Today/HEAD.version=lhcb-head/Today/HEAD\n"));
}

#[test]
fn test_nightly_keep_local_includes() {
    let work_dir = tempdir().unwrap();
    let nightlies = work_dir.path().join("nightlies");
    write_database(
        &install_area(&nightlies, "lhcb-gaudi-head", "1234", "Gaudi"),
        nightly_build("Gaudi", &["/workspace/build/Gaudi/GaudiKernel"]),
    );

    let local = nightlies.join("lhcb-gaudi-head/1234/Gaudi/GaudiKernel");

    Command::cargo_bin(CC2CE_BIN)
        .unwrap()
        .current_dir(work_dir.path())
        .args([
            "nightly",
            "--slot",
            "lhcb-gaudi-head",
            "--day",
            "1234",
            "--project",
            "Gaudi",
            "--platform",
            PLATFORM,
            "--nightly-base",
            nightlies.to_str().unwrap(),
            "--keep-local-includes",
            "-o",
            "gaudi.properties",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(local.display().to_string()));

    assert!(work_dir.path().join("gaudi.properties").exists());
}

#[test]
fn test_released() {
    let work_dir = tempdir().unwrap();
    let releases = work_dir.path().join("releases");
    write_database(
        &releases.join("BRUNEL/BRUNEL_v50r1/InstallArea").join(PLATFORM),
        nightly_build("BRUNEL", &["/workspace/build/LHCB/LHCB_v40r1/InstallArea/x86_64-centos7-gcc7-opt/include"]),
    );
    let config = work_dir.path().join("site.yml");
    fs::write(
        &config,
        format!("schema: \"1.0\"\nsite:\n  release_root: {}\n  platform: {PLATFORM}\n", releases.display()),
    )
    .unwrap();

    let dependency = releases.join("LHCB/LHCB_v40r1/InstallArea/x86_64-centos7-gcc7-opt/include");

    Command::cargo_bin(CC2CE_BIN)
        .unwrap()
        .current_dir(work_dir.path())
        .args(["-c", "site.yml", "nightly", "-R", "--lib-version", "v50r1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(dependency.display().to_string()));

    let content = fs::read_to_string(work_dir.path().join(OUTPUT_FILE)).unwrap();
    assert!(content.contains("libs.brunel.versions=lhcb-head/Today/v50r1\n"));
}

#[test]
fn test_nightly_unexpected_include_path() {
    let work_dir = tempdir().unwrap();
    let nightlies = work_dir.path().join("nightlies");
    write_database(
        &install_area(&nightlies, "lhcb-head", "Today", "Brunel"),
        nightly_build("Brunel", &["/some/random/unrelated/path"]),
    );

    Command::cargo_bin(CC2CE_BIN)
        .unwrap()
        .current_dir(work_dir.path())
        .args(["nightly", "--platform", PLATFORM, "--nightly-base", nightlies.to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unexpected include path"))
        .stderr(predicate::str::contains("/some/random/unrelated/path"));

    assert!(!work_dir.path().join(OUTPUT_FILE).exists());
}

#[test]
fn test_nightly_missing_build() {
    let work_dir = tempdir().unwrap();
    let nightlies = work_dir.path().join("nightlies");

    Command::cargo_bin(CC2CE_BIN)
        .unwrap()
        .current_dir(work_dir.path())
        .args(["nightly", "--platform", PLATFORM, "--nightly-base", nightlies.to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Compilation database does not exist"));
}

#[test]
fn test_collect() {
    let work_dir = tempdir().unwrap();
    let nightlies = work_dir.path().join("nightlies");
    write_database(
        &install_area(&nightlies, "lhcb-head", "Mon", "Brunel"),
        nightly_build("Brunel", &["/cvmfs/sft.cern.ch/boost/include"]),
    );
    write_database(
        &install_area(&nightlies, "lhcb-head", "Tue", "Brunel"),
        nightly_build("Brunel", &["/cvmfs/sft.cern.ch/boost/include"]),
    );
    write_database(
        &install_area(&nightlies, "lhcb-head", "Tue", "Gaudi"),
        nightly_build("Gaudi", &["/cvmfs/sft.cern.ch/tbb/include"]),
    );
    fs::write(
        work_dir.path().join("cc2ce.yml"),
        format!(
            "schema: \"1.0\"\nsite:\n  platform: {PLATFORM}\nnightlies:\n  slots: [lhcb-head]\n  days: [Mon, Tue, Wed]\n  projects: [Brunel, Gaudi]\n  versions: [HEAD]\n"
        ),
    )
    .unwrap();

    Command::cargo_bin(CC2CE_BIN)
        .unwrap()
        .current_dir(work_dir.path())
        .args(["collect", "--nightly-base", nightlies.to_str().unwrap()])
        .assert()
        .success();

    let content = fs::read_to_string(work_dir.path().join(OUTPUT_FILE)).unwrap();
    assert!(content.starts_with("libs=brunel:gaudi\n"));
    assert!(content.contains("libs.brunel.versions=lhcb-head/Mon/HEAD:lhcb-head/Tue/HEAD\n"));
    assert!(content.contains("libs.gaudi.versions=lhcb-head/Tue/HEAD\n"));
    assert!(!content.contains("Wed"));
}

#[test]
fn test_collect_nothing_found() {
    let work_dir = tempdir().unwrap();
    let nightlies = work_dir.path().join("nightlies");

    Command::cargo_bin(CC2CE_BIN)
        .unwrap()
        .current_dir(work_dir.path())
        .args(["collect", "--platform", PLATFORM, "--nightly-base", nightlies.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No nightly build found"));

    assert!(!work_dir.path().join(OUTPUT_FILE).exists());
}
