// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Black-box tests of the `assembly` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const IDENTITY: &str = "[1,0,0,0,0,1,0,0,0,0,1,0,0,0,0,1]";

fn assembly() -> Command {
    let mut cmd = Command::cargo_bin("assembly").unwrap();
    cmd.env("RUST_LOG", "warn");
    cmd
}

fn write_full(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("scene.json");
    let doc = format!(
        r#"{{
  "version": "1.0",
  "parts": [
    {{ "nodeId": 5, "name": "bearing CS", "fileName": "bearing_CS.scs",
       "matrix": {IDENTITY}, "visible": true, "isPreset": true }},
    {{ "nodeId": 6, "name": "housing", "fileName": "housing.scs",
       "matrix": {IDENTITY}, "visible": false,
       "cadUrl": "https://cdn.example/u/housing.scs", "isPreset": false }},
    {{ "nodeId": 7, "name": "bracket", "fileName": "bracket.scs",
       "matrix": [1, 2, 3], "visible": true }}
  ],
  "metadata": {{ "sceneId": "s-42", "savedAt": "2025-02-10T08:30:00Z" }}
}}"#
    );
    fs::write(&path, doc).unwrap();
    path
}

#[test]
fn normalize_prints_one_file_name_per_line() {
    assembly()
        .args(["normalize", "bearing  CS", "/models/axe.SCS", "gear"])
        .assert()
        .success()
        .stdout("bearing_CS.scs\naxe.SCS\ngear.scs\n");
}

#[test]
fn inspect_shows_metadata_and_issue_count() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_full(dir.path());
    assembly()
        .arg("inspect")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("scene: s-42"))
        .stdout(predicate::str::contains("parts: 3 (1 with issues)"))
        .stdout(predicate::str::contains("matrix has 3 elements"));
}

#[test]
fn compact_then_expand_keeps_parts() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_full(dir.path());
    let compact = assembly().arg("compact").arg(&file).assert().success();
    let compact_text = String::from_utf8(compact.get_output().stdout.clone()).unwrap();
    assert!(compact_text.starts_with("{\"parts\":[\n"));
    assert!(compact_text.contains("\"name\":\"bearing_CS\""));

    let compact_file = dir.path().join("compact.json");
    fs::write(&compact_file, compact_text).unwrap();
    assembly()
        .arg("expand")
        .arg(&compact_file)
        .args(["--scene-id", "renamed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"sceneId\": \"renamed\""))
        .stdout(predicate::str::contains("\"nodeId\": 1000"))
        .stdout(predicate::str::contains("\"fileName\": \"housing.scs\""));
}

#[test]
fn replay_reports_per_part_outcomes() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_full(dir.path());
    assembly()
        .arg("replay")
        .arg(&file)
        .args(["--fail", "https://cdn.example/u/housing.scs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#0 loaded 5 -> "))
        .stdout(predicate::str::contains("/preset_parts/bearing_CS.scs"))
        .stdout(predicate::str::contains("#1 skipped housing.scs"))
        .stdout(predicate::str::contains("#2 skipped bracket.scs"))
        .stdout(predicate::str::ends_with("Loaded 1 of 3 parts\n"));
}

#[test]
fn store_round_trip_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_full(dir.path());
    let store = dir.path().join("store");

    assembly()
        .args(["save", "s-42"])
        .arg(&file)
        .arg("--store")
        .arg(&store)
        .assert()
        .success();
    assert!(store.join("s-42").join("config.json").is_file());

    assembly()
        .args(["load", "s-42", "--store"])
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"cadUrl\": \"https://cdn.example/u/housing.scs\""));

    assembly()
        .args(["delete", "s-42", "--store"])
        .arg(&store)
        .assert()
        .success();
    assembly()
        .args(["load", "s-42", "--store"])
        .arg(&store)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no saved scene"));
}

#[test]
fn settings_file_changes_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("settings.json");
    fs::write(&settings, r#"{ "suffix": ".step" }"#).unwrap();
    assembly()
        .arg("--settings")
        .arg(&settings)
        .args(["normalize", "gear box"])
        .assert()
        .success()
        .stdout("gear_box.step\n");
}

#[test]
fn missing_input_fails_with_context() {
    assembly()
        .args(["inspect", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading does-not-exist.json"));
}

#[test]
fn rust_log_overrides_default_level() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_full(dir.path());
    let store = dir.path().join("store");

    assembly()
        .args(["-v", "save", "quiet"])
        .arg(&file)
        .arg("--store")
        .arg(&store)
        .assert()
        .success()
        .stderr(predicate::str::contains("scene saved").not());

    assembly()
        .env_remove("RUST_LOG")
        .args(["save", "loud"])
        .arg(&file)
        .arg("--store")
        .arg(&store)
        .assert()
        .success()
        .stderr(predicate::str::contains("scene saved"));
}
