//! Integration tests driving the compiled `bomscan` binary end to end:
//! scanning real fixture trees, report output, and exit codes.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Helper to get the path to the bomscan binary
fn bomscan_bin() -> PathBuf {
    let mut path = env::current_exe()
        .expect("Failed to get current executable path")
        .parent()
        .expect("No parent")
        .to_path_buf();

    // tests live in target/debug/deps; the binary sits one level up
    if path.ends_with("deps") {
        path = path.parent().expect("No parent").to_path_buf();
    }

    path.join("bomscan")
}

/// Helper to create a small npm project with a v3 lockfile
fn create_npm_fixture(dir: &TempDir) -> PathBuf {
    let project = dir.path().to_path_buf();

    fs::write(
        project.join("package.json"),
        r#"{ "name": "webapp", "version": "2.4.0" }"#,
    )
    .expect("Failed to write package.json");

    let lock = r#"{
  "name": "webapp",
  "version": "2.4.0",
  "lockfileVersion": 3,
  "packages": {
    "": {
      "name": "webapp",
      "version": "2.4.0",
      "dependencies": { "left-pad": "^1.3.0" }
    },
    "node_modules/left-pad": { "version": "1.3.0" }
  }
}"#;
    fs::write(project.join("package-lock.json"), lock).expect("Failed to write package-lock.json");

    project
}

/// Runs `bomscan scan` on a fixture without CLI-invoking detectables, so the
/// outcome never depends on which package managers the host has installed.
fn scan_json(project: &PathBuf, extra_args: &[&str]) -> std::process::Output {
    Command::new(bomscan_bin())
        .arg("scan")
        .arg(project)
        .args(["--format", "json", "--no-cli-detectables", "-q"])
        .args(extra_args)
        .output()
        .expect("Failed to execute bomscan")
}

#[test]
fn test_scan_emits_json_report() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let project = create_npm_fixture(&dir);

    let output = scan_json(&project, &[]);
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let report: serde_json::Value =
        serde_json::from_str(&stdout).expect("stdout is not valid JSON");

    assert_eq!(report["project"]["name"], "webapp");
    assert_eq!(report["project"]["version"], "2.4.0");
    assert_eq!(report["successful_detector_types"][0], "NPM");
    assert_eq!(report["code_locations"][0]["external_id"], "npmjs:webapp/2.4.0");
    assert_eq!(report["code_locations"][0]["component_count"], 1);
}

#[test]
fn test_yielded_detector_is_reported_with_reason() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let project = create_npm_fixture(&dir);

    let output = scan_json(&project, &[]);
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let report: serde_json::Value =
        serde_json::from_str(&stdout).expect("stdout is not valid JSON");

    // the lockfile wins over the manifest parse, which must still appear in
    // the report with the reason it stepped aside
    let yielded = report["detectors"]
        .as_array()
        .expect("detectors is not an array")
        .iter()
        .find(|d| d["detector"] == "Package Json Parse")
        .expect("yielded detector missing from report");
    assert_eq!(yielded["status"], "NotApplicable");
    assert!(yielded["reason"]
        .as_str()
        .expect("yielded detector has no reason")
        .contains("Yielded to Package Lock"));
}

#[test]
fn test_scan_writes_report_to_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let project = create_npm_fixture(&dir);
    let report_path = dir.path().join("report.json");

    let output = scan_json(&project, &["-o", report_path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));

    let written = fs::read_to_string(&report_path).expect("report file was not written");
    let report: serde_json::Value =
        serde_json::from_str(&written).expect("report file is not valid JSON");
    assert_eq!(report["project"]["name"], "webapp");
}

#[test]
fn test_missing_project_path_is_a_configuration_failure() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let missing = dir.path().join("no-such-project");

    let output = scan_json(&missing, &[]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_file_project_path_is_a_configuration_failure() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let file = dir.path().join("not-a-directory");
    fs::write(&file, "").expect("Failed to write file");

    let output = scan_json(&file, &[]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_help_lists_scan_command() {
    let output = Command::new(bomscan_bin())
        .arg("--help")
        .output()
        .expect("Failed to execute bomscan");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("scan"));
}
