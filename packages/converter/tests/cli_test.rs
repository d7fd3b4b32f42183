//! Tests for the `qpp-converter` binary.

mod common;

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

use common::fixture;

fn converter() -> Command {
    let mut cmd = Command::cargo_bin("qpp-converter").unwrap();
    cmd.env_remove("QPP_PROGRAM")
        .env_remove("QPP_SKIP_DEFAULTS")
        .env_remove("QPP_SKIP_VALIDATION");
    cmd
}

#[test]
fn test_converts_valid_file() {
    let out = tempfile::tempdir().unwrap();

    converter()
        .arg("convert")
        .arg(fixture("valid-QRDA-III.xml"))
        .arg("--output")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Converted:"));

    let written = out.path().join("valid-QRDA-III.qpp.json");
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(written).unwrap()).unwrap();
    assert_eq!(json["programName"], "mips");
    assert_eq!(json["measurementSets"].as_array().unwrap().len(), 3);
}

#[test]
fn test_failed_file_writes_error_report_and_exits_non_zero() {
    let out = tempfile::tempdir().unwrap();

    converter()
        .arg("convert")
        .arg(fixture("valid-QRDA-III.xml"))
        .arg(fixture("not-a-QRDA-III-file.xml"))
        .arg("-o")
        .arg(out.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 of 2 file(s) failed to convert"));

    assert!(out.path().join("valid-QRDA-III.qpp.json").exists());
    let report = fs::read_to_string(out.path().join("not-a-QRDA-III-file-error.json")).unwrap();
    assert!(report.contains("not a valid QRDA document"));
}

#[test]
fn test_skip_validation_flag() {
    let out = tempfile::tempdir().unwrap();

    converter()
        .args(["convert", "--skip-validation", "-o"])
        .arg(out.path())
        .arg(fixture("angerTheConverter.xml"))
        .assert()
        .failure();

    // validation is skipped, so the textual count fails in the encoder instead
    let report = fs::read_to_string(out.path().join("angerTheConverter-error.json")).unwrap();
    assert!(report.contains("not a valid XML document"));
}

#[test]
fn test_invalid_program_is_rejected() {
    converter()
        .args(["convert", "--program", "pqrs"])
        .arg(fixture("valid-QRDA-III.xml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid program name"));
}

#[test]
fn test_missing_output_directory() {
    converter()
        .arg("convert")
        .arg(fixture("valid-QRDA-III.xml"))
        .args(["--output", "/nonexistent/qpp-output"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Output directory does not exist"));
}
