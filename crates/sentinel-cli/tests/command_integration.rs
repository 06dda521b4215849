//! Integration tests for `sentinel` commands end-to-end against the seeded
//! in-process agent (there is no server process to connect to — spec §1
//! Non-goals).

#![allow(deprecated)] // Command::cargo_bin is deprecated but replacement requires newer assert_cmd

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn status_reports_seeded_traffic() {
    Command::cargo_bin("sentinel")
        .unwrap()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Interceptions"))
        .stdout(predicate::str::contains("Quarantine"))
        .stdout(predicate::str::contains("Rate limiter"));
}

#[test]
fn inspect_lists_quarantined_entries_as_table() {
    Command::cargo_bin("sentinel")
        .unwrap()
        .args(["inspect", "--limit", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("signature"));
}

#[test]
fn inspect_json_output_is_valid_json_array() {
    let output = Command::cargo_bin("sentinel")
        .unwrap()
        .args(["inspect", "--limit", "10", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).expect("stdout must be valid JSON");
    assert!(parsed.is_array());
}

#[test]
fn inspect_json_single_lookup_is_array_or_null() {
    let fake_signature = format!("spam:{}", "a".repeat(64));
    let output = Command::cargo_bin("sentinel")
        .unwrap()
        .args(["inspect", "--signature", &fake_signature, "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.trim() == "null" || serde_json::from_str::<serde_json::Value>(&text).is_ok());
}

#[test]
fn no_color_flag_suppresses_ansi_escapes() {
    let output = Command::cargo_bin("sentinel")
        .unwrap()
        .args(["--no-color", "status"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(!text.contains("\u{1b}["));
}

#[test]
fn status_is_deterministic_across_runs() {
    let first = Command::cargo_bin("sentinel").unwrap().arg("status").output().unwrap();
    let second = Command::cargo_bin("sentinel").unwrap().arg("status").output().unwrap();
    assert_eq!(first.stdout, second.stdout);
}
