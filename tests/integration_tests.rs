//! Integration tests for the pct CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get a pct command
fn pct() -> Command {
    Command::cargo_bin("pct").unwrap()
}

/// A diameter/planarity export with preamble noise, garbled unit labels
/// and a legacy label column. Probe IDs arrive unsorted on purpose.
const DIAMETER_EXPORT: &str = "\
Station,PC-07,,,,,
Operator,anan,,,,,

Probe ID,User Defined Label 4,Diameter (um),Planarity (ตm),X Error (um),Y Error (um),V Align (um)
2,PIN-B,25.0,5.0,0.2,-0.3,1.0
1,PIN-A,20.1,-20.0,16.5,0.0,2.0
3,PIN-C,19.8,10.0,0.1,0.4,18.0

trailer,,,,,,
";

/// A contact-resistance export for the same three probes.
const CONTACT_EXPORT: &str = "\
Probe ID,X Error (um),Y Error (um),Contact Resistance (Ohm),Leakage Current (A)
1,1.0,0.5,10.0,0.01
2,2.0,0.5,20.0,0.02
3,3.0,0.5,30.0,0.03
";

fn write_export(tmp: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = tmp.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    pct()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Probe Card Toolkit"));
}

#[test]
fn test_version_displays() {
    pct()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pct"));
}

#[test]
fn test_unknown_command_fails() {
    pct()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// ============================================================================
// Extract Command Tests
// ============================================================================

#[test]
fn test_extract_normalizes_units_and_sorts() {
    let tmp = TempDir::new().unwrap();
    let file = write_export(&tmp, "dia.csv", DIAMETER_EXPORT);

    let output = pct()
        .args(["extract", "--format", "csv"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut lines = stdout.lines();
    assert_eq!(
        lines.next(),
        Some("Probe ID,Probe name,Diameter (µm),Planarity (µm),X Error (µm),Y Error (µm),V Align (µm)")
    );
    // sorted ascending by Probe ID; preamble and trailer never make it in
    assert_eq!(
        lines.next(),
        Some("1,PIN-A,20.1,-20.0,16.5,0.0,2.0")
    );
    assert!(stdout.lines().count() == 4);
}

#[test]
fn test_extract_decodes_legacy_codepage_micro_sign() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("legacy.csv");
    // 0xB5 is the micro sign in windows-1252
    let mut bytes = b"Probe ID,Diameter (\xb5m)\n1,20.0\n".to_vec();
    bytes.extend_from_slice(b"2,21.0\n");
    fs::write(&path, bytes).unwrap();

    pct()
        .args(["extract", "--format", "csv"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Diameter (µm)"));
}

#[test]
fn test_extract_missing_header_fails_file_but_not_batch() {
    let tmp = TempDir::new().unwrap();
    let bad = write_export(&tmp, "bad.csv", "Station,PC-07\n1,2,3\n");
    let good = write_export(&tmp, "good.csv", DIAMETER_EXPORT);

    pct()
        .arg("extract")
        .arg(&bad)
        .arg(&good)
        .assert()
        .success()
        .stderr(predicate::str::contains("no 'Probe ID' header row"))
        .stdout(predicate::str::contains("good.csv"));
}

#[test]
fn test_extract_fails_when_every_file_fails() {
    let tmp = TempDir::new().unwrap();
    let bad = write_export(&tmp, "bad.csv", "no marker here\n");

    pct().arg("extract").arg(&bad).assert().failure();
}

#[test]
fn test_extract_json_reports_kind() {
    let tmp = TempDir::new().unwrap();
    let file = write_export(&tmp, "cres.csv", CONTACT_EXPORT);

    pct()
        .args(["extract", "--format", "json"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Contact Resistance (Ohm)"));
}

#[test]
fn test_extract_directory_input() {
    let tmp = TempDir::new().unwrap();
    write_export(&tmp, "one.csv", DIAMETER_EXPORT);
    write_export(&tmp, "two.csv", CONTACT_EXPORT);

    pct()
        .arg("extract")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 file(s) extracted"));
}

// ============================================================================
// Analyze Command Tests
// ============================================================================

#[test]
fn test_analyze_default_thresholds() {
    let tmp = TempDir::new().unwrap();
    let file = write_export(&tmp, "dia.csv", DIAMETER_EXPORT);

    pct()
        .arg("analyze")
        .arg(&file)
        .assert()
        .success()
        // 25.0 breaches UCL 24
        .stdout(predicate::str::contains("1 pin(s) out of range [14, 24]"))
        // delta = 10 - (-20) = 30, boundary inclusive
        .stdout(predicate::str::contains("Planarity within spec"))
        .stdout(predicate::str::contains("X/Y error out of spec"))
        .stdout(predicate::str::contains("V-Align out of spec"));
}

#[test]
fn test_analyze_custom_thresholds_and_pm15() {
    let tmp = TempDir::new().unwrap();
    let file = write_export(&tmp, "dia.csv", DIAMETER_EXPORT);

    pct()
        .args(["analyze", "--lcl", "10", "--ucl", "30", "--planarity", "pm15"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("all pins within [10, 30]"))
        // -20.0 breaches the symmetric bound
        .stdout(predicate::str::contains("Planarity out of spec"));
}

#[test]
fn test_analyze_contact_file_skips_diameter_rules() {
    let tmp = TempDir::new().unwrap();
    let file = write_export(&tmp, "cres.csv", CONTACT_EXPORT);

    pct()
        .arg("analyze")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("contact-resistance"))
        .stdout(predicate::str::contains("Diameter").not());
}

#[test]
fn test_analyze_json_output() {
    let tmp = TempDir::new().unwrap();
    let file = write_export(&tmp, "dia.csv", DIAMETER_EXPORT);

    let output = pct()
        .args(["analyze", "--json"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let result = &value["dia.csv"];
    assert_eq!(result["thresholds"]["ucl"], 24.0);
    assert_eq!(result["diameter_out"][0]["probe_id"], 2.0);
    assert_eq!(result["planarity_delta"], 30.0);
}

#[test]
fn test_analyze_batch_continues_after_bad_file() {
    let tmp = TempDir::new().unwrap();
    let bad = write_export(&tmp, "bad.csv", "nothing\n");
    let good = write_export(&tmp, "dia.csv", DIAMETER_EXPORT);

    pct()
        .arg("analyze")
        .arg(&bad)
        .arg(&good)
        .assert()
        .success()
        .stderr(predicate::str::contains("bad.csv"))
        .stdout(predicate::str::contains("dia.csv"));
}

#[test]
fn test_analyze_export_categories() {
    let tmp = TempDir::new().unwrap();
    let file = write_export(&tmp, "dia.csv", DIAMETER_EXPORT);
    let out = tmp.path().join("out");

    pct()
        .arg("analyze")
        .arg(&file)
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let subdir = fs::read_dir(&out)
        .unwrap()
        .filter_map(|e| e.ok())
        .find(|e| e.file_name().to_string_lossy().starts_with("analyzed_dia_"))
        .expect("analyzed output directory");
    for name in [
        "All_Data.csv",
        "XY_Error.csv",
        "V_Align_Out.csv",
        "Diameter_Out.csv",
        "Planarity_Out.csv",
        "Top_5_Max_Dia.csv",
        "Top_5_Min_Dia.csv",
    ] {
        assert!(subdir.path().join(name).exists(), "missing {}", name);
    }

    let top5 = fs::read_to_string(subdir.path().join("Top_5_Max_Dia.csv")).unwrap();
    assert!(top5.starts_with("Probe ID,Probe name,Diameter (µm)\n2,PIN-B,25\n"));
}

// ============================================================================
// Merge Command Tests
// ============================================================================

#[test]
fn test_merge_replaces_and_repositions() {
    let tmp = TempDir::new().unwrap();
    let base = write_export(&tmp, "dia.csv", DIAMETER_EXPORT);
    let overlay = write_export(&tmp, "cres.csv", CONTACT_EXPORT);

    let output = pct()
        .arg("merge")
        .arg(&base)
        .arg(&overlay)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut lines = stdout.lines();
    // contact then leakage sit immediately after Planarity
    assert_eq!(
        lines.next(),
        Some("Probe ID,Probe name,Diameter (µm),Planarity (µm),Contact Resistance (Ohm),Leakage Current (A),X Error (µm),Y Error (µm),V Align (µm)")
    );
    // X/Y replaced positionally from the overlay; V Align kept (absent there)
    assert_eq!(
        lines.next(),
        Some("1,PIN-A,20.1,-20.0,10.0,0.01,1.0,0.5,2.0")
    );
}

#[test]
fn test_merge_to_output_file() {
    let tmp = TempDir::new().unwrap();
    let base = write_export(&tmp, "dia.csv", DIAMETER_EXPORT);
    let overlay = write_export(&tmp, "cres.csv", CONTACT_EXPORT);
    let out = tmp.path().join("merged.csv");

    pct()
        .arg("merge")
        .arg(&base)
        .arg(&overlay)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged"));

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.contains("Contact Resistance (Ohm)"));
}

#[test]
fn test_merge_missing_file_fails() {
    let tmp = TempDir::new().unwrap();
    let base = write_export(&tmp, "dia.csv", DIAMETER_EXPORT);

    pct()
        .arg("merge")
        .arg(&base)
        .arg(tmp.path().join("missing.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}
