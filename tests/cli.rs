//! E2E tests running the takehome binary

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::io::Write;
use std::process::{Command, Output, Stdio};

fn takehome(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_takehome"))
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Decimal amounts serialise as strings
fn amount(value: &serde_json::Value) -> Decimal {
    value
        .as_str()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| panic!("not an amount: {}", value))
}

/// Summary table for the basic employee scenario
#[test]
fn summary_from_inputs_file() {
    let output = takehome(&["summary", "-i", "tests/data/basic.json"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = stdout(&output);
    assert!(stdout.contains("TAKE-HOME SUMMARY (2026/27) - basic rate taxpayer"));
    assert!(stdout.contains("£48,000.00"));
    assert!(stdout.contains("£6,486.00"));
    assert!(stdout.contains("£2,594.40"));
    assert!(stdout.contains("£38,665.85"));
}

/// Flags work without an inputs file
#[test]
fn summary_from_flags() {
    let output = takehome(&[
        "summary",
        "--salary",
        "45000",
        "--savings",
        "1000",
        "--dividends",
        "1000",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout(&output).contains("£37,865.85"));
}

/// JSON output carries the full result
#[test]
fn summary_json() {
    let output = takehome(&["summary", "-i", "tests/data/basic.json", "--json"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(amount(&json["total_income"]), dec!(48000));
    assert_eq!(amount(&json["national_insurance"]), dec!(2594.40));
    assert_eq!(amount(&json["income_tax"]["salary_tax"]), dec!(6486));
    assert_eq!(json["warnings"].as_array().map(Vec::len), Some(0));
}

/// Flags override values from the inputs file
#[test]
fn flags_override_inputs_file() {
    let output = takehome(&[
        "summary",
        "-i",
        "tests/data/basic.json",
        "--savings",
        "1000",
        "--json",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(amount(&json["total_income"]), dec!(47000));
    assert_eq!(amount(&json["income_tax"]["savings_tax"]), Decimal::ZERO);
}

/// Inputs can be piped through stdin
#[test]
fn summary_from_stdin() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_takehome"))
        .args(["summary", "-i", "-", "--json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to spawn command");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(br#"{"salary": 60270}"#)
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(amount(&json["national_insurance"]), dec!(3216));
}

/// Invalid inputs are rejected at the boundary
#[test]
fn invalid_inputs_rejected() {
    let output = takehome(&["summary", "-i", "tests/data/invalid.json"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("exceeds salary"), "stderr: {}", stderr);
}

/// Amounts too large to calculate with are rejected, not crashed on
#[test]
fn oversized_inputs_rejected() {
    let output = takehome(&[
        "summary",
        "--salary",
        "50000000000000000000000000000",
        "--savings",
        "50000000000000000000000000000",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("salary exceeds the maximum"), "stderr: {}", stderr);
    assert!(!stderr.contains("panicked"), "stderr: {}", stderr);
}

/// Rates file overrides selected thresholds
#[test]
fn rates_override() {
    let output = takehome(&[
        "summary",
        "--salary",
        "30000",
        "--gains",
        "10000",
        "--rates",
        "tests/data/rates_override.json",
        "--json",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["tax_year"], 2026);
    // 4,000 taxable at 18%
    assert_eq!(amount(&json["capital_gains"]["tax"]), dec!(720));
}

/// Explanation steps for a self-employed voluntary Class 2 payer
#[test]
fn explain_self_employed() {
    let output = takehome(&["explain", "-i", "tests/data/self_employed.json"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = stdout(&output);
    assert!(stdout.contains("National Insurance (Self-Employed)"));
    assert!(stdout.contains("Voluntary Class 2 NI"));
    assert!(stdout.contains("£189.80"));
    assert!(stdout.contains("Annual Take-Home Pay"));
}

#[test]
fn explain_json() {
    let output = takehome(&["explain", "-i", "tests/data/basic.json", "--json"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let steps: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let steps = steps.as_array().unwrap();
    assert_eq!(steps[0]["title"], "Total Income");
    assert_eq!(steps[0]["value"], "£48,000.00");
    assert_eq!(steps.last().unwrap()["value"], "£38,665.85");
}

/// CSV statement to stdout
#[test]
fn export_csv_statement() {
    let output = takehome(&["export", "-i", "tests/data/basic.json", "--format", "csv"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = stdout(&output);
    assert!(stdout.starts_with("UK Tax Calculator 2026/27 - Tax Statement"));
    assert!(stdout.contains("Total Deductions,\"£9,334.15\""));
    assert!(stdout.contains("Annual Take-Home,\"£38,665.85\""));
}

/// HTML statement written to a file
#[test]
fn export_html_statement() {
    let path = std::env::temp_dir().join(format!("takehome-test-{}.html", std::process::id()));
    let path_str = path.to_string_lossy().to_string();
    let output = takehome(&[
        "export",
        "-i",
        "tests/data/basic.json",
        "--format",
        "html",
        "--output",
        &path_str,
        "--print",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let html = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert!(html.contains("UK Tax Statement 2026/27"));
    assert!(html.contains("Reference: "));
    assert!(html.contains("window.print()"));
    assert!(html.contains("£38,665.85"));
}

/// One result row per batch row
#[test]
fn batch_results() {
    let output = takehome(&["batch", "tests/data/batch.csv"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = stdout(&output);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("basic,45000.00,48000.00"));
    assert!(lines[2].starts_with("sole-trader,"));
    assert!(lines[3].starts_with("ras,70000.00"));
}

/// Batch errors name the failing line
#[test]
fn batch_invalid_row() {
    let output = takehome(&["batch", "tests/data/batch_invalid.csv"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 3"), "stderr: {}", stderr);
}

#[test]
fn schema_csv_header() {
    let output = takehome(&["schema", "csv-header"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout(&output).starts_with("id,salary,savings_interest"));
}

#[test]
fn schema_rates() {
    let output = takehome(&["schema", "rates-schema"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(schema["properties"]["personal_allowance"].is_object());
}
