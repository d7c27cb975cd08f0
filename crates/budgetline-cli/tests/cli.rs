use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

const HEADER: &str = "Subject,Observation,X,Y,X-intercept,Y-intercept";

fn budgetline() -> Command {
    Command::cargo_bin("budgetline").expect("binary built")
}

fn write_input(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write input csv");
    path
}

#[test]
fn adjusts_bundles_end_to_end() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_input(
        dir.path(),
        "input.csv",
        &format!("{HEADER}\n1,1,5,5,20,10\n1,2,10,5,20,10\n"),
    );
    let output = dir.path().join("adjusted.csv");

    budgetline()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Wrote 2 rows to {}",
            output.display()
        )))
        .stdout(predicate::str::contains("max abs_delta="))
        .stdout(predicate::str::contains("income_after range=["));

    let text = fs::read_to_string(&output).expect("read output");
    let mut lines = text.lines();
    assert_eq!(
        lines.next().expect("header row"),
        format!("{HEADER},X_old,Y_old,income_before,income_after,abs_delta")
    );

    let first: Vec<&str> = lines.next().expect("first row").split(',').collect();
    assert_eq!(first[0], "1");
    assert_eq!(first[6], "5");
    assert_eq!(first[7], "5");
    let x: f64 = first[2].parse().expect("adjusted X");
    let y: f64 = first[3].parse().expect("adjusted Y");
    let income_after: f64 = first[9].parse().expect("income_after");
    assert!((x - 6.0).abs() < 1e-9);
    assert!((y - 7.0).abs() < 1e-9);
    assert!((income_after - 1.0).abs() < 1e-9);

    assert_eq!(lines.count(), 1);
}

#[test]
fn missing_column_fails_without_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_input(
        dir.path(),
        "input.csv",
        "Subject,Observation,X,Y,Y-intercept\n1,1,5,5,10\n",
    );
    let output = dir.path().join("adjusted.csv");

    budgetline()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("X-intercept"));

    assert!(!output.exists());
}

#[test]
fn creates_output_parent_dirs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_input(
        dir.path(),
        "input.csv",
        &format!("{HEADER}\n1,1,5,5,20,10\n"),
    );
    let output = dir.path().join("nested").join("deeper").join("adjusted.csv");

    budgetline()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    assert!(output.exists());
}

#[test]
fn passes_extra_columns_through() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_input(
        dir.path(),
        "input.csv",
        &format!("{HEADER},Session\n1,1,5,5,20,10,morning\n"),
    );
    let output = dir.path().join("adjusted.csv");

    budgetline()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let text = fs::read_to_string(&output).expect("read output");
    let mut lines = text.lines();
    assert_eq!(
        lines.next().expect("header row"),
        format!("{HEADER},Session,X_old,Y_old,income_before,income_after,abs_delta")
    );
    let first: Vec<&str> = lines.next().expect("first row").split(',').collect();
    assert_eq!(first[6], "morning");
}

#[test]
fn writes_json_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_input(
        dir.path(),
        "input.csv",
        &format!("{HEADER}\n1,1,5,5,20,10\n1,2,10,5,20,10\n"),
    );
    let output = dir.path().join("adjusted.csv");
    let report = dir.path().join("report").join("run.json");

    budgetline()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--report")
        .arg(&report)
        .assert()
        .success();

    let text = fs::read_to_string(&report).expect("read report");
    let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(value["summary"]["rows"], 2);
    assert_eq!(value["summary"]["clipped"], 0);
    assert!(value["input"].as_str().expect("input path").ends_with("input.csv"));
}
