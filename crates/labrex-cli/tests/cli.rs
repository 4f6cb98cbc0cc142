//! Integration tests for the labrex binary.

use assert_cmd::Command;
use predicates::prelude::*;

const PAGE1_TOKENS: &str = "\
conf,text,left,top,width,height
92.0,City,10,40,40,12
91.0,Care,55,41,40,12
90.0,Hospital,100,40,60,12
88.0,Patient,10,80,50,12
87.0,Name:,65,81,40,12
86.0,John,110,80,30,12
85.0,Smith,145,81,35,12
";

const PAGE2_TOKENS: &str = "\
conf,text,left,top,width,height
95.0,Hemoglobin,10,40,80,12
94.0,14.2,100,41,30,12
93.0,g/dL,140,40,30,12
90.0,12.0,180,41,30,12
91.0,-,215,40,8,12
92.0,15.5,230,41,30,12
";

fn labrex() -> Command {
    Command::cargo_bin("labrex").unwrap()
}

#[test]
fn process_prints_json_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("cbc_tokens.csv");
    std::fs::write(&input, PAGE2_TOKENS).unwrap();

    labrex()
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"test_name\": \"Hemoglobin\""))
        .stdout(predicate::str::contains("\"value\": \"14.2\""))
        .stdout(predicate::str::contains("\"reference_range\": \"12.0 - 15.5\""));
}

#[test]
fn process_missing_input_fails() {
    labrex()
        .arg("process")
        .arg("does/not/exist_tokens.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn batch_writes_extraction_and_merged_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let tokens_dir = dir.path().join("tokens");
    let output_dir = dir.path().join("extracted");
    std::fs::create_dir_all(&tokens_dir).unwrap();
    std::fs::write(tokens_dir.join("report_page1_tokens.csv"), PAGE1_TOKENS).unwrap();
    std::fs::write(tokens_dir.join("report_page2_tokens.csv"), PAGE2_TOKENS).unwrap();

    labrex()
        .arg("batch")
        .arg(&tokens_dir)
        .arg("--output-dir")
        .arg(&output_dir)
        .assert()
        .success();

    let page1: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(output_dir.join("report_page1_extracted.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(page1["fields"]["Hospital"]["value"], "City Care Hospital");
    assert_eq!(page1["fields"]["Name"]["value"], "John Smith");

    let merged: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(output_dir.join("report_merged.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(merged["fields"]["Hospital"]["value"], "City Care Hospital");
    assert_eq!(merged["test_results"][0]["test_name"], "Hemoglobin");
    assert_eq!(merged["test_results"][0]["unit"], "g/dL");
}

#[test]
fn batch_fails_on_directory_without_token_tables() {
    let dir = tempfile::tempdir().unwrap();
    let output_dir = dir.path().join("extracted");

    labrex()
        .arg("batch")
        .arg(dir.path())
        .arg("--output-dir")
        .arg(&output_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No token tables found"));

    // Nothing may be written when the batch refuses to start
    assert!(!output_dir.exists());
}

#[test]
fn batch_malformed_table_degrades_to_empty_result() {
    let dir = tempfile::tempdir().unwrap();
    let tokens_dir = dir.path().join("tokens");
    let output_dir = dir.path().join("extracted");
    std::fs::create_dir_all(&tokens_dir).unwrap();
    std::fs::write(tokens_dir.join("good_tokens.csv"), PAGE2_TOKENS).unwrap();
    std::fs::write(
        tokens_dir.join("bad_tokens.csv"),
        "conf,text,left,top,width,height\nnot-a-number,x,1,2,3,4\n",
    )
    .unwrap();

    labrex()
        .arg("batch")
        .arg(&tokens_dir)
        .arg("--output-dir")
        .arg(&output_dir)
        .assert()
        .success();

    let bad: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(output_dir.join("bad_extracted.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(bad["fields"], serde_json::json!({}));
    assert_eq!(bad["test_results"], serde_json::json!([]));

    let good: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(output_dir.join("good_extracted.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(good["test_results"][0]["test_name"], "Hemoglobin");
}

#[test]
fn merge_command_reports_when_nothing_to_merge() {
    let dir = tempfile::tempdir().unwrap();

    labrex()
        .arg("merge")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No multi-page reports found."));
}

#[test]
fn config_show_prints_defaults() {
    labrex()
        .arg("config")
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"y_tolerance\": 20"));
}
