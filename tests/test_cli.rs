//! Tests for CLI argument parsing and the binary's exit behaviour

use assert_cmd::Command;
use clap::Parser;
use ecbgs::cli::Cli;
use ecbgs::ensemble::ClassifierKind;
use ecbgs::pipeline::RetentionPolicy;
use predicates::prelude::*;
use std::path::PathBuf;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_cli_positional_arguments() {
    let cli = Cli::parse_from(["ecbgs", "data.arff", "0.1", "S", "20"]);

    assert_eq!(cli.dataset, PathBuf::from("data.arff"));
    assert_eq!(cli.threshold, 0.1);
    assert_eq!(cli.classifier, ClassifierKind::Margin);
    assert_eq!(cli.ensemble_size, 20);
}

#[test]
fn test_cli_default_values() {
    let cli = Cli::parse_from(["ecbgs", "data", "0", "C", "3"]);

    assert_eq!(cli.folds, 10, "Default folds should be 10");
    assert_eq!(cli.repetitions, 1, "Default repetitions should be 1");
    assert_eq!(cli.retention, RetentionPolicy::PerRound);
    assert!(cli.class.is_none());
    assert!(cli.export.is_none());
    assert!(!cli.quiet);
    assert_eq!(cli.infer_schema_length, 10000);
}

#[test]
fn test_cli_options() {
    let cli = Cli::parse_from([
        "ecbgs",
        "data.csv",
        "0.25",
        "C",
        "5",
        "--class",
        "diagnosis",
        "--folds",
        "5",
        "--repetitions",
        "3",
        "--retention",
        "cumulative",
        "--export",
        "out.json",
        "--quiet",
    ]);

    assert_eq!(cli.class.as_deref(), Some("diagnosis"));
    assert_eq!(cli.folds, 5);
    assert_eq!(cli.repetitions, 3);
    assert_eq!(cli.retention, RetentionPolicy::Cumulative);
    assert_eq!(cli.export, Some(PathBuf::from("out.json")));
    assert!(cli.quiet);

    let config = cli.config();
    assert!(config.validate().is_ok());
    assert_eq!(config.classifier, ClassifierKind::Tree);
}

#[test]
fn test_cli_rejects_bad_arguments() {
    assert!(Cli::try_parse_from(["ecbgs", "d", "1.5", "C", "3"]).is_err());
    assert!(Cli::try_parse_from(["ecbgs", "d", "-0.2", "C", "3"]).is_err());
    assert!(Cli::try_parse_from(["ecbgs", "d", "abc", "C", "3"]).is_err());
    assert!(Cli::try_parse_from(["ecbgs", "d", "0.1", "X", "3"]).is_err());
    assert!(Cli::try_parse_from(["ecbgs", "d", "0.1", "C", "0"]).is_err());
    assert!(Cli::try_parse_from(["ecbgs", "d", "0.1", "C", "two"]).is_err());
    assert!(Cli::try_parse_from(["ecbgs", "d", "0.1", "C", "3", "--folds", "1"]).is_err());
    assert!(Cli::try_parse_from(["ecbgs", "d", "0.1", "C"]).is_err());
}

#[test]
fn test_binary_prints_accuracy_in_quiet_mode() {
    let (_temp_dir, arff_path) = create_temp_arff();

    Command::cargo_bin("ecbgs")
        .unwrap()
        .arg(&arff_path)
        .args(["0", "C", "3", "--quiet"])
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn test_binary_resolves_base_name_and_repeats() {
    let (temp_dir, _arff_path) = create_temp_arff();

    Command::cargo_bin("ecbgs")
        .unwrap()
        .arg(temp_dir.path().join("expression"))
        .args(["0", "S", "2", "--quiet", "--repetitions", "2"])
        .assert()
        .success()
        .stdout("1, 1\n");
}

#[test]
fn test_binary_exports_json() {
    let (temp_dir, arff_path) = create_temp_arff();
    let export_path = temp_dir.path().join("run.json");

    Command::cargo_bin("ecbgs")
        .unwrap()
        .arg(&arff_path)
        .args(["0", "C", "3", "--quiet", "--export"])
        .arg(&export_path)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&export_path).unwrap()).unwrap();
    assert_eq!(json["members"].as_array().unwrap().len(), 2);
}

#[test]
fn test_binary_missing_file_fails() {
    Command::cargo_bin("ecbgs")
        .unwrap()
        .args(["/nonexistent/dataset", "0.1", "C", "3"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("was not found"));
}

#[test]
fn test_binary_usage_errors_exit_with_two() {
    Command::cargo_bin("ecbgs")
        .unwrap()
        .args(["data", "2", "C", "3"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("range from 0 to 1"));

    Command::cargo_bin("ecbgs")
        .unwrap()
        .args(["data", "0.1", "Q", "3"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("'C' (tree) or 'S' (SVM)"));

    Command::cargo_bin("ecbgs")
        .unwrap()
        .args(["data", "0.1", "C", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("at least 1"));
}

#[test]
fn test_binary_no_relevant_features_fails() {
    let (_temp_dir, arff_path) = create_temp_arff();

    Command::cargo_bin("ecbgs")
        .unwrap()
        .arg(&arff_path)
        .args(["1", "C", "3", "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no feature has symmetric uncertainty"));
}
