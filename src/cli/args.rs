//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

use crate::ensemble::ClassifierKind;
use crate::pipeline::RetentionPolicy;

use super::config::SelectionConfig;

/// ecbgs - Ensemble correlation-based gene selection
///
/// Ranks features by symmetric uncertainty with the class, splits the relevant
/// ones into non-redundant subsets and cross-validates a voting ensemble built
/// from those subsets.
#[derive(Parser, Debug)]
#[command(name = "ecbgs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Dataset file (ARFF, CSV, or Parquet).
    /// A name without extension resolves to <name>.arff
    pub dataset: PathBuf,

    /// Relevance threshold in [0, 1] - features need SU with the class above this value
    #[arg(allow_negative_numbers = true, value_parser = validate_threshold)]
    pub threshold: f64,

    /// Base classifier: "C" (decision tree) or "S" (linear SVM)
    #[arg(value_parser = parse_classifier_kind)]
    pub classifier: ClassifierKind,

    /// Maximum number of ensemble members (at least 1)
    #[arg(allow_negative_numbers = true, value_parser = validate_ensemble_size)]
    pub ensemble_size: usize,

    /// Class column name. Defaults to the last column
    #[arg(short, long)]
    pub class: Option<String>,

    /// Number of cross-validation folds
    #[arg(long, default_value = "10", value_parser = validate_folds)]
    pub folds: usize,

    /// Number of cross-validation repetitions; repetition r is seeded with r
    #[arg(long, default_value = "1", value_parser = validate_repetitions)]
    pub repetitions: usize,

    /// Features each member is restricted to.
    /// Options: "per-round" (that round's survivors, default) or "cumulative" (survivors of all rounds so far)
    #[arg(long, default_value = "per-round", value_parser = parse_retention)]
    pub retention: RetentionPolicy,

    /// Write the selection and evaluation results to this JSON file
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Print only the accuracy line
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

impl Cli {
    /// Run configuration carried through the pipeline and into the export
    pub fn config(&self) -> SelectionConfig {
        SelectionConfig {
            dataset: self.dataset.clone(),
            class_column: self.class.clone(),
            threshold: self.threshold,
            classifier: self.classifier,
            ensemble_size: self.ensemble_size,
            retention: self.retention,
            folds: self.folds,
            repetitions: self.repetitions,
        }
    }
}

/// Validator for the relevance threshold
fn validate_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| "The relevant threshold must be a float number".to_string())?;

    if !(0.0..=1.0).contains(&value) {
        Err(format!(
            "The relevant threshold must be in range from 0 to 1, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}

/// Validator for the ensemble size
fn validate_ensemble_size(s: &str) -> Result<usize, String> {
    let value: i64 = s
        .parse()
        .map_err(|_| "The number of classifiers must be an integer".to_string())?;

    if value < 1 {
        Err(format!(
            "The number of classifiers must be at least 1, got {}",
            value
        ))
    } else {
        Ok(value as usize)
    }
}

fn validate_folds(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number of folds", s))?;

    if value < 2 {
        Err(format!("folds must be at least 2, got {}", value))
    } else {
        Ok(value)
    }
}

fn validate_repetitions(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number of repetitions", s))?;

    if value == 0 {
        Err("repetitions must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

fn parse_classifier_kind(s: &str) -> Result<ClassifierKind, String> {
    s.parse()
}

fn parse_retention(s: &str) -> Result<RetentionPolicy, String> {
    s.parse()
}
