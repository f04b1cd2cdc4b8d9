//! Validated run configuration

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::ensemble::ClassifierKind;
use crate::pipeline::{validate_threshold, RetentionPolicy};

/// Settings of one selection run
#[derive(Debug, Clone, Serialize)]
pub struct SelectionConfig {
    pub dataset: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_column: Option<String>,
    pub threshold: f64,
    pub classifier: ClassifierKind,
    pub ensemble_size: usize,
    pub retention: RetentionPolicy,
    pub folds: usize,
    pub repetitions: usize,
}

impl SelectionConfig {
    /// Check the ranges the library relies on
    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.threshold)?;
        if self.ensemble_size == 0 {
            anyhow::bail!("The number of classifiers must be at least 1");
        }
        if self.folds < 2 {
            anyhow::bail!("Cross-validation needs at least 2 folds, got {}", self.folds);
        }
        if self.repetitions == 0 {
            anyhow::bail!("At least one cross-validation repetition is required");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SelectionConfig {
        SelectionConfig {
            dataset: PathBuf::from("data.arff"),
            class_column: None,
            threshold: 0.1,
            classifier: ClassifierKind::Tree,
            ensemble_size: 5,
            retention: RetentionPolicy::PerRound,
            folds: 10,
            repetitions: 1,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_invalid_ranges() {
        let mut c = config();
        c.threshold = 2.0;
        assert!(c.validate().is_err());

        let mut c = config();
        c.ensemble_size = 0;
        assert!(c.validate().is_err());

        let mut c = config();
        c.folds = 1;
        assert!(c.validate().is_err());
    }
}
