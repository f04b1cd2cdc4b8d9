//! Error types for the selection pipeline

use thiserror::Error;

/// Errors raised by dataset construction and the relevance/redundancy analysis.
#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    /// The dataset has no rows.
    #[error("dataset contains no instances")]
    EmptyDataset,

    /// The dataset has a class column but no feature columns.
    #[error("dataset contains no feature columns")]
    NoFeatures,

    /// Row widths disagree with the declared feature count.
    #[error("row {row} has {found} values, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    /// A class label index points outside the class label list.
    #[error("row {row} has class index {class}, but only {num_classes} classes are declared")]
    ClassOutOfRange {
        row: usize,
        class: usize,
        num_classes: usize,
    },

    /// Relevance threshold outside [0, 1].
    #[error("relevance threshold must be in [0, 1], got {0}")]
    InvalidThreshold(f64),

    /// Ensemble size below one.
    #[error("number of classifiers must be at least 1, got {0}")]
    InvalidEnsembleSize(usize),

    /// No feature scored above the relevance threshold.
    #[error("no feature has symmetric uncertainty above the threshold {threshold}")]
    NoRelevantFeatures { threshold: f64 },

    /// A feature index outside `[0, num_features)`.
    #[error("feature index {index} out of range for {num_features} features")]
    FeatureOutOfRange { index: usize, num_features: usize },

    /// A classifier spec was offered after the ensemble reached its limit.
    #[error("ensemble already holds the maximum of {0} members")]
    EnsembleFull(usize),
}
