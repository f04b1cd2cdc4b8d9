//! Evaluation module - cross-validation and classification metrics

pub mod cross_validation;
pub mod metrics;

pub use cross_validation::{stratified_folds, CrossValidator, EvaluationError, DEFAULT_FOLDS};
pub use metrics::{area_under_roc, Metrics};
