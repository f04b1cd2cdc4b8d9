//! ecbgs: Ensemble Correlation-Based Gene Selection
//!
//! Selects small, non-redundant feature subsets from high-dimensional,
//! low-sample datasets using symmetric uncertainty, builds one classifier per
//! subset and evaluates the averaging-vote ensemble by cross-validation.

pub mod cli;
pub mod ensemble;
pub mod evaluation;
pub mod pipeline;
pub mod report;
pub mod utils;
