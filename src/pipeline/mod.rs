//! Pipeline module - loading, discretization, relevance and redundancy analysis

pub mod arff;
pub mod dataset;
pub mod discretize;
pub mod error;
pub mod loader;
pub mod redundancy;
pub mod relevance;
pub mod statistics;

pub use arff::{load_arff, parse_arff, ArffError};
pub use dataset::*;
pub use discretize::*;
pub use error::SelectionError;
pub use loader::*;
pub use redundancy::*;
pub use relevance::*;
pub use statistics::*;
