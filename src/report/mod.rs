//! Report module - console summary and JSON export of a selection run

pub mod selection_export;
pub mod summary;

pub use selection_export::*;
pub use summary::*;
