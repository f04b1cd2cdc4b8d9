//! CLI module - argument parsing and run configuration

pub mod args;
pub mod config;

pub use args::Cli;
pub use config::SelectionConfig;
