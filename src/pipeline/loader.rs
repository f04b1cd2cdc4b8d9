//! Dataset loader for ARFF, CSV and Parquet files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::*;

use super::arff::load_arff;
use crate::utils::{create_spinner, finish_with_success};

/// Supported input formats, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Arff,
    Csv,
    Parquet,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "arff" => Ok(InputFormat::Arff),
            "csv" => Ok(InputFormat::Csv),
            "parquet" => Ok(InputFormat::Parquet),
            _ => anyhow::bail!(
                "Unsupported file format: '{}'. Supported formats: arff, csv, parquet",
                extension
            ),
        }
    }
}

/// Resolve a dataset argument to an existing file.
///
/// A path that exists is used as is. A base name without extension resolves to
/// `<base>.arff`.
pub fn resolve_dataset_path(dataset: &Path) -> Result<PathBuf> {
    if dataset.is_file() {
        return Ok(dataset.to_path_buf());
    }

    if dataset.extension().is_none() {
        let with_arff = dataset.with_extension("arff");
        if with_arff.is_file() {
            return Ok(with_arff);
        }
    }

    anyhow::bail!("The file {} was not found", dataset.display())
}

/// Load a dataset from a file (ARFF, CSV or Parquet based on extension)
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    let df = match InputFormat::from_path(path)? {
        InputFormat::Arff => load_arff(path)
            .with_context(|| format!("Failed to load ARFF file: {}", path.display()))?,
        InputFormat::Csv => {
            let schema_length = if infer_schema_length == 0 {
                None
            } else {
                Some(infer_schema_length)
            };
            LazyCsvReader::new(path)
                .with_infer_schema_length(schema_length)
                .finish()
                .with_context(|| format!("Failed to load CSV file: {}", path.display()))?
                .collect()
                .with_context(|| format!("Failed to read CSV file: {}", path.display()))?
        }
        InputFormat::Parquet => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?
            .collect()
            .with_context(|| format!("Failed to read Parquet file: {}", path.display()))?,
    };

    Ok(df)
}

/// Load a dataset behind a spinner and report its shape.
///
/// Returns `(DataFrame, rows, columns, memory_mb)`.
pub fn load_dataset_with_progress(
    path: &Path,
    infer_schema_length: usize,
) -> Result<(DataFrame, usize, usize, f64)> {
    let spinner = create_spinner(&format!("Loading {}...", path.display()));
    let df = load_dataset(path, infer_schema_length)?;
    let (rows, cols) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
    finish_with_success(&spinner, &format!("Loaded {} rows x {} columns", rows, cols));
    Ok((df, rows, cols, memory_mb))
}
