//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a small expression DataFrame with known characteristics
///
/// This DataFrame includes:
/// - `gene_a`: Perfectly separates the classes with a wide gap
/// - `gene_b`: Monotone copy of gene_a (fully redundant with it)
/// - `gene_noise`: Identical value multiset in both classes (no information)
/// - `class`: "normal" for the first 10 rows, "tumor" for the last 10
pub fn create_expression_dataframe() -> DataFrame {
    df! {
        "gene_a" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0,
                     101.0, 102.0, 103.0, 104.0, 105.0, 106.0, 107.0, 108.0, 109.0, 110.0],
        "gene_b" => [3.0f64, 5.0, 7.0, 9.0, 11.0, 13.0, 15.0, 17.0, 19.0, 21.0,
                     203.0, 205.0, 207.0, 209.0, 211.0, 213.0, 215.0, 217.0, 219.0, 221.0],
        "gene_noise" => [5.0f64, 8.0, 2.0, 9.0, 1.0, 3.0, 7.0, 4.0, 6.0, 0.0,
                         4.0, 6.0, 8.0, 1.0, 9.0, 2.0, 5.0, 7.0, 3.0, 0.0],
        "class" => ["normal", "normal", "normal", "normal", "normal",
                    "normal", "normal", "normal", "normal", "normal",
                    "tumor", "tumor", "tumor", "tumor", "tumor",
                    "tumor", "tumor", "tumor", "tumor", "tumor"],
    }
    .unwrap()
}

/// The expression fixture in ARFF form
pub fn expression_arff() -> String {
    let df = create_expression_dataframe();
    let a = df.column("gene_a").unwrap().f64().unwrap().clone();
    let b = df.column("gene_b").unwrap().f64().unwrap().clone();
    let noise = df.column("gene_noise").unwrap().f64().unwrap().clone();
    let class = df.column("class").unwrap().str().unwrap().clone();

    let mut content = String::from(
        "% synthetic expression data\n@RELATION expression\n\n\
         @ATTRIBUTE gene_a NUMERIC\n@ATTRIBUTE gene_b NUMERIC\n@ATTRIBUTE gene_noise NUMERIC\n\
         @ATTRIBUTE class {normal,tumor}\n\n@DATA\n",
    );
    for i in 0..df.height() {
        content.push_str(&format!(
            "{},{},{},{}\n",
            a.get(i).unwrap(),
            b.get(i).unwrap(),
            noise.get(i).unwrap(),
            class.get(i).unwrap()
        ));
    }
    content
}

/// Create a temporary directory with the expression fixture as `expression.arff`
pub fn create_temp_arff() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let arff_path = temp_dir.path().join("expression.arff");
    std::fs::write(&arff_path, expression_arff()).unwrap();
    (temp_dir, arff_path)
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Create a larger random expression matrix for stress tests
pub fn create_large_expression_dataframe(rows: usize, genes: usize, seed: u64) -> DataFrame {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    let mut rng = StdRng::seed_from_u64(seed);

    let class: Vec<&str> = (0..rows)
        .map(|i| if i % 2 == 0 { "normal" } else { "tumor" })
        .collect();

    let mut columns: Vec<Column> = Vec::with_capacity(genes + 1);
    for g in 0..genes {
        let values: Vec<f64> = (0..rows)
            .map(|i| {
                // Every fifth gene carries a class shift
                let shift = if g % 5 == 0 && i % 2 == 1 { 3.0 } else { 0.0 };
                rng.gen::<f64>() + shift
            })
            .collect();
        columns.push(Column::new(format!("gene_{}", g).into(), values));
    }
    columns.push(Column::new("class".into(), class));

    DataFrame::new(columns).unwrap()
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}
