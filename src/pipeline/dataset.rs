//! In-memory datasets: the raw table the learners train on and the
//! discretized code matrix the relevance/redundancy analysis reads.

use anyhow::{Context, Result};
use polars::prelude::*;

use super::error::SelectionError;

/// Code used for a missing value in a [`DiscreteDataset`]. Never counted as a value.
pub const MISSING: u32 = u32::MAX;

/// How a raw feature column is interpreted
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureKind {
    /// Continuous values, discretized before analysis
    Numeric,
    /// Categorical values encoded as an index into `labels`
    Nominal { labels: Vec<String> },
}

/// Raw dataset: one `f64` per feature per row plus a class index.
///
/// Nominal values are stored as their label index and missing values as `NaN`.
/// Rows are stored contiguously (row-major).
#[derive(Debug, Clone)]
pub struct Dataset {
    feature_names: Vec<String>,
    kinds: Vec<FeatureKind>,
    class_name: String,
    class_labels: Vec<String>,
    values: Vec<f64>,
    classes: Vec<usize>,
}

impl Dataset {
    /// Build a dataset of numeric features from row vectors.
    pub fn new(
        feature_names: Vec<String>,
        class_name: impl Into<String>,
        class_labels: Vec<String>,
        rows: Vec<Vec<f64>>,
        classes: Vec<usize>,
    ) -> Result<Self, SelectionError> {
        let kinds = vec![FeatureKind::Numeric; feature_names.len()];
        Self::with_kinds(feature_names, kinds, class_name, class_labels, rows, classes)
    }

    /// Build a dataset with explicit per-feature kinds.
    pub fn with_kinds(
        feature_names: Vec<String>,
        kinds: Vec<FeatureKind>,
        class_name: impl Into<String>,
        class_labels: Vec<String>,
        rows: Vec<Vec<f64>>,
        classes: Vec<usize>,
    ) -> Result<Self, SelectionError> {
        let num_features = feature_names.len();
        if num_features == 0 {
            return Err(SelectionError::NoFeatures);
        }
        if rows.is_empty() {
            return Err(SelectionError::EmptyDataset);
        }
        if kinds.len() != num_features {
            return Err(SelectionError::RaggedRow {
                row: 0,
                found: kinds.len(),
                expected: num_features,
            });
        }
        if classes.len() != rows.len() {
            return Err(SelectionError::RaggedRow {
                row: rows.len().min(classes.len()),
                found: classes.len(),
                expected: rows.len(),
            });
        }

        let mut values = Vec::with_capacity(rows.len() * num_features);
        for (row_idx, (row, &class)) in rows.iter().zip(classes.iter()).enumerate() {
            if row.len() != num_features {
                return Err(SelectionError::RaggedRow {
                    row: row_idx,
                    found: row.len(),
                    expected: num_features,
                });
            }
            if class >= class_labels.len() {
                return Err(SelectionError::ClassOutOfRange {
                    row: row_idx,
                    class,
                    num_classes: class_labels.len(),
                });
            }
            values.extend_from_slice(row);
        }

        Ok(Self {
            feature_names,
            kinds,
            class_name: class_name.into(),
            class_labels,
            values,
            classes,
        })
    }

    /// Convert a polars DataFrame into a dataset.
    ///
    /// The class column is `class_column` when given, otherwise the last column.
    /// Rows with a missing class are skipped. Numeric columns become numeric
    /// features; string, categorical and boolean columns become nominal features
    /// with sorted labels.
    pub fn from_dataframe(df: &DataFrame, class_column: Option<&str>) -> Result<Self> {
        let column_names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let class_name = match class_column {
            Some(name) => {
                if !column_names.iter().any(|c| c == name) {
                    anyhow::bail!(
                        "Class column '{}' not found in dataset. Available columns: {:?}",
                        name,
                        column_names
                    );
                }
                name.to_string()
            }
            None => column_names
                .last()
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("Dataset has no columns"))?,
        };

        let class_col = df
            .column(&class_name)
            .with_context(|| format!("Class column '{}' not found", class_name))?;
        let class_strings = column_to_string_vec(class_col)?;
        let class_labels = sorted_labels(&class_strings);
        if class_labels.is_empty() {
            anyhow::bail!("Class column '{}' contains only missing values", class_name);
        }

        let keep: Vec<usize> = class_strings
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_ref().map(|_| i))
            .collect();
        let classes: Vec<usize> = keep
            .iter()
            .filter_map(|&i| class_strings[i].as_ref())
            .filter_map(|label| class_labels.iter().position(|l| l == label))
            .collect();

        let mut feature_names = Vec::new();
        let mut kinds = Vec::new();
        let mut feature_columns: Vec<Vec<f64>> = Vec::new();

        for col in df.get_columns() {
            if col.name().as_str() == class_name {
                continue;
            }
            let (kind, values) = feature_column_values(col)
                .with_context(|| format!("Failed to read feature column '{}'", col.name()))?;
            feature_names.push(col.name().to_string());
            kinds.push(kind);
            feature_columns.push(values);
        }

        let rows: Vec<Vec<f64>> = keep
            .iter()
            .map(|&r| feature_columns.iter().map(|c| c[r]).collect())
            .collect();

        Ok(Self::with_kinds(
            feature_names,
            kinds,
            class_name,
            class_labels,
            rows,
            classes,
        )?)
    }

    pub fn num_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn num_instances(&self) -> usize {
        self.classes.len()
    }

    pub fn num_classes(&self) -> usize {
        self.class_labels.len()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn kind(&self, feature: usize) -> &FeatureKind {
        &self.kinds[feature]
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn class_labels(&self) -> &[String] {
        &self.class_labels
    }

    /// Feature values of one row
    pub fn row(&self, row: usize) -> &[f64] {
        let width = self.num_features();
        &self.values[row * width..(row + 1) * width]
    }

    pub fn class_of(&self, row: usize) -> usize {
        self.classes[row]
    }

    pub fn classes(&self) -> &[usize] {
        &self.classes
    }

    /// Number of rows of each class
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.num_classes()];
        for &c in &self.classes {
            counts[c] += 1;
        }
        counts
    }

    /// Copy of one feature column
    pub fn column(&self, feature: usize) -> Vec<f64> {
        (0..self.num_instances())
            .map(|r| self.row(r)[feature])
            .collect()
    }
}

/// Discretized dataset stored column-major: one code vector per feature.
///
/// Codes are small non-negative integers; [`MISSING`] marks a missing value.
#[derive(Debug, Clone)]
pub struct DiscreteDataset {
    feature_names: Vec<String>,
    columns: Vec<Vec<u32>>,
    class_codes: Vec<u32>,
    cardinalities: Vec<u32>,
    class_cardinality: u32,
}

impl DiscreteDataset {
    /// Build from feature code columns and class codes.
    pub fn new(
        feature_names: Vec<String>,
        columns: Vec<Vec<u32>>,
        class_codes: Vec<u32>,
    ) -> Result<Self, SelectionError> {
        if columns.is_empty() {
            return Err(SelectionError::NoFeatures);
        }
        if class_codes.is_empty() {
            return Err(SelectionError::EmptyDataset);
        }
        for (feature, column) in columns.iter().enumerate() {
            if column.len() != class_codes.len() {
                return Err(SelectionError::RaggedRow {
                    row: feature,
                    found: column.len(),
                    expected: class_codes.len(),
                });
            }
        }
        if feature_names.len() != columns.len() {
            return Err(SelectionError::RaggedRow {
                row: 0,
                found: feature_names.len(),
                expected: columns.len(),
            });
        }

        let cardinalities = columns.iter().map(|c| cardinality_of(c)).collect();
        let class_cardinality = cardinality_of(&class_codes);

        Ok(Self {
            feature_names,
            columns,
            class_codes,
            cardinalities,
            class_cardinality,
        })
    }

    /// Build from row vectors of codes; features are named `f0`, `f1`, ...
    pub fn from_rows(rows: &[Vec<u32>], class_codes: Vec<u32>) -> Result<Self, SelectionError> {
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(SelectionError::RaggedRow {
                row,
                found: r.len(),
                expected: width,
            });
        }
        let columns = (0..width)
            .map(|f| rows.iter().map(|r| r[f]).collect())
            .collect();
        let names = (0..width).map(|f| format!("f{}", f)).collect();
        Self::new(names, columns, class_codes)
    }

    pub fn num_features(&self) -> usize {
        self.columns.len()
    }

    pub fn num_instances(&self) -> usize {
        self.class_codes.len()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn column(&self, feature: usize) -> &[u32] {
        &self.columns[feature]
    }

    pub fn class_codes(&self) -> &[u32] {
        &self.class_codes
    }

    /// One more than the largest non-missing code of a feature
    pub fn cardinality(&self, feature: usize) -> u32 {
        self.cardinalities[feature]
    }

    pub fn class_cardinality(&self) -> u32 {
        self.class_cardinality
    }

    /// Number of distinct non-missing codes present in a feature
    pub fn distinct_count(&self, feature: usize) -> usize {
        let mut seen = vec![false; self.cardinalities[feature] as usize];
        for &code in &self.columns[feature] {
            if code != MISSING {
                seen[code as usize] = true;
            }
        }
        seen.into_iter().filter(|s| *s).count()
    }
}

fn cardinality_of(codes: &[u32]) -> u32 {
    codes
        .iter()
        .filter(|&&c| c != MISSING)
        .max()
        .map(|m| m + 1)
        .unwrap_or(0)
}

fn sorted_labels(values: &[Option<String>]) -> Vec<String> {
    let mut labels: Vec<String> = values.iter().flatten().cloned().collect();
    labels.sort();
    labels.dedup();
    labels
}

/// Read one feature column as `f64` values with its kind
fn feature_column_values(col: &Column) -> Result<(FeatureKind, Vec<f64>)> {
    if col.dtype().is_primitive_numeric() {
        let cast = col.cast(&DataType::Float64)?;
        let values = cast
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        return Ok((FeatureKind::Numeric, values));
    }

    let strings = column_to_string_vec(col)?;
    let labels = sorted_labels(&strings);
    let values = strings
        .iter()
        .map(|v| match v {
            Some(s) => labels
                .iter()
                .position(|l| l == s)
                .map(|i| i as f64)
                .unwrap_or(f64::NAN),
            None => f64::NAN,
        })
        .collect();
    Ok((FeatureKind::Nominal { labels }, values))
}

/// Convert a column to a Vec of Option<String>
fn column_to_string_vec(col: &Column) -> Result<Vec<Option<String>>> {
    let values: Vec<Option<String>> = match col.dtype() {
        DataType::String => col
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect(),
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            let cast = col.cast(&DataType::Int64)?;
            cast.i64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            let cast = col.cast(&DataType::UInt64)?;
            cast.u64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::Float32 | DataType::Float64 => {
            let cast = col.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|v| v.map(|n| format!("{}", n)))
                .collect()
        }
        DataType::Boolean => col
            .bool()?
            .into_iter()
            .map(|v| v.map(|b| b.to_string()))
            .collect(),
        _ => {
            let cast = col.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map(|s| s.to_string()))
                .collect()
        }
    };

    Ok(values)
}
