//! ARFF (attribute-relation file format) reader.
//!
//! Parses the dense ARFF layout into a Polars DataFrame: `numeric`, `real` and
//! `integer` attributes become `Float64` columns, nominal and string attributes
//! become `String` columns, and `?` becomes null. Sparse data rows and
//! relational attributes are rejected.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use polars::prelude::*;
use thiserror::Error;

/// Errors that can occur when reading an ARFF file
#[derive(Debug, Error)]
pub enum ArffError {
    /// I/O failure while reading the file
    #[error("I/O error reading ARFF file: {0}")]
    Io(#[from] std::io::Error),

    /// A header line could not be understood
    #[error("line {line}: invalid header: {message}")]
    InvalidHeader { line: usize, message: String },

    /// The `@data` section was never reached
    #[error("ARFF file has no @data section")]
    MissingData,

    /// The header declares no attributes
    #[error("ARFF file declares no attributes")]
    NoAttributes,

    /// An attribute type this reader does not handle
    #[error("line {line}: unsupported attribute type '{kind}'")]
    UnsupportedType { line: usize, kind: String },

    /// Sparse `{index value, ...}` rows are not supported
    #[error("line {line}: sparse ARFF rows are not supported")]
    SparseRow { line: usize },

    /// A data row has the wrong number of values
    #[error("line {line}: expected {expected} values, found {found}")]
    RowWidth {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A numeric attribute holds something that is not a number
    #[error("line {line}: attribute '{attribute}' expects a number, found '{value}'")]
    InvalidNumber {
        line: usize,
        attribute: String,
        value: String,
    },

    /// A nominal attribute holds an undeclared label
    #[error("line {line}: attribute '{attribute}' has undeclared value '{value}'")]
    UnknownLabel {
        line: usize,
        attribute: String,
        value: String,
    },

    /// DataFrame assembly failed
    #[error("failed to build DataFrame: {0}")]
    Polars(#[from] PolarsError),
}

#[derive(Debug, Clone, PartialEq)]
enum AttributeType {
    Numeric,
    Nominal(Vec<String>),
    Text,
}

#[derive(Debug, Clone)]
struct Attribute {
    name: String,
    kind: AttributeType,
}

enum ColumnValues {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

/// Load an ARFF file into a DataFrame
pub fn load_arff(path: &Path) -> Result<DataFrame, ArffError> {
    let file = File::open(path)?;
    parse_arff(BufReader::new(file))
}

/// Parse ARFF content from any buffered reader
pub fn parse_arff<R: BufRead>(reader: R) -> Result<DataFrame, ArffError> {
    let mut attributes: Vec<Attribute> = Vec::new();
    let mut columns: Vec<ColumnValues> = Vec::new();
    let mut in_data = false;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }

        if !in_data {
            let lower = trimmed.to_lowercase();
            if lower.starts_with("@relation") {
                continue;
            } else if lower.starts_with("@attribute") {
                attributes.push(parse_attribute(&trimmed["@attribute".len()..], line_no)?);
            } else if lower.starts_with("@data") {
                if attributes.is_empty() {
                    return Err(ArffError::NoAttributes);
                }
                columns = attributes
                    .iter()
                    .map(|a| match a.kind {
                        AttributeType::Numeric => ColumnValues::Numeric(Vec::new()),
                        _ => ColumnValues::Text(Vec::new()),
                    })
                    .collect();
                in_data = true;
            } else {
                return Err(ArffError::InvalidHeader {
                    line: line_no,
                    message: format!("unexpected line '{}'", trimmed),
                });
            }
            continue;
        }

        if trimmed.starts_with('{') {
            return Err(ArffError::SparseRow { line: line_no });
        }

        let values = split_values(trimmed);
        if values.len() != attributes.len() {
            return Err(ArffError::RowWidth {
                line: line_no,
                expected: attributes.len(),
                found: values.len(),
            });
        }

        for ((attribute, column), raw) in attributes.iter().zip(columns.iter_mut()).zip(values) {
            let missing = raw == "?";
            match (column, &attribute.kind) {
                (ColumnValues::Numeric(col), _) => {
                    if missing {
                        col.push(None);
                    } else {
                        let value = raw.parse::<f64>().map_err(|_| ArffError::InvalidNumber {
                            line: line_no,
                            attribute: attribute.name.clone(),
                            value: raw.clone(),
                        })?;
                        col.push(Some(value));
                    }
                }
                (ColumnValues::Text(col), AttributeType::Nominal(labels)) => {
                    if missing {
                        col.push(None);
                    } else if labels.contains(&raw) {
                        col.push(Some(raw));
                    } else {
                        return Err(ArffError::UnknownLabel {
                            line: line_no,
                            attribute: attribute.name.clone(),
                            value: raw,
                        });
                    }
                }
                (ColumnValues::Text(col), _) => {
                    col.push(if missing { None } else { Some(raw) });
                }
            }
        }
    }

    if !in_data {
        return Err(ArffError::MissingData);
    }

    let series: Vec<Column> = attributes
        .iter()
        .zip(columns)
        .map(|(attribute, values)| match values {
            ColumnValues::Numeric(v) => Column::new(attribute.name.as_str().into(), v),
            ColumnValues::Text(v) => Column::new(attribute.name.as_str().into(), v),
        })
        .collect();

    Ok(DataFrame::new(series)?)
}

fn parse_attribute(rest: &str, line: usize) -> Result<Attribute, ArffError> {
    let rest = rest.trim();
    let (name, remainder) = take_token(rest).ok_or_else(|| ArffError::InvalidHeader {
        line,
        message: "attribute without a name".to_string(),
    })?;
    let type_spec = remainder.trim();
    if type_spec.is_empty() {
        return Err(ArffError::InvalidHeader {
            line,
            message: format!("attribute '{}' has no type", name),
        });
    }

    let kind = if type_spec.starts_with('{') {
        let inner = type_spec
            .trim_start_matches('{')
            .trim_end_matches('}');
        AttributeType::Nominal(split_values(inner))
    } else {
        let lower = type_spec.to_lowercase();
        let keyword = lower.split_whitespace().next().unwrap_or("");
        match keyword {
            "numeric" | "real" | "integer" => AttributeType::Numeric,
            "string" | "date" => AttributeType::Text,
            _ => {
                return Err(ArffError::UnsupportedType {
                    line,
                    kind: type_spec.to_string(),
                })
            }
        }
    };

    Ok(Attribute { name, kind })
}

/// Take a possibly quoted token; returns (token, rest)
fn take_token(s: &str) -> Option<(String, &str)> {
    let s = s.trim_start();
    let first = s.chars().next()?;
    if first == '\'' || first == '"' {
        let body = &s[1..];
        let end = body.find(first)?;
        Some((body[..end].to_string(), &body[end + 1..]))
    } else {
        let end = s.find(char::is_whitespace).unwrap_or(s.len());
        Some((s[..end].to_string(), &s[end..]))
    }
}

/// Split a comma-separated list, honouring single and double quotes
fn split_values(s: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in s.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None if ch == '\'' || ch == '"' => quote = Some(ch),
            None if ch == ',' => {
                values.push(current.trim().to_string());
                current.clear();
            }
            None => current.push(ch),
        }
    }
    if !current.trim().is_empty() || !values.is_empty() {
        values.push(current.trim().to_string());
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "% miRNA sample
@RELATION expression

@ATTRIBUTE hsa-mir-21 NUMERIC
@ATTRIBUTE 'hsa let 7' real
@ATTRIBUTE class {tumor,normal}

@DATA
1.5,0.25,tumor
?,0.5,normal
% trailing comment
2.0,?,'tumor'
";

    #[test]
    fn test_parse_dense_arff() {
        let df = parse_arff(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(df.shape(), (3, 3));
        assert_eq!(
            df.get_column_names(),
            &["hsa-mir-21", "hsa let 7", "class"]
        );

        let first = df.column("hsa-mir-21").unwrap();
        assert_eq!(first.null_count(), 1);
        let class: Vec<Option<&str>> = df.column("class").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(class, vec![Some("tumor"), Some("normal"), Some("tumor")]);
    }

    #[test]
    fn test_row_width_mismatch() {
        let content = "@relation r\n@attribute a numeric\n@attribute c {x,y}\n@data\n1,x,3\n";
        let err = parse_arff(Cursor::new(content)).unwrap_err();
        assert!(matches!(
            err,
            ArffError::RowWidth {
                line: 5,
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn test_undeclared_label() {
        let content = "@relation r\n@attribute a numeric\n@attribute c {x,y}\n@data\n1,z\n";
        let err = parse_arff(Cursor::new(content)).unwrap_err();
        assert!(matches!(err, ArffError::UnknownLabel { .. }));
    }

    #[test]
    fn test_invalid_number() {
        let content = "@relation r\n@attribute a numeric\n@attribute c {x,y}\n@data\nabc,x\n";
        let err = parse_arff(Cursor::new(content)).unwrap_err();
        assert!(err.to_string().contains("expects a number"));
    }

    #[test]
    fn test_sparse_rows_rejected() {
        let content = "@relation r\n@attribute a numeric\n@data\n{0 1.0}\n";
        assert!(matches!(
            parse_arff(Cursor::new(content)),
            Err(ArffError::SparseRow { line: 4 })
        ));
    }

    #[test]
    fn test_missing_data_section() {
        let content = "@relation r\n@attribute a numeric\n";
        assert!(matches!(
            parse_arff(Cursor::new(content)),
            Err(ArffError::MissingData)
        ));
    }

    #[test]
    fn test_split_values_respects_quotes() {
        assert_eq!(
            split_values("a, 'b,c' ,\"d\""),
            vec!["a".to_string(), "b,c".to_string(), "d".to_string()]
        );
    }
}
