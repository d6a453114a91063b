// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Dataset validation ahead of any collaborator invocation
//!
//! A run is only allowed once the chosen dataset exists, is readable, and
//! its header contains the chosen target column. Validation re-runs after
//! every dataset or target change.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Dataset/target problems that block a benchmark run.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("dataset file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unable to read dataset {}: {source}", .path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("target column '{target}' not found in dataset header")]
    ColumnMissing {
        target: String,
        available: Vec<String>,
    },
}

impl InputError {
    /// Columns that were successfully parsed before the failure
    /// (empty when the file itself could not be read).
    pub fn available_columns(&self) -> &[String] {
        match self {
            InputError::ColumnMissing { available, .. } => available,
            _ => &[],
        }
    }
}

/// Parse the dataset header and confirm the target column is present.
///
/// Header cells are trimmed of surrounding whitespace and stripped of
/// quote characters before the case-sensitive exact match.
pub fn validate_columns(path: &Path, target: &str) -> Result<Vec<String>, InputError> {
    if !path.exists() {
        return Err(InputError::NotFound(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|source| InputError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    let mut header_line = String::new();
    BufReader::new(file)
        .read_line(&mut header_line)
        .map_err(|source| InputError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

    let header: Vec<String> = header_line
        .trim()
        .split(',')
        .map(|cell| cell.trim().replace('"', ""))
        .collect();

    if header.iter().any(|column| column == target) {
        Ok(header)
    } else {
        Err(InputError::ColumnMissing {
            target: target.to_string(),
            available: header,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn dataset_with_header(header: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "{}", header).unwrap();
        writeln!(file, "1,2,3").unwrap();
        file
    }

    #[test]
    fn test_valid_target_returns_header() {
        let file = dataset_with_header("a,b,income");
        let header = validate_columns(file.path(), "income").expect("should validate");
        assert_eq!(header, vec!["a", "b", "income"]);
    }

    #[test]
    fn test_missing_target_reports_available_columns() {
        let file = dataset_with_header("a,b,income");
        let err = validate_columns(file.path(), "nonexistent_col").unwrap_err();
        match &err {
            InputError::ColumnMissing { target, available } => {
                assert_eq!(target, "nonexistent_col");
                assert_eq!(available, &["a", "b", "income"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.available_columns(), ["a", "b", "income"]);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = validate_columns(Path::new("/no/such/dataset.csv"), "income").unwrap_err();
        assert!(matches!(err, InputError::NotFound(_)));
        assert!(err.available_columns().is_empty());
    }

    #[test]
    fn test_header_cells_are_trimmed_and_unquoted() {
        let file = dataset_with_header("\"a\" , \"b\",\"income\"");
        let header = validate_columns(file.path(), "income").expect("should validate");
        assert_eq!(header, vec!["a", "b", "income"]);
    }

    #[test]
    fn test_target_match_is_case_sensitive() {
        let file = dataset_with_header("a,b,Income");
        let err = validate_columns(file.path(), "income").unwrap_err();
        assert!(matches!(err, InputError::ColumnMissing { .. }));
    }
}
