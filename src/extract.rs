// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Metric extraction from collaborator result files
//!
//! Each implementation reports results in its own tabular schema; this
//! module normalizes all three into a single `MetricPair`. A missing file,
//! an empty file, or the absence of a matching row all yield `None` so the
//! caller can render an explicit error marker, never a silent zero.

use crate::algorithms::{AlgorithmSpec, Language};
use crate::config::HarnessPaths;
use csv::StringRecord;
use std::path::Path;

/// Normalized two-value metric pair. The meaning of the values is set by
/// the algorithm's task kind (accuracy/macro-F1 or RMSE/R²).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricPair {
    pub metric1: String,
    pub metric2: String,
}

/// Read a result file into (header, records); `None` if absent or empty.
fn read_records(path: &Path) -> Option<(StringRecord, Vec<StringRecord>)> {
    if !path.exists() {
        return None;
    }
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .ok()?;
    let headers = reader.headers().ok()?.clone();
    let records: Vec<StringRecord> = reader.records().filter_map(|r| r.ok()).collect();
    if records.is_empty() {
        return None;
    }
    Some((headers, records))
}

/// Field lookup by column name; empty string when the column is absent.
fn field<'r>(headers: &StringRecord, record: &'r StringRecord, name: &str) -> &'r str {
    headers
        .iter()
        .position(|h| h == name)
        .and_then(|idx| record.get(idx))
        .unwrap_or("")
}

fn pair_from(headers: &StringRecord, record: &StringRecord, m1: &str, m2: &str) -> MetricPair {
    MetricPair {
        metric1: field(headers, record, m1).to_string(),
        metric2: field(headers, record, m2).to_string(),
    }
}

/// Lisp writes one file per algorithm; the last row is the latest run.
pub fn lisp_metrics(paths: &HarnessPaths, spec: &AlgorithmSpec) -> Option<MetricPair> {
    let (headers, records) = read_records(&paths.lisp_results(spec.lisp_csv))?;
    let last = records.last()?;
    let (m1, m2) = spec.task.metric_names();
    Some(pair_from(&headers, last, m1, m2))
}

/// C appends every model to one file; select by reported model name.
pub fn c_metrics(paths: &HarnessPaths, spec: &AlgorithmSpec) -> Option<MetricPair> {
    let (headers, records) = read_records(&paths.c_results())?;
    let row = records
        .iter()
        .find(|record| field(&headers, record, "Model") == spec.c_name)?;
    Some(pair_from(&headers, row, "Metric1_Value", "Metric2_Value"))
}

/// Java's batch CLI writes one file per run; take the last row matching
/// the requested algorithm key.
pub fn java_metrics(paths: &HarnessPaths, spec: &AlgorithmSpec) -> Option<MetricPair> {
    let (headers, records) = read_records(&paths.java_results())?;
    let row = records
        .iter()
        .filter(|record| field(&headers, record, "Algorithm") == spec.java_key)
        .next_back()?;
    Some(pair_from(&headers, row, "Metric1", "Metric2"))
}

/// Dispatch to the schema belonging to one implementation.
pub fn extract(
    paths: &HarnessPaths,
    language: Language,
    spec: &AlgorithmSpec,
) -> Option<MetricPair> {
    match language {
        Language::Lisp => lisp_metrics(paths, spec),
        Language::C => c_metrics(paths, spec),
        Language::Java => java_metrics(paths, spec),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms;
    use std::fs;
    use tempfile::TempDir;

    fn harness() -> (TempDir, HarnessPaths) {
        let dir = TempDir::new().unwrap();
        let paths = HarnessPaths::new(dir.path());
        fs::create_dir_all(&paths.c_dir).unwrap();
        fs::create_dir_all(&paths.results_dir).unwrap();
        (dir, paths)
    }

    #[test]
    fn test_missing_file_yields_none() {
        let (_dir, paths) = harness();
        let spec = algorithms::find("knn").unwrap();
        assert_eq!(lisp_metrics(&paths, spec), None);
        assert_eq!(c_metrics(&paths, spec), None);
        assert_eq!(java_metrics(&paths, spec), None);
    }

    #[test]
    fn test_empty_file_yields_none() {
        let (_dir, paths) = harness();
        let spec = algorithms::find("knn").unwrap();
        fs::write(paths.lisp_results(spec.lisp_csv), "Accuracy,Macro-F1\n").unwrap();
        assert_eq!(lisp_metrics(&paths, spec), None);
    }

    #[test]
    fn test_lisp_takes_last_row() {
        let (_dir, paths) = harness();
        let spec = algorithms::find("knn").unwrap();
        fs::write(
            paths.lisp_results(spec.lisp_csv),
            "Accuracy,Macro-F1\n0.71,0.65\n0.83,0.79\n",
        )
        .unwrap();

        let pair = lisp_metrics(&paths, spec).expect("metrics expected");
        assert_eq!(pair.metric1, "0.83");
        assert_eq!(pair.metric2, "0.79");
    }

    #[test]
    fn test_lisp_regression_uses_rmse_columns() {
        let (_dir, paths) = harness();
        let spec = algorithms::find("linear_regression").unwrap();
        fs::write(
            paths.lisp_results(spec.lisp_csv),
            "RMSE,R^2\n11.2,0.42\n",
        )
        .unwrap();

        let pair = lisp_metrics(&paths, spec).expect("metrics expected");
        assert_eq!(pair.metric1, "11.2");
        assert_eq!(pair.metric2, "0.42");
    }

    #[test]
    fn test_c_selects_row_by_model_name() {
        let (_dir, paths) = harness();
        let spec = algorithms::find("knn").unwrap();
        fs::write(
            paths.c_results(),
            "Model,Metric1_Value,Metric2_Value\n\
             Logistic Regression,0.80,0.75\n\
             \"K-Nearest Neighbors (k=7)\",0.84,0.81\n",
        )
        .unwrap();

        let pair = c_metrics(&paths, spec).expect("metrics expected");
        assert_eq!(pair.metric1, "0.84");
        assert_eq!(pair.metric2, "0.81");

        // No matching model row.
        let tree = algorithms::find("decision_tree").unwrap();
        assert_eq!(c_metrics(&paths, tree), None);
    }

    #[test]
    fn test_java_takes_last_matching_key() {
        let (_dir, paths) = harness();
        let spec = algorithms::find("knn").unwrap();
        fs::write(
            paths.java_results(),
            "Algorithm,Metric1,Metric2\nknn,0.70,0.66\nlinear,10.0,0.5\nknn,0.82,0.78\n",
        )
        .unwrap();

        let pair = java_metrics(&paths, spec).expect("metrics expected");
        assert_eq!(pair.metric1, "0.82");
        assert_eq!(pair.metric2, "0.78");
    }

    #[test]
    fn test_empty_metric_fields_pass_through() {
        // A matching row with empty cells is still a result; the
        // distinction from "no row" is deliberately preserved.
        let (_dir, paths) = harness();
        let spec = algorithms::find("knn").unwrap();
        fs::write(paths.java_results(), "Algorithm,Metric1,Metric2\nknn,,\n").unwrap();

        let pair = java_metrics(&paths, spec).expect("row matches");
        assert_eq!(pair.metric1, "");
        assert_eq!(pair.metric2, "");
    }
}
