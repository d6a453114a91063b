// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Session configuration for the benchmark harness
//!
//! `HarnessPaths` pins down where the three collaborator programs and their
//! result files live; `RunConfig` carries the dataset/target pair chosen for
//! the session. Both are passed explicitly into every orchestration call so
//! no global mutable state is needed.

use std::path::PathBuf;

/// Filesystem layout of the collaborator programs and result files.
#[derive(Debug, Clone)]
pub struct HarnessPaths {
    /// Project base directory; Lisp result files land here.
    pub base: PathBuf,
    /// C implementation directory (sources, Makefile, binary, results).
    pub c_dir: PathBuf,
    /// Java implementation directory (sources, build output).
    pub java_dir: PathBuf,
    /// The single Lisp source/script file.
    pub lisp_script: PathBuf,
    /// Directory holding the Java results file and the unified ledger.
    pub results_dir: PathBuf,
}

impl HarnessPaths {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        let base = absolute(base.into());
        Self {
            c_dir: base.join("proc"),
            java_dir: base.join("oop-java"),
            lisp_script: base.join("fp").join("Lisp-Algorithm"),
            results_dir: base.join("results"),
            base,
        }
    }

    /// Results file the C implementation appends to.
    pub fn c_results(&self) -> PathBuf {
        self.c_dir.join("c_model_results.csv")
    }

    /// Sanitized dataset copy handed to the C parser.
    pub fn c_temp_input(&self) -> PathBuf {
        self.c_dir.join("temp_c_input.csv")
    }

    /// Results file the Java batch CLI writes, deleted before each run.
    pub fn java_results(&self) -> PathBuf {
        self.results_dir.join("java_results.csv")
    }

    /// Per-algorithm result file the Lisp implementation writes.
    pub fn lisp_results(&self, file_name: &str) -> PathBuf {
        self.base.join(file_name)
    }

    /// The append-only unified ledger spanning all runs.
    pub fn ledger(&self) -> PathBuf {
        self.results_dir.join("unified_results.csv")
    }
}

/// Dataset/target pair for one benchmarking session.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Absolute path to the delimited dataset file.
    pub dataset: PathBuf,
    /// Target column name, matched case-sensitively against the header.
    pub target: String,
}

impl RunConfig {
    pub fn new(dataset: impl Into<PathBuf>, target: impl Into<String>) -> Self {
        Self {
            dataset: absolute(dataset.into()),
            target: target.into(),
        }
    }
}

/// Resolve a path against the current directory without requiring it
/// to exist (validation happens separately).
fn absolute(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(&path))
            .unwrap_or(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_derive_from_base() {
        let paths = HarnessPaths::new("/opt/mlbench");
        assert_eq!(paths.c_dir, PathBuf::from("/opt/mlbench/proc"));
        assert_eq!(
            paths.c_results(),
            PathBuf::from("/opt/mlbench/proc/c_model_results.csv")
        );
        assert_eq!(
            paths.java_results(),
            PathBuf::from("/opt/mlbench/results/java_results.csv")
        );
        assert_eq!(
            paths.lisp_results("knn_results.csv"),
            PathBuf::from("/opt/mlbench/knn_results.csv")
        );
        assert_eq!(
            paths.ledger(),
            PathBuf::from("/opt/mlbench/results/unified_results.csv")
        );
    }

    #[test]
    fn test_run_config_absolutizes_dataset() {
        let config = RunConfig::new("data/income.csv", "income");
        assert!(config.dataset.is_absolute());
        assert!(config.dataset.ends_with("data/income.csv"));

        let config = RunConfig::new("/data/income.csv", "income");
        assert_eq!(config.dataset, PathBuf::from("/data/income.csv"));
    }
}
