// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Algorithm registry shared by every collaborator pipeline
//!
//! Each entry records the per-implementation invocation metadata:
//! result-file names, display names, CLI keys, and the one Lisp-specific
//! override (linear regression runs against a fixed target with L2
//! regularization).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Task family of an algorithm, determining which metric pair applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    Classification,
    Regression,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Classification => "classification",
            TaskKind::Regression => "regression",
        }
    }

    /// Display/column names of the normalized metric pair.
    pub fn metric_names(&self) -> (&'static str, &'static str) {
        match self {
            TaskKind::Classification => ("Accuracy", "Macro-F1"),
            TaskKind::Regression => ("RMSE", "R^2"),
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the three external implementations under comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    C,
    Java,
    Lisp,
}

impl Language {
    /// Invocation order for "run all": Lisp first, then C, then Java.
    pub const ALL: [Language; 3] = [Language::Lisp, Language::C, Language::Java];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => "C",
            Language::Java => "Java",
            Language::Lisp => "Lisp",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lisp-only invocation override: one algorithm ignores the session target
/// and takes an extra regularization argument. Not configurable by callers.
#[derive(Debug, Clone, Copy)]
pub struct LispOverride {
    pub target: &'static str,
    pub l2: f64,
}

/// Static description of one benchmarkable algorithm.
#[derive(Debug, Clone)]
pub struct AlgorithmSpec {
    /// Stable lookup key, also the argument passed to the Lisp runner.
    pub key: &'static str,
    /// Human-readable label used in tables and the unified ledger.
    pub label: &'static str,
    pub task: TaskKind,
    /// Result file the Lisp implementation writes for this algorithm.
    pub lisp_csv: &'static str,
    /// Model name the C implementation reports in its results file.
    pub c_name: &'static str,
    /// Algorithm key understood by the Java batch CLI.
    pub java_key: &'static str,
    pub lisp_override: Option<LispOverride>,
}

pub const ALGORITHMS: &[AlgorithmSpec] = &[
    AlgorithmSpec {
        key: "knn",
        label: "KNN",
        task: TaskKind::Classification,
        lisp_csv: "knn_results.csv",
        c_name: "K-Nearest Neighbors (k=7)",
        java_key: "knn",
        lisp_override: None,
    },
    AlgorithmSpec {
        key: "logistic",
        label: "Logistic Regression",
        task: TaskKind::Classification,
        lisp_csv: "logistic_regression_results.csv",
        c_name: "Logistic Regression",
        java_key: "logistic",
        lisp_override: None,
    },
    AlgorithmSpec {
        key: "naive_bayes",
        label: "Gaussian Naive Bayes",
        task: TaskKind::Classification,
        lisp_csv: "naive_bayes_results.csv",
        c_name: "Gaussian Naive Bayes",
        java_key: "naivebayes",
        lisp_override: None,
    },
    AlgorithmSpec {
        key: "decision_tree",
        label: "Decision Tree (ID3)",
        task: TaskKind::Classification,
        lisp_csv: "decision_tree_results.csv",
        c_name: "Decision Tree (ID3)",
        java_key: "tree",
        lisp_override: None,
    },
    AlgorithmSpec {
        key: "linear_regression",
        label: "Linear Regression",
        task: TaskKind::Regression,
        lisp_csv: "linear_regression_results.csv",
        c_name: "Linear Regression",
        java_key: "linear",
        lisp_override: Some(LispOverride {
            target: "hours.per.week",
            l2: 1.0,
        }),
    },
];

/// Look up an algorithm by its stable key.
pub fn find(key: &str) -> Option<&'static AlgorithmSpec> {
    ALGORITHMS.iter().find(|spec| spec.key == key)
}
