// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Unified benchmark harness for cross-language ML implementations
//!
//! This crate provides:
//! - Dataset/target validation ahead of every run
//! - Per-implementation process invocation with wall-clock timing
//! - Metric extraction from heterogeneous result-file schemas
//! - Source-line counting per language
//! - An append-only unified results ledger with cross-run views
//! - Fixed-width comparison tables for interactive display
//!
//! The ML algorithms themselves live in three external programs (C, Java,
//! Lisp); this crate owns only the meta-process of running, timing,
//! parsing, and tabulating them.

pub mod algorithms;
pub mod config;
pub mod dataset;
pub mod extract;
pub mod ledger;
pub mod pipeline;
pub mod report;
pub mod runner;
pub mod sloc;

pub use algorithms::{AlgorithmSpec, Language, TaskKind, ALGORITHMS};
pub use config::{HarnessPaths, RunConfig};
pub use dataset::{validate_columns, InputError};
pub use extract::MetricPair;
pub use ledger::{RunMetrics, UnifiedRow};
pub use runner::{CollaboratorError, InvocationPlan};
pub use sloc::SlocCounter;
