// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Append-only unified results ledger
//!
//! One CSV file spans all algorithms, languages, and runs. The header is
//! written exactly once when the file is created; rows are only ever
//! appended. Re-running an algorithm appends new rows; the ledger is a
//! full history, and "latest only" views filter at read time.

use crate::algorithms::{AlgorithmSpec, Language};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::time::Duration;

/// One collaborator's timed, measured run of one algorithm. In-memory
/// only; rendered and then persisted as a `UnifiedRow`.
#[derive(Debug, Clone)]
pub struct RunMetrics {
    pub language: Language,
    pub metric1: String,
    pub metric2: String,
    pub elapsed: Duration,
    pub sloc: usize,
}

/// One persisted ledger record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifiedRow {
    #[serde(rename = "Algorithm")]
    pub algorithm: String,
    #[serde(rename = "Task")]
    pub task: String,
    #[serde(rename = "Language")]
    pub language: String,
    #[serde(rename = "Metric1")]
    pub metric1: String,
    #[serde(rename = "Metric2")]
    pub metric2: String,
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "SLOC")]
    pub sloc: String,
}

/// Fixed six-decimal wall-clock formatting used in tables and the ledger.
pub fn format_seconds(elapsed: Duration) -> String {
    format!("{:.6}", elapsed.as_secs_f64())
}

/// Append one row per present metric set, creating the header only when
/// the ledger file does not exist yet (or is empty).
pub fn append_rows(ledger: &Path, spec: &AlgorithmSpec, runs: &[RunMetrics]) -> Result<()> {
    if runs.is_empty() {
        return Ok(());
    }

    if let Some(parent) = ledger.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create results directory {}", parent.display()))?;
    }

    let fresh = fs::metadata(ledger).map(|meta| meta.len() == 0).unwrap_or(true);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(ledger)
        .with_context(|| format!("failed to open ledger {}", ledger.display()))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(fresh)
        .from_writer(file);

    for run in runs {
        writer
            .serialize(UnifiedRow {
                algorithm: spec.label.to_string(),
                task: spec.task.as_str().to_string(),
                language: run.language.as_str().to_string(),
                metric1: run.metric1.clone(),
                metric2: run.metric2.clone(),
                time: format_seconds(run.elapsed),
                sloc: run.sloc.to_string(),
            })
            .context("failed to append ledger row")?;
    }

    writer.flush().context("failed to flush ledger")?;
    Ok(())
}

/// Read the whole ledger back; empty when the file is missing or empty.
pub fn read_rows(ledger: &Path) -> Result<Vec<UnifiedRow>> {
    if !ledger.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(ledger)
        .with_context(|| format!("failed to open ledger {}", ledger.display()))?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record.context("malformed ledger row")?);
    }
    Ok(rows)
}
