// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Benchmark orchestration
//!
//! One run request fans out sequentially over the requested collaborators:
//! invoke, time, extract metrics, attach SLOC, render the per-algorithm
//! comparison table, and persist the successful rows to the unified ledger.
//! Execution is strictly sequential: timing demands exclusive wall-clock
//! attribution and the collaborators contend for shared result files.

use crate::algorithms::{AlgorithmSpec, Language};
use crate::config::{HarnessPaths, RunConfig};
use crate::extract;
use crate::ledger::{self, RunMetrics};
use crate::report;
use crate::runner;
use crate::sloc::SlocCounter;
use anyhow::Result;

/// Run one algorithm across the requested collaborators (all when
/// `only` is `None`). Returns the successful metric sets; failed
/// extractions appear as `ERROR` rows in the rendered table only.
pub fn run_algorithm(
    paths: &HarnessPaths,
    run: &RunConfig,
    spec: &AlgorithmSpec,
    only: Option<Language>,
    sloc: &mut SlocCounter,
) -> Result<Vec<RunMetrics>> {
    tracing::info!(
        "running {} (dataset {}, target {})",
        spec.label,
        run.dataset.display(),
        run.target
    );

    let mut completed: Vec<RunMetrics> = Vec::new();
    let mut display_rows: Vec<Vec<String>> = Vec::new();

    for language in Language::ALL {
        if only.is_some_and(|requested| requested != language) {
            continue;
        }

        let plan = runner::plan_for(language, spec, paths, run);
        let elapsed = runner::execute(&plan);
        let metrics = extract::extract(paths, language, spec);
        let lines = sloc.total(language, spec.key);

        match metrics {
            Some(pair) => {
                tracing::info!(
                    "{language}: {}={} {}={} time={} sloc={lines}",
                    spec.task.metric_names().0,
                    pair.metric1,
                    spec.task.metric_names().1,
                    pair.metric2,
                    ledger::format_seconds(elapsed),
                );
                display_rows.push(vec![
                    language.as_str().to_string(),
                    pair.metric1.clone(),
                    pair.metric2.clone(),
                    ledger::format_seconds(elapsed),
                    lines.to_string(),
                ]);
                completed.push(RunMetrics {
                    language,
                    metric1: pair.metric1,
                    metric2: pair.metric2,
                    elapsed,
                    sloc: lines,
                });
            }
            None => {
                tracing::warn!("{language} produced no usable metrics for {}", spec.label);
                display_rows.push(vec![
                    language.as_str().to_string(),
                    "ERROR".to_string(),
                    "ERROR".to_string(),
                    "ERROR".to_string(),
                    lines.to_string(),
                ]);
            }
        }
    }

    let (metric1, metric2) = spec.task.metric_names();
    let headers = ["Language", metric1, metric2, "Time", "SLOC"];
    println!("\n{}", report::render_table(&headers, &display_rows));

    // A ledger write failure loses this save only; the session continues.
    if let Err(err) = ledger::append_rows(&paths.ledger(), spec, &completed) {
        tracing::error!("failed to persist unified results: {err:#}");
    }

    Ok(completed)
}
