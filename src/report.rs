// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Fixed-width table rendering and cross-run result views

use crate::algorithms::Language;
use crate::ledger::{self, UnifiedRow};
use anyhow::Result;
use std::path::Path;

/// Render a bordered, left-justified table. Column widths are the maximum
/// display length across the header and every row.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return "(no data)\n".to_string();
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if idx < widths.len() {
                widths[idx] = widths[idx].max(cell.len());
            }
        }
    }

    let border = format!(
        "+{}+",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    let format_row = |cells: &[String]| -> String {
        let body = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!(" {:<w$} ", cell, w = *width))
            .collect::<Vec<_>>()
            .join("|");
        format!("|{}|", body)
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();

    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    out.push_str(&format_row(&header_cells));
    out.push('\n');
    out.push_str(&border);
    out.push('\n');
    for row in rows {
        out.push_str(&format_row(row));
        out.push('\n');
    }
    out.push_str(&border);
    out.push('\n');
    out
}

/// Cross-run "general results" view over the persisted ledger, optionally
/// filtered to one implementation by exact language tag.
pub fn general_results(ledger_path: &Path, filter: Option<Language>) -> Result<String> {
    let rows = ledger::read_rows(ledger_path)?;
    if rows.is_empty() {
        return Ok("No unified results yet.\n".to_string());
    }

    let table_rows: Vec<Vec<String>> = rows
        .iter()
        .filter(|row| filter.map_or(true, |lang| row.language == lang.as_str()))
        .map(ledger_display_row)
        .collect();

    Ok(render_table(
        &["Impl", "Algorithm", "Time", "Metric1", "Metric2", "SLOC"],
        &table_rows,
    ))
}

fn ledger_display_row(row: &UnifiedRow) -> Vec<String> {
    vec![
        row.language.clone(),
        row.algorithm.clone(),
        row.time.clone(),
        row.metric1.clone(),
        row.metric2.clone(),
        row.sloc.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms;
    use crate::ledger::RunMetrics;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_empty_rows_render_placeholder() {
        assert_eq!(render_table(&["A", "B"], &[]), "(no data)\n");
    }

    #[test]
    fn test_column_widths_fit_widest_cell() {
        let rows = vec![
            vec!["Lisp".to_string(), "0.84".to_string()],
            vec!["C".to_string(), "ERROR".to_string()],
        ];
        let table = render_table(&["Language", "Accuracy"], &rows);

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "+----------+----------+");
        assert_eq!(lines[1], "| Language | Accuracy |");
        assert_eq!(lines[3], "| Lisp     | 0.84     |");
        assert_eq!(lines[4], "| C        | ERROR    |");
        // All rows share the border width.
        assert!(lines.iter().all(|l| l.len() == lines[0].len()));
    }

    #[test]
    fn test_general_results_filters_by_language() {
        let dir = TempDir::new().unwrap();
        let ledger_path = dir.path().join("unified_results.csv");
        let spec = algorithms::find("knn").unwrap();

        let run = |language| RunMetrics {
            language,
            metric1: "0.8".to_string(),
            metric2: "0.7".to_string(),
            elapsed: Duration::from_secs(1),
            sloc: 100,
        };
        ledger::append_rows(&ledger_path, spec, &[run(Language::Lisp), run(Language::Java)])
            .unwrap();

        let all = general_results(&ledger_path, None).unwrap();
        assert!(all.contains("Lisp"));
        assert!(all.contains("Java"));

        let only_java = general_results(&ledger_path, Some(Language::Java)).unwrap();
        assert!(only_java.contains("Java"));
        assert!(!only_java.contains("Lisp"));
    }

    #[test]
    fn test_general_results_without_ledger() {
        let dir = TempDir::new().unwrap();
        let view = general_results(&dir.path().join("unified_results.csv"), None).unwrap();
        assert_eq!(view, "No unified results yet.\n");
    }
}
