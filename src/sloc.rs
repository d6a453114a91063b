// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Source-line counting for the cross-language comparison
//!
//! SLOC is a best-effort metric: unreadable files contribute zero and the
//! comment-prefix table is the union across all three languages (files are
//! already partitioned by language, so the union is safe).

use crate::algorithms::Language;
use crate::config::HarnessPaths;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Union of single-line comment markers across C, Java, and Lisp.
const COMMENT_PREFIXES: &[&str] = &["//", "/*", "*", "#", ";"];

/// Count non-blank, non-comment lines in one source file.
pub fn count_file(path: &Path) -> usize {
    let Ok(raw) = fs::read(path) else {
        return 0;
    };
    String::from_utf8_lossy(&raw)
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty()
                && !COMMENT_PREFIXES
                    .iter()
                    .any(|prefix| trimmed.starts_with(prefix))
        })
        .count()
}

/// Recursively collect files whose extension matches (case-insensitive).
fn files_with_extensions(dir: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    let mut collected = Vec::new();
    let Ok(entries) = fs::read_dir(dir) else {
        return collected;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collected.extend(files_with_extensions(&path, extensions));
        } else if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if extensions.iter().any(|want| ext.eq_ignore_ascii_case(want)) {
                collected.push(path);
            }
        }
    }
    collected
}

/// Per-language source sets, fixed at startup, with a per-(language,
/// algorithm) count cache for the session.
pub struct SlocCounter {
    files: HashMap<Language, Vec<PathBuf>>,
    cache: HashMap<(Language, String), usize>,
}

impl SlocCounter {
    pub fn new(paths: &HarnessPaths) -> Self {
        let mut files = HashMap::new();
        files.insert(Language::C, files_with_extensions(&paths.c_dir, &["c", "h"]));
        files.insert(
            Language::Java,
            files_with_extensions(&paths.java_dir, &["java"]),
        );
        files.insert(Language::Lisp, vec![paths.lisp_script.clone()]);
        Self {
            files,
            cache: HashMap::new(),
        }
    }

    /// Total SLOC for one language/algorithm pair.
    pub fn total(&mut self, language: Language, algorithm: &str) -> usize {
        let key = (language, algorithm.to_string());
        if let Some(&count) = self.cache.get(&key) {
            return count;
        }
        let count = self
            .files
            .get(&language)
            .map(|set| set.iter().map(|file| count_file(file)).sum())
            .unwrap_or(0);
        self.cache.insert(key, count);
        count
    }
}
