//! Header/data split inside a refined block.
//!
//! Rows are scored for how much they look like data. The first run of data-like rows marks
//! the end of the header. When no clean run exists, a small search over candidate depths
//! picks the one under which columns keep the most consistent value kinds.

use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

use crate::classify::{CellKind, classify, is_header_keyword, is_unit_marker};
use crate::config::ExtractConfig;
use crate::grid::{Grid, Rect};

const NUMERIC_WEIGHT: f64 = 0.45;
const SIMILARITY_WEIGHT: f64 = 0.40;
const KEYWORD_PENALTY: f64 = 0.5;
const UNIT_PENALTY: f64 = 0.3;
const FALLBACK_DEPTH_CAP: usize = 3;
const STABILITY_WEIGHT: f64 = 0.75;
const LIKELIHOOD_WEIGHT: f64 = 0.25;

/// How much `row` looks like a data row, in `0..=1`.
///
/// Numeric share and shape similarity with the following row raise the score; cells that
/// read like column names or unit markers lower it.
pub fn data_score(row: &[String], next: Option<&[String]>) -> f64 {
    let values: Vec<&str> = non_empty(row).collect();
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;

    let numeric = values.iter().filter(|v| classify(v).is_numeric()).count() as f64;
    let sim_next = next.map_or(0.0, |next| jaccard(&shape_tokens(row), &shape_tokens(next)));

    let mut keywords = 0.0;
    let mut units = 0.0;
    for v in &values {
        if is_header_keyword(v) {
            keywords += 1.0;
        } else if is_unit_marker(v) {
            units += 1.0;
        }
    }
    let penalty = (KEYWORD_PENALTY * keywords + UNIT_PENALTY * units) / n;

    (NUMERIC_WEIGHT * numeric / n + SIMILARITY_WEIGHT * sim_next - penalty).clamp(0.0, 1.0)
}

/// Number of leading rows of `rect` that form its header.
///
/// Zero only for single-row blocks. Pure: identical input always yields the same depth.
pub fn detect_header_depth(grid: &Grid, rect: &Rect, config: &ExtractConfig) -> usize {
    let block: Vec<&[String]> = rect
        .rows()
        .map(|r| grid.row_span(r, rect.c1, rect.c2))
        .collect();
    header_depth(&block, config)
}

/// [`detect_header_depth`] over rows already cut to the block's columns
pub fn header_depth(block: &[&[String]], config: &ExtractConfig) -> usize {
    let height = block.len();
    if height <= 1 {
        return 0;
    }

    let run = first_data_run(block, config);
    if let Some(start) = run
        && start > 0
        && start <= config.max_header_depth
    {
        debug!(depth = start, "header depth from data-row run");
        return start;
    }

    let cap = run.filter(|&s| s > 0).unwrap_or(FALLBACK_DEPTH_CAP);
    let max_h = cap.min(config.max_header_depth).min(height - 1).max(1);

    let mut best = (1, f64::MIN);
    for h in 1..=max_h {
        let stability = column_typing_stability(&block[h..], config.stability_sample_rows);
        let likelihood =
            block[..h].iter().map(|row| header_likelihood(row)).sum::<f64>() / h as f64;
        let score = STABILITY_WEIGHT * stability + LIKELIHOOD_WEIGHT * likelihood;
        trace!(h, stability, likelihood, score, "header depth candidate");
        if score > best.1 {
            best = (h, score);
        }
    }

    debug!(depth = best.0, "header depth from fallback search");
    best.0
}

fn first_data_run(block: &[&[String]], config: &ExtractConfig) -> Option<usize> {
    let scanned = block.len().min(config.header_scan_rows);
    let scores: Vec<f64> = (0..scanned)
        .map(|i| data_score(block[i], block.get(i + 1).copied()))
        .collect();
    trace!(?scores, "data scores");

    scores
        .windows(2)
        .position(|pair| pair.iter().all(|&s| s >= config.data_row_threshold))
}

/// Per column, the share of non-empty cells whose kind equals the column's most frequent
/// kind, averaged over the columns that have any data.
pub fn column_typing_stability(rows: &[&[String]], sample_rows: usize) -> f64 {
    let mut per_column: HashMap<usize, HashMap<CellKind, usize>> = HashMap::new();
    for row in rows.iter().take(sample_rows) {
        for (c, value) in row.iter().enumerate() {
            let kind = classify(value);
            if kind != CellKind::Empty {
                *per_column.entry(c).or_default().entry(kind).or_default() += 1;
            }
        }
    }
    if per_column.is_empty() {
        return 0.0;
    }

    let total: f64 = per_column
        .values()
        .map(|kinds| {
            let seen: usize = kinds.values().sum();
            let modal = kinds.values().copied().max().unwrap_or(0);
            modal as f64 / seen as f64
        })
        .sum();
    total / per_column.len() as f64
}

/// Keyword density of a candidate header row, damped by numeric content
pub fn header_likelihood(row: &[String]) -> f64 {
    let values: Vec<&str> = non_empty(row).collect();
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let keywords = values.iter().filter(|v| is_header_keyword(v)).count() as f64;
    let numeric = values.iter().filter(|v| classify(v).is_numeric()).count() as f64;
    (0.5 + 0.5 * keywords / n) * (1.0 - numeric / n)
}

fn non_empty(row: &[String]) -> impl Iterator<Item = &str> {
    row.iter().map(|v| v.trim()).filter(|v| !v.is_empty())
}

// Lower-cased words with digit runs collapsed, so "9.99" and "14.50" both become "#.#"
fn shape_tokens(row: &[String]) -> HashSet<String> {
    let mut tokens = HashSet::new();
    for value in row {
        for word in value.split_whitespace() {
            let mut token = String::with_capacity(word.len());
            let mut in_digits = false;
            for ch in word.chars() {
                if ch.is_ascii_digit() {
                    if !in_digits {
                        token.push('#');
                    }
                    in_digits = true;
                } else {
                    token.extend(ch.to_lowercase());
                    in_digits = false;
                }
            }
            tokens.insert(token);
        }
    }
    tokens
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}
