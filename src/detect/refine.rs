//! Boundary refinement around a seed rectangle.

use std::collections::HashSet;
use tracing::debug;

use crate::config::ExtractConfig;
use crate::detect::header::detect_header_depth;
use crate::grid::{Grid, Rect};

const MAX_COLUMN_MISSES: usize = 2;
const MAX_BLANK_ROWS: usize = 2;
const SMALL_WINDOW_ROWS: usize = 10;
const MIN_COLUMN_FILL: usize = 3;

/// Grows `seed` into the full table: header rows above it, sparse columns beside it and
/// data rows below it.
pub fn refine_region(grid: &Grid, seed: Rect, config: &ExtractConfig) -> Rect {
    let rect = attach_header_rows(grid, seed, config.max_header_depth);
    let depth = detect_header_depth(grid, &rect, config);
    let rect = expand_columns(grid, rect, depth, config.sample_window);
    let rect = extend_down(grid, rect);
    debug!(seed = %seed, refined = %rect, provisional_depth = depth, "refined region");
    rect
}

/// Attaches non-blank rows directly above `rect`, at most `max_rows` of them.
///
/// Stops at a blank row or at a banner: one repeated value across a block at least three
/// columns wide, which is what a merged title looks like once flattened.
pub fn attach_header_rows(grid: &Grid, rect: Rect, max_rows: usize) -> Rect {
    let mut top = rect.r1;
    while top > 0 && rect.r1 - top < max_rows {
        let values: HashSet<&str> = grid
            .row_span(top - 1, rect.c1, rect.c2)
            .iter()
            .map(String::as_str)
            .filter(|v| !v.is_empty())
            .collect();
        if values.is_empty() || (values.len() == 1 && rect.width() >= 3) {
            break;
        }
        top -= 1;
    }
    Rect { r1: top, ..rect }
}

/// Widens `rect` with neighbouring columns that are filled often enough in the rows just
/// below the header. Two failing columns in a row are tolerated before giving up on a
/// direction.
pub fn expand_columns(grid: &Grid, rect: Rect, header_depth: usize, sample_window: usize) -> Rect {
    if rect.is_empty() {
        return rect;
    }

    let start = if header_depth < rect.height() {
        rect.r1 + header_depth
    } else {
        rect.r1 + 1.min(rect.height() - 1)
    };
    let window = sample_window.min(rect.r2 + 1 - start).max(1);
    let end = start + window - 1;
    let threshold = if window >= SMALL_WINDOW_ROWS {
        MIN_COLUMN_FILL.max((0.25 * window as f64).round() as usize)
    } else {
        MIN_COLUMN_FILL
    };
    let admits = |c: usize| grid.column_fill(c, start, end) >= threshold;

    let mut c2 = rect.c2;
    let mut misses = 0;
    for c in rect.c2 + 1..grid.width() {
        if admits(c) {
            c2 = c;
            misses = 0;
        } else {
            misses += 1;
            if misses > MAX_COLUMN_MISSES {
                break;
            }
        }
    }

    let mut c1 = rect.c1;
    misses = 0;
    for c in (0..rect.c1).rev() {
        if admits(c) {
            c1 = c;
            misses = 0;
        } else {
            misses += 1;
            if misses > MAX_COLUMN_MISSES {
                break;
            }
        }
    }

    Rect { c1, c2, ..rect }
}

/// Extends `rect` down through rows that have content within its columns; two blank rows
/// in a row end the table.
pub fn extend_down(grid: &Grid, rect: Rect) -> Rect {
    if rect.is_empty() {
        return rect;
    }

    let mut r2 = rect.r2;
    let mut blanks = 0;
    for r in rect.r2 + 1..grid.height() {
        if grid.is_row_blank(r, rect.c1, rect.c2) {
            blanks += 1;
            if blanks >= MAX_BLANK_ROWS {
                break;
            }
        } else {
            r2 = r;
            blanks = 0;
        }
    }

    Rect { r2, ..rect }
}
