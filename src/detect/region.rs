//! Seed search: the densest, most regular rectangle of signal cells.

use std::cmp::Ordering;
use tracing::{debug, trace};

use crate::classify::is_signal;
use crate::config::ExtractConfig;
use crate::detect::histogram::maximal_rectangles;
use crate::grid::{Grid, Rect};

/// A scored seed rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub rect: Rect,
    /// Share of signal cells inside `rect`
    pub density: f64,
    /// `1 / (1 + stdev(signal cells per row))`
    pub regularity: f64,
    pub score: f64,
}

impl Candidate {
    /// Best first: score, then area, then top-most, then left-most
    fn rank(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then(other.rect.area().cmp(&self.rect.area()))
            .then(self.rect.r1.cmp(&other.rect.r1))
            .then(self.rect.c1.cmp(&other.rect.c1))
    }
}

/// Signal flags per cell. A non-signal cell with signal on both sides in its row is
/// bridged, so one blank cell inside a data row does not cut the histogram.
pub fn signal_mask(grid: &Grid) -> Vec<Vec<bool>> {
    grid.rows()
        .iter()
        .map(|row| {
            let signal: Vec<bool> = row.iter().map(|v| is_signal(v)).collect();
            (0..signal.len())
                .map(|c| {
                    signal[c]
                        || (c > 0 && c + 1 < signal.len() && signal[c - 1] && signal[c + 1])
                })
                .collect()
        })
        .collect()
}

/// Scored candidates that clear the density threshold, best first.
///
/// Every maximal all-mask rectangle ending at each row is offered to a running pool that
/// keeps the `top_k` largest by area over the whole grid; only pooled rectangles are scored.
pub fn candidates(grid: &Grid, config: &ExtractConfig) -> Vec<Candidate> {
    if grid.is_empty() {
        return Vec::new();
    }

    let mask = signal_mask(grid);
    let mut heights = vec![0usize; grid.width()];
    let mut pool: Vec<Rect> = Vec::with_capacity(config.top_k + 1);

    for (r, mask_row) in mask.iter().enumerate() {
        for (h, &set) in heights.iter_mut().zip(mask_row) {
            *h = if set { *h + 1 } else { 0 };
        }
        for bar in maximal_rectangles(&heights) {
            if bar.height < config.min_seed_rows || bar.width() < config.min_seed_cols {
                continue;
            }
            let rect = Rect::new(r + 1 - bar.height, bar.left, r, bar.right);
            offer(&mut pool, rect, config.top_k);
        }
    }

    let mut scored: Vec<Candidate> = pool
        .into_iter()
        .map(|rect| score(grid, rect, config))
        .inspect(|c| {
            trace!(
                rect = %c.rect,
                density = c.density,
                regularity = c.regularity,
                score = c.score,
                "seed candidate"
            )
        })
        .filter(|c| c.density >= config.density_threshold)
        .collect();
    scored.sort_by(Candidate::rank);
    scored
}

/// Highest-scoring seed, `None` when no rectangle qualifies
pub fn detect_region(grid: &Grid, config: &ExtractConfig) -> Option<Candidate> {
    let best = candidates(grid, config).into_iter().next();
    if let Some(c) = &best {
        debug!(rect = %c.rect, score = c.score, "seed region");
    }
    best
}

fn offer(pool: &mut Vec<Rect>, rect: Rect, k: usize) {
    if pool.contains(&rect) {
        return;
    }
    if pool.len() < k {
        pool.push(rect);
        return;
    }
    // Smallest entry; on ties the lowest one goes so upper rects survive
    let Some((idx, smallest)) = pool
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            a.area()
                .cmp(&b.area())
                .then(b.r1.cmp(&a.r1))
                .then(b.c1.cmp(&a.c1))
        })
        .map(|(i, r)| (i, r.area()))
    else {
        return;
    };
    if rect.area() > smallest {
        pool[idx] = rect;
    }
}

fn score(grid: &Grid, rect: Rect, config: &ExtractConfig) -> Candidate {
    let per_row: Vec<f64> = rect
        .rows()
        .map(|r| {
            grid.row_span(r, rect.c1, rect.c2)
                .iter()
                .filter(|v| is_signal(v))
                .count() as f64
        })
        .collect();

    let area = rect.area().max(1) as f64;
    let density = per_row.iter().sum::<f64>() / area;
    let regularity = 1.0 / (1.0 + stdev(&per_row));
    let score = config.density_weight() * density + config.regularity_weight * regularity;

    Candidate {
        rect,
        density,
        regularity,
        score,
    }
}

fn stdev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
}
