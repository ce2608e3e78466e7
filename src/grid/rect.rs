use std::fmt;
use std::ops::RangeInclusive;

use crate::utils::cell_reference;

/// Inclusive rectangle `(r1, c1) ..= (r2, c2)` over a grid.
///
/// A rect with `r2 < r1` or `c2 < c1` is empty and stands for "no region".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub r1: usize,
    pub c1: usize,
    pub r2: usize,
    pub c2: usize,
}

impl Rect {
    pub const EMPTY: Rect = Rect {
        r1: 1,
        c1: 1,
        r2: 0,
        c2: 0,
    };

    pub const fn new(r1: usize, c1: usize, r2: usize, c2: usize) -> Self {
        Self { r1, c1, r2, c2 }
    }

    pub const fn is_empty(&self) -> bool {
        self.r2 < self.r1 || self.c2 < self.c1
    }

    pub const fn height(&self) -> usize {
        if self.is_empty() { 0 } else { self.r2 - self.r1 + 1 }
    }

    pub const fn width(&self) -> usize {
        if self.is_empty() { 0 } else { self.c2 - self.c1 + 1 }
    }

    pub const fn area(&self) -> usize {
        self.height() * self.width()
    }

    pub const fn contains(&self, row: usize, col: usize) -> bool {
        !self.is_empty() && row >= self.r1 && row <= self.r2 && col >= self.c1 && col <= self.c2
    }

    pub fn rows(&self) -> RangeInclusive<usize> {
        self.r1..=self.r2
    }

    pub fn cols(&self) -> RangeInclusive<usize> {
        self.c1..=self.c2
    }

    /// Overlap of two rects, empty when they are disjoint
    pub fn intersect(&self, other: &Rect) -> Rect {
        if self.is_empty() || other.is_empty() {
            return Rect::EMPTY;
        }
        let r = Rect::new(
            self.r1.max(other.r1),
            self.c1.max(other.c1),
            self.r2.min(other.r2),
            self.c2.min(other.c2),
        );
        if r.is_empty() { Rect::EMPTY } else { r }
    }
}

impl Default for Rect {
    fn default() -> Self {
        Rect::EMPTY
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "<empty>");
        }
        write!(
            f,
            "{}:{}",
            cell_reference((self.r1, self.c1)),
            cell_reference((self.r2, self.c2))
        )
    }
}
