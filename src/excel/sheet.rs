use crate::error::Result;
use crate::grid::Rect;
use crate::utils::parse_cell_reference;

/// A merged cell range, inclusive on both ends, plus the anchor's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRange {
    /// (row, col) of the top-left anchor
    pub start: (usize, usize),
    pub end: (usize, usize),
    pub value: String,
}

impl MergeRange {
    pub fn new(start: (usize, usize), end: (usize, usize), value: impl Into<String>) -> Self {
        Self {
            start: (start.0.min(end.0), start.1.min(end.1)),
            end: (start.0.max(end.0), start.1.max(end.1)),
            value: value.into(),
        }
    }

    /// Builds a range from A1 references, e.g. `("B2", "D2")`
    pub fn from_refs(start_ref: &str, end_ref: &str, value: impl Into<String>) -> Result<Self> {
        let start = parse_cell_reference(start_ref)?;
        let end = parse_cell_reference(end_ref)?;
        Ok(Self::new(start, end, value))
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.start.0, self.start.1, self.end.0, self.end.1)
    }
}

/// One worksheet as read from the file: raw cell text at absolute sheet coordinates plus
/// its merged ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
    pub merges: Vec<MergeRange>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
            merges: Vec::new(),
        }
    }

    pub fn with_merges(mut self, merges: Vec<MergeRange>) -> Self {
        self.merges = merges;
        self
    }
}
