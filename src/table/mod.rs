//! Turning a refined region into a `{header, rows}` table.

mod category;
mod header;
mod projector;

pub use category::find_category;
pub use header::{
    build_header, collapse_label, flatten_label, is_placeholder_label, is_synthetic_label,
};
pub use projector::project_columns;

use serde::{Deserialize, Serialize};

use crate::config::ExtractConfig;
use crate::grid::{Grid, Rect};

/// One extracted table.
///
/// Every row has exactly `header.len()` cells. Row order follows the sheet, and so does
/// column order after unusable columns are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableResult {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableResult {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { header, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Appends a column holding `value` on every row
    pub fn push_constant_column(&mut self, name: &str, value: &str) {
        self.header.push(name.to_string());
        for row in &mut self.rows {
            row.push(value.to_string());
        }
    }
}

/// Builds the table for `rect`, whose first `header_depth` rows are header.
pub fn assemble(grid: &Grid, rect: &Rect, header_depth: usize, config: &ExtractConfig) -> TableResult {
    let block = grid.extract(rect);
    let depth = header_depth.min(block.len());

    let header = build_header(&block, depth, config.label_policy, &config.label_separator);
    let rows = block.into_iter().skip(depth).collect();
    let (header, rows) = project_columns(
        header,
        rows,
        config.min_column_values,
        config.projection_sample_rows,
    );

    TableResult::new(header, rows)
}
