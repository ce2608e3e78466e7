//! Dense string grid for one sheet.

mod rect;

pub use rect::Rect;

use crate::config::ExtractConfig;
use crate::excel::MergeRange;

/// Rectangular snapshot of one sheet's cell text.
///
/// Every row has exactly [`Grid::width`] cells; missing cells are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Vec<String>>,
    width: usize,
}

impl Grid {
    /// Normalizes every value and pads ragged rows to the widest one.
    pub fn from_rows<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cells: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(|v| normalize_cell(v.as_ref())).collect())
            .collect();

        let width = cells.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return Self::default();
        }
        for row in &mut cells {
            row.resize(width, String::new());
        }

        Self { cells, width }
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() || self.width == 0
    }

    /// Whole grid as a rect, empty for an empty grid
    pub fn bounds(&self) -> Rect {
        if self.is_empty() {
            return Rect::EMPTY;
        }
        Rect::new(0, 0, self.height() - 1, self.width - 1)
    }

    /// Cell text, `""` outside the grid
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn row(&self, row: usize) -> &[String] {
        self.cells.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cells of `row` between columns `c1..=c2`, clamped to the grid
    pub fn row_span(&self, row: usize, c1: usize, c2: usize) -> &[String] {
        let cells = self.row(row);
        if c1 >= cells.len() || c2 < c1 {
            return &[];
        }
        &cells[c1..=c2.min(cells.len() - 1)]
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.cells
    }

    pub fn is_row_blank(&self, row: usize, c1: usize, c2: usize) -> bool {
        self.row_span(row, c1, c2).iter().all(|v| v.is_empty())
    }

    /// Non-empty cells of column `col` within rows `r1..=r2`
    pub fn column_fill(&self, col: usize, r1: usize, r2: usize) -> usize {
        (r1..=r2)
            .filter(|&r| !self.cell(r, col).is_empty())
            .count()
    }

    /// Cells of `rect` as owned rows, clamped to the grid
    pub fn extract(&self, rect: &Rect) -> Vec<Vec<String>> {
        let rect = rect.intersect(&self.bounds());
        rect.rows()
            .map(|r| self.row_span(r, rect.c1, rect.c2).to_vec())
            .collect()
    }

    /// Blanks every cell inside `rect`
    pub fn clear(&mut self, rect: &Rect) {
        let rect = rect.intersect(&self.bounds());
        if rect.is_empty() {
            return;
        }
        for row in &mut self.cells[rect.r1..=rect.r2] {
            for cell in &mut row[rect.c1..=rect.c2] {
                cell.clear();
            }
        }
    }

    fn fill(&mut self, rect: &Rect, value: &str) {
        let rect = rect.intersect(&self.bounds());
        if rect.is_empty() {
            return;
        }
        for row in &mut self.cells[rect.r1..=rect.r2] {
            for cell in &mut row[rect.c1..=rect.c2] {
                cell.clear();
                cell.push_str(value);
            }
        }
    }
}

/// Trims a cell value and folds NBSP and CR/CRLF line endings.
pub fn normalize_cell(value: &str) -> String {
    let value = value.trim();
    if !value.contains(['\u{00A0}', '\r']) {
        return value.to_string();
    }
    value
        .replace('\u{00A0}', " ")
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .trim()
        .to_string()
}

/// Builds the dense grid for one sheet.
///
/// Rows beyond `max_rows` and columns beyond `max_cols` are dropped. Every cell covered by a
/// merge range, anchor included, receives the anchor's normalized value; ranges reaching
/// past the grid are clamped and ranges fully outside it are ignored. Zero rows or zero
/// columns yields an empty grid.
pub fn build_grid(rows: &[Vec<String>], merges: &[MergeRange], config: &ExtractConfig) -> Grid {
    let mut grid = Grid::from_rows(
        rows.iter()
            .take(config.max_rows)
            .map(|row| row.iter().take(config.max_cols)),
    );
    if grid.is_empty() {
        return grid;
    }

    for merge in merges {
        let value = normalize_cell(&merge.value);
        grid.fill(&merge.rect(), &value);
    }

    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect()
    }

    #[test]
    fn ragged_rows_are_padded_to_the_widest() {
        let grid = Grid::from_rows(vec![vec!["Acme Corp"], vec![], vec!["Code", "Name", "Price"]]);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.width(), 3);
        assert!(grid.rows().iter().all(|row| row.len() == 3));
        assert_eq!(grid.cell(0, 2), "");
        assert_eq!(grid.cell(9, 9), "");
    }

    #[test]
    fn values_are_trimmed_and_line_endings_folded() {
        assert_eq!(normalize_cell("  Price\r\nUSD "), "Price\nUSD");
        assert_eq!(normalize_cell("1\u{00A0}000"), "1 000");
        assert_eq!(normalize_cell("\u{00A0}x\u{00A0}"), "x");
    }

    #[test]
    fn merge_ranges_broadcast_the_anchor_value() {
        let rows = strings(&[&["Price list", "", ""], &["Code", "Name", "Price"]]);
        let merges = vec![MergeRange::new((0, 0), (0, 2), " Price list ")];
        let grid = build_grid(&rows, &merges, &ExtractConfig::default());
        assert_eq!(grid.row(0), ["Price list", "Price list", "Price list"]);
        assert_eq!(grid.row(1), ["Code", "Name", "Price"]);
    }

    #[test]
    fn merges_outside_the_grid_are_clamped_or_ignored() {
        let rows = strings(&[&["a", "b"], &["c", "d"]]);
        let merges = vec![
            MergeRange::new((1, 1), (5, 5), "X"),
            MergeRange::new((7, 0), (8, 1), "Y"),
        ];
        let grid = build_grid(&rows, &merges, &ExtractConfig::default());
        assert_eq!(grid.rows(), strings(&[&["a", "b"], &["c", "X"]]).as_slice());
    }

    #[test]
    fn caps_and_empty_input() {
        let config = ExtractConfig {
            max_rows: 2,
            max_cols: 1,
            ..ExtractConfig::default()
        };
        let rows = strings(&[&["a", "b"], &["c", "d"], &["e", "f"]]);
        let grid = build_grid(&rows, &[], &config);
        assert_eq!((grid.height(), grid.width()), (2, 1));

        assert!(build_grid(&[], &[], &config).is_empty());
        let blank: Vec<Vec<String>> = vec![vec![], vec![]];
        assert!(build_grid(&blank, &[], &config).is_empty());
    }

    #[test]
    fn clear_blanks_only_the_rect() {
        let mut grid = Grid::from_rows([["a", "b"], ["c", "d"]]);
        grid.clear(&Rect::new(0, 1, 1, 1));
        assert_eq!(grid.rows(), strings(&[&["a", ""], &["c", ""]]).as_slice());
        assert_eq!(grid.extract(&Rect::new(1, 0, 4, 0)), strings(&[&["c"]]));
    }
}
