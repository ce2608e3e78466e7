use crate::classify::{CellKind, classify};
use crate::grid::{Grid, Rect};

const SEARCH_ROWS: usize = 5;

/// Label of the nearest caption row around `rect`, e.g. a section title such as
/// `Fasteners` printed above a block of products.
///
/// Looks up to five rows above the table first, nearest row first, then up to five rows
/// below. Only cells within the table's columns are considered. A caption row has text and
/// no numbers, dates or prices; its distinct values are joined with ` / `.
pub fn find_category(grid: &Grid, rect: &Rect) -> Option<String> {
    if rect.is_empty() {
        return None;
    }

    let above = (rect.r1.saturating_sub(SEARCH_ROWS)..rect.r1).rev();
    let below = (rect.r2 + 1..grid.height()).take(SEARCH_ROWS);

    above
        .chain(below)
        .find_map(|r| caption(grid.row_span(r, rect.c1, rect.c2)))
}

fn caption(cells: &[String]) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    for value in cells.iter().map(|v| v.as_str()).filter(|v| !v.is_empty()) {
        match classify(value) {
            CellKind::Number | CellKind::Date | CellKind::Money => return None,
            _ if parts.contains(&value) => {}
            _ => parts.push(value),
        }
    }
    (!parts.is_empty()).then(|| parts.join(" / "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_caption_above_wins() {
        let grid = Grid::from_rows(vec![
            vec!["Acme Corp", "", ""],
            vec!["Fasteners", "Fasteners", ""],
            vec!["Code", "Name", "Price"],
            vec!["A1", "Bolt", "1.20"],
        ]);
        assert_eq!(
            find_category(&grid, &Rect::new(2, 0, 3, 2)).as_deref(),
            Some("Fasteners")
        );
    }

    #[test]
    fn numeric_rows_are_not_captions_and_below_is_searched_next() {
        let grid = Grid::from_rows(vec![
            vec!["Total", "42"],
            vec!["Code", "Price"],
            vec!["1", "2.00"],
            vec!["", ""],
            vec!["Subtotal", "2.00"],
        ]);
        assert_eq!(find_category(&grid, &Rect::new(1, 0, 2, 1)), None);

        let grid = Grid::from_rows(vec![
            vec!["Code", "Price"],
            vec!["1", "2.00"],
            vec!["", ""],
            vec!["Tools", "Garden"],
        ]);
        assert_eq!(
            find_category(&grid, &Rect::new(0, 0, 1, 1)).as_deref(),
            Some("Tools / Garden")
        );
    }
}
