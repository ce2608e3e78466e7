//! End-to-end extraction: sheets in, `{header, rows}` tables out.

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::config::ExtractConfig;
use crate::detect::{detect_header_depth, detect_region, refine_region};
use crate::error::{ExtractError, Result};
use crate::excel::{RawSheet, Workbook};
use crate::grid::{Grid, Rect, build_grid};
use crate::oracle::{HeaderOracle, ask_boundary, ask_verdict, rows_snippet};
use crate::table::{TableResult, assemble, find_category};

/// Tables per sheet, in workbook sheet order
pub type SheetTables = IndexMap<String, Vec<TableResult>>;

/// Data rows shown to the oracle when asking for a table verdict
const VERDICT_SAMPLE_ROWS: usize = 5;

/// A table together with where it was found
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedTable {
    /// Block the table was built from, header rows included
    pub region: Rect,
    pub header_depth: usize,
    pub table: TableResult,
}

/// Finds every table in `grid`, in sheet order (top to bottom, then left to right).
///
/// Each found region is blanked in a working copy before searching again, so regions never
/// overlap. At most `max_tables_per_sheet` tables are returned.
pub fn extract_regions(
    grid: &Grid,
    config: &ExtractConfig,
    oracle: Option<&dyn HeaderOracle>,
) -> Vec<ExtractedTable> {
    let mut working = grid.clone();
    let mut found = Vec::new();

    for _ in 0..config.max_tables_per_sheet {
        let Some(seed) = detect_region(&working, config) else {
            break;
        };
        let refined = refine_region(&working, seed.rect, config);

        if let Some(table) = build_table(grid, &working, refined, config, oracle) {
            found.push(table);
        }
        working.clear(&refined);
    }

    found.sort_by_key(|t| (t.region.r1, t.region.c1));
    debug!(tables = found.len(), "extraction finished");
    found
}

/// [`extract_regions`] without the region bookkeeping
pub fn extract_tables(
    grid: &Grid,
    config: &ExtractConfig,
    oracle: Option<&dyn HeaderOracle>,
) -> Vec<TableResult> {
    extract_regions(grid, config, oracle)
        .into_iter()
        .map(|t| t.table)
        .collect()
}

/// Builds the grid for `sheet` and extracts its tables.
///
/// A sheet without rows or columns is [`ExtractError::MalformedInput`]; a sheet that simply
/// holds no table yields an empty list.
pub fn extract_sheet(
    sheet: &RawSheet,
    config: &ExtractConfig,
    oracle: Option<&dyn HeaderOracle>,
) -> Result<Vec<TableResult>> {
    let grid = build_grid(&sheet.rows, &sheet.merges, config);
    if grid.is_empty() {
        return Err(ExtractError::malformed(&sheet.name, "sheet has no cells"));
    }
    debug!(
        sheet = %sheet.name,
        rows = grid.height(),
        cols = grid.width(),
        "extracting tables"
    );
    Ok(extract_tables(&grid, config, oracle))
}

/// Extracts every sheet of `workbook` in parallel. Sheets that cannot be processed are
/// logged and left out.
pub fn extract_workbook(
    workbook: &Workbook,
    config: &ExtractConfig,
    oracle: Option<&dyn HeaderOracle>,
) -> SheetTables {
    let results: Vec<(String, Result<Vec<TableResult>>)> = workbook
        .sheets()
        .par_iter()
        .map(|sheet| (sheet.name.clone(), extract_sheet(sheet, config, oracle)))
        .collect();

    let mut tables = SheetTables::new();
    for (name, result) in results {
        match result {
            Ok(found) => {
                tables.insert(name, found);
            }
            Err(e) if e.is_recoverable() => warn!("Skipping sheet '{}': {}", name, e),
            Err(e) => warn!("Failed to extract sheet '{}': {}", name, e),
        }
    }
    tables
}

fn build_table(
    grid: &Grid,
    working: &Grid,
    refined: Rect,
    config: &ExtractConfig,
    oracle: Option<&dyn HeaderOracle>,
) -> Option<ExtractedTable> {
    let (region, header_depth) = oracle
        .and_then(|o| oracle_split(working, refined, config, o))
        .unwrap_or_else(|| (refined, detect_header_depth(working, &refined, config)));
    debug!(region = %region, header_depth, "table split");

    let mut table = assemble(working, &region, header_depth, config);
    if table.rows.is_empty() {
        debug!(region = %region, "region has no data rows, skipping");
        return None;
    }

    if let Some(oracle) = oracle {
        let sample: Vec<Vec<String>> = table.rows.iter().take(VERDICT_SAMPLE_ROWS).cloned().collect();
        if let Some((false, confidence)) = ask_verdict(oracle, &table.header, &sample)
            && confidence >= config.oracle_reject_confidence
        {
            debug!(region = %region, confidence, "oracle rejected table");
            return None;
        }
    }

    if config.attach_category
        && let Some(category) = find_category(grid, &region)
    {
        table.push_constant_column(&config.category_column, &category);
    }

    Some(ExtractedTable {
        region,
        header_depth,
        table,
    })
}

/// Region and header depth from the oracle's boundary suggestion, if it is usable.
///
/// `(header_row, data_start)` is accepted when the header lies above the data and the data
/// starts within `max_header_depth` rows of it, before the last row of the block.
fn oracle_split(
    grid: &Grid,
    rect: Rect,
    config: &ExtractConfig,
    oracle: &dyn HeaderOracle,
) -> Option<(Rect, usize)> {
    let snippet = rows_snippet(grid, &rect, config.oracle_snippet_rows);
    let (header_row, data_start) = ask_boundary(oracle, &snippet)?;

    let limit = (header_row + config.max_header_depth).min(rect.height().saturating_sub(1));
    if header_row >= data_start || data_start > limit {
        debug!(header_row, data_start, "ignoring out-of-range oracle boundary");
        return None;
    }

    let region = Rect {
        r1: rect.r1 + header_row,
        ..rect
    };
    Some((region, data_start - header_row))
}
