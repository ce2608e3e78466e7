use calamine::{Data, Dimensions, Range, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::{debug, warn};

use crate::config::ExtractConfig;
use crate::error::{ExtractError, Result};
use crate::excel::{MergeRange, RawSheet, data_to_string};

/// Largest sheet area copied out of calamine's range, in absolute sheet coordinates.
/// Cells past either limit are never materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadLimits {
    pub max_rows: usize,
    pub max_cols: usize,
}

impl Default for ReadLimits {
    fn default() -> Self {
        ReadLimits::from(&ExtractConfig::default())
    }
}

impl From<&ExtractConfig> for ReadLimits {
    fn from(config: &ExtractConfig) -> Self {
        Self {
            max_rows: config.max_rows,
            max_cols: config.max_cols,
        }
    }
}

/// All worksheets of one file, read eagerly.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<RawSheet>,
    file_path: String,
}

/// Opens `xlsx`, `xlsm`, `xlsb`, `xls` or `ods` files and reads every sheet, within the
/// default [`ReadLimits`].
pub fn open_workbook<P: AsRef<Path>>(path: P) -> Result<Workbook> {
    open_workbook_with_limits(path, ReadLimits::default())
}

/// [`open_workbook`] with explicit limits, usually `ReadLimits::from(&config)`.
pub fn open_workbook_with_limits<P: AsRef<Path>>(path: P, limits: ReadLimits) -> Result<Workbook> {
    let path_str = path.as_ref().to_string_lossy().to_string();
    let workbook = open_workbook_auto(path.as_ref())?;
    let sheets = read_sheets(workbook, limits)?;
    debug!(path = %path_str, sheets = sheets.len(), "opened workbook");

    Ok(Workbook {
        sheets,
        file_path: path_str,
    })
}

/// Same as [`open_workbook`] for an in-memory file, e.g. an upload body.
pub fn open_workbook_from_bytes(bytes: Vec<u8>) -> Result<Workbook> {
    let workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    Ok(Workbook {
        sheets: read_sheets(workbook, ReadLimits::default())?,
        file_path: String::new(),
    })
}

fn read_sheets<RS: Read + Seek>(mut workbook: Sheets<RS>, limits: ReadLimits) -> Result<Vec<RawSheet>> {
    if let Sheets::Xlsx(xlsx) = &mut workbook
        && let Err(e) = xlsx.load_merged_regions()
    {
        warn!("failed to read merged cells, continuing without: {e}");
    }

    let sheet_names = workbook.sheet_names();
    if sheet_names.is_empty() {
        return Err(ExtractError::Workbook(calamine::Error::Msg(
            "No worksheets found in file",
        )));
    }

    let mut sheets = Vec::with_capacity(sheet_names.len());
    for name in sheet_names {
        let range = match workbook.worksheet_range(&name) {
            Ok(range) => range,
            Err(e) => {
                // Left empty so the caller skips it like any other malformed sheet
                warn!(sheet = %name, "unable to read worksheet: {e}");
                sheets.push(RawSheet::new(name, Vec::new()));
                continue;
            }
        };
        let merges = merged_cells(&mut workbook, &name);
        sheets.push(sheet_from_range(name, &range, &merges, limits));
    }

    Ok(sheets)
}

fn merged_cells<RS: Read + Seek>(workbook: &mut Sheets<RS>, name: &str) -> Vec<Dimensions> {
    match workbook {
        Sheets::Xlsx(xlsx) => xlsx
            .worksheet_merge_cells(name)
            .unwrap_or(Ok(Vec::new()))
            .unwrap_or_default(),
        Sheets::Xls(xls) => xls.worksheet_merge_cells(name).unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Lays the used range out at absolute sheet coordinates, so row and column indices
/// match what a user sees in the file. Rows and columns past `limits` are cut before
/// anything is allocated; merges starting past them are dropped, the rest are clamped.
fn sheet_from_range(
    name: String,
    range: &Range<Data>,
    merges: &[Dimensions],
    limits: ReadLimits,
) -> RawSheet {
    let Some((start_row, start_col)) = range.start() else {
        return RawSheet::new(name, Vec::new());
    };
    let (start_row, start_col) = (start_row as usize, start_col as usize);
    let (height, width) = range.get_size();

    let total_rows = (start_row + height).min(limits.max_rows);
    let total_cols = (start_col + width).min(limits.max_cols);
    if total_rows < start_row + height || total_cols < start_col + width {
        debug!(
            sheet = %name,
            rows = start_row + height,
            cols = start_col + width,
            kept_rows = total_rows,
            kept_cols = total_cols,
            "sheet truncated to read limits"
        );
    }
    if total_rows == 0 || total_cols == 0 {
        return RawSheet::new(name, Vec::new());
    }

    let mut rows = vec![vec![String::new(); total_cols]; total_rows];
    for (row_idx, col_idx, cell) in range.used_cells() {
        let (r, c) = (start_row + row_idx, start_col + col_idx);
        if r < total_rows && c < total_cols {
            rows[r][c] = data_to_string(cell);
        }
    }

    let merges = merges
        .iter()
        .filter_map(|dims| {
            let start = (dims.start.0 as usize, dims.start.1 as usize);
            if start.0 >= total_rows || start.1 >= total_cols {
                return None;
            }
            let end = (
                (dims.end.0 as usize).min(total_rows - 1),
                (dims.end.1 as usize).min(total_cols - 1),
            );
            let anchor = rows[start.0][start.1].clone();
            Some(MergeRange::new(start, end, anchor))
        })
        .collect();

    RawSheet::new(name, rows).with_merges(merges)
}

impl Workbook {
    /// Wraps sheets that did not come from a file
    pub fn from_sheets(sheets: Vec<RawSheet>) -> Self {
        Self {
            sheets,
            file_path: String::new(),
        }
    }

    pub fn sheets(&self) -> &[RawSheet] {
        &self.sheets
    }

    pub fn get_sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    pub fn sheet(&self, name: &str) -> Result<&RawSheet> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| ExtractError::SheetNotFound(name.to_string()))
    }

    /// Keeps only the named sheet
    pub fn retain_sheet(mut self, name: &str) -> Result<Self> {
        self.sheet(name)?;
        self.sheets.retain(|s| s.name == name);
        Ok(self)
    }

    pub fn get_file_path(&self) -> &str {
        &self.file_path
    }
}
