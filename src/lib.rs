//! Finds the data tables inside loosely formatted spreadsheets (supplier price lists,
//! exported reports) and splits each one into a header and data rows.
//!
//! ```no_run
//! use sheet_tables::{ExtractConfig, excel, extract_workbook};
//!
//! let workbook = excel::open_workbook("prices.xlsx")?;
//! let tables = extract_workbook(&workbook, &ExtractConfig::default(), None);
//! for (sheet, found) in &tables {
//!     println!("{sheet}: {} tables", found.len());
//! }
//! # Ok::<(), sheet_tables::ExtractError>(())
//! ```

pub mod classify;
pub mod config;
pub mod detect;
pub mod error;
pub mod excel;
pub mod extract;
pub mod grid;
pub mod json_export;
pub mod oracle;
pub mod table;
pub mod utils;

pub use config::{ExtractConfig, LabelPolicy};
pub use error::{ExtractError, Result};
pub use extract::{
    ExtractedTable, SheetTables, extract_regions, extract_sheet, extract_tables, extract_workbook,
};
pub use grid::{Grid, Rect, build_grid};
pub use oracle::{HeaderOracle, OracleError};
pub use table::TableResult;
