mod cell;
mod sheet;
mod workbook;

pub use cell::{data_to_string, excel_date_to_iso_string};
pub use sheet::{MergeRange, RawSheet};
pub use workbook::{
    ReadLimits, Workbook, open_workbook, open_workbook_from_bytes, open_workbook_with_limits,
};
