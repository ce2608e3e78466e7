use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Serialize;

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::extract::SheetTables;
use crate::json_export::converters::table_to_records;
use crate::json_export::types::{OrderedTableData, OutputShape};

pub fn serialize_to_json<T: Serialize>(data: &T, compact: bool) -> Result<String> {
    if compact {
        serde_json::to_string(data).context("Failed to serialize data to JSON")
    } else {
        serde_json::to_string_pretty(data).context("Failed to serialize data to JSON")
    }
}

pub fn write_json_to_file(json_string: &str, path: &Path) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;

    file.write_all(json_string.as_bytes())
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    Ok(())
}

// Tables of every sheet as header-keyed records
pub fn generate_records_json(sheets: &SheetTables) -> IndexMap<String, Vec<OrderedTableData>> {
    sheets
        .iter()
        .map(|(name, tables)| (name.clone(), tables.iter().map(table_to_records).collect()))
        .collect()
}

// JSON text for the extracted tables of a workbook, in the requested shape
pub fn export_tables_json(sheets: &SheetTables, shape: OutputShape, compact: bool) -> Result<String> {
    match shape {
        OutputShape::Tables => serialize_to_json(sheets, compact),
        OutputShape::Records => serialize_to_json(&generate_records_json(sheets), compact),
    }
}
