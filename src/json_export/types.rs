use indexmap::IndexMap;
use serde_json::Value;
use std::str::FromStr;

/// Shape of the exported tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputShape {
    /// `{"header": [...], "rows": [[...]]}` per table
    #[default]
    Tables,
    /// One object per data row, keyed by header label
    Records,
}

impl FromStr for OutputShape {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "t" | "tables" => Ok(OutputShape::Tables),
            "r" | "records" => Ok(OutputShape::Records),
            _ => Err(()),
        }
    }
}

/// Rows of one table as header-keyed objects, in column order
pub type OrderedTableData = Vec<IndexMap<String, Value>>;
