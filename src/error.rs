use thiserror::Error;

/// Errors raised while reading workbooks and preparing sheets for table extraction.
///
/// "No table found" is deliberately absent: a sheet without a qualifying region simply
/// yields an empty list of tables.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The sheet cannot be turned into a usable grid (zero rows or zero columns).
    /// Callers recover by skipping the sheet.
    #[error("Malformed sheet '{sheet}': {reason}")]
    MalformedInput { sheet: String, reason: String },

    /// Requested sheet does not exist in the workbook
    #[error("Sheet '{0}' not found in workbook")]
    SheetNotFound(String),

    /// A1-style reference that could not be parsed
    #[error("Invalid cell reference '{0}'")]
    InvalidReference(String),

    /// Invalid configuration value or file
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unable to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl ExtractError {
    pub fn malformed(sheet: &str, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            sheet: sheet.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the error only concerns one sheet, so the rest of the workbook can proceed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MalformedInput { .. })
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
