use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ExtractError, Result};

/// How the labels of multi-row headers collapse into one label per column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelPolicy {
    /// Top-down, every non-empty header value overwrites the previous one, so the
    /// bottom-most (most specific) label wins. Unit markers only fill empty labels.
    #[default]
    LastNonEmpty,
    /// Distinct non-empty header values joined top-down with the label separator
    Join,
}

impl FromStr for LabelPolicy {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "last" | "last-non-empty" | "last_non_empty" => Ok(LabelPolicy::LastNonEmpty),
            "join" => Ok(LabelPolicy::Join),
            _ => Err(ExtractError::Config(format!("unknown label policy: {}", s))),
        }
    }
}

/// Tuning knobs for table extraction. Every field has a default, so a JSON config file
/// only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Minimum share of signal cells inside a candidate rectangle
    pub density_threshold: f64,
    /// Weight of row regularity in the candidate score (density gets the rest)
    pub regularity_weight: f64,
    /// Size of the running candidate pool, by area
    pub top_k: usize,
    /// Smallest seed rectangle that can be a table
    pub min_seed_rows: usize,
    pub min_seed_cols: usize,
    /// Rows sampled below the provisional header when widening a region
    pub sample_window: usize,
    /// Deepest header the detector will accept
    pub max_header_depth: usize,
    /// Rows scanned for a run of data-like rows
    pub header_scan_rows: usize,
    /// Data score a row needs to count as data-like
    pub data_row_threshold: f64,
    /// Data rows sampled for column typing stability
    pub stability_sample_rows: usize,
    /// Non-empty values an unlabelled column needs to survive projection
    pub min_column_values: usize,
    /// Data rows sampled by the column projector
    pub projection_sample_rows: usize,
    pub label_policy: LabelPolicy,
    /// Separator used by [`LabelPolicy::Join`]
    pub label_separator: String,
    /// Grid caps, bounding worst-case cost on huge sheets
    pub max_rows: usize,
    pub max_cols: usize,
    pub max_tables_per_sheet: usize,
    /// Append the nearest label row above/below a table as an extra column
    pub attach_category: bool,
    pub category_column: String,
    /// Confidence above which an oracle "not a data table" verdict drops the table
    pub oracle_reject_confidence: f32,
    /// Leading block rows shown to the oracle
    pub oracle_snippet_rows: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            density_threshold: 0.55,
            regularity_weight: 0.3,
            top_k: 3,
            min_seed_rows: 2,
            min_seed_cols: 2,
            sample_window: 30,
            max_header_depth: 6,
            header_scan_rows: 20,
            data_row_threshold: 0.55,
            stability_sample_rows: 60,
            min_column_values: 3,
            projection_sample_rows: 200,
            label_policy: LabelPolicy::LastNonEmpty,
            label_separator: " ".to_string(),
            max_rows: 10_000,
            max_cols: 512,
            max_tables_per_sheet: 32,
            attach_category: false,
            category_column: "category".to_string(),
            oracle_reject_confidence: 0.8,
            oracle_snippet_rows: 24,
        }
    }
}

impl ExtractConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ExtractConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.density_threshold) {
            return Err(ExtractError::Config(format!(
                "density_threshold must be within 0..=1, got {}",
                self.density_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.regularity_weight) {
            return Err(ExtractError::Config(format!(
                "regularity_weight must be within 0..=1, got {}",
                self.regularity_weight
            )));
        }
        if self.top_k == 0 {
            return Err(ExtractError::Config("top_k must be at least 1".to_string()));
        }
        if self.max_rows == 0 || self.max_cols == 0 {
            return Err(ExtractError::Config(
                "max_rows and max_cols must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn density_weight(&self) -> f64 {
        1.0 - self.regularity_weight
    }
}
