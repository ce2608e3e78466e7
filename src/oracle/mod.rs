//! Optional external advice on header boundaries and table validity.
//!
//! An oracle (typically an LLM behind a network call) may suggest where the header ends or
//! veto a region that is not really a data table. Extraction never depends on it: a missing,
//! failing or slow oracle is the same as one without an opinion.

mod cache;
mod deadline;

pub use cache::{CachedAnswer, CachedOracle, MokaCache, OracleCache, snippet_key};
pub use deadline::DeadlineOracle;

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use crate::grid::{Grid, Rect};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    #[error("oracle did not answer within {0:?}")]
    Timeout(Duration),

    #[error("oracle unavailable: {0}")]
    Unavailable(String),

    #[error("malformed oracle response: {0}")]
    MalformedResponse(String),
}

/// External decision-maker consulted per detected region.
///
/// Both calls default to "no opinion", so an implementation only overrides what it supports.
pub trait HeaderOracle: Send + Sync {
    /// `(header_row_index, data_start_index)` relative to the first snippet row
    fn suggest_header_boundary(
        &self,
        _rows_snippet: &[String],
    ) -> Result<Option<(usize, usize)>, OracleError> {
        Ok(None)
    }

    /// Whether `header` over `sample_rows` looks like a real data table, with a confidence
    /// in `0..=1`
    fn is_likely_data_table(
        &self,
        _header: &[String],
        _sample_rows: &[Vec<String>],
    ) -> Result<Option<(bool, f32)>, OracleError> {
        Ok(None)
    }
}

impl<T: HeaderOracle + ?Sized> HeaderOracle for Arc<T> {
    fn suggest_header_boundary(
        &self,
        rows_snippet: &[String],
    ) -> Result<Option<(usize, usize)>, OracleError> {
        (**self).suggest_header_boundary(rows_snippet)
    }

    fn is_likely_data_table(
        &self,
        header: &[String],
        sample_rows: &[Vec<String>],
    ) -> Result<Option<(bool, f32)>, OracleError> {
        (**self).is_likely_data_table(header, sample_rows)
    }
}

/// The first `max_rows` rows of `rect`, each as its non-empty cells joined with ` | `
pub fn rows_snippet(grid: &Grid, rect: &Rect, max_rows: usize) -> Vec<String> {
    rect.rows()
        .take(max_rows)
        .map(|r| {
            grid.row_span(r, rect.c1, rect.c2)
                .iter()
                .map(|v| v.as_str())
                .filter(|v| !v.is_empty())
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect()
}

/// Boundary suggestion, with failures logged and treated as no suggestion
pub(crate) fn ask_boundary(oracle: &dyn HeaderOracle, snippet: &[String]) -> Option<(usize, usize)> {
    oracle
        .suggest_header_boundary(snippet)
        .unwrap_or_else(|e| {
            warn!("header oracle failed, using heuristics: {e}");
            None
        })
}

/// Table verdict, with failures logged and treated as no verdict
pub(crate) fn ask_verdict(
    oracle: &dyn HeaderOracle,
    header: &[String],
    sample_rows: &[Vec<String>],
) -> Option<(bool, f32)> {
    oracle
        .is_likely_data_table(header, sample_rows)
        .unwrap_or_else(|e| {
            warn!("table oracle failed, keeping table: {e}");
            None
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl HeaderOracle for Broken {
        fn suggest_header_boundary(
            &self,
            _rows_snippet: &[String],
        ) -> Result<Option<(usize, usize)>, OracleError> {
            Err(OracleError::MalformedResponse("not json".into()))
        }
    }

    struct Silent;

    impl HeaderOracle for Silent {}

    #[test]
    fn snippet_joins_non_empty_cells() {
        let grid = Grid::from_rows([["Code", "", "Price"], ["A1", "Widget", "9.99"], ["x", "y", "z"]]);
        let snippet = rows_snippet(&grid, &Rect::new(0, 0, 2, 2), 2);
        assert_eq!(snippet, vec!["Code | Price", "A1 | Widget | 9.99"]);
    }

    #[test]
    fn failures_read_as_no_opinion() {
        assert_eq!(ask_boundary(&Broken, &["a".to_string()]), None);
        assert_eq!(ask_verdict(&Broken, &[], &[]), None);
        assert_eq!(ask_boundary(&Silent, &[]), None);
        let shared: Arc<dyn HeaderOracle> = Arc::new(Silent);
        assert_eq!(ask_verdict(&shared, &[], &[]), None);
    }
}
