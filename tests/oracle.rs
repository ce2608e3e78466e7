use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use pretty_assertions::assert_eq;
use sheet_tables::oracle::{CachedOracle, DeadlineOracle, MokaCache};
use sheet_tables::{ExtractConfig, Grid, HeaderOracle, OracleError, extract_regions, extract_tables};

fn price_list() -> Grid {
    Grid::from_rows(vec![
        vec!["Acme Corp", "", ""],
        vec!["", "", ""],
        vec!["Code", "Name", "Price"],
        vec!["A1", "Widget", "9.99"],
        vec!["A2", "Gadget", "14.50"],
        vec!["A3", "Gizmo", "3.25"],
    ])
}

/// Answers a fixed boundary and counts how often it was asked
struct Fixed {
    boundary: Option<(usize, usize)>,
    calls: AtomicUsize,
}

impl Fixed {
    fn new(boundary: Option<(usize, usize)>) -> Self {
        Self {
            boundary,
            calls: AtomicUsize::new(0),
        }
    }
}

impl HeaderOracle for Fixed {
    fn suggest_header_boundary(
        &self,
        _rows_snippet: &[String],
    ) -> Result<Option<(usize, usize)>, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.boundary)
    }
}

struct Down;

impl HeaderOracle for Down {
    fn suggest_header_boundary(
        &self,
        _rows_snippet: &[String],
    ) -> Result<Option<(usize, usize)>, OracleError> {
        Err(OracleError::Unavailable("connection refused".into()))
    }

    fn is_likely_data_table(
        &self,
        _header: &[String],
        _sample_rows: &[Vec<String>],
    ) -> Result<Option<(bool, f32)>, OracleError> {
        Err(OracleError::MalformedResponse("expected a JSON object".into()))
    }
}

struct Slow;

impl HeaderOracle for Slow {
    fn suggest_header_boundary(
        &self,
        _rows_snippet: &[String],
    ) -> Result<Option<(usize, usize)>, OracleError> {
        thread::sleep(Duration::from_millis(400));
        Ok(Some((0, 2)))
    }
}

#[test]
fn accepted_suggestion_replaces_the_heuristic_split() {
    let config = ExtractConfig::default();
    let oracle = Fixed::new(Some((0, 2)));
    let found = extract_regions(&price_list(), &config, Some(&oracle));

    assert_eq!(found[0].header_depth, 2);
    assert_eq!(found[0].table.header, vec!["A1", "Widget", "9.99"]);
    assert_eq!(found[0].table.rows.len(), 2);
}

#[test]
fn failing_oracle_behaves_like_no_oracle() {
    let config = ExtractConfig::default();
    let plain = extract_tables(&price_list(), &config, None);
    assert_eq!(plain[0].header, vec!["Code", "Name", "Price"]);
    assert_eq!(extract_tables(&price_list(), &config, Some(&Down)), plain);
    assert_eq!(extract_tables(&price_list(), &config, Some(&Fixed::new(None))), plain);
}

#[test]
fn cached_oracle_is_asked_once_per_snippet() {
    let config = ExtractConfig::default();
    let inner = Arc::new(Fixed::new(Some((0, 1))));
    let oracle = CachedOracle::new(Arc::clone(&inner), MokaCache::new(Duration::from_secs(60), 100));

    let first = extract_tables(&price_list(), &config, Some(&oracle));
    let second = extract_tables(&price_list(), &config, Some(&oracle));
    assert_eq!(first, second);
    assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn slow_oracle_is_cut_off() {
    let config = ExtractConfig::default();
    let oracle = DeadlineOracle::new(Slow, Duration::from_millis(20));
    let found = extract_regions(&price_list(), &config, Some(&oracle));
    assert_eq!(found[0].header_depth, 1);
    assert_eq!(found[0].table.header, vec!["Code", "Name", "Price"]);
}
