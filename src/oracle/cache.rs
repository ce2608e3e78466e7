use std::time::Duration;

use crate::oracle::{HeaderOracle, OracleError};

/// A remembered oracle answer
#[derive(Debug, Clone, PartialEq)]
pub enum CachedAnswer {
    Boundary(Option<(usize, usize)>),
    Verdict(Option<(bool, f32)>),
}

/// Storage for oracle answers, injected by the caller so that nothing is cached
/// process-wide.
pub trait OracleCache: Send + Sync {
    fn get(&self, key: &str) -> Option<CachedAnswer>;
    fn insert(&self, key: String, answer: CachedAnswer);
}

/// In-memory cache with a time-to-live, backed by `moka`.
#[derive(Clone)]
pub struct MokaCache {
    inner: moka::sync::Cache<String, CachedAnswer>,
}

impl MokaCache {
    pub fn new(time_to_live: Duration, max_capacity: u64) -> Self {
        Self {
            inner: moka::sync::Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(time_to_live)
                .build(),
        }
    }
}

impl Default for MokaCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(30 * 60), 10_000)
    }
}

impl OracleCache for MokaCache {
    fn get(&self, key: &str) -> Option<CachedAnswer> {
        self.inner.get(key)
    }

    fn insert(&self, key: String, answer: CachedAnswer) {
        self.inner.insert(key, answer);
    }
}

/// Content hash of a snippet: blake3 over the rows, hex encoded
pub fn snippet_key<S: AsRef<str>>(rows: &[S]) -> String {
    let mut hasher = blake3::Hasher::new();
    for row in rows {
        hasher.update(row.as_ref().as_bytes());
        // Row separator that cannot occur inside a cell
        hasher.update(&[0]);
    }
    hasher.finalize().to_hex().to_string()
}

/// Wraps an oracle so identical snippets are answered from `cache`. Errors are not cached.
pub struct CachedOracle<O, C> {
    inner: O,
    cache: C,
}

impl<O: HeaderOracle, C: OracleCache> CachedOracle<O, C> {
    pub fn new(inner: O, cache: C) -> Self {
        Self { inner, cache }
    }
}

impl<O: HeaderOracle, C: OracleCache> HeaderOracle for CachedOracle<O, C> {
    fn suggest_header_boundary(
        &self,
        rows_snippet: &[String],
    ) -> Result<Option<(usize, usize)>, OracleError> {
        let key = format!("boundary:{}", snippet_key(rows_snippet));
        if let Some(CachedAnswer::Boundary(answer)) = self.cache.get(&key) {
            return Ok(answer);
        }
        let answer = self.inner.suggest_header_boundary(rows_snippet)?;
        self.cache.insert(key, CachedAnswer::Boundary(answer));
        Ok(answer)
    }

    fn is_likely_data_table(
        &self,
        header: &[String],
        sample_rows: &[Vec<String>],
    ) -> Result<Option<(bool, f32)>, OracleError> {
        let mut lines = Vec::with_capacity(sample_rows.len() + 1);
        lines.push(header.join("\t"));
        lines.extend(sample_rows.iter().map(|row| row.join("\t")));
        let key = format!("verdict:{}", snippet_key(&lines));

        if let Some(CachedAnswer::Verdict(answer)) = self.cache.get(&key) {
            return Ok(answer);
        }
        let answer = self.inner.is_likely_data_table(header, sample_rows)?;
        self.cache.insert(key, CachedAnswer::Verdict(answer));
        Ok(answer)
    }
}
