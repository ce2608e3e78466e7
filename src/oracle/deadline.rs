use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crate::oracle::{HeaderOracle, OracleError};

const DEFAULT_MAX_IN_FLIGHT: usize = 4;

/// Bounds every call of the wrapped oracle by `timeout`.
///
/// The call runs on a helper thread; when the deadline passes the caller gets
/// [`OracleError::Timeout`] and the late answer is discarded. A timed-out worker keeps
/// running until the oracle returns, so at most `max_in_flight` workers exist at once;
/// further calls fail fast with [`OracleError::Unavailable`] until one finishes.
pub struct DeadlineOracle<O> {
    inner: Arc<O>,
    timeout: Duration,
    max_in_flight: usize,
    in_flight: Arc<AtomicUsize>,
}

/// Releases a worker slot when the worker ends, panics included
struct Slot(Arc<AtomicUsize>);

impl Drop for Slot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<O: HeaderOracle + 'static> DeadlineOracle<O> {
    pub fn new(inner: O, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            timeout,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Workers currently running, timed-out ones included
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn acquire(&self) -> Option<Slot> {
        self.in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < self.max_in_flight).then_some(n + 1)
            })
            .ok()
            .map(|_| Slot(Arc::clone(&self.in_flight)))
    }

    fn call<T, F>(&self, f: F) -> Result<T, OracleError>
    where
        T: Send + 'static,
        F: FnOnce(&O) -> Result<T, OracleError> + Send + 'static,
    {
        let Some(slot) = self.acquire() else {
            return Err(OracleError::Unavailable(format!(
                "{} oracle calls still running",
                self.max_in_flight
            )));
        };

        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        thread::spawn(move || {
            let _slot = slot;
            // The receiver is gone once the deadline has passed
            let _ = tx.send(f(&inner));
        });

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(OracleError::Timeout(self.timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(OracleError::Unavailable(
                "oracle worker exited without an answer".to_string(),
            )),
        }
    }
}

impl<O: HeaderOracle + 'static> HeaderOracle for DeadlineOracle<O> {
    fn suggest_header_boundary(
        &self,
        rows_snippet: &[String],
    ) -> Result<Option<(usize, usize)>, OracleError> {
        let snippet = rows_snippet.to_vec();
        self.call(move |oracle| oracle.suggest_header_boundary(&snippet))
    }

    fn is_likely_data_table(
        &self,
        header: &[String],
        sample_rows: &[Vec<String>],
    ) -> Result<Option<(bool, f32)>, OracleError> {
        let header = header.to_vec();
        let sample = sample_rows.to_vec();
        self.call(move |oracle| oracle.is_likely_data_table(&header, &sample))
    }
}
