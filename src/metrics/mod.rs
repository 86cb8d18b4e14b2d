//! Metrics collection module
//!
//! Tracks search volume, outcomes by error kind, stale responses and
//! backend response times.

use crate::results::ErrorKind;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Number of response times kept for the rolling average
const RESPONSE_TIME_WINDOW: usize = 100;

/// Search metrics collector
pub struct Metrics {
    /// Requests sent to the backend
    total_searches: AtomicU64,
    /// Requests that produced a result page
    successes: AtomicU64,
    /// Responses dropped because a newer request had been issued
    discarded: AtomicU64,
    /// Failed requests by kind
    failures: RwLock<HashMap<ErrorKind, u64>>,
    /// Recent response times in ms
    response_times: RwLock<VecDeque<u64>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            total_searches: AtomicU64::new(0),
            successes: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
            failures: RwLock::new(HashMap::new()),
            response_times: RwLock::new(VecDeque::with_capacity(RESPONSE_TIME_WINDOW)),
        }
    }

    /// Increment total search count
    pub fn inc_search(&self) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_discarded(&self) {
        self.discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self, kind: ErrorKind) {
        let mut failures = self.failures.write().unwrap_or_else(PoisonError::into_inner);
        *failures.entry(kind).or_insert(0) += 1;
    }

    /// Record backend response time
    pub fn record_response_time(&self, time_ms: u64) {
        let mut times = self
            .response_times
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if times.len() >= RESPONSE_TIME_WINDOW {
            times.pop_front();
        }
        times.push_back(time_ms);
    }

    /// Get total searches
    pub fn get_total_searches(&self) -> u64 {
        self.total_searches.load(Ordering::Relaxed)
    }

    pub fn get_successes(&self) -> u64 {
        self.successes.load(Ordering::Relaxed)
    }

    pub fn get_discarded(&self) -> u64 {
        self.discarded.load(Ordering::Relaxed)
    }

    /// Failures of one kind
    pub fn get_failures(&self, kind: ErrorKind) -> u64 {
        let failures = self.failures.read().unwrap_or_else(PoisonError::into_inner);
        failures.get(&kind).copied().unwrap_or(0)
    }

    /// Get average response time
    pub fn get_avg_response_time(&self) -> Option<u64> {
        let times = self
            .response_times
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        if times.is_empty() {
            None
        } else {
            Some(times.iter().sum::<u64>() / times.len() as u64)
        }
    }

    /// Share of completed searches that succeeded, in percent
    pub fn get_reliability(&self) -> f64 {
        let failures: u64 = self
            .failures
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .sum();
        let successes = self.get_successes();

        let total = failures + successes;
        if total == 0 {
            100.0
        } else {
            (successes as f64 / total as f64) * 100.0
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let metrics = Metrics::new();

        metrics.inc_search();
        metrics.inc_search();
        metrics.record_response_time(100);
        metrics.record_response_time(300);
        metrics.record_success();
        metrics.record_failure(ErrorKind::ServerFault);

        assert_eq!(metrics.get_total_searches(), 2);
        assert_eq!(metrics.get_avg_response_time(), Some(200));
        assert_eq!(metrics.get_failures(ErrorKind::ServerFault), 1);
        assert_eq!(metrics.get_failures(ErrorKind::RateLimited), 0);
        assert_eq!(metrics.get_reliability(), 50.0);
    }

    #[test]
    fn test_response_time_window() {
        let metrics = Metrics::new();
        for _ in 0..RESPONSE_TIME_WINDOW {
            metrics.record_response_time(10);
        }
        for _ in 0..RESPONSE_TIME_WINDOW {
            metrics.record_response_time(50);
        }

        assert_eq!(metrics.get_avg_response_time(), Some(50));
    }
}
