//! Metrics collection module
//!
//! Tracks searches, failures and response times per search mode.

use crate::search::SearchMode;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Number of response times kept per mode
const RESPONSE_WINDOW: usize = 100;

/// Process-wide metrics collector
pub struct Metrics {
    /// Total search count
    total_searches: AtomicU64,
    /// Per-mode counters
    modes: RwLock<HashMap<SearchMode, ModeCounters>>,
}

#[derive(Default)]
struct ModeCounters {
    searches: u64,
    errors: u64,
    response_times: VecDeque<u64>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            total_searches: AtomicU64::new(0),
            modes: RwLock::new(HashMap::new()),
        }
    }

    /// Record a finished search and how long it took
    pub fn record_search(&self, mode: SearchMode, time_ms: u64, success: bool) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);

        let mut modes = self.modes.write().unwrap_or_else(PoisonError::into_inner);
        let counters = modes.entry(mode).or_default();
        counters.searches += 1;
        if !success {
            counters.errors += 1;
        }

        if counters.response_times.len() >= RESPONSE_WINDOW {
            counters.response_times.pop_front();
        }
        counters.response_times.push_back(time_ms);
    }

    /// Get total searches
    pub fn get_total_searches(&self) -> u64 {
        self.total_searches.load(Ordering::Relaxed)
    }

    /// Get average response time for a mode
    pub fn get_avg_response_time(&self, mode: SearchMode) -> Option<u64> {
        let modes = self.modes.read().unwrap_or_else(PoisonError::into_inner);
        modes.get(&mode).and_then(|c| average(&c.response_times))
    }

    /// Get reliability percentage for a mode
    pub fn get_reliability(&self, mode: SearchMode) -> f64 {
        let modes = self.modes.read().unwrap_or_else(PoisonError::into_inner);
        modes.get(&mode).map(reliability).unwrap_or(100.0)
    }

    /// Snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        let modes = self.modes.read().unwrap_or_else(PoisonError::into_inner);
        let modes = modes
            .iter()
            .map(|(mode, c)| {
                (
                    mode.as_str().to_string(),
                    ModeStats {
                        searches: c.searches,
                        errors: c.errors,
                        avg_response_time_ms: average(&c.response_times),
                        reliability: reliability(c),
                    },
                )
            })
            .collect();

        MetricsSnapshot {
            total_searches: self.get_total_searches(),
            modes,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

fn average(times: &VecDeque<u64>) -> Option<u64> {
    if times.is_empty() {
        None
    } else {
        Some(times.iter().sum::<u64>() / times.len() as u64)
    }
}

fn reliability(counters: &ModeCounters) -> f64 {
    if counters.searches == 0 {
        100.0
    } else {
        let ok = counters.searches - counters.errors;
        (ok as f64 / counters.searches as f64) * 100.0
    }
}

/// Statistics served by the stats endpoint
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_searches: u64,
    pub modes: BTreeMap<String, ModeStats>,
}

/// Statistics for a single search mode
#[derive(Debug, Clone, Serialize)]
pub struct ModeStats {
    pub searches: u64,
    pub errors: u64,
    pub avg_response_time_ms: Option<u64>,
    pub reliability: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let metrics = Metrics::new();

        metrics.record_search(SearchMode::Standard, 100, true);
        metrics.record_search(SearchMode::Standard, 300, false);
        metrics.record_search(SearchMode::Fuzzy, 40, true);

        assert_eq!(metrics.get_total_searches(), 3);
        assert_eq!(metrics.get_avg_response_time(SearchMode::Standard), Some(200));
        assert_eq!(metrics.get_reliability(SearchMode::Standard), 50.0);
        assert_eq!(metrics.get_reliability(SearchMode::Prefix), 100.0);
        assert_eq!(metrics.get_avg_response_time(SearchMode::Prefix), None);
    }

    #[test]
    fn test_response_window() {
        let metrics = Metrics::new();
        for _ in 0..RESPONSE_WINDOW {
            metrics.record_search(SearchMode::Prefix, 10, true);
        }
        metrics.record_search(SearchMode::Prefix, 10 + RESPONSE_WINDOW as u64, true);

        // one sample of 10 was evicted
        assert_eq!(metrics.get_avg_response_time(SearchMode::Prefix), Some(11));
    }

    #[test]
    fn test_snapshot() {
        let metrics = Metrics::new();
        metrics.record_search(SearchMode::Fuzzy, 5, false);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_searches, 1);
        assert_eq!(snapshot.modes["fuzzy"].errors, 1);
        assert_eq!(snapshot.modes["fuzzy"].reliability, 0.0);
        assert!(!snapshot.modes.contains_key("standard"));
    }
}
