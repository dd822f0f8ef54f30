//! In-process counters behind `GET /metrics`.
//!
//! [`ServerMetrics`] implements [`matcher::MatchMetrics`] and is installed as
//! the global recorder when the server starts.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use matcher::{MatchMetrics, MatchOutcome};
use serde::Serialize;

#[derive(Debug, Default)]
pub struct ServerMetrics {
    matched: AtomicU64,
    no_match: AtomicU64,
    empty_catalog: AtomicU64,
    invalid_query: AtomicU64,
    hits_returned: AtomicU64,
    latency_micros: AtomicU64,
    memo_hits: AtomicU64,
    memo_misses: AtomicU64,
}

/// Point-in-time copy of [`ServerMetrics`].
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub searches: u64,
    pub matched: u64,
    pub no_match: u64,
    pub empty_catalog: u64,
    pub invalid_query: u64,
    pub hits_returned: u64,
    pub avg_latency_micros: u64,
    pub memo_hits: u64,
    pub memo_misses: u64,
}

impl ServerMetrics {
    pub fn snapshot(&self) -> MetricsSnapshot {
        let matched = self.matched.load(Ordering::Relaxed);
        let no_match = self.no_match.load(Ordering::Relaxed);
        let empty_catalog = self.empty_catalog.load(Ordering::Relaxed);
        let invalid_query = self.invalid_query.load(Ordering::Relaxed);
        let searches = matched + no_match + empty_catalog + invalid_query;
        let latency = self.latency_micros.load(Ordering::Relaxed);

        MetricsSnapshot {
            searches,
            matched,
            no_match,
            empty_catalog,
            invalid_query,
            hits_returned: self.hits_returned.load(Ordering::Relaxed),
            avg_latency_micros: latency.checked_div(searches).unwrap_or(0),
            memo_hits: self.memo_hits.load(Ordering::Relaxed),
            memo_misses: self.memo_misses.load(Ordering::Relaxed),
        }
    }
}

impl MatchMetrics for ServerMetrics {
    fn record_match(&self, outcome: MatchOutcome, latency: Duration, hit_count: usize) {
        let counter = match outcome {
            MatchOutcome::Matched => &self.matched,
            MatchOutcome::NoMatch => &self.no_match,
            MatchOutcome::EmptyCatalog => &self.empty_catalog,
            MatchOutcome::InvalidQuery => &self.invalid_query,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.hits_returned
            .fetch_add(hit_count as u64, Ordering::Relaxed);
        let micros = u64::try_from(latency.as_micros()).unwrap_or(u64::MAX);
        self.latency_micros.fetch_add(micros, Ordering::Relaxed);
    }

    fn record_memo(&self, hit: bool) {
        let counter = if hit { &self.memo_hits } else { &self.memo_misses };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}
