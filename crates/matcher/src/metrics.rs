// Metrics hooks for the matcher.
//
// A process installs one `MatchMetrics` implementation via
// [`set_match_metrics`]; every `Matcher::search` then reports its outcome,
// latency and hit count, and whether the answer came from the query memo.
// No metrics backend is linked here.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    Matched,
    NoMatch,
    EmptyCatalog,
    InvalidQuery,
}

/// Metrics observer for match operations.
pub trait MatchMetrics: Send + Sync {
    /// Record the outcome of one search.
    ///
    /// `latency` covers normalization, memo lookup and ranking; `hit_count`
    /// is the number of matches returned after truncation (0 on error).
    fn record_match(&self, outcome: MatchOutcome, latency: Duration, hit_count: usize);

    /// Record whether a search was answered from the query memo.
    fn record_memo(&self, _hit: bool) {}
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn MatchMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn MatchMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn MatchMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global match metrics recorder.
///
/// Usually called once at startup so every `Matcher` in the process shares
/// the same backend.
pub fn set_match_metrics(recorder: Option<Arc<dyn MatchMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}
