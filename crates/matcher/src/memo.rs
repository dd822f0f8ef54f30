//! Bounded memo of recent query results, tagged with the catalog generation.
//!
//! Entries from an older generation are never served. The memo tracks the
//! newest generation it has seen: the first lookup or insert for a newer
//! generation drops everything cached so far, and inserts computed against
//! an older snapshot (a query that raced a reload) are discarded.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

use lru::LruCache;

use crate::types::{PreparedQuery, ProductMatch};

/// Normalized query text plus the generation it was answered against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoKey {
    pub generation: u64,
    pub disease: String,
    pub plant: Option<String>,
}

impl MemoKey {
    pub fn new(query: &PreparedQuery, generation: u64) -> Self {
        Self {
            generation,
            disease: query.disease.as_str().to_owned(),
            plant: query.plant.as_ref().map(|p| p.as_str().to_owned()),
        }
    }
}

struct MemoState {
    entries: LruCache<MemoKey, Arc<Vec<ProductMatch>>>,
    generation: u64,
}

impl MemoState {
    /// Returns false when `generation` is older than the newest one seen.
    fn observe(&mut self, generation: u64) -> bool {
        if generation < self.generation {
            return false;
        }
        if generation > self.generation {
            let purged = self.entries.len();
            self.entries.clear();
            self.generation = generation;
            if purged > 0 {
                tracing::debug!(generation, purged, "query memo purged stale generation");
            }
        }
        true
    }
}

pub struct QueryMemo {
    state: Mutex<MemoState>,
    capacity: NonZeroUsize,
}

impl QueryMemo {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            state: Mutex::new(MemoState {
                entries: LruCache::new(capacity),
                generation: 0,
            }),
            capacity,
        }
    }

    /// `None` when `capacity` is zero, meaning memoization is off.
    pub fn with_capacity(capacity: usize) -> Option<Self> {
        NonZeroUsize::new(capacity).map(Self::new)
    }

    fn lock(&self) -> MutexGuard<'_, MemoState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: &MemoKey) -> Option<Arc<Vec<ProductMatch>>> {
        let mut state = self.lock();
        if !state.observe(key.generation) {
            return None;
        }
        state.entries.get(key).cloned()
    }

    pub fn insert(&self, key: MemoKey, matches: Arc<Vec<ProductMatch>>) {
        let mut state = self.lock();
        if state.observe(key.generation) {
            state.entries.put(key, matches);
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn clear(&self) {
        self.lock().entries.clear();
    }
}

impl fmt::Debug for QueryMemo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryMemo")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductQuery;

    fn key(disease: &str, generation: u64) -> MemoKey {
        MemoKey::new(&PreparedQuery::new(&ProductQuery::new(disease)), generation)
    }

    fn memo(capacity: usize) -> QueryMemo {
        QueryMemo::with_capacity(capacity).expect("non-zero capacity")
    }

    #[test]
    fn zero_capacity_disables_memo() {
        assert!(QueryMemo::with_capacity(0).is_none());
    }

    #[test]
    fn key_uses_normalized_text() {
        assert_eq!(key("Diplocarpon  ROSAE", 1), key("diplocarpon rosae", 1));
        assert_ne!(key("diplocarpon rosae", 1), key("diplocarpon rosae", 2));
    }

    #[test]
    fn serves_entries_for_current_generation() {
        let memo = memo(4);
        memo.insert(key("puccinia", 1), Arc::new(Vec::new()));
        assert!(memo.get(&key("puccinia", 1)).is_some());
        assert!(memo.get(&key("erysiphe", 1)).is_none());
    }

    #[test]
    fn newer_generation_purges_older_entries() {
        let memo = memo(4);
        memo.insert(key("puccinia", 1), Arc::new(Vec::new()));
        memo.insert(key("erysiphe", 1), Arc::new(Vec::new()));
        assert_eq!(memo.len(), 2);

        assert!(memo.get(&key("puccinia", 2)).is_none());
        assert!(memo.is_empty());
        assert!(memo.get(&key("puccinia", 1)).is_none());
    }

    #[test]
    fn late_insert_from_older_generation_is_dropped() {
        let memo = memo(4);
        memo.insert(key("puccinia", 3), Arc::new(Vec::new()));
        memo.insert(key("erysiphe", 2), Arc::new(Vec::new()));
        assert_eq!(memo.len(), 1);
        assert!(memo.get(&key("erysiphe", 2)).is_none());
    }

    #[test]
    fn evicts_least_recently_used() {
        let memo = memo(2);
        memo.insert(key("a", 1), Arc::new(Vec::new()));
        memo.insert(key("b", 1), Arc::new(Vec::new()));
        assert!(memo.get(&key("a", 1)).is_some());
        memo.insert(key("c", 1), Arc::new(Vec::new()));

        assert!(memo.get(&key("b", 1)).is_none());
        assert!(memo.get(&key("a", 1)).is_some());
        assert_eq!(memo.capacity(), 2);
    }
}
