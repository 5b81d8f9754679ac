//! Result count cache.
//!
//! Maps a statement's structural hash to its total row count. The count
//! decides whether a query is sorted; it is a heuristic, so a count that went
//! stale after data changed is tolerated rather than refreshed.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

/// Bounded, thread-safe hash → row count map.
///
/// Concurrent misses on the same hash may both compute the count; the last
/// writer wins and both values are equal since they count the same statement.
pub struct ResultCountCache {
    inner: Mutex<LruCache<u64, u64>>,
}

impl ResultCountCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, hash: u64) -> Option<u64> {
        self.inner.lock().get(&hash).copied()
    }

    pub fn put(&self, hash: u64, count: u64) {
        self.inner.lock().put(hash, count);
    }

    /// Drop every cached count.
    pub fn invalidate(&self) {
        self.inner.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sorting is affordable only strictly below the threshold.
pub fn should_sort(count: u64, threshold: u64) -> bool {
    count < threshold
}
