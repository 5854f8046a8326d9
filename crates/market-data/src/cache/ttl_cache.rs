//! Lock-free keyed cache with a fixed time-to-live.
//!
//! Expired entries are not evicted on read. They stay available through
//! [`TtlCache::get_stale`] until overwritten or invalidated.

use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

#[derive(Clone, Debug)]
struct Entry<V> {
    value: V,
    stored_at: Instant,
}

/// Keyed cache whose entries are fresh for `ttl` after insertion.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: DashMap<String, Entry<V>>,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Value stored less than `ttl` ago.
    pub fn get_fresh(&self, key: &str) -> Option<V> {
        self.entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    /// Last stored value regardless of age.
    pub fn get_stale(&self, key: &str) -> Option<V> {
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Store `value`, replacing any previous entry whole.
    pub fn insert(&self, key: impl Into<String>, value: V) {
        self.entries.insert(
            key.into(),
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
