//! Bounded Recency Cache Module
//!
//! Fixed-capacity map that evicts the least recently used entry on overflow.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::debug;

use crate::cache::{CacheStats, LruTracker};
use crate::error::{EtlError, Result};

// == Bounded Recency Cache ==
/// Capacity-bounded key-value cache with LRU eviction and no expiry.
///
/// Both `get` and `put` count as a touch. After a `put` the cache never
/// holds more than `capacity` distinct keys.
#[derive(Debug)]
pub struct BoundedRecencyCache<K, V> {
    /// Key-value storage
    entries: HashMap<K, V>,
    /// LRU access tracker
    lru: LruTracker<K>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries, fixed for the instance's lifetime
    capacity: usize,
}

impl<K, V> BoundedRecencyCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// `EtlError::Configuration` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(EtlError::Configuration(
                "cache capacity must be positive".to_string(),
            ));
        }

        Ok(Self {
            entries: HashMap::with_capacity(capacity + 1),
            lru: LruTracker::with_capacity(capacity + 1),
            stats: CacheStats::new(),
            capacity,
        })
    }

    // == Get ==
    /// Returns a clone of the cached value and marks the key most recently used.
    ///
    /// A miss has no effect on recency order.
    pub fn get(&mut self, key: &K) -> Option<V> {
        match self.entries.get(key) {
            Some(value) => {
                let value = value.clone();
                self.lru.touch(key);
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Put ==
    /// Inserts or overwrites a value and marks the key most recently used.
    ///
    /// Returns the evicted key, if inserting a new key pushed the cache over
    /// capacity.
    pub fn put(&mut self, key: K, value: V) -> Option<K> {
        self.lru.touch(&key);
        self.entries.insert(key, value);

        let evicted = if self.entries.len() > self.capacity {
            self.lru.evict_oldest().inspect(|oldest| {
                self.entries.remove(oldest);
                self.stats.record_eviction();
                debug!(key = ?oldest, "evicted least recently used entry");
            })
        } else {
            None
        };

        self.stats.set_total_entries(self.entries.len());
        evicted
    }

    /// Checks for a key without touching it.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }
}
