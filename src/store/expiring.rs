//! Expiring Store Module
//!
//! Key-value storage where every entry carries its own optional deadline.
//! Expired entries are removed lazily on read and actively by the reaper
//! task (see [`crate::tasks::spawn_reaper`]), whichever runs first.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};

use crate::cache::CacheStats;
use crate::store::StoreEntry;

// == Expiring Store ==
/// In-memory key-value store with per-entry TTL.
///
/// The store itself is not synchronised; share it as
/// `Arc<tokio::sync::RwLock<ExpiringStore<V>>>` when the reaper runs.
#[derive(Debug)]
pub struct ExpiringStore<V> {
    /// Key-value storage
    entries: HashMap<String, StoreEntry<V>>,
    /// Performance statistics
    stats: CacheStats,
}

impl<V> Default for ExpiringStore<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
        }
    }
}

impl<V: Clone> ExpiringStore<V> {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Stores a value, replacing any existing entry for `key`.
    ///
    /// `ttl` of None never expires. A negative or zero `ttl` is accepted and
    /// stores an entry that is already expired, so the next `get` misses.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<TimeDelta>) {
        self.entries.insert(key.into(), StoreEntry::new(value, ttl));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// An entry whose deadline has passed is removed as a side effect and
    /// reported as absent.
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.get_at(key, Utc::now())
    }

    fn get_at(&mut self, key: &str, now: DateTime<Utc>) -> Option<V> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if entry.is_expired_at(now) {
            self.entries.remove(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            self.stats.set_total_entries(self.entries.len());
            return None;
        }

        let value = entry.value.clone();
        self.stats.record_hit();
        Some(value)
    }

    // == Delete ==
    /// Removes an entry by key, returning its value if it was still live.
    pub fn delete(&mut self, key: &str) -> Option<V> {
        let removed = self.entries.remove(key)?;
        self.stats.set_total_entries(self.entries.len());
        (!removed.is_expired()).then_some(removed.value)
    }

    /// Remaining lifetime of a live entry.
    ///
    /// Outer None = absent or expired, inner None = never expires.
    pub fn ttl_remaining(&self, key: &str) -> Option<Option<TimeDelta>> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(StoreEntry::ttl_remaining)
    }

    // == Cleanup Expired ==
    /// Removes all entries whose deadline is at or before now.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        self.cleanup_expired_at(Utc::now())
    }

    pub(crate) fn cleanup_expired_at(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - self.entries.len();

        self.stats.record_expirations(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Snapshot ==
    /// Lists live `(key, value, deadline)` triples, sorted by key.
    ///
    /// Entries past their deadline are skipped even if neither `get` nor the
    /// reaper has removed them yet.
    pub fn snapshot(&self) -> Vec<(String, V, Option<DateTime<Utc>>)> {
        let now = Utc::now();
        let mut live: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired_at(now))
            .map(|(key, entry)| (key.clone(), entry.value.clone(), entry.expires_at))
            .collect();
        live.sort_by(|a, b| a.0.cmp(&b.0));
        live
    }

    /// Number of stored entries, including expired ones not yet removed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw presence check that ignores deadlines.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns current store statistics.
    ///
    /// `total_entries` counts live entries only, matching [`Self::snapshot`].
    pub fn stats(&self) -> CacheStats {
        let now = Utc::now();
        let live = self
            .entries
            .values()
            .filter(|entry| !entry.is_expired_at(now))
            .count();

        let mut stats = self.stats.clone();
        stats.set_total_entries(live);
        stats
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_store_new() {
        let store: ExpiringStore<String> = ExpiringStore::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = ExpiringStore::new();

        store.set("key1", "value1".to_string(), None);

        assert_eq!(store.get("key1"), Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store: ExpiringStore<String> = ExpiringStore::new();
        assert_eq!(store.get("nonexistent"), None);
    }

    #[test]
    fn test_store_overwrite_replaces_value_and_ttl() {
        let mut store = ExpiringStore::new();

        store.set("key1", 1, Some(TimeDelta::seconds(-1)));
        store.set("key1", 2, None);

        assert_eq!(store.get("key1"), Some(2));
        assert_eq!(store.ttl_remaining("key1"), Some(None));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_negative_ttl_reads_absent() {
        let mut store = ExpiringStore::new();

        store.set("key1", "value".to_string(), Some(TimeDelta::seconds(-10)));

        assert!(store.contains_key("key1"));
        assert_eq!(store.get("key1"), None);
        assert!(!store.contains_key("key1"));
    }

    #[test]
    fn test_store_ttl_expiration_is_lazy_on_get() {
        let mut store = ExpiringStore::new();

        store.set("key1", "value1".to_string(), Some(TimeDelta::milliseconds(50)));
        assert!(store.get("key1").is_some());

        sleep(Duration::from_millis(80));

        // Still physically present until a read or sweep notices
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("key1"), None);
        assert_eq!(store.len(), 0);
        // Stays absent
        assert_eq!(store.get("key1"), None);
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_store_cleanup_expired() {
        let mut store = ExpiringStore::new();
        let now = Utc::now();

        store.set("short", 1, Some(TimeDelta::seconds(1)));
        store.set("long", 2, Some(TimeDelta::seconds(10)));
        store.set("forever", 3, None);

        let removed = store.cleanup_expired_at(now + TimeDelta::seconds(5));
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 2);
        assert!(!store.contains_key("short"));
        assert_eq!(store.get("long"), Some(2));
        assert_eq!(store.get("forever"), Some(3));
    }

    #[test]
    fn test_store_lazy_and_active_expiry_agree() {
        let mut lazy = ExpiringStore::new();
        let mut active = ExpiringStore::new();
        lazy.set("k", 1, Some(TimeDelta::seconds(-1)));
        active.set("k", 1, Some(TimeDelta::seconds(-1)));

        assert_eq!(lazy.get("k"), None);
        assert_eq!(active.cleanup_expired(), 1);

        assert_eq!(lazy.len(), active.len());
        assert_eq!(lazy.cleanup_expired(), 0);
        assert_eq!(active.get("k"), None);
    }

    #[test]
    fn test_store_get_at_deadline_boundary() {
        let mut store = ExpiringStore::new();
        store.set("k", 1, Some(TimeDelta::seconds(30)));
        let deadline = store.snapshot()[0].2.unwrap();

        assert_eq!(store.get_at("k", deadline - TimeDelta::milliseconds(1)), Some(1));
        assert_eq!(store.get_at("k", deadline), None);
    }

    #[test]
    fn test_store_snapshot_skips_expired() {
        let mut store = ExpiringStore::new();

        store.set("b", 2, None);
        store.set("a", 1, Some(TimeDelta::seconds(60)));
        store.set("dead", 0, Some(TimeDelta::seconds(-5)));

        let snapshot = store.snapshot();
        let keys: Vec<_> = snapshot.iter().map(|(k, _, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert!(snapshot[0].2.is_some());
        assert!(snapshot[1].2.is_none());
    }

    #[test]
    fn test_store_delete() {
        let mut store = ExpiringStore::new();

        store.set("key1", 1, None);
        store.set("gone", 2, Some(TimeDelta::seconds(-1)));

        assert_eq!(store.delete("key1"), Some(1));
        assert_eq!(store.delete("key1"), None);
        // Removed, but an expired value is never handed back
        assert_eq!(store.delete("gone"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_stats_ignore_unreaped_expired_entries() {
        let mut store = ExpiringStore::new();

        store.set("live", 1, Some(TimeDelta::seconds(60)));
        store.set("dead", 2, Some(TimeDelta::seconds(-1)));

        // Still physically stored, but not reported
        assert_eq!(store.len(), 2);
        assert_eq!(store.stats().total_entries, 1);
        assert_eq!(store.stats().total_entries, store.snapshot().len());
    }

    #[test]
    fn test_store_stats() {
        let mut store = ExpiringStore::new();

        store.set("key1", 1, None);
        store.get("key1");
        store.get("nonexistent");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }
}
