//! Entry Store Module
//!
//! In-process keyed container with lazy TTL expiry, whole-store sweeping
//! and an optional LRU capacity bound.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cache::{CacheEntry, LruTracker, StatsRecorder};
use crate::config::CacheOptions;

// == Entry Store ==
/// The key to entry mapping backing one local cache instance.
///
/// Every point operation goes through `&mut self`: under the sliding
/// policy even `get` rewrites the expiry deadline, so reads are not
/// read-only here. Callers wrap the store in `Arc<RwLock<_>>` and take
/// the write lock for all three operations plus sweeping, which keeps
/// them linearizable per key.
#[derive(Debug)]
pub struct EntryStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// LRU access tracker for the capacity bound
    lru: LruTracker<K>,
    /// Shared metric counters
    stats: Arc<StatsRecorder>,
    /// Base validity duration per entry
    ttl: Duration,
    /// Whether a successful read refreshes the deadline
    sliding: bool,
    /// Optional capacity bound
    max_entries: Option<usize>,
}

impl<K, V> EntryStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new store from per-instance options.
    pub fn new(options: &CacheOptions, stats: Arc<StatsRecorder>) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats,
            ttl: options.time_to_live,
            sliding: options.sliding,
            max_entries: options.max_entries,
        }
    }

    // == Get ==
    /// Retrieves the value for `key` if present and not expired.
    ///
    /// Expiry is checked lazily on every read, independent of the janitor:
    /// a dead entry is removed on the spot and reported as a miss. Under
    /// the sliding policy a hit also pushes the deadline to `now + ttl`.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get_mut(key) {
            if !entry.is_expired(now) {
                if self.sliding {
                    entry.touch(now, self.ttl);
                }
                let value = entry.value.clone();
                self.lru.touch(key);
                self.stats.record_hit();
                return Some(value);
            }
        } else {
            self.stats.record_miss();
            return None;
        }

        // Present but past its deadline: drop it lazily.
        self.entries.remove(key);
        self.lru.remove(key);
        self.stats.record_expired(1);
        self.stats.record_miss();
        None
    }

    // == Set ==
    /// Unconditionally inserts or replaces the entry for `key`.
    ///
    /// Writes always replace the full entry, and the deadline is recomputed
    /// as `now + ttl` on every set, under both policies: overwriting an
    /// existing key renews its validity window. If the store is bounded and
    /// at capacity, the least recently used entry is evicted first.
    pub fn set(&mut self, key: K, value: V) {
        let is_overwrite = self.entries.contains_key(&key);
        if !is_overwrite {
            if let Some(capacity) = self.max_entries {
                if self.entries.len() >= capacity {
                    if let Some(evicted) = self.lru.evict_oldest() {
                        self.entries.remove(&evicted);
                        self.stats.record_eviction();
                    }
                }
            }
        }

        self.entries.insert(key.clone(), CacheEntry::new(value, self.ttl));
        self.lru.touch(&key);
    }

    // == Delete ==
    /// Removes the entry for `key` if present. Idempotent.
    ///
    /// Returns whether an entry was actually removed.
    pub fn delete(&mut self, key: &K) -> bool {
        if self.entries.remove(key).is_some() {
            self.lru.remove(key);
            true
        } else {
            false
        }
    }

    // == Sweep ==
    /// Removes every entry whose deadline is at or before `now`.
    ///
    /// Called by the janitor with the store lock held exclusively, so a
    /// sweep never races a sliding-read refresh. Returns the number of
    /// entries removed.
    pub fn sweep(&mut self, now: Instant) -> usize {
        let expired_keys: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        let count = expired_keys.len();
        self.stats.record_expired(count as u64);
        count
    }

    // == Length ==
    /// Returns the current number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn test_store(options: CacheOptions) -> EntryStore<String, String> {
        EntryStore::new(&options, Arc::new(StatsRecorder::default()))
    }

    fn short_ttl(ms: u64) -> CacheOptions {
        CacheOptions {
            time_to_live: Duration::from_millis(ms),
            ..Default::default()
        }
    }

    #[test]
    fn test_store_new() {
        let store = test_store(CacheOptions::default());
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = test_store(CacheOptions::default());

        store.set("key1".to_string(), "value1".to_string());

        assert_eq!(store.get(&"key1".to_string()), Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = test_store(CacheOptions::default());

        assert_eq!(store.get(&"nonexistent".to_string()), None);
    }

    #[test]
    fn test_store_delete() {
        let mut store = test_store(CacheOptions::default());

        store.set("key1".to_string(), "value1".to_string());

        assert!(store.delete(&"key1".to_string()));
        assert!(store.is_empty());
        assert_eq!(store.get(&"key1".to_string()), None);
    }

    #[test]
    fn test_store_delete_is_idempotent() {
        let mut store = test_store(CacheOptions::default());

        store.set("key1".to_string(), "value1".to_string());

        assert!(store.delete(&"key1".to_string()));
        assert!(!store.delete(&"key1".to_string()));
        assert!(!store.delete(&"never_set".to_string()));
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = test_store(CacheOptions::default());

        store.set("key1".to_string(), "value1".to_string());
        store.set("key1".to_string(), "value2".to_string());

        assert_eq!(store.get(&"key1".to_string()), Some("value2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_fixed_policy_expiry() {
        let mut store = test_store(short_ttl(60));

        store.set("key1".to_string(), "value1".to_string());
        assert!(store.get(&"key1".to_string()).is_some());

        sleep(Duration::from_millis(90));

        assert_eq!(store.get(&"key1".to_string()), None);
        // Lazy expiry removed the entry on read.
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_store_fixed_policy_reads_do_not_extend() {
        let mut store = test_store(short_ttl(120));

        store.set("key1".to_string(), "value1".to_string());

        // Poll well within the TTL; the deadline must not move.
        for _ in 0..3 {
            sleep(Duration::from_millis(30));
            assert!(store.get(&"key1".to_string()).is_some());
        }

        sleep(Duration::from_millis(60));
        assert_eq!(store.get(&"key1".to_string()), None);
    }

    #[test]
    fn test_store_sliding_policy_reads_extend() {
        let options = CacheOptions {
            time_to_live: Duration::from_millis(100),
            sliding: true,
            ..Default::default()
        };
        let mut store = test_store(options);

        store.set("key1".to_string(), "value1".to_string());

        // Each read lands before the deadline and pushes it forward,
        // carrying the entry well past its original window.
        for _ in 0..4 {
            sleep(Duration::from_millis(60));
            assert!(store.get(&"key1".to_string()).is_some());
        }

        // Once access stops, the entry dies one TTL after the last read.
        sleep(Duration::from_millis(150));
        assert_eq!(store.get(&"key1".to_string()), None);
    }

    #[test]
    fn test_store_set_renews_window() {
        let mut store = test_store(short_ttl(100));

        store.set("key1".to_string(), "value1".to_string());
        sleep(Duration::from_millis(60));

        // Overwrite resets the deadline to a full TTL from now.
        store.set("key1".to_string(), "value2".to_string());
        sleep(Duration::from_millis(60));

        assert_eq!(store.get(&"key1".to_string()), Some("value2".to_string()));
    }

    #[test]
    fn test_store_sweep_removes_expired() {
        let mut store = test_store(short_ttl(50));

        store.set("dead".to_string(), "value".to_string());

        sleep(Duration::from_millis(80));
        store.set("alive".to_string(), "value".to_string());

        let removed = store.sweep(Instant::now());

        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert!(store.get(&"alive".to_string()).is_some());
    }

    #[test]
    fn test_store_sweep_without_reads() {
        let mut store = test_store(short_ttl(40));

        store.set("write_once".to_string(), "value".to_string());
        sleep(Duration::from_millis(70));

        // The entry is never read again; only the sweep reclaims it.
        assert_eq!(store.len(), 1);
        assert_eq!(store.sweep(Instant::now()), 1);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_store_sweep_empty() {
        let mut store = test_store(CacheOptions::default());
        assert_eq!(store.sweep(Instant::now()), 0);
    }

    #[test]
    fn test_store_capacity_evicts_lru() {
        let options = CacheOptions {
            max_entries: Some(3),
            ..Default::default()
        };
        let mut store = test_store(options);

        store.set("key1".to_string(), "value1".to_string());
        store.set("key2".to_string(), "value2".to_string());
        store.set("key3".to_string(), "value3".to_string());

        // At capacity: inserting key4 evicts key1, the oldest.
        store.set("key4".to_string(), "value4".to_string());

        assert_eq!(store.len(), 3);
        assert_eq!(store.get(&"key1".to_string()), None);
        assert!(store.get(&"key2".to_string()).is_some());
        assert!(store.get(&"key4".to_string()).is_some());
    }

    #[test]
    fn test_store_capacity_get_protects_key() {
        let options = CacheOptions {
            max_entries: Some(3),
            ..Default::default()
        };
        let mut store = test_store(options);

        store.set("key1".to_string(), "value1".to_string());
        store.set("key2".to_string(), "value2".to_string());
        store.set("key3".to_string(), "value3".to_string());

        // Reading key1 makes it most recently used, so key2 goes instead.
        store.get(&"key1".to_string());
        store.set("key4".to_string(), "value4".to_string());

        assert!(store.get(&"key1".to_string()).is_some());
        assert_eq!(store.get(&"key2".to_string()), None);
    }

    #[test]
    fn test_store_stats_flow() {
        let stats = Arc::new(StatsRecorder::default());
        let mut store: EntryStore<String, String> =
            EntryStore::new(&CacheOptions::default(), stats.clone());

        store.set("key1".to_string(), "value1".to_string());
        store.get(&"key1".to_string());
        store.get(&"nonexistent".to_string());

        let snapshot = stats.snapshot(store.len());
        assert_eq!(snapshot.hits, 1);
        assert_eq!(snapshot.misses, 1);
        assert_eq!(snapshot.entries, 1);
    }
}
