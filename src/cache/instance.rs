//! Cache Instance Module
//!
//! The public facade combining an entry store, an expiration policy, a
//! janitor and an optional Redis backing adapter behind one
//! `get`/`set`/`delete` surface.

use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;

use deadpool_redis::Pool;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::warn;

use crate::cache::{CacheStats, EntryStore, RemoteStore, StatsRecorder};
use crate::config::CacheOptions;
use crate::tasks::{spawn_janitor, JanitorGuard};

// == Backend ==
/// Where one cache instance keeps its entries.
#[derive(Debug, Clone)]
enum Backend<K, V> {
    /// Process-local: entry store plus its background sweeper. The guard
    /// aborts the janitor when the last clone of the cache is dropped.
    Local {
        store: Arc<RwLock<EntryStore<K, V>>>,
        _janitor: Arc<JanitorGuard>,
    },
    /// Distributed: every operation goes to the shared Redis store, so all
    /// replicas see one consistent view per logical key. Redis key expiry
    /// stands in for the janitor.
    Remote(RemoteStore),
}

// == Cache ==
/// A concurrency-safe, time-bounded cache for one entity kind.
///
/// Generic over a single key and value type per instance; independently
/// configured instances never affect each other. Cloning is cheap and all
/// clones share the same storage; handlers receive clones at startup
/// rather than reaching for process-wide globals.
///
/// The cache is best-effort: no operation returns an error, absent or
/// unreachable data is simply a miss, and callers fall back to the
/// durable store. The cache never self-invalidates on writes it did not
/// perform; handlers delete the relevant keys after durable mutations.
///
/// Note that under the sliding policy `get` is not read-only: a hit
/// rewrites the entry's expiry deadline (locally through the write lock,
/// remotely via `EXPIRE`).
#[derive(Debug, Clone)]
pub struct Cache<K, V> {
    backend: Backend<K, V>,
    stats: Arc<StatsRecorder>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone + Display + Send + Sync + 'static,
    V: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    // == Constructors ==
    /// Creates a process-local instance and spawns its janitor.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(options: CacheOptions) -> Self {
        let stats = Arc::new(StatsRecorder::default());
        let store = Arc::new(RwLock::new(EntryStore::new(&options, stats.clone())));
        let janitor = spawn_janitor(store.clone(), options.clean_interval);

        Self {
            backend: Backend::Local {
                store,
                _janitor: Arc::new(JanitorGuard::new(janitor)),
            },
            stats,
        }
    }

    /// Creates a distributed instance over a shared Redis pool.
    ///
    /// The pool is typically shared by every distributed cache in the
    /// process; `options.prefix` keeps their key spaces apart.
    pub fn distributed(options: CacheOptions, pool: Pool) -> Self {
        Self {
            backend: Backend::Remote(RemoteStore::new(&options, pool)),
            stats: Arc::new(StatsRecorder::default()),
        }
    }

    // == Get ==
    /// Looks up `key`, returning None when absent or expired.
    ///
    /// A backing-store failure is logged and reported as a miss so the
    /// caller falls through to the durable source of truth.
    pub async fn get(&self, key: &K) -> Option<V> {
        match &self.backend {
            Backend::Local { store, .. } => store.write().await.get(key),
            Backend::Remote(remote) => match remote.get(key).await {
                Ok(Some(value)) => {
                    self.stats.record_hit();
                    Some(value)
                }
                Ok(None) => {
                    self.stats.record_miss();
                    None
                }
                Err(err) => {
                    warn!(key = %key, error = %err, "remote cache get failed, treating as miss");
                    self.stats.record_miss();
                    None
                }
            },
        }
    }

    // == Set ==
    /// Inserts or replaces the entry for `key`, valid one TTL from now.
    ///
    /// A backing-store failure is logged and swallowed; the next `get`
    /// will miss and the caller reloads from the durable store.
    pub async fn set(&self, key: K, value: V) {
        match &self.backend {
            Backend::Local { store, .. } => store.write().await.set(key, value),
            Backend::Remote(remote) => {
                if let Err(err) = remote.set(&key, &value).await {
                    warn!(key = %key, error = %err, "remote cache set failed, skipping");
                }
            }
        }
    }

    // == Delete ==
    /// Removes the entry for `key` if present. Idempotent.
    ///
    /// Single-use token flows pair a successful `get` with an immediate
    /// `delete` of the same key before the token counts as consumed.
    pub async fn delete(&self, key: &K) {
        match &self.backend {
            Backend::Local { store, .. } => {
                store.write().await.delete(key);
            }
            Backend::Remote(remote) => {
                if let Err(err) = remote.delete(key).await {
                    warn!(key = %key, error = %err, "remote cache delete failed, skipping");
                }
            }
        }
    }

    // == Length ==
    /// Number of locally held entries, expired or not.
    ///
    /// Distributed instances hold nothing locally and always report 0.
    pub async fn len(&self) -> usize {
        match &self.backend {
            Backend::Local { store, .. } => store.read().await.len(),
            Backend::Remote(_) => 0,
        }
    }

    /// Returns true when no entries are held locally.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    // == Stats ==
    /// Snapshot of this instance's counters.
    pub async fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.len().await)
    }
}
