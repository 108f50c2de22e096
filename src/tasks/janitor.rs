//! Janitor Task
//!
//! Background sweeper that periodically purges expired entries from a
//! local entry store, independent of read traffic. Lazy expiry already
//! hides staleness from callers; the janitor exists to bound memory for
//! keys that are written once and never read again.

use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::EntryStore;

// == Spawn Janitor ==
/// Spawns a background task sweeping `store` every `clean_interval`.
///
/// Each sweep takes the store's write lock, so it serializes against point
/// operations and can never race a sliding-read refresh. Sweep cost is
/// O(store size); the interval is normally configured much coarser than
/// the TTL.
///
/// # Example
/// ```ignore
/// let handle = spawn_janitor(store.clone(), Duration::from_secs(600));
/// // During shutdown:
/// handle.abort();
/// ```
pub fn spawn_janitor<K, V>(
    store: Arc<RwLock<EntryStore<K, V>>>,
    clean_interval: Duration,
) -> JoinHandle<()>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(interval_secs = clean_interval.as_secs_f64(), "janitor started");

        loop {
            tokio::time::sleep(clean_interval).await;

            let removed = {
                let mut store = store.write().await;
                store.sweep(Instant::now())
            };

            if removed > 0 {
                info!(removed, "janitor removed expired entries");
            } else {
                debug!("janitor found no expired entries");
            }
        }
    })
}

// == Janitor Guard ==
/// Owns a janitor's join handle and aborts the task on drop.
///
/// A cache instance keeps this behind an `Arc`, so the sweeper stops as
/// soon as the last clone of the instance goes away. Tests can construct
/// and drop caches freely without leaking background execution.
#[derive(Debug)]
pub struct JanitorGuard {
    handle: JoinHandle<()>,
}

impl JanitorGuard {
    /// Wraps a spawned janitor handle.
    pub fn new(handle: JoinHandle<()>) -> Self {
        Self { handle }
    }
}

impl Drop for JanitorGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
