//! Remote Store Module
//!
//! Backing adapter that mirrors cache operations onto a shared Redis
//! instance so several service replicas observe the same cache state.
//! Security-sensitive single-use entries (password-reset tokens, OAuth
//! CSRF state) stay valid and single-use even when the redirect and
//! callback legs of a flow land on different replicas.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use deadpool_redis::{Connection, Pool};
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{CacheOptions, RedisSettings};
use crate::error::{RemoteCacheError, RemoteResult};

// == Constants ==
/// Upper bound on any single Redis round trip. A slow backing store must
/// degrade to a miss, never block a request handler.
pub const REMOTE_OP_TIMEOUT: Duration = Duration::from_millis(500);

// == Remote Store ==
/// Proxy presenting the entry-store contract against shared Redis storage.
///
/// Keys are namespaced as `"{prefix}:{key}"` so several logical caches can
/// share one Redis database without collision. Values travel as JSON.
/// Redis key expiry (`SET .. EX`) replaces the local janitor: nothing here
/// needs sweeping.
#[derive(Clone)]
pub struct RemoteStore {
    /// Shared connection pool, safe for concurrent use
    pool: Pool,
    /// Key namespace for this logical cache
    prefix: String,
    /// Base validity duration per entry
    ttl: Duration,
    /// Whether a successful read reissues the expiry (a Redis `EXPIRE`)
    sliding: bool,
    /// Per-command timeout
    op_timeout: Duration,
}

impl std::fmt::Debug for RemoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteStore")
            .field("prefix", &self.prefix)
            .field("ttl", &self.ttl)
            .field("sliding", &self.sliding)
            .finish_non_exhaustive()
    }
}

impl RemoteStore {
    // == Constructor ==
    /// Creates a remote store over an existing pool.
    pub fn new(options: &CacheOptions, pool: Pool) -> Self {
        Self {
            pool,
            prefix: options.prefix.clone(),
            ttl: options.time_to_live,
            sliding: options.sliding,
            op_timeout: REMOTE_OP_TIMEOUT,
        }
    }

    // == Get ==
    /// Fetches and deserializes the value for `key`.
    ///
    /// Under the sliding policy a hit also reissues the expiry against the
    /// backing store, the remote equivalent of a touch.
    pub async fn get<K, V>(&self, key: &K) -> RemoteResult<Option<V>>
    where
        K: Display,
        V: DeserializeOwned,
    {
        let key = self.namespaced(key);
        let mut conn = self.connection().await?;

        let payload: Option<Vec<u8>> = self.bounded(conn.get(&key)).await?;
        let Some(bytes) = payload else {
            return Ok(None);
        };

        let value = serde_json::from_slice(&bytes)?;
        if self.sliding {
            let _: i64 = self.bounded(conn.expire(&key, self.ttl_secs() as i64)).await?;
        }
        Ok(Some(value))
    }

    // == Set ==
    /// Serializes and stores `value`, expiring a TTL from now.
    pub async fn set<K, V>(&self, key: &K, value: &V) -> RemoteResult<()>
    where
        K: Display,
        V: Serialize,
    {
        let key = self.namespaced(key);
        let payload = serde_json::to_vec(value)?;
        let mut conn = self.connection().await?;

        self.bounded(conn.set_ex::<_, _, ()>(&key, payload, self.ttl_secs()))
            .await?;
        Ok(())
    }

    // == Delete ==
    /// Removes the entry for `key`. Idempotent, as `DEL` is.
    pub async fn delete<K: Display>(&self, key: &K) -> RemoteResult<()> {
        let key = self.namespaced(key);
        let mut conn = self.connection().await?;

        self.bounded(conn.del::<_, ()>(&key)).await?;
        Ok(())
    }

    // == Helpers ==
    /// Builds the namespaced Redis key for this logical cache.
    fn namespaced<K: Display>(&self, key: &K) -> String {
        format!("{}:{}", self.prefix, key)
    }

    /// TTL in whole seconds; Redis rejects a zero expiry, so sub-second
    /// configurations round up to one second.
    fn ttl_secs(&self) -> u64 {
        self.ttl.as_secs().max(1)
    }

    /// Acquires a pooled connection within the operation timeout.
    async fn connection(&self) -> RemoteResult<Connection> {
        match tokio::time::timeout(self.op_timeout, self.pool.get()).await {
            Ok(conn) => Ok(conn?),
            Err(_) => Err(RemoteCacheError::Timeout(self.op_timeout)),
        }
    }

    /// Runs a Redis command future with the operation timeout applied.
    async fn bounded<T>(
        &self,
        command: impl Future<Output = redis::RedisResult<T>>,
    ) -> RemoteResult<T> {
        match tokio::time::timeout(self.op_timeout, command).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(RemoteCacheError::Timeout(self.op_timeout)),
        }
    }
}

// == Connect ==
/// Builds a pool from settings and verifies connectivity.
///
/// Returns None when Redis is unreachable so callers can fall back to
/// local-only instances and the service still starts.
pub async fn connect(settings: &RedisSettings) -> Option<Pool> {
    let pool = match settings.create_pool() {
        Ok(pool) => pool,
        Err(err) => {
            warn!(error = %err, "failed to create redis pool, staying local-only");
            return None;
        }
    };

    match pool.get().await {
        Ok(_) => {
            info!(url = %settings.url, "connected to redis backing store");
            Some(pool)
        }
        Err(err) => {
            warn!(error = %err, "redis unreachable, staying local-only");
            None
        }
    }
}
