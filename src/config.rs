//! Configuration Module
//!
//! Per-instance cache options plus connection settings for the optional
//! Redis backing store.

use std::env;
use std::time::Duration;

use deadpool_redis::{CreatePoolError, Pool, Runtime};

// == Cache Options ==
/// Configuration for one cache instance, supplied once at construction
/// and immutable afterwards.
///
/// Each entity kind gets its own instance with its own options, built with
/// struct-update syntax over [`Default`]:
///
/// ```
/// use std::time::Duration;
/// use auth_cache::CacheOptions;
///
/// let options = CacheOptions {
///     time_to_live: Duration::from_secs(180),
///     sliding: true,
///     prefix: "totp".into(),
///     ..Default::default()
/// };
/// assert!(options.max_entries.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct CacheOptions {
    /// Base validity duration per entry
    pub time_to_live: Duration,
    /// Period between janitor sweeps (local mode only)
    pub clean_interval: Duration,
    /// true = refresh the expiry deadline on every successful read;
    /// false = fixed deadline set at insertion
    pub sliding: bool,
    /// Key namespace used when several logical caches share one backing store
    pub prefix: String,
    /// Optional capacity bound; the least recently used entry is evicted
    /// when a new key would exceed it. None = unbounded.
    pub max_entries: Option<usize>,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            time_to_live: Duration::from_secs(300),
            clean_interval: Duration::from_secs(600),
            sliding: false,
            prefix: "cache".to_string(),
            max_entries: None,
        }
    }
}

// == Redis Settings ==
/// Connection settings for the shared Redis backing store.
///
/// One pool is built per process and shared by every distributed cache
/// instance; the pool is safe for concurrent use.
#[derive(Debug, Clone)]
pub struct RedisSettings {
    /// Connection URL, e.g. `redis://127.0.0.1:6379`
    pub url: String,
    /// Maximum number of pooled connections
    pub pool_size: usize,
    /// Per-operation timeout in milliseconds; a slow backing store degrades
    /// to a cache miss rather than blocking callers
    pub timeout_ms: u64,
}

impl RedisSettings {
    /// Creates settings by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_URL` - Connection URL (default: `redis://127.0.0.1:6379`)
    /// - `REDIS_POOL_SIZE` - Pool size (default: 16)
    /// - `REDIS_TIMEOUT_MS` - Operation timeout in ms (default: 500)
    pub fn from_env() -> Self {
        Self {
            url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            pool_size: env::var("REDIS_POOL_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(16),
            timeout_ms: env::var("REDIS_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
        }
    }

    /// Returns the per-operation timeout as a `Duration`.
    pub fn op_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Builds a deadpool Redis pool from these settings.
    ///
    /// Pool acquisition shares the same timeout as individual commands so
    /// a saturated pool also degrades to a miss.
    pub fn create_pool(&self) -> Result<Pool, CreatePoolError> {
        let mut config = deadpool_redis::Config::from_url(&self.url);
        let mut pool_config = config.pool.take().unwrap_or_default();
        pool_config.max_size = self.pool_size;
        pool_config.timeouts.wait = Some(self.op_timeout());
        pool_config.timeouts.create = Some(self.op_timeout());
        pool_config.timeouts.recycle = Some(self.op_timeout());
        config.pool = Some(pool_config);
        config.create_pool(Some(Runtime::Tokio1))
    }
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            pool_size: 16,
            timeout_ms: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_options_default() {
        let options = CacheOptions::default();
        assert_eq!(options.time_to_live, Duration::from_secs(300));
        assert_eq!(options.clean_interval, Duration::from_secs(600));
        assert!(!options.sliding);
        assert_eq!(options.prefix, "cache");
        assert!(options.max_entries.is_none());
    }

    #[test]
    fn test_cache_options_struct_update() {
        let options = CacheOptions {
            sliding: true,
            prefix: "users".to_string(),
            ..Default::default()
        };
        assert!(options.sliding);
        assert_eq!(options.prefix, "users");
        assert_eq!(options.time_to_live, Duration::from_secs(300));
    }

    #[test]
    fn test_redis_settings_default() {
        let settings = RedisSettings::default();
        assert_eq!(settings.url, "redis://127.0.0.1:6379");
        assert_eq!(settings.pool_size, 16);
        assert_eq!(settings.op_timeout(), Duration::from_millis(500));
    }

    #[test]
    fn test_redis_settings_create_pool() {
        // Pool creation is lazy: no server needs to be running.
        let settings = RedisSettings::default();
        assert!(settings.create_pool().is_ok());
    }
}
