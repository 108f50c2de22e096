//! Auth Cache - a concurrency-safe, time-bounded cache layer
//!
//! Sits between request handlers and the durable store of an auth
//! service, resolving hot identities (users, teams, one-time tokens, TOTP
//! metadata, OAuth CSRF state) without a database round trip. Each entity
//! kind gets its own independently configured [`Cache`] instance: its own
//! TTL, fixed or sliding expiry, janitor sweep interval and key prefix,
//! running either process-local or against a shared Redis backing store.
//!
//! The layer is best-effort by design. Losing an entry, or losing Redis
//! entirely, costs a fallback read against the durable store, never
//! correctness: the public surface returns `Option`, not errors.
//!
//! ```
//! use std::time::Duration;
//! use auth_cache::{Cache, CacheOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Profile data: reread often, refreshed on every hit.
//!     let users: Cache<u32, String> = Cache::new(CacheOptions {
//!         time_to_live: Duration::from_secs(300),
//!         sliding: true,
//!         prefix: "user".into(),
//!         ..Default::default()
//!     });
//!
//!     users.set(7, "alice".to_string()).await;
//!     assert_eq!(users.get(&7).await.as_deref(), Some("alice"));
//!
//!     // Invalidate after a durable-store mutation.
//!     users.delete(&7).await;
//!     assert_eq!(users.get(&7).await, None);
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{connect, Cache, CacheEntry, CacheStats, EntryStore, RemoteStore};
pub use config::{CacheOptions, RedisSettings};
pub use error::RemoteCacheError;
pub use tasks::spawn_janitor;
