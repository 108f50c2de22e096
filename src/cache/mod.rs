//! Cache Module
//!
//! Generic TTL caching with lazy and background expiry, fixed or sliding
//! deadlines, and an optional Redis-backed distributed mode.

mod entry;
mod instance;
mod lru;
mod remote;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use instance::Cache;
pub use lru::LruTracker;
pub use remote::{connect, RemoteStore, REMOTE_OP_TIMEOUT};
pub use stats::{CacheStats, StatsRecorder};
pub use store::EntryStore;
