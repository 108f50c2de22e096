//! Error types for the cache layer
//!
//! The public cache surface never returns errors: absence is `None` and a
//! failing backing store degrades to a miss. These types exist for the
//! internal remote path, where failures are logged and then swallowed.

use std::time::Duration;

use thiserror::Error;

// == Remote Cache Error ==
/// Failure talking to the Redis backing store.
///
/// Never propagated to cache callers; the facade converts any of these
/// into a miss (for `get`) or a silent no-op (for `set`/`delete`).
#[derive(Error, Debug)]
pub enum RemoteCacheError {
    /// Could not obtain a pooled connection
    #[error("redis pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    /// A Redis command failed
    #[error("redis command error: {0}")]
    Command(#[from] redis::RedisError),

    /// Payload could not be (de)serialized
    #[error("payload codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The operation exceeded the configured timeout
    #[error("remote operation timed out after {0:?}")]
    Timeout(Duration),
}

// == Result Type Alias ==
/// Convenience Result type for remote operations.
pub(crate) type RemoteResult<T> = std::result::Result<T, RemoteCacheError>;
