//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cache entry holding a value and its expiry metadata.
///
/// Timestamps use `Instant` so that expiry decisions are monotonic and
/// immune to wall-clock adjustments.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation (or last overwrite) time
    pub inserted_at: Instant,
    /// Time after which the entry is logically absent
    pub expires_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl` from now.
    pub fn new(value: V, ttl: Duration) -> Self {
        let now = Instant::now();
        Self {
            value,
            inserted_at: now,
            expires_at: now + ttl,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired as of `now`.
    ///
    /// Boundary condition: an entry is expired once `now` is greater than
    /// or equal to `expires_at`, so an entry whose TTL has fully elapsed is
    /// never served again.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    // == Touch ==
    /// Pushes the expiry deadline forward to `now + ttl`.
    ///
    /// Only called by stores configured with the sliding policy; under the
    /// fixed policy the deadline set at insertion never moves.
    pub fn touch(&mut self, now: Instant, ttl: Duration) {
        self.expires_at = now + ttl;
    }

    // == Remaining TTL ==
    /// Returns the time left before expiry, or zero if already expired.
    ///
    /// Useful for debugging and stats surfaces.
    pub fn remaining_ttl(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}
