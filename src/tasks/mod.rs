//! Background Tasks Module
//!
//! Background work that runs for the lifetime of a cache instance.
//!
//! # Tasks
//! - Janitor: sweeps expired entries out of a local store at a fixed
//!   interval, aborted automatically when its cache is dropped

mod janitor;

pub use janitor::{spawn_janitor, JanitorGuard};
