//! Key-value cache access.
//!
//! Derived read models (the ambassador revenue snapshot, the product listings) and the ambassador leaderboard live in
//! a key-value cache. Production deployments use [`RedisCache`]; [`MemoryCache`] is an in-process stand-in with the
//! same semantics for tests and local development.
//!
//! Writes never delete cache entries inline. Instead, they hand the affected keys to the
//! [`CacheInvalidator`], which forwards them to a single background worker (see [`invalidation`]).
use std::{future::Future, time::Duration};

use thiserror::Error;

mod memory;
mod redis_cache;

pub mod invalidation;

pub use invalidation::{CacheInvalidationWorker, CacheInvalidator};
pub use memory::MemoryCache;
pub use redis_cache::RedisCache;

/// Cached ambassador list with revenue totals.
pub const AMBASSADORS_WITH_REVENUE_KEY: &str = "ambassadors_with_revenue";
/// Cached product listing served to the storefront.
pub const PRODUCTS_FRONTEND_KEY: &str = "products_frontend";
/// Cached, searchable product listing served to ambassadors.
pub const PRODUCTS_BACKEND_KEY: &str = "products_backend";
/// Sorted set of ambassador display names, scored by cumulative referral revenue.
pub const RANKINGS_KEY: &str = "rankings";
/// Lifetime of point-cache snapshots.
pub const SNAPSHOT_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    BackendError(String),
    #[error("Could not (de)serialize cache entry: {0}")]
    SerializationError(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(e: redis::RedisError) -> Self {
        CacheError::BackendError(e.to_string())
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(e: serde_json::Error) -> Self {
        CacheError::SerializationError(e.to_string())
    }
}

/// The operations the engine needs from a key-value cache.
///
/// The futures are `Send` so that a cache handle can be moved into spawned tasks, such as the invalidation worker.
pub trait KeyValueCache: Clone + Send + Sync + 'static {
    /// Fetches the raw value stored under `key`, or `None` if it is absent or has expired.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>, CacheError>> + Send;

    /// Stores `value` under `key`, replacing any previous value. The entry expires after `ttl`.
    fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> impl Future<Output = Result<(), CacheError>> + Send;

    /// Deletes `key`. Returns `true` if an entry was removed.
    fn delete(&self, key: &str) -> impl Future<Output = Result<bool, CacheError>> + Send;

    /// Adds `delta` to the score of `member` in the sorted set `set`, creating either as needed. Returns the new score.
    fn incr_score(&self, set: &str, member: &str, delta: f64) -> impl Future<Output = Result<f64, CacheError>> + Send;

    /// Returns every member of the sorted set `set` with its score, highest score first.
    fn scores_desc(&self, set: &str) -> impl Future<Output = Result<Vec<(String, f64)>, CacheError>> + Send;
}
