use std::time::Duration;

use ambassador_engine::cache::{CacheError, KeyValueCache, MemoryCache, RedisCache};
use log::*;

/// The cache the server runs against: Redis when `AMB_REDIS_URL` is configured, otherwise an in-process cache.
#[derive(Debug, Clone)]
pub enum CacheBackend {
    Redis(RedisCache),
    Memory(MemoryCache),
}

impl CacheBackend {
    pub async fn connect(redis_url: Option<&str>) -> Result<Self, CacheError> {
        match redis_url {
            Some(url) => Ok(Self::Redis(RedisCache::connect(url).await?)),
            None => {
                info!("🧹️ Using the in-memory cache");
                Ok(Self::Memory(MemoryCache::new()))
            },
        }
    }
}

impl KeyValueCache for CacheBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        match self {
            Self::Redis(c) => c.get(key).await,
            Self::Memory(c) => c.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        match self {
            Self::Redis(c) => c.set(key, value, ttl).await,
            Self::Memory(c) => c.set(key, value, ttl).await,
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        match self {
            Self::Redis(c) => c.delete(key).await,
            Self::Memory(c) => c.delete(key).await,
        }
    }

    async fn incr_score(&self, set: &str, member: &str, delta: f64) -> Result<f64, CacheError> {
        match self {
            Self::Redis(c) => c.incr_score(set, member, delta).await,
            Self::Memory(c) => c.incr_score(set, member, delta).await,
        }
    }

    async fn scores_desc(&self, set: &str) -> Result<Vec<(String, f64)>, CacheError> {
        match self {
            Self::Redis(c) => c.scores_desc(set).await,
            Self::Memory(c) => c.scores_desc(set).await,
        }
    }
}
