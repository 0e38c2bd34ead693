use std::{fmt::Debug, time::Duration};

use log::*;
use redis::{aio::ConnectionManager, AsyncCommands, Client};

use super::{CacheError, KeyValueCache};

/// A [`KeyValueCache`] backed by Redis. The connection manager reconnects transparently, and clones share the same
/// multiplexed connection.
#[derive(Clone)]
pub struct RedisCache {
    url: String,
    conn: ConnectionManager,
}

impl Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RedisCache ({})", self.url)
    }
}

impl RedisCache {
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        info!("🧹️ Connected to redis at {url}");
        Ok(Self { url: url.to_string(), conn })
    }
}

impl KeyValueCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(key, value, ttl.as_secs().max(1)).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn.del(key).await?;
        Ok(removed > 0)
    }

    async fn incr_score(&self, set: &str, member: &str, delta: f64) -> Result<f64, CacheError> {
        let mut conn = self.conn.clone();
        let score: f64 = conn.zincr(set, member, delta).await?;
        Ok(score)
    }

    async fn scores_desc(&self, set: &str) -> Result<Vec<(String, f64)>, CacheError> {
        let mut conn = self.conn.clone();
        let scores: Vec<(String, f64)> = conn.zrevrange_withscores(set, 0, -1).await?;
        Ok(scores)
    }
}
