use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use tokio::time::Instant;

use super::{CacheError, KeyValueCache};

#[derive(Debug, Default)]
struct MemoryStore {
    entries: HashMap<String, (Vec<u8>, Instant)>,
    sorted_sets: HashMap<String, HashMap<String, f64>>,
}

/// An in-process [`KeyValueCache`].
///
/// Expiry is measured with the tokio clock, so tests that pause time can step over a TTL.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    store: Arc<Mutex<MemoryStore>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryStore>, CacheError> {
        self.store.lock().map_err(|e| CacheError::BackendError(format!("Memory cache lock is poisoned: {e}")))
    }
}

impl KeyValueCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut store = self.lock()?;
        let now = Instant::now();
        let expired = matches!(store.entries.get(key), Some((_, expires_at)) if *expires_at <= now);
        if expired {
            store.entries.remove(key);
            return Ok(None);
        }
        Ok(store.entries.get(key).map(|(value, _)| value.clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let expires_at = Instant::now() + ttl;
        self.lock()?.entries.insert(key.to_string(), (value, expires_at));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let mut store = self.lock()?;
        let removed_entry = store.entries.remove(key).is_some();
        let removed_set = store.sorted_sets.remove(key).is_some();
        Ok(removed_entry || removed_set)
    }

    async fn incr_score(&self, set: &str, member: &str, delta: f64) -> Result<f64, CacheError> {
        let mut store = self.lock()?;
        let score = store.sorted_sets.entry(set.to_string()).or_default().entry(member.to_string()).or_insert(0.0);
        *score += delta;
        Ok(*score)
    }

    async fn scores_desc(&self, set: &str) -> Result<Vec<(String, f64)>, CacheError> {
        let store = self.lock()?;
        let mut scores = store
            .sorted_sets
            .get(set)
            .map(|members| members.iter().map(|(m, s)| (m.clone(), *s)).collect::<Vec<_>>())
            .unwrap_or_default();
        // Redis breaks score ties by reverse lexicographic member order
        scores.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| b.0.cmp(&a.0)));
        Ok(scores)
    }
}
