//! Background cache invalidation.
//!
//! Every write path that makes a cached read model stale calls [`CacheInvalidator::clear_cache`] with the affected
//! keys. The call only enqueues; it never blocks the request and never reports whether the deletion succeeded.
//!
//! A single worker task owns the receiving end of the queue and deletes the keys one at a time, in the order they
//! were enqueued, waiting at least the pacing interval between consecutive deletions so that a burst of writes cannot
//! hammer the cache backend. The first key after a quiet period is deleted immediately.
//!
//! When every [`CacheInvalidator`] has been dropped, the worker drains whatever is still queued and exits.
use std::time::Duration;

use log::*;
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{sleep_until, Instant},
};

use super::KeyValueCache;

/// The default interval between consecutive cache deletions.
pub const DEFAULT_PACING: Duration = Duration::from_secs(5);

/// Producer handle for the invalidation queue. Cheap to clone; hand one to every API that mutates cached data.
#[derive(Debug, Clone)]
pub struct CacheInvalidator {
    sender: mpsc::UnboundedSender<String>,
}

impl CacheInvalidator {
    /// Enqueues the keys for deletion and returns immediately.
    pub fn clear_cache<I, S>(&self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            let key = key.into();
            trace!("🧹️ Queueing cache key '{key}' for invalidation");
            if let Err(e) = self.sender.send(key) {
                warn!("🧹️ The cache invalidation worker has stopped. Key '{}' will not be cleared.", e.0);
            }
        }
    }
}

pub struct CacheInvalidationWorker<C> {
    cache: C,
    pacing: Duration,
    receiver: mpsc::UnboundedReceiver<String>,
}

impl<C: KeyValueCache> CacheInvalidationWorker<C> {
    /// Spawns the worker. Call this once, at process start-up, and share the returned [`CacheInvalidator`].
    pub fn start(cache: C, pacing: Duration) -> (CacheInvalidator, JoinHandle<()>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = Self { cache, pacing, receiver };
        let handle = tokio::spawn(worker.run());
        info!("🧹️ Cache invalidation worker started with a pacing of {}ms", pacing.as_millis());
        (CacheInvalidator { sender }, handle)
    }

    async fn run(mut self) {
        let mut last_deletion: Option<Instant> = None;
        while let Some(key) = self.receiver.recv().await {
            if let Some(last) = last_deletion {
                sleep_until(last + self.pacing).await;
            }
            match self.cache.delete(&key).await {
                Ok(true) => info!("🧹️ Cache cleared for key '{key}'"),
                Ok(false) => debug!("🧹️ Cache key '{key}' was already absent"),
                Err(e) => warn!("🧹️ Could not clear cache key '{key}': {e}"),
            }
            last_deletion = Some(Instant::now());
        }
        info!("🧹️ All cache invalidators have been dropped. Cache invalidation worker is shutting down.");
    }
}
