//! Core cache types and structures

use hashcache_core::{CacheConfig, KeyDigester, Router};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::lifecycle::Lifecycle;
use crate::shard::ShardHandle;
use crate::stats::CacheStats;

/// Sharded in-memory cache
///
/// Cloning is cheap and every clone refers to the same shards. Tearing down
/// any clone with [`Cache::close`] invalidates all of them, and dropping the
/// last clone tears the cache down as well.
pub struct Cache<V> {
    pub(super) inner: Arc<CacheInner<V>>,
}

pub(super) struct CacheInner<V> {
    /// Configuration, fixed at construction
    pub config: CacheConfig,
    /// Reduces keys to digests
    pub digester: KeyDigester,
    /// Maps digests to shards
    pub router: Router,
    /// One handle per shard actor, indexed by shard
    pub shards: Vec<ShardHandle<V>>,
    /// Invalidation flag and cancellation broadcast
    pub lifecycle: Arc<Lifecycle>,
    /// Statistics
    pub stats: Arc<CacheStats>,
    /// Actor and watcher tasks, taken by `shutdown`
    pub tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl<V> Drop for CacheInner<V> {
    fn drop(&mut self) {
        // Actors exit once the token is cancelled
        self.lifecycle.invalidate();
    }
}

impl<V> Clone for Cache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> fmt::Debug for Cache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("shard_count", &self.inner.shards.len())
            .field("buffer_size", &self.inner.config.buffer_size)
            .field("hash_type", &self.inner.config.hash_type)
            .field("invalidated", &self.inner.lifecycle.is_invalidated())
            .finish()
    }
}
