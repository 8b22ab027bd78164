//! Cache operations

use hashcache_core::{CacheConfig, CacheError, Digest, Result};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::types::Cache;
use crate::shard::{ShardHandle, ShardRequest, ShardState};
use crate::stats::CacheStatSnapshot;

impl<V> Cache<V>
where
    V: Send + 'static,
{
    /// Insert or overwrite the value stored under `key`
    ///
    /// Waits while the owning shard's queue is full; teardown releases the
    /// wait with [`CacheError::CacheInvalidated`].
    pub async fn put<K>(&self, key: &K, value: V) -> Result<()>
    where
        K: Serialize + ?Sized,
    {
        let (shard, digest) = self.locate(key)?;
        let result = shard
            .dispatch(self.inner.lifecycle.token(), |reply| ShardRequest::Put {
                key: digest.into_hex(),
                value,
                reply,
            })
            .await;
        self.observe(result)
    }

    /// Fetch the value stored under `key`
    ///
    /// Returns [`CacheError::NotFound`] when nothing is stored for the key.
    pub async fn get<K>(&self, key: &K) -> Result<V>
    where
        K: Serialize + ?Sized,
    {
        let (shard, digest) = self.locate(key)?;
        let result = shard
            .dispatch(self.inner.lifecycle.token(), |reply| ShardRequest::Get {
                key: digest.into_hex(),
                reply,
            })
            .await;
        self.observe(result)
    }

    /// Blocking variant of [`Cache::put`] for code outside the runtime
    ///
    /// Like the async form, a wait on a full queue ends as soon as the cache
    /// is torn down.
    ///
    /// # Panics
    ///
    /// Panics when called from within an asynchronous execution context.
    pub fn blocking_put<K>(&self, key: &K, value: V) -> Result<()>
    where
        K: Serialize + ?Sized,
    {
        let (shard, digest) = self.locate(key)?;
        let result = shard.blocking_dispatch(self.inner.lifecycle.token(), |reply| {
            ShardRequest::Put {
                key: digest.into_hex(),
                value,
                reply,
            }
        });
        self.observe(result)
    }

    /// Blocking variant of [`Cache::get`] for code outside the runtime
    ///
    /// # Panics
    ///
    /// Panics when called from within an asynchronous execution context.
    pub fn blocking_get<K>(&self, key: &K) -> Result<V>
    where
        K: Serialize + ?Sized,
    {
        let (shard, digest) = self.locate(key)?;
        let result = shard.blocking_dispatch(self.inner.lifecycle.token(), |reply| {
            ShardRequest::Get {
                key: digest.into_hex(),
                reply,
            }
        });
        self.observe(result)
    }

    /// Total number of entries across all shards
    pub async fn len(&self) -> Result<usize> {
        let mut total = 0;
        for shard in &self.inner.shards {
            self.ensure_valid()?;
            let result = shard
                .dispatch(self.inner.lifecycle.token(), |reply| ShardRequest::Len {
                    reply,
                })
                .await;
            total += self.observe(result)?;
        }
        Ok(total)
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Tear the cache down
    ///
    /// Idempotent: only the first call has any effect. Every later
    /// operation fails with [`CacheError::CacheInvalidated`].
    pub fn close(&self) {
        if self.inner.lifecycle.invalidate() {
            debug!(shards = self.inner.shards.len(), "cache closed");
        }
    }

    /// Alias of [`Cache::close`]
    pub fn delete(&self) {
        self.close();
    }

    /// Close the cache and wait for every shard actor to stop
    pub async fn shutdown(&self) {
        self.close();

        let tasks = std::mem::take(&mut *self.inner.tasks.lock());
        for task in tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "cache task ended abnormally");
            }
        }
    }

    pub fn is_invalidated(&self) -> bool {
        self.inner.lifecycle.is_invalidated()
    }

    /// Token cancelled when the cache is torn down
    pub fn cancellation_token(&self) -> CancellationToken {
        self.inner.lifecycle.token().clone()
    }

    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    pub fn shard_count(&self) -> usize {
        self.inner.shards.len()
    }

    /// Current state of every shard actor, indexed by shard
    pub fn shard_states(&self) -> Vec<ShardState> {
        self.inner.shards.iter().map(ShardHandle::state).collect()
    }

    pub fn stats(&self) -> CacheStatSnapshot {
        self.inner.stats.snapshot()
    }

    fn ensure_valid(&self) -> Result<()> {
        if self.inner.lifecycle.is_invalidated() {
            self.inner.stats.record_rejected();
            return Err(CacheError::CacheInvalidated);
        }
        Ok(())
    }

    /// Check validity, digest the key and pick its shard
    fn locate<K>(&self, key: &K) -> Result<(&ShardHandle<V>, Digest)>
    where
        K: Serialize + ?Sized,
    {
        self.ensure_valid()?;
        let digest = self.inner.digester.digest(key)?;
        let index = self.inner.router.route(&digest)?;
        let shard = &self.inner.shards[index];
        trace!(shard = shard.index(), digest = %digest, "routed key");
        Ok((shard, digest))
    }

    fn observe<T>(&self, result: Result<T>) -> Result<T> {
        if matches!(result, Err(CacheError::CacheInvalidated)) {
            self.inner.stats.record_rejected();
        }
        result
    }
}
