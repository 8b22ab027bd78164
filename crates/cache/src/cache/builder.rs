//! Cache construction

use hashcache_core::{CacheConfig, CacheError, KeyDigester, Result, Router};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::types::{Cache, CacheInner};
use crate::lifecycle::Lifecycle;
use crate::shard::ShardHandle;
use crate::stats::CacheStats;
use crate::store::{create_store, ShardStore};

impl<V> Cache<V>
where
    V: Clone + Send + 'static,
{
    /// Create a cache whose shards use the store selected by `config`
    ///
    /// Must be called from within a tokio runtime; the shard actors are
    /// spawned onto it.
    pub fn new(config: CacheConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Create a cache that is torn down when `token` is cancelled
    pub fn with_cancellation(config: CacheConfig, token: CancellationToken) -> Result<Self> {
        Self::build(config, Some(token))
    }

    fn build(config: CacheConfig, parent: Option<CancellationToken>) -> Result<Self> {
        let store_config = config.clone();
        Self::with_store_factory(config, parent, move |_| create_store(&store_config))
    }
}

impl<V> Cache<V>
where
    V: Send + 'static,
{
    /// Create a cache with a custom store per shard
    ///
    /// `factory` is called once for each shard index. `max_entries` in
    /// `config` is ignored here; bounding is up to the supplied stores.
    pub fn with_store_factory<F>(
        config: CacheConfig,
        parent: Option<CancellationToken>,
        mut factory: F,
    ) -> Result<Self>
    where
        F: FnMut(usize) -> Box<dyn ShardStore<V>>,
    {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|e| {
            CacheError::configuration(format!("cache must be created inside a tokio runtime: {e}"))
        })?;

        let router = Router::new(config.shard_count)?;
        let lifecycle = Arc::new(Lifecycle::new(parent.as_ref()));
        let stats = Arc::new(CacheStats::default());

        let mut shards = Vec::with_capacity(config.shard_count);
        let mut tasks = Vec::with_capacity(config.shard_count + 1);
        for index in 0..config.shard_count {
            let (shard, task) = ShardHandle::spawn(
                &runtime,
                index,
                factory(index),
                config.buffer_size,
                lifecycle.token().clone(),
                Arc::clone(&stats),
            );
            shards.push(shard);
            tasks.push(task);
        }
        tasks.push(lifecycle.watch(&runtime));

        info!(
            shards = config.shard_count,
            buffer_size = config.buffer_size,
            hash_type = %config.hash_type,
            max_entries = ?config.max_entries,
            "cache created"
        );

        Ok(Self {
            inner: Arc::new(CacheInner {
                digester: KeyDigester::new(config.hash_type),
                config,
                router,
                shards,
                lifecycle,
                stats,
                tasks: Mutex::new(tasks),
            }),
        })
    }
}
