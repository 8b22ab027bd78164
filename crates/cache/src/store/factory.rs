//! Factory for creating shard stores

use hashcache_core::CacheConfig;

use super::bounded::LruStore;
use super::traits::ShardStore;
use super::unbounded::UnboundedStore;

/// Store matching the configuration: LRU when bounded, a plain map otherwise
pub fn create_store<V>(config: &CacheConfig) -> Box<dyn ShardStore<V>>
where
    V: Clone + Send + 'static,
{
    match config.max_entries {
        Some(capacity) => Box::new(LruStore::new(capacity)),
        None => Box::new(UnboundedStore::new()),
    }
}
