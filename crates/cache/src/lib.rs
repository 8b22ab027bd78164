//! Sharded in-memory cache
//!
//! This crate provides a concurrency-safe key/value cache with features like:
//! - Keys of any `Serialize` type, reduced to SHA-2 digests
//! - A fixed number of shards, each owned by a single sequential actor
//! - FIFO processing per shard with bounded request queues
//! - Optional LRU bounding of each shard
//! - Idempotent teardown, triggered explicitly or by an external
//!   cancellation token
//!
//! ```no_run
//! use hashcache::{Cache, CacheConfig};
//!
//! # async fn example() -> hashcache::Result<()> {
//! let cache: Cache<String> = Cache::new(CacheConfig::default())?;
//!
//! cache.put("MyKey", "MyValue".to_string()).await?;
//! assert_eq!(cache.get("MyKey").await?, "MyValue");
//!
//! cache.close();
//! assert!(cache.get("MyKey").await.unwrap_err().is_invalidated());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod lifecycle;
pub mod shard;
pub mod stats;
pub mod store;

pub use crate::cache::Cache;
pub use hashcache_core::{
    CacheConfig, CacheConfigBuilder, CacheError, Digest, HashType, KeyDigester, Result, Router,
};
pub use lifecycle::Lifecycle;
pub use shard::ShardState;
pub use stats::CacheStatSnapshot;
pub use store::{create_store, LruStore, ShardStore, StoreError, StoreResult, UnboundedStore};
pub use tokio_util::sync::CancellationToken;
