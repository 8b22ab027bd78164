//! Shard actors
//!
//! Every shard is served by one tokio task that owns the shard's store and
//! processes requests from a bounded queue strictly in arrival order. The
//! task moves from `Running` to `Draining` when the cache's cancellation
//! token fires, answers everything still queued with
//! `CacheError::CacheInvalidated`, drops its store and ends in `Stopped`.

mod actor;
mod handle;
mod request;
mod state;

pub(crate) use handle::ShardHandle;
pub(crate) use request::ShardRequest;
pub use state::ShardState;
