//! The cache facade
//!
//! [`Cache`] checks the invalidation flag, digests the key, routes the
//! digest to a shard and exchanges a request with that shard's actor.

mod builder;
mod operations;
mod types;

pub use types::Cache;
