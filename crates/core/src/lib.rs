//! Core types and errors for hashcache
//!
//! This crate holds the pieces of the cache that involve no concurrency:
//! the error taxonomy, the immutable cache configuration, the key digester
//! that reduces arbitrary keys to fixed-size digests, and the router that
//! maps a digest onto a shard.

pub mod config;
pub mod digest;
pub mod errors;
pub mod router;
mod shape;

pub use config::{
    CacheConfig, CacheConfigBuilder, DEFAULT_BUFFER_SIZE, DEFAULT_SHARD_COUNT, MAX_SHARD_COUNT,
};
pub use digest::{Digest, HashType, KeyDigester};
pub use errors::{CacheError, Result};
pub use router::Router;
