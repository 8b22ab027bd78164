//! Cache configuration with defaults and validation

use crate::digest::HashType;
use crate::errors::{CacheError, Result};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Default capacity of each shard's request queue
pub const DEFAULT_BUFFER_SIZE: usize = 100;

/// Default number of shards
pub const DEFAULT_SHARD_COUNT: usize = 16;

/// Routing decodes a single digest byte, so more shards than this are unreachable
pub const MAX_SHARD_COUNT: usize = 256;

/// Immutable configuration for one cache instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Capacity of each shard's request queue
    pub buffer_size: usize,
    /// Digest algorithm applied to encoded keys
    pub hash_type: HashType,
    /// Maximum entries held per shard; `None` means unbounded
    pub max_entries: Option<NonZeroUsize>,
    /// Number of shards, fixed for the cache's lifetime
    pub shard_count: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            hash_type: HashType::default(),
            max_entries: None,
            shard_count: DEFAULT_SHARD_COUNT,
        }
    }
}

impl CacheConfig {
    /// Start building a configuration from the defaults
    pub fn builder() -> CacheConfigBuilder {
        CacheConfigBuilder::new()
    }

    /// Check every option is within its accepted range
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(CacheError::configuration(
                "buffer_size must be greater than zero",
            ));
        }

        if self.shard_count == 0 || self.shard_count > MAX_SHARD_COUNT {
            return Err(CacheError::configuration(format!(
                "shard_count must be between 1 and {MAX_SHARD_COUNT}, got {}",
                self.shard_count
            )));
        }

        Ok(())
    }

    /// Upper bound on the number of entries across all shards, if bounded
    pub fn total_capacity(&self) -> Option<usize> {
        self.max_entries
            .map(|per_shard| per_shard.get().saturating_mul(self.shard_count))
    }
}

/// Builder for creating cache configurations
#[derive(Debug, Default)]
pub struct CacheConfigBuilder {
    config: CacheConfig,
}

impl CacheConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CacheConfig::default(),
        }
    }

    /// Set the request queue capacity per shard
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.config.buffer_size = buffer_size;
        self
    }

    /// Set the digest algorithm
    pub fn with_hash_type(mut self, hash_type: HashType) -> Self {
        self.config.hash_type = hash_type;
        self
    }

    /// Bound each shard to `max_entries`, evicting least recently used entries
    pub fn with_max_entries(mut self, max_entries: NonZeroUsize) -> Self {
        self.config.max_entries = Some(max_entries);
        self
    }

    /// Set the number of shards
    pub fn with_shard_count(mut self, shard_count: usize) -> Self {
        self.config.shard_count = shard_count;
        self
    }

    /// Validate and return the configuration
    pub fn build(self) -> Result<CacheConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
