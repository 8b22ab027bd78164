/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

/// Error type shared by every cache operation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// The key could not be reduced to a deterministic digest
    #[error("invalid key: {reason}")]
    KeyEncoding { reason: String },

    /// No entry exists for the digest in its owning shard
    #[error("key not found (digest {digest})")]
    NotFound { digest: String },

    /// The cache has been torn down and accepts no further work
    #[error("cache has been invalidated")]
    CacheInvalidated,

    /// A shard's store failed or panicked while serving a request
    #[error("shard {shard} storage failure: {reason}")]
    InternalStorage { shard: usize, reason: String },

    /// A digest representation could not be decoded
    #[error("malformed digest '{digest}': {reason}")]
    DigestEncoding { digest: String, reason: String },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl CacheError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a key encoding error
    pub fn key_encoding(reason: impl Into<String>) -> Self {
        Self::KeyEncoding {
            reason: reason.into(),
        }
    }

    /// Create a digest encoding error for the given digest text
    pub fn digest_encoding(digest: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DigestEncoding {
            digest: digest.into(),
            reason: reason.into(),
        }
    }

    /// Whether this is the expected "absent" outcome of a lookup
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether the operation was refused because the cache is torn down
    pub fn is_invalidated(&self) -> bool {
        matches!(self, Self::CacheInvalidated)
    }
}
