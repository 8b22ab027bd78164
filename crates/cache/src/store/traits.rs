//! Core shard store trait definition

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failure raised by a store implementation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
    message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Storage owned by exactly one shard actor
///
/// Implementations are only ever driven from their actor's task, one call
/// at a time, so they need no internal locking. Keys are hex-encoded digests.
pub trait ShardStore<V>: Send {
    /// Insert or overwrite the value for `key`
    fn put(&mut self, key: String, value: V) -> StoreResult<()>;

    /// Look up `key`; may update recency tracking
    fn get(&mut self, key: &str) -> StoreResult<Option<V>>;

    /// Number of entries currently held
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry
    fn clear(&mut self);
}
