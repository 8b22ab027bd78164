//! LRU (Least Recently Used) bounded store

use crate::store::traits::{ShardStore, StoreResult};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Store holding at most `capacity` entries
///
/// Inserting into a full store evicts the least recently used entry. Both
/// puts and gets count as a use.
#[derive(Debug)]
pub struct LruStore<V> {
    entries: LruCache<String, V>,
}

impl<V> LruStore<V> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
        }
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.entries.cap()
    }
}

impl<V: Clone + Send> ShardStore<V> for LruStore<V> {
    fn put(&mut self, key: String, value: V) -> StoreResult<()> {
        if let Some((evicted, _)) = self.entries.push(key.clone(), value) {
            if evicted != key {
                tracing::trace!(digest = %evicted, "evicted least recently used entry");
            }
        }
        Ok(())
    }

    fn get(&mut self, key: &str) -> StoreResult<Option<V>> {
        Ok(self.entries.get(key).cloned())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}
