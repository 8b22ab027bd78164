use crate::store::traits::{ShardStore, StoreResult};
use std::collections::HashMap;

/// Plain map with no size limit
#[derive(Debug)]
pub struct UnboundedStore<V> {
    entries: HashMap<String, V>,
}

impl<V> UnboundedStore<V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V> Default for UnboundedStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send> ShardStore<V> for UnboundedStore<V> {
    fn put(&mut self, key: String, value: V) -> StoreResult<()> {
        self.entries.insert(key, value);
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
