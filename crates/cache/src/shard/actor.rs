//! The sequential worker that owns one shard's store

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use hashcache_core::{CacheError, Result};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::request::ShardRequest;
use super::state::{ShardState, StateCell};
use crate::stats::CacheStats;
use crate::store::{ShardStore, StoreResult};

pub(crate) struct ShardActor<V> {
    pub(crate) index: usize,
    pub(crate) store: Box<dyn ShardStore<V>>,
    pub(crate) requests: mpsc::Receiver<ShardRequest<V>>,
    pub(crate) cancel: CancellationToken,
    pub(crate) state: Arc<StateCell>,
    pub(crate) stats: Arc<CacheStats>,
}

impl<V: Send + 'static> ShardActor<V> {
    /// Serve requests in arrival order until cancelled
    pub(crate) async fn run(mut self) {
        debug!(shard = self.index, "shard actor started");

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                request = self.requests.recv() => match request {
                    Some(request) => self.handle(request),
                    None => break,
                },
            }
        }

        self.drain().await;
    }

    fn handle(&mut self, request: ShardRequest<V>) {
        if self.cancel.is_cancelled() {
            request.reject(CacheError::CacheInvalidated);
            return;
        }

        match request {
            ShardRequest::Put { key, value, reply } => {
                let result = self.put(key, value);
                let _ = reply.send(result);
            }
            ShardRequest::Get { key, reply } => {
                let result = self.get(key);
                let _ = reply.send(result);
            }
            ShardRequest::Len { reply } => {
                let result = self.guarded("len", |store| Ok(store.len()));
                let _ = reply.send(result);
            }
        }
    }

    fn put(&mut self, key: String, value: V) -> Result<()> {
        self.guarded("put", move |store| store.put(key, value))?;
        self.stats.record_write();
        Ok(())
    }

    fn get(&mut self, key: String) -> Result<V> {
        match self.guarded("get", |store| store.get(&key))? {
            Some(value) => {
                self.stats.record_hit();
                Ok(value)
            }
            None => {
                self.stats.record_miss();
                Err(CacheError::NotFound { digest: key })
            }
        }
    }

    /// Run a store operation, converting failures and panics into errors
    fn guarded<T>(
        &mut self,
        operation: &'static str,
        f: impl FnOnce(&mut dyn ShardStore<V>) -> StoreResult<T>,
    ) -> Result<T> {
        let store = self.store.as_mut();
        let reason = match panic::catch_unwind(AssertUnwindSafe(|| f(store))) {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) => e.to_string(),
            Err(payload) => format!(
                "store panicked during {operation}: {}",
                panic_message(&*payload)
            ),
        };

        self.stats.record_error();
        warn!(shard = self.index, operation, %reason, "shard store failure");
        Err(CacheError::InternalStorage {
            shard: self.index,
            reason,
        })
    }

    /// Refuse everything still queued, then release the store
    async fn drain(mut self) {
        self.state.store(ShardState::Draining);
        self.requests.close();

        let mut refused = 0usize;
        while let Some(request) = self.requests.recv().await {
            debug!(shard = self.index, kind = request.kind(), "refusing queued request");
            request.reject(CacheError::CacheInvalidated);
            refused += 1;
        }

        self.store.clear();
        self.state.store(ShardState::Stopped);
        debug!(shard = self.index, refused, "shard actor stopped");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
