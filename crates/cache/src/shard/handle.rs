use std::sync::Arc;

use hashcache_core::{CacheError, Result};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::actor::ShardActor;
use super::request::ShardRequest;
use super::state::{ShardState, StateCell};
use crate::stats::CacheStats;
use crate::store::ShardStore;

/// Sending side of one shard actor
pub(crate) struct ShardHandle<V> {
    index: usize,
    sender: mpsc::Sender<ShardRequest<V>>,
    state: Arc<StateCell>,
    runtime: Handle,
}

impl<V: Send + 'static> ShardHandle<V> {
    /// Spawn the actor for shard `index` on `runtime`
    pub(crate) fn spawn(
        runtime: &Handle,
        index: usize,
        store: Box<dyn ShardStore<V>>,
        buffer_size: usize,
        cancel: CancellationToken,
        stats: Arc<CacheStats>,
    ) -> (Self, JoinHandle<()>) {
        let (sender, requests) = mpsc::channel(buffer_size);
        let state = Arc::new(StateCell::new());

        let actor = ShardActor {
            index,
            store,
            requests,
            cancel,
            state: Arc::clone(&state),
            stats,
        };
        let task = runtime.spawn(actor.run());

        (
            Self {
                index,
                sender,
                state,
                runtime: runtime.clone(),
            },
            task,
        )
    }

    /// Queue a request and wait for the actor's reply
    ///
    /// Waiting for queue capacity is abandoned as soon as `cancel` fires.
    pub(crate) async fn dispatch<T>(
        &self,
        cancel: &CancellationToken,
        build: impl FnOnce(oneshot::Sender<Result<T>>) -> ShardRequest<V>,
    ) -> Result<T> {
        let (reply, response) = oneshot::channel();
        let request = build(reply);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(CacheError::CacheInvalidated),
            sent = self.sender.send(request) => {
                sent.map_err(|_| CacheError::CacheInvalidated)?;
            }
        }

        // A dropped reply means the actor stopped before answering
        response.await.unwrap_or(Err(CacheError::CacheInvalidated))
    }

    /// Blocking variant of [`ShardHandle::dispatch`] for synchronous callers
    ///
    /// Drives the same cancellable wait on the calling thread, so a sender
    /// blocked on a full queue is released as soon as `cancel` fires.
    pub(crate) fn blocking_dispatch<T>(
        &self,
        cancel: &CancellationToken,
        build: impl FnOnce(oneshot::Sender<Result<T>>) -> ShardRequest<V>,
    ) -> Result<T> {
        self.runtime.block_on(self.dispatch(cancel, build))
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn state(&self) -> ShardState {
        self.state.load()
    }
}
