use hashcache_core::{CacheError, Result};
use tokio::sync::oneshot;

/// Message sent from the facade to a shard actor
pub(crate) enum ShardRequest<V> {
    Put {
        key: String,
        value: V,
        reply: oneshot::Sender<Result<()>>,
    },
    Get {
        key: String,
        reply: oneshot::Sender<Result<V>>,
    },
    Len {
        reply: oneshot::Sender<Result<usize>>,
    },
}

impl<V> ShardRequest<V> {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Put { .. } => "put",
            Self::Get { .. } => "get",
            Self::Len { .. } => "len",
        }
    }

    /// Answer the request with `error` without touching the store
    pub(crate) fn reject(self, error: CacheError) {
        // The caller may have gone away; nothing to do then.
        match self {
            Self::Put { reply, .. } => {
                let _ = reply.send(Err(error));
            }
            Self::Get { reply, .. } => {
                let _ = reply.send(Err(error));
            }
            Self::Len { reply } => {
                let _ = reply.send(Err(error));
            }
        }
    }
}
