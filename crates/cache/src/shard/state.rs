use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle state of one shard actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShardState {
    /// Accepting and processing requests
    Running,
    /// Cancellation received; queued requests are being refused
    Draining,
    /// The actor has exited and dropped its store
    Stopped,
}

/// State shared between an actor and its handle
#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(ShardState::Running as u8))
    }

    pub(crate) fn load(&self) -> ShardState {
        match self.0.load(Ordering::Acquire) {
            0 => ShardState::Running,
            1 => ShardState::Draining,
            _ => ShardState::Stopped,
        }
    }

    pub(crate) fn store(&self, state: ShardState) {
        self.0.store(state as u8, Ordering::Release);
    }
}
