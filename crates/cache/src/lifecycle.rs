//! Cache lifecycle and invalidation
//!
//! A [`Lifecycle`] pairs an atomic invalidation flag with a
//! [`CancellationToken`] that every shard actor listens on. Explicit
//! teardown and cancellation of a caller-supplied parent token both end up
//! in [`Lifecycle::invalidate`], which runs the teardown sequence exactly
//! once.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Debug)]
pub struct Lifecycle {
    invalidated: AtomicBool,
    token: CancellationToken,
}

impl Lifecycle {
    /// Create a lifecycle, optionally tied to an external cancellation source
    pub fn new(parent: Option<&CancellationToken>) -> Self {
        let token = match parent {
            Some(parent) => parent.child_token(),
            None => CancellationToken::new(),
        };
        Self {
            invalidated: AtomicBool::new(false),
            token,
        }
    }

    /// Token cancelled when teardown begins
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Fast-path check used before any work is attempted
    pub fn is_invalidated(&self) -> bool {
        self.invalidated.load(Ordering::Acquire) || self.token.is_cancelled()
    }

    /// Flip the flag and broadcast cancellation
    ///
    /// Returns `true` for the single caller that performed the teardown;
    /// every other call is a no-op returning `false`.
    pub fn invalidate(&self) -> bool {
        if self
            .invalidated
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        info!("invalidating cache");
        self.token.cancel();
        true
    }

    /// Route external cancellation into [`Lifecycle::invalidate`]
    pub(crate) fn watch(self: &Arc<Self>, runtime: &Handle) -> JoinHandle<()> {
        let lifecycle = Arc::clone(self);
        runtime.spawn(async move {
            lifecycle.token.cancelled().await;
            if lifecycle.invalidate() {
                debug!("cache invalidated by external cancellation");
            }
        })
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[test]
    fn test_invalidate_is_idempotent() {
        let lifecycle = Lifecycle::default();
        assert!(!lifecycle.is_invalidated());

        assert!(lifecycle.invalidate());
        assert!(lifecycle.is_invalidated());
        assert!(lifecycle.token().is_cancelled());

        for _ in 0..10 {
            assert!(!lifecycle.invalidate());
        }
        assert!(lifecycle.is_invalidated());
    }

    #[test]
    fn test_concurrent_invalidate_runs_once() {
        let lifecycle = Arc::new(Lifecycle::default());
        let winners = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let lifecycle = Arc::clone(&lifecycle);
                let winners = Arc::clone(&winners);
                std::thread::spawn(move || {
                    if lifecycle.invalidate() {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(winners.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_parent_cancellation_is_visible_immediately() {
        let parent = CancellationToken::new();
        let lifecycle = Lifecycle::new(Some(&parent));
        assert!(!lifecycle.is_invalidated());

        parent.cancel();
        assert!(lifecycle.is_invalidated());
    }

    #[tokio::test]
    async fn test_watch_converges_on_invalidate() {
        let parent = CancellationToken::new();
        let lifecycle = Arc::new(Lifecycle::new(Some(&parent)));
        let watcher = lifecycle.watch(&Handle::current());

        parent.cancel();
        tokio::time::timeout(Duration::from_secs(5), watcher)
            .await
            .expect("watcher should finish")
            .unwrap();

        // The watcher already ran teardown
        assert!(!lifecycle.invalidate());
    }

    #[tokio::test]
    async fn test_explicit_invalidate_releases_watcher() {
        let lifecycle = Arc::new(Lifecycle::default());
        let watcher = lifecycle.watch(&Handle::current());

        assert!(lifecycle.invalidate());
        tokio::time::timeout(Duration::from_secs(5), watcher)
            .await
            .expect("watcher should finish")
            .unwrap();
    }
}
