//! Runtime abstraction layer for async operations
//!
//! The tracker only needs to fire off fetch futures; their results come back
//! over a channel. This module hides which executor runs them.

use futures::future::BoxFuture;

/// A trait for spawning detached async tasks (object-safe)
pub trait AsyncSpawner: Send + Sync + 'static {
    fn spawn_boxed(&self, future: BoxFuture<'static, ()>);
}

/// Drives each future to completion on the calling thread before returning.
///
/// Fetches complete in the order they were issued, which makes tracker
/// behaviour deterministic in tests and headless tools. Not suitable for
/// `HttpDataSource`, whose client needs a tokio reactor.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineSpawner;

impl AsyncSpawner for InlineSpawner {
    fn spawn_boxed(&self, future: BoxFuture<'static, ()>) {
        futures::executor::block_on(future);
    }
}

#[cfg(feature = "tokio-runtime")]
pub mod tokio_impl {
    use super::*;

    /// Spawns onto the ambient tokio runtime; must be used from inside one
    #[derive(Debug, Default, Clone, Copy)]
    pub struct TokioSpawner;

    impl AsyncSpawner for TokioSpawner {
        fn spawn_boxed(&self, future: BoxFuture<'static, ()>) {
            ::tokio::spawn(future);
        }
    }
}

#[cfg(feature = "tokio-runtime")]
pub use tokio_impl::TokioSpawner;

/// The spawner used when none is given explicitly
pub fn default_spawner() -> Box<dyn AsyncSpawner> {
    #[cfg(feature = "tokio-runtime")]
    {
        if ::tokio::runtime::Handle::try_current().is_ok() {
            return Box::new(TokioSpawner);
        }
        log::debug!("no tokio runtime entered, fetches will run inline");
    }
    Box::new(InlineSpawner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_inline_spawner_runs_immediately() {
        let counter = Arc::new(AtomicUsize::new(0));
        let clone = counter.clone();
        InlineSpawner.spawn_boxed(Box::pin(async move {
            clone.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_default_spawner_outside_runtime_is_inline() {
        let counter = Arc::new(AtomicUsize::new(0));
        let clone = counter.clone();
        default_spawner().spawn_boxed(Box::pin(async move {
            clone.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
