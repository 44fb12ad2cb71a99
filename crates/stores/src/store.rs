//! Reactive single-value container backing every store.

use std::sync::Arc;

use tokio::sync::watch;

/// A state slot with synchronous reads and change notification.
///
/// Mutations run under the channel's write lock, so a mutator never observes a
/// half-applied update from another one. Subscribers are only woken when a
/// mutator reports that it actually changed something.
#[derive(Debug)]
pub struct Store<S> {
    tx: Arc<watch::Sender<S>>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<S: Default> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> Store<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current state.
    pub fn get(&self) -> S
    where
        S: Clone,
    {
        self.tx.borrow().clone()
    }

    /// Borrow the current state for the duration of `f`.
    ///
    /// `f` must not call back into the same store.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Receiver that is marked changed after every effective mutation.
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Apply `f` and notify subscribers only if it returns true.
    pub(crate) fn update(&self, f: impl FnOnce(&mut S) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    /// Swap in `next` unconditionally, returning the previous state.
    pub(crate) fn replace(&self, next: S) -> S {
        self.tx.send_replace(next)
    }
}
