//! Whether a generation request is currently in flight.

use crate::store::Store;

#[derive(Debug, Clone, Default)]
pub struct GenerationStore {
    inner: Store<bool>,
}

impl GenerationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_generating(&self) -> bool {
        self.inner.get()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<bool> {
        self.inner.subscribe()
    }

    /// Returns true if the flag actually flipped.
    pub fn set_generating(&self, generating: bool) -> bool {
        self.inner.update(|current| {
            if *current == generating {
                return false;
            }
            *current = generating;
            true
        })
    }
}
