//! Single-slot alert. A new alert replaces whatever is showing; there is no
//! queue.

use tracing::debug;

use crate::{
    models::alert::{AlertKind, AlertOptions, AlertState},
    store::Store,
};

#[derive(Debug, Clone, Default)]
pub struct AlertStore {
    inner: Store<AlertState>,
}

impl AlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AlertState {
        self.inner.get()
    }

    pub fn is_open(&self) -> bool {
        self.inner.read(|state| state.open)
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<AlertState> {
        self.inner.subscribe()
    }

    pub fn show(&self, options: AlertOptions) {
        debug!(kind = %options.kind, message = %options.message, "showing alert");
        self.inner.replace(AlertState {
            open: true,
            options,
        });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(AlertOptions::new(AlertKind::Success, message));
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.show(AlertOptions::new(AlertKind::Warning, message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(AlertOptions::new(AlertKind::Error, message));
    }

    /// Hide the alert. The last content is kept so a closing animation can
    /// still render it.
    pub fn close(&self) {
        self.inner.update(|state| {
            if !state.open {
                return false;
            }
            state.open = false;
            true
        });
    }
}
