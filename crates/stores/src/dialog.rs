//! Confirm-dialog mediation between nested components.
//!
//! One dialog at a time: `show_confirm` overwrites any prompt still open and
//! drops its callbacks. Whoever renders the dialog calls [`DialogStore::confirm`]
//! or [`DialogStore::cancel`]; confirm leaves the dialog open so the requesting
//! flow can close it once its own work is done.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tracing::debug;

use crate::{
    models::dialog::{ConfirmDialogState, ConfirmOptions, DialogAction},
    store::Store,
};

#[derive(Debug, Clone, Default)]
pub struct DialogStore {
    inner: Store<ConfirmDialogState>,
    next_id: Arc<AtomicU64>,
}

impl DialogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConfirmDialogState {
        self.inner.get()
    }

    pub fn is_open(&self) -> bool {
        self.inner.read(|state| state.open)
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<ConfirmDialogState> {
        self.inner.subscribe()
    }

    /// Open a prompt, replacing any other. Returns the id of the new prompt.
    pub fn show_confirm(&self, options: ConfirmOptions) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(dialog_id = id, title = %options.title, "showing confirm dialog");
        // The previous state, and with it any pending callbacks, is dropped here.
        self.inner.replace(ConfirmDialogState {
            id,
            open: true,
            options,
        });
        id
    }

    /// Run the confirm callback of the open dialog. Returns false if nothing
    /// was open.
    pub fn confirm(&self) -> bool {
        match self.open_action(|options| options.on_confirm.clone()) {
            Some((_, action)) => {
                if let Some(action) = action {
                    action.invoke();
                }
                true
            }
            None => false,
        }
    }

    /// Run the cancel callback of the open dialog, then close it. A prompt
    /// opened by the callback itself stays up.
    pub fn cancel(&self) -> bool {
        match self.open_action(|options| options.on_cancel.clone()) {
            Some((id, action)) => {
                if let Some(action) = action {
                    action.invoke();
                }
                self.close_if_current(id);
                true
            }
            None => false,
        }
    }

    pub fn close(&self) {
        self.inner.update(|state| {
            if !state.open && state.options.on_confirm.is_none() && state.options.on_cancel.is_none()
            {
                return false;
            }
            *state = ConfirmDialogState::default();
            true
        });
    }

    /// Close the dialog only if prompt `id` is still the one showing.
    pub fn close_if_current(&self, id: u64) -> bool {
        self.inner.update(|state| {
            if !state.open || state.id != id {
                return false;
            }
            *state = ConfirmDialogState::default();
            true
        })
    }

    /// Clone a callback out, together with the id of the prompt it belongs
    /// to, so it runs without the store borrowed.
    fn open_action(
        &self,
        pick: impl FnOnce(&ConfirmOptions) -> Option<DialogAction>,
    ) -> Option<(u64, Option<DialogAction>)> {
        self.inner
            .read(|state| state.open.then(|| (state.id, pick(&state.options))))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::models::dialog::{DEFAULT_CANCEL_TEXT, DEFAULT_CONFIRM_TEXT};

    #[test]
    fn test_defaults_applied() {
        let store = DialogStore::new();
        store.show_confirm(ConfirmOptions::new("Delete image", "This cannot be undone."));

        let state = store.state();
        assert!(state.open);
        assert_eq!(state.options.confirm_text, DEFAULT_CONFIRM_TEXT);
        assert_eq!(state.options.cancel_text, DEFAULT_CANCEL_TEXT);
        assert!(state.options.icon.is_none());
    }

    #[test]
    fn test_second_show_confirm_wins() {
        let store = DialogStore::new();
        let first_hits = Arc::new(AtomicUsize::new(0));
        let hits = first_hits.clone();

        store.show_confirm(ConfirmOptions::new("First", "a").on_confirm(move || {
            hits.fetch_add(1, Ordering::SeqCst);
        }));
        store.show_confirm(ConfirmOptions::new("Second", "b").confirm_text("Yes"));

        let state = store.state();
        assert_eq!(state.options.title, "Second");
        assert_eq!(state.options.confirm_text, "Yes");

        assert!(store.confirm());
        assert_eq!(first_hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_confirm_does_not_close() {
        let store = DialogStore::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        store.show_confirm(ConfirmOptions::new("t", "c").on_confirm(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        assert!(store.confirm());
        assert!(store.is_open());
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        store.close();
        assert!(!store.is_open());
        assert!(!store.confirm());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cancel_runs_callback_and_closes() {
        let store = DialogStore::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        store.show_confirm(ConfirmOptions::new("t", "c").on_cancel(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        assert!(store.cancel());
        assert!(!store.is_open());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!store.cancel());
    }

    #[test]
    fn test_close_if_current_ignores_replaced_prompt() {
        let store = DialogStore::new();
        let first = store.show_confirm(ConfirmOptions::new("First", "a"));
        let second = store.show_confirm(ConfirmOptions::new("Second", "b"));
        assert_ne!(first, second);

        assert!(!store.close_if_current(first));
        assert!(store.is_open());
        assert!(store.close_if_current(second));
        assert!(!store.is_open());
    }

    #[test]
    fn test_cancel_keeps_prompt_opened_by_callback() {
        let store = DialogStore::new();
        let handle = store.clone();
        store.show_confirm(ConfirmOptions::new("Discard draft", "c").on_cancel(move || {
            handle.show_confirm(ConfirmOptions::new("Follow-up", "Keep editing?"));
        }));

        assert!(store.cancel());

        let state = store.state();
        assert!(state.open);
        assert_eq!(state.options.title, "Follow-up");
    }

    #[test]
    fn test_callback_may_touch_the_store() {
        let store = DialogStore::new();
        let handle = store.clone();
        store.show_confirm(ConfirmOptions::new("t", "c").on_confirm(move || handle.close()));

        assert!(store.confirm());
        assert!(!store.is_open());
    }
}
