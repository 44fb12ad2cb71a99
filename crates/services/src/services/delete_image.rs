//! Delete-with-confirmation flow.
//!
//! `Idle -> ConfirmPending -> Deleting -> Idle`. The API is only called after
//! the user confirms; cancelling, closing the dialog or having it replaced by
//! another prompt all go straight back to `Idle`. Dropping the request
//! future also closes its prompt if it is still the one showing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use stores::{
    AppStores,
    album::AlbumStore,
    alert::AlertStore,
    dialog::DialogStore,
    models::{album_image::ImageId, dialog::ConfirmOptions},
};
use strum_macros::Display;
use thiserror::Error;
use tokio::sync::{oneshot, watch};
use tracing::{debug, info, warn};

use super::{
    album::AlbumApi,
    http_client::{ApiClientError, BackendResponse},
};

const DIALOG_TITLE: &str = "Delete image";
const DIALOG_CONTENT: &str = "Are you sure you want to delete this image? This cannot be undone.";
const DIALOG_ICON: &str = "delete";
const FAILURE_MESSAGE: &str = "Failed to delete image";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "snake_case")]
pub enum DeletePhase {
    #[default]
    Idle,
    ConfirmPending,
    Deleting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
    /// The backend answered with a non-success code.
    Rejected { code: i32, message: String },
}

#[derive(Debug, Error)]
pub enum DeleteImageError {
    #[error("api error: {0}")]
    Api(#[from] ApiClientError),
    #[error("a delete is already in progress")]
    Busy,
}

/// Backend call used by the flow, implemented by [`AlbumApi`].
#[async_trait]
pub trait ImageDeleter: Send + Sync {
    async fn delete_image(&self, id: ImageId) -> Result<BackendResponse<Value>, ApiClientError>;
}

#[async_trait]
impl ImageDeleter for AlbumApi {
    async fn delete_image(&self, id: ImageId) -> Result<BackendResponse<Value>, ApiClientError> {
        AlbumApi::delete_image(self, id).await
    }
}

#[derive(Clone)]
pub struct DeleteImageFlow {
    deleter: Arc<dyn ImageDeleter>,
    dialog: DialogStore,
    alert: AlertStore,
    phase: Arc<watch::Sender<DeletePhase>>,
}

/// Puts the flow back to `Idle` however the request ends, and takes down
/// the prompt it opened if that prompt is still showing.
struct PhaseReset<'a> {
    phase: &'a watch::Sender<DeletePhase>,
    dialog: &'a DialogStore,
    dialog_id: Option<u64>,
}

impl Drop for PhaseReset<'_> {
    fn drop(&mut self) {
        if let Some(id) = self.dialog_id {
            self.dialog.close_if_current(id);
        }
        self.phase.send_replace(DeletePhase::Idle);
    }
}

impl DeleteImageFlow {
    pub fn new(deleter: Arc<dyn ImageDeleter>, stores: &AppStores) -> Self {
        let (phase, _) = watch::channel(DeletePhase::Idle);
        Self {
            deleter,
            dialog: stores.dialog.clone(),
            alert: stores.alert.clone(),
            phase: Arc::new(phase),
        }
    }

    pub fn phase(&self) -> DeletePhase {
        *self.phase.borrow()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<DeletePhase> {
        self.phase.subscribe()
    }

    /// Ask for confirmation, then delete `id`. `on_success` runs exactly once,
    /// and only if the backend reports success.
    pub async fn request_delete<F>(&self, id: ImageId, on_success: F) -> Result<DeleteOutcome, DeleteImageError>
    where
        F: FnOnce() + Send,
    {
        let started = self.phase.send_if_modified(|phase| {
            if *phase != DeletePhase::Idle {
                return false;
            }
            *phase = DeletePhase::ConfirmPending;
            true
        });
        if !started {
            return Err(DeleteImageError::Busy);
        }
        let mut reset = PhaseReset {
            phase: &self.phase,
            dialog: &self.dialog,
            dialog_id: None,
        };

        let (decision, dialog_id) = self.prompt();
        reset.dialog_id = Some(dialog_id);
        // A dropped sender means the dialog was closed or replaced.
        let confirmed = decision.await.unwrap_or(false);
        if !confirmed {
            debug!(image_id = id, "Delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        self.phase.send_replace(DeletePhase::Deleting);
        let result = self.deleter.delete_image(id).await;
        self.dialog.close_if_current(dialog_id);

        match result {
            Ok(res) if res.is_success() => {
                info!(image_id = id, "Image deleted");
                on_success();
                Ok(DeleteOutcome::Deleted)
            }
            Ok(res) => {
                let message = res.message_or(FAILURE_MESSAGE);
                warn!(image_id = id, code = res.code, %message, "Delete rejected by backend");
                self.alert.error(message.clone());
                Ok(DeleteOutcome::Rejected {
                    code: res.code,
                    message,
                })
            }
            Err(e) => {
                warn!(image_id = id, error = %e, "Delete request failed");
                self.alert.error(FAILURE_MESSAGE);
                Err(e.into())
            }
        }
    }

    /// Delete `id` and drop it from `album` once the backend confirms.
    pub async fn delete_from_album(
        &self,
        id: ImageId,
        album: &AlbumStore,
    ) -> Result<DeleteOutcome, DeleteImageError> {
        self.request_delete(id, || {
            album.remove_image(id);
        })
        .await
    }

    /// Show the prompt. Its callbacks own the only sender, so the receiver
    /// errors out as soon as the prompt is closed or replaced.
    fn prompt(&self) -> (oneshot::Receiver<bool>, u64) {
        let (tx, rx) = oneshot::channel();
        let slot = Arc::new(Mutex::new(Some(tx)));
        let confirm_slot = Arc::clone(&slot);

        let options = ConfirmOptions::new(DIALOG_TITLE, DIALOG_CONTENT)
            .icon(DIALOG_ICON)
            .confirm_text("Delete")
            .on_confirm(move || send_decision(&confirm_slot, true))
            .on_cancel(move || send_decision(&slot, false));
        let dialog_id = self.dialog.show_confirm(options);

        (rx, dialog_id)
    }
}

fn send_decision(slot: &Mutex<Option<oneshot::Sender<bool>>>, confirmed: bool) {
    if let Some(tx) = slot.lock().ok().and_then(|mut guard| guard.take()) {
        let _ = tx.send(confirmed);
    }
}
