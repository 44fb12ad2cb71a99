//! Submit a generation request and poll it to completion.
//!
//! The generation flag in the stores is raised for the whole run and lowered
//! on every exit path, including early returns and cancellation of the future.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use stores::{
    AppStores, album::AlbumStore, alert::AlertStore, generation::GenerationStore,
    models::album_image::AlbumImage,
};
use thiserror::Error;
use tracing::{debug, info, warn};
use utils::image_url::is_valid_image_url;

use super::{
    config::ClientConfig,
    http_client::{ApiClientError, BackendResponse},
    image::{GenerationRequest, GenerationStatus, GenerationTask, ImageApi, TaskStatus},
};

const FAILURE_MESSAGE: &str = "Generation failed, please try again";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("api error: {0}")]
    Api(#[from] ApiClientError),
    #[error("invalid image url: {0}")]
    InvalidImageUrl(String),
    #[error("a generation is already running")]
    AlreadyRunning,
    #[error("backend rejected the request (code {code}): {message}")]
    Rejected { code: i32, message: String },
    #[error("generation task {task_id} failed: {message}")]
    TaskFailed { task_id: String, message: String },
    #[error("generation task {task_id} did not finish after {attempts} polls")]
    TimedOut { task_id: String, attempts: u32 },
}

/// Backend calls used by the service, implemented by [`ImageApi`].
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn submit(&self, request: &GenerationRequest) -> Result<BackendResponse<GenerationTask>, ApiClientError>;

    async fn poll(&self, task_id: &str) -> Result<BackendResponse<TaskStatus>, ApiClientError>;
}

#[async_trait]
impl GenerationBackend for ImageApi {
    async fn submit(&self, request: &GenerationRequest) -> Result<BackendResponse<GenerationTask>, ApiClientError> {
        self.generate(request).await
    }

    async fn poll(&self, task_id: &str) -> Result<BackendResponse<TaskStatus>, ApiClientError> {
        self.task_status(task_id).await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl From<&ClientConfig> for PollSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            interval: config.poll_interval,
            max_attempts: config.max_poll_attempts,
        }
    }
}

struct GeneratingFlag<'a>(&'a GenerationStore);

impl Drop for GeneratingFlag<'_> {
    fn drop(&mut self) {
        self.0.set_generating(false);
    }
}

#[derive(Clone)]
pub struct GenerationService {
    backend: Arc<dyn GenerationBackend>,
    generation: GenerationStore,
    album: AlbumStore,
    alert: AlertStore,
    poll: PollSettings,
}

impl GenerationService {
    pub fn new(backend: Arc<dyn GenerationBackend>, stores: &AppStores, poll: PollSettings) -> Self {
        Self {
            backend,
            generation: stores.generation.clone(),
            album: stores.album.clone(),
            alert: stores.alert.clone(),
            poll,
        }
    }

    /// Run one generation. Result images are put at the front of the album.
    pub async fn run(&self, request: GenerationRequest) -> Result<Vec<AlbumImage>, GenerationError> {
        if let Some(bad) = request
            .image_urls()
            .into_iter()
            .find(|url| !is_valid_image_url(url))
        {
            warn!(url = %bad, "Rejecting generation request with invalid image url");
            self.alert.warning("Please choose a valid image");
            return Err(GenerationError::InvalidImageUrl(bad.to_string()));
        }

        if !self.generation.set_generating(true) {
            return Err(GenerationError::AlreadyRunning);
        }
        let _flag = GeneratingFlag(&self.generation);

        match self.submit_and_wait(&request).await {
            Ok(images) => {
                let added = self.album.prepend_images(images.clone());
                info!(images = images.len(), added, "Generation finished");
                Ok(images)
            }
            Err(e) => {
                warn!(error = %e, "Generation failed");
                let message = match &e {
                    GenerationError::Rejected { message, .. }
                    | GenerationError::TaskFailed { message, .. } => message.clone(),
                    _ => FAILURE_MESSAGE.to_string(),
                };
                self.alert.error(message);
                Err(e)
            }
        }
    }

    async fn submit_and_wait(&self, request: &GenerationRequest) -> Result<Vec<AlbumImage>, GenerationError> {
        let res = self.backend.submit(request).await?;
        if !res.is_success() {
            return Err(GenerationError::Rejected {
                code: res.code,
                message: res.message_or(FAILURE_MESSAGE),
            });
        }
        let Some(task) = res.data else {
            return Err(GenerationError::Rejected {
                code: res.code,
                message: "Generation task was not created".to_string(),
            });
        };
        debug!(task_id = %task.task_id, "Generation submitted");

        for attempt in 1..=self.poll.max_attempts {
            tokio::time::sleep(self.poll.interval).await;

            let res = self.backend.poll(&task.task_id).await?;
            if !res.is_success() {
                return Err(GenerationError::Rejected {
                    code: res.code,
                    message: res.message_or(FAILURE_MESSAGE),
                });
            }
            let Some(status) = res.data else {
                continue;
            };

            debug!(task_id = %task.task_id, attempt, status = %status.status, "Polled generation task");
            match status.status {
                GenerationStatus::Succeeded => return Ok(status.images),
                GenerationStatus::Failed => {
                    return Err(GenerationError::TaskFailed {
                        task_id: task.task_id,
                        message: status.error.unwrap_or_else(|| FAILURE_MESSAGE.to_string()),
                    });
                }
                GenerationStatus::Pending | GenerationStatus::Running => {}
            }
        }

        Err(GenerationError::TimedOut {
            task_id: task.task_id,
            attempts: self.poll.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use stores::models::alert::AlertKind;

    use super::*;

    struct ScriptedBackend {
        submit: BackendResponse<GenerationTask>,
        polls: Mutex<Vec<TaskStatus>>,
        submitted: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedBackend {
        fn new(polls: Vec<TaskStatus>) -> Arc<Self> {
            Arc::new(Self {
                submit: BackendResponse {
                    code: 0,
                    msg: None,
                    data: Some(GenerationTask {
                        task_id: "task-1".into(),
                    }),
                },
                polls: Mutex::new(polls.into_iter().rev().collect()),
                submitted: Mutex::default(),
            })
        }
    }

    #[async_trait]
    impl GenerationBackend for ScriptedBackend {
        async fn submit(&self, request: &GenerationRequest) -> Result<BackendResponse<GenerationTask>, ApiClientError> {
            self.submitted.lock().unwrap().push(request.clone());
            Ok(self.submit.clone())
        }

        async fn poll(&self, _task_id: &str) -> Result<BackendResponse<TaskStatus>, ApiClientError> {
            let next = self.polls.lock().unwrap().pop().unwrap_or(TaskStatus {
                status: GenerationStatus::Running,
                images: vec![],
                error: None,
            });
            Ok(BackendResponse {
                code: 0,
                msg: None,
                data: Some(next),
            })
        }
    }

    fn status(status: GenerationStatus, images: Vec<AlbumImage>) -> TaskStatus {
        TaskStatus {
            status,
            images,
            error: None,
        }
    }

    fn fast_poll(max_attempts: u32) -> PollSettings {
        PollSettings {
            interval: Duration::from_millis(1),
            max_attempts,
        }
    }

    fn try_on() -> GenerationRequest {
        GenerationRequest::TryOn {
            model_image_url: "https://x.com/model.png".into(),
            garment_image_url: "https://x.com/photo/123".into(),
        }
    }

    #[tokio::test]
    async fn test_success_prepends_images_and_clears_flag() {
        let stores = AppStores::new();
        stores.album.set_images(vec![AlbumImage::new(1, "https://x.com/1.png")]);
        let backend = ScriptedBackend::new(vec![
            status(GenerationStatus::Pending, vec![]),
            status(
                GenerationStatus::Succeeded,
                vec![AlbumImage::new(9, "https://x.com/9.png")],
            ),
        ]);
        let service = GenerationService::new(backend.clone(), &stores, fast_poll(5));
        let mut flag = stores.generation.subscribe();

        let images = service.run(try_on()).await.unwrap();

        assert_eq!(images.len(), 1);
        let ids: Vec<_> = stores.album.images().iter().map(|img| img.id).collect();
        assert_eq!(ids, vec![9, 1]);
        assert!(!stores.generation.is_generating());
        // the flag went up and came back down
        assert!(flag.has_changed().unwrap());
        assert_eq!(backend.submitted.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_task_alerts_and_clears_flag() {
        let stores = AppStores::new();
        let backend = ScriptedBackend::new(vec![TaskStatus {
            status: GenerationStatus::Failed,
            images: vec![],
            error: Some("garment not detected".into()),
        }]);
        let service = GenerationService::new(backend, &stores, fast_poll(5));

        let err = service.run(try_on()).await.unwrap_err();

        assert!(matches!(err, GenerationError::TaskFailed { .. }));
        assert!(!stores.generation.is_generating());
        let alert = stores.alert.state();
        assert_eq!(alert.options.kind, AlertKind::Error);
        assert_eq!(alert.options.message, "garment not detected");
        assert!(stores.album.is_empty());
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let stores = AppStores::new();
        let service = GenerationService::new(ScriptedBackend::new(vec![]), &stores, fast_poll(3));

        let err = service.run(try_on()).await.unwrap_err();

        assert!(matches!(err, GenerationError::TimedOut { attempts: 3, .. }));
        assert!(!stores.generation.is_generating());
    }

    #[tokio::test]
    async fn test_invalid_url_rejected_before_submit() {
        let stores = AppStores::new();
        let backend = ScriptedBackend::new(vec![]);
        let service = GenerationService::new(backend.clone(), &stores, fast_poll(3));

        let err = service
            .run(GenerationRequest::MagicKit {
                image_url: "ftp://x.com/a.png".into(),
                mask_url: None,
                prompt: "shorter sleeves".into(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::InvalidImageUrl(_)));
        assert!(backend.submitted.lock().unwrap().is_empty());
        assert_eq!(stores.alert.state().options.kind, AlertKind::Warning);
    }

    #[tokio::test]
    async fn test_refuses_to_start_while_running() {
        let stores = AppStores::new();
        stores.generation.set_generating(true);
        let service = GenerationService::new(ScriptedBackend::new(vec![]), &stores, fast_poll(3));

        let err = service.run(try_on()).await.unwrap_err();

        assert!(matches!(err, GenerationError::AlreadyRunning));
        // someone else's run still owns the flag
        assert!(stores.generation.is_generating());
    }
}
