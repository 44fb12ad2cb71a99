//! Image endpoints: detail lookup, upload, generation submit and task polling.

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use stores::models::album_image::{AlbumImage, ImageId};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use super::http_client::{ApiClient, ApiClientError, BackendResponse};

/// What the user asked the generator to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationRequest {
    /// Dress the model photo in the garment photo.
    #[serde(rename_all = "camelCase")]
    TryOn {
        model_image_url: String,
        garment_image_url: String,
    },
    /// Edit a region of an existing image from a prompt.
    #[serde(rename_all = "camelCase")]
    MagicKit {
        image_url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        mask_url: Option<String>,
        prompt: String,
    },
    #[serde(rename_all = "camelCase")]
    Design {
        prompt: String,
        size_id: String,
        variation_type_id: String,
    },
}

impl GenerationRequest {
    /// Every image reference carried by the request.
    pub fn image_urls(&self) -> Vec<&str> {
        match self {
            GenerationRequest::TryOn {
                model_image_url,
                garment_image_url,
            } => vec![model_image_url.as_str(), garment_image_url.as_str()],
            GenerationRequest::MagicKit {
                image_url, mask_url, ..
            } => std::iter::once(image_url.as_str())
                .chain(mask_url.as_deref())
                .collect(),
            GenerationRequest::Design { .. } => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct GenerationTask {
    pub task_id: String,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GenerationStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl GenerationStatus {
    pub fn is_finished(self) -> bool {
        matches!(self, GenerationStatus::Succeeded | GenerationStatus::Failed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    pub status: GenerationStatus,
    #[serde(default)]
    pub images: Vec<AlbumImage>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub url: String,
    #[serde(default)]
    pub gen_img_id: Option<ImageId>,
}

#[derive(Debug, Serialize)]
struct DetailQuery {
    id: ImageId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskQuery<'a> {
    task_id: &'a str,
}

#[derive(Debug, Clone)]
pub struct ImageApi {
    client: ApiClient,
}

impl ImageApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn detail(&self, id: ImageId) -> Result<BackendResponse<AlbumImage>, ApiClientError> {
        self.client.get_json("/image/detail", &DetailQuery { id }).await
    }

    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        mime: &str,
    ) -> Result<BackendResponse<UploadedImage>, ApiClientError> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(|e| ApiClientError::Transport(e.to_string()))?;
        let form = Form::new().part("file", part);
        self.client.post_multipart("/image/upload", form).await
    }

    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<BackendResponse<GenerationTask>, ApiClientError> {
        self.client.post_json("/image/generate", request).await
    }

    pub async fn task_status(&self, task_id: &str) -> Result<BackendResponse<TaskStatus>, ApiClientError> {
        self.client
            .get_json("/image/task", &TaskQuery { task_id })
            .await
    }
}
