//! Album endpoints: listing, collection toggling and deletion.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use stores::models::album_image::{AlbumImage, ImageId};
use ts_rs::TS;

use super::http_client::{ApiClient, ApiClientError, BackendResponse};

/// Wire value of the `type` field on `/album/collect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectAction {
    Add,
    Remove,
}

impl CollectAction {
    pub fn code(self) -> u8 {
        match self {
            CollectAction::Add => 1,
            CollectAction::Remove => 2,
        }
    }

    pub fn for_state(collected: bool) -> Self {
        if collected { Self::Add } else { Self::Remove }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct AlbumQuery {
    pub page: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collected: Option<bool>,
}

impl Default for AlbumQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            collected: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct AlbumPage {
    #[serde(default)]
    pub list: Vec<AlbumImage>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectRequest {
    gen_img_id: ImageId,
    #[serde(rename = "type")]
    action: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageIdRequest {
    gen_img_id: ImageId,
}

#[derive(Debug, Clone)]
pub struct AlbumApi {
    client: ApiClient,
}

impl AlbumApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &AlbumQuery) -> Result<BackendResponse<AlbumPage>, ApiClientError> {
        self.client.post_json("/album/list", query).await
    }

    pub async fn toggle_collection(
        &self,
        id: ImageId,
        action: CollectAction,
    ) -> Result<BackendResponse<Value>, ApiClientError> {
        let body = CollectRequest {
            gen_img_id: id,
            action: action.code(),
        };
        self.client.post_json("/album/collect", &body).await
    }

    pub async fn delete_image(&self, id: ImageId) -> Result<BackendResponse<Value>, ApiClientError> {
        self.client
            .post_json("/album/delete", &ImageIdRequest { gen_img_id: id })
            .await
    }
}
