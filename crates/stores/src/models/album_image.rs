use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub type ImageId = i64;

/// A generated or uploaded image as listed in the user's album.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct AlbumImage {
    #[serde(rename = "genImgId")]
    pub id: ImageId,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default)]
    pub collected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl AlbumImage {
    pub fn new(id: ImageId, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            thumbnail_url: None,
            prompt: None,
            width: None,
            height: None,
            collected: false,
            created_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_record() {
        let image: AlbumImage = serde_json::from_value(serde_json::json!({
            "genImgId": 42,
            "url": "https://cdn.example.com/images/42.png",
            "thumbnailUrl": "https://cdn.example.com/images/42_s.png",
            "collected": true
        }))
        .unwrap();

        assert_eq!(image.id, 42);
        assert!(image.collected);
        assert_eq!(image.prompt, None);
        assert_eq!(
            image.thumbnail_url.as_deref(),
            Some("https://cdn.example.com/images/42_s.png")
        );
    }
}
