//! Loading of the size and variation-type pickers.

use async_trait::async_trait;
use stores::{model_options::ModelOptionsStore, models::model_option::ModelOptions};
use thiserror::Error;
use tracing::{info, warn};

use super::http_client::{ApiClient, ApiClientError, BackendResponse};

#[derive(Debug, Error)]
pub enum ModelOptionsError {
    #[error("api error: {0}")]
    Api(#[from] ApiClientError),
    #[error("backend rejected the request (code {code}): {message}")]
    Rejected { code: i32, message: String },
}

/// Source of model options, implemented by [`ModelOptionsApi`].
#[async_trait]
pub trait ModelOptionsSource: Send + Sync {
    async fn fetch_options(&self) -> Result<BackendResponse<ModelOptions>, ApiClientError>;
}

#[derive(Debug, Clone)]
pub struct ModelOptionsApi {
    client: ApiClient,
}

impl ModelOptionsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn fetch(&self) -> Result<BackendResponse<ModelOptions>, ApiClientError> {
        self.client.get_json("/model/options", &()).await
    }
}

#[async_trait]
impl ModelOptionsSource for ModelOptionsApi {
    async fn fetch_options(&self) -> Result<BackendResponse<ModelOptions>, ApiClientError> {
        self.fetch().await
    }
}

/// Fetch both option lists and replace the store contents wholesale.
///
/// A rejected or empty response leaves the store as it was.
pub async fn load_model_options(
    source: &dyn ModelOptionsSource,
    store: &ModelOptionsStore,
) -> Result<ModelOptions, ModelOptionsError> {
    let res = source.fetch_options().await?;

    if !res.is_success() {
        let message = res.message_or("Failed to load model options");
        warn!(code = res.code, %message, "Model options request rejected");
        return Err(ModelOptionsError::Rejected {
            code: res.code,
            message,
        });
    }

    let Some(options) = res.data else {
        warn!("Model options response carried no data");
        return Err(ModelOptionsError::Rejected {
            code: res.code,
            message: "Model options response was empty".to_string(),
        });
    };
    info!(
        sizes = options.sizes.len(),
        variation_types = options.variation_types.len(),
        "Loaded model options"
    );
    store.set_options(options);
    Ok(store.options())
}

#[cfg(test)]
mod tests {
    use stores::models::model_option::ModelOption;

    use super::*;

    struct FixedSource(BackendResponse<ModelOptions>);

    #[async_trait]
    impl ModelOptionsSource for FixedSource {
        async fn fetch_options(&self) -> Result<BackendResponse<ModelOptions>, ApiClientError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_load_replaces_store() {
        let store = ModelOptionsStore::new();
        store.set_sizes(vec![ModelOption::new("old", "Old")]);

        let source = FixedSource(BackendResponse {
            code: 0,
            msg: None,
            data: Some(ModelOptions {
                sizes: vec![ModelOption::new("s", "Small"), ModelOption::new("s", "Dup")],
                variation_types: vec![ModelOption::new("print", "Print")],
            }),
        });

        let loaded = load_model_options(&source, &store).await.unwrap();
        assert_eq!(loaded.sizes, vec![ModelOption::new("s", "Small")]);
        assert_eq!(store.variation_types().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_response_keeps_store() {
        let store = ModelOptionsStore::new();
        store.set_sizes(vec![ModelOption::new("keep", "Keep")]);

        let source = FixedSource(BackendResponse {
            code: 401,
            msg: Some("login required".into()),
            data: None,
        });

        let err = load_model_options(&source, &store).await.unwrap_err();
        assert!(matches!(err, ModelOptionsError::Rejected { code: 401, .. }));
        assert_eq!(store.sizes(), vec![ModelOption::new("keep", "Keep")]);
    }

    #[tokio::test]
    async fn test_missing_data_keeps_store() {
        let store = ModelOptionsStore::new();
        store.set_options(ModelOptions {
            sizes: vec![ModelOption::new("m", "Medium")],
            variation_types: vec![ModelOption::new("print", "Print")],
        });

        let source = FixedSource(BackendResponse {
            code: 0,
            msg: None,
            data: None,
        });

        let err = load_model_options(&source, &store).await.unwrap_err();
        assert!(matches!(err, ModelOptionsError::Rejected { code: 0, .. }));
        assert_eq!(store.sizes(), vec![ModelOption::new("m", "Medium")]);
        assert_eq!(store.variation_types().len(), 1);
    }
}
