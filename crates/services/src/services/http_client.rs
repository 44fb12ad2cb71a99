//! Shared request client for the backend REST API.
//!
//! Every API module goes through [`ApiClient`], which resolves paths against
//! the configured base URL and attaches the session token. Calls are one-shot:
//! no retries and no client-side timeout.

use std::sync::Arc;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use ts_rs::TS;
use url::Url;

use super::config::ClientConfig;

/// Response code the backend uses for a successful call.
pub const SUCCESS_CODE: i32 = 0;

#[derive(Debug, Clone, Error)]
pub enum ApiClientError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("not signed in or session expired")]
    Unauthorized,
    #[error("json error: {0}")]
    Serde(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Body shape shared by every backend endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct BackendResponse<T> {
    pub code: i32,
    #[serde(default)]
    pub msg: Option<String>,
    pub data: Option<T>,
}

impl<T> BackendResponse<T> {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Message to show the user when the call did not succeed.
    pub fn message_or(&self, fallback: &str) -> String {
        self.msg
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

trait WithAuth {
    fn with_auth(self, token: Option<&SecretString>) -> Self;
}

impl WithAuth for RequestBuilder {
    fn with_auth(self, token: Option<&SecretString>) -> Self {
        match token {
            Some(token) => self.bearer_auth(token.expose_secret()),
            None => self,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    auth_token: Arc<RwLock<Option<SecretString>>>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiClientError> {
        let http = Client::builder()
            .user_agent(concat!("atelier-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiClientError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: normalize_base(config.api_base_url),
            auth_token: Arc::new(RwLock::new(config.auth_token)),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Install the session token obtained at sign-in.
    pub async fn set_auth_token(&self, token: impl Into<String>) {
        *self.auth_token.write().await = Some(SecretString::from(token.into()));
    }

    pub async fn clear_auth_token(&self) {
        *self.auth_token.write().await = None;
    }

    pub async fn has_auth_token(&self) -> bool {
        self.auth_token.read().await.is_some()
    }

    pub async fn get_json<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        debug!(method = "GET", %url, "backend request");
        let request = self.http.get(url).query(query);
        self.send(request).await
    }

    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        debug!(method = "POST", %url, "backend request");
        let request = self.http.post(url).json(body);
        self.send(request).await
    }

    pub async fn post_multipart<T>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!(method = "POST", %url, "backend multipart request");
        let request = self.http.post(url).multipart(form);
        self.send(request).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiClientError::InvalidUrl(format!("{path}: {e}")))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiClientError> {
        let request = {
            let token = self.auth_token.read().await;
            request.with_auth(token.as_ref())
        };
        let res = request
            .send()
            .await
            .map_err(|e| ApiClientError::Transport(e.to_string()))?;

        parse_response(res).await
    }
}

async fn parse_response<T: DeserializeOwned>(res: Response) -> Result<T, ApiClientError> {
    match res.status() {
        s if s.is_success() => res
            .json::<T>()
            .await
            .map_err(|e| ApiClientError::Serde(e.to_string())),
        StatusCode::UNAUTHORIZED => Err(ApiClientError::Unauthorized),
        s => {
            let status = s.as_u16();
            let body = res.text().await.unwrap_or_default();
            warn!(status, "backend returned an error status");
            Err(ApiClientError::Http { status, body })
        }
    }
}

/// `Url::join` drops the last path segment unless it ends with a slash.
fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
