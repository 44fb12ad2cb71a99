//! Exchange of a PayPal approval code for a backend-issued payer token.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::http_client::{ApiClient, ApiClientError, BackendResponse};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct PaypalToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    code: &'a str,
}

#[derive(Debug, Clone)]
pub struct PaypalApi {
    client: ApiClient,
}

impl PaypalApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn exchange_token(&self, code: &str) -> Result<BackendResponse<PaypalToken>, ApiClientError> {
        self.client
            .post_json("/paypal/token", &TokenRequest { code })
            .await
    }
}
