//! Purchase endpoints. The backend settles the purchase after the provider
//! checkout has been approved on the client.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use super::http_client::{ApiClient, ApiClientError, BackendResponse};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPurchase {
    pub plan_id: String,
    pub subscription_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreditPurchase {
    pub package_id: String,
    pub order_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReceipt {
    #[serde(default)]
    pub credits: Option<u64>,
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub price: String,
    pub currency_code: String,
    #[serde(default)]
    pub credits: Option<u64>,
    #[serde(default)]
    pub paypal_plan_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CaptureRequest<'a> {
    order_id: &'a str,
}

#[derive(Debug, Clone)]
pub struct PaymentApi {
    client: ApiClient,
}

impl PaymentApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn purchase_subscription(
        &self,
        purchase: &SubscriptionPurchase,
    ) -> Result<BackendResponse<PurchaseReceipt>, ApiClientError> {
        self.client.post_json("/pay/subscription", purchase).await
    }

    pub async fn purchase_credits(
        &self,
        purchase: &CreditPurchase,
    ) -> Result<BackendResponse<PurchaseReceipt>, ApiClientError> {
        self.client.post_json("/pay/credits", purchase).await
    }

    pub async fn capture_payment(&self, order_id: &str) -> Result<BackendResponse<Value>, ApiClientError> {
        self.client
            .post_json("/pay/capture", &CaptureRequest { order_id })
            .await
    }

    pub async fn list_plans(&self) -> Result<BackendResponse<Vec<Plan>>, ApiClientError> {
        self.client.get_json("/pay/plans", &()).await
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, routing::post};
    use serde_json::json;

    use super::*;
    use crate::services::test_support::{client_for, spawn_backend};

    #[tokio::test]
    async fn test_purchase_credits_round_trip() {
        let app = Router::new().route(
            "/pay/credits",
            post(|Json(body): Json<Value>| async move {
                let credits = if body == json!({ "packageId": "pack-100", "orderId": "ORD-1" }) {
                    100
                } else {
                    0
                };
                Json(json!({ "code": 0, "data": { "credits": credits } }))
            }),
        );
        let api = PaymentApi::new(client_for(&spawn_backend(app).await));

        let res = api
            .purchase_credits(&CreditPurchase {
                package_id: "pack-100".into(),
                order_id: "ORD-1".into(),
            })
            .await
            .unwrap();

        assert_eq!(res.data.unwrap().credits, Some(100));
    }

    #[tokio::test]
    async fn test_capture_failure_is_not_swallowed() {
        let app = Router::new().route(
            "/pay/capture",
            post(|| async { (axum::http::StatusCode::BAD_GATEWAY, "provider down") }),
        );
        let api = PaymentApi::new(client_for(&spawn_backend(app).await));

        let err = api.capture_payment("ORD-1").await.unwrap_err();
        assert!(matches!(err, ApiClientError::Http { status: 502, .. }));
    }
}
