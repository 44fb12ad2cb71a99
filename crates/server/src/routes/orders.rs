use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::post,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use services::services::paypal_checkout::{Money, OrderCapture, PurchaseUnit};
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{AppState, config::is_currency_code, error::ApiError};

static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,10}(\.\d{1,2})?$").expect("valid amount regex"));

#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub amount: String,
    pub currency_code: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrder {
    pub order_id: String,
    pub status: String,
    pub approve_url: Option<String>,
}

/// Accepts a positive decimal with at most two fractional digits.
pub fn validate_amount(raw: &str) -> Result<String, ApiError> {
    let amount = raw.trim();
    if !AMOUNT_RE.is_match(amount) {
        return Err(ApiError::BadRequest(format!("Invalid amount `{raw}`")));
    }
    if amount.chars().all(|c| c == '0' || c == '.') {
        return Err(ApiError::BadRequest("Amount must be greater than zero".to_string()));
    }
    Ok(amount.to_string())
}

/// POST /api/orders
pub async fn create_order(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateOrderRequest>,
) -> Result<ResponseJson<ApiResponse<CreatedOrder>>, ApiError> {
    let value = validate_amount(&payload.amount)?;
    let currency_code = match payload.currency_code {
        Some(code) => {
            let code = code.trim().to_ascii_uppercase();
            if !is_currency_code(&code) {
                return Err(ApiError::BadRequest(format!("Invalid currency code `{code}`")));
            }
            code
        }
        None => state.checkout().currency.clone(),
    };

    let unit = PurchaseUnit {
        amount: Money {
            currency_code,
            value,
        },
        description: payload.description.filter(|d| !d.trim().is_empty()),
    };
    let order = state.paypal().create_order(&unit).await?;

    Ok(ResponseJson(ApiResponse::success(CreatedOrder {
        approve_url: order.approve_link().map(str::to_string),
        order_id: order.id,
        status: order.status,
    })))
}

/// POST /api/orders/{order_id}/capture
pub async fn capture_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<OrderCapture>>, ApiError> {
    let capture = state.paypal().capture_order(&order_id).await?;
    Ok(ResponseJson(ApiResponse::success(capture)))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/orders",
        Router::new()
            .route("/", post(create_order))
            .route("/{order_id}/capture", post(capture_order)),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::Path,
        http::StatusCode,
        routing::post,
    };
    use serde_json::{Value, json};

    use super::*;
    use crate::{
        config::CheckoutSettings,
        routes::test_support::{app_with_provider, call, post_json, token_route},
    };

    fn provider(seen: Arc<Mutex<Vec<Value>>>) -> axum::Router {
        token_route()
            .route(
                "/v2/checkout/orders",
                post(move |Json(body): Json<Value>| {
                    let seen = seen.clone();
                    async move {
                        seen.lock().unwrap().push(body);
                        Json(json!({
                            "id": "ORDER-1",
                            "status": "CREATED",
                            "links": [{ "href": "https://paypal.test/approve/ORDER-1", "rel": "approve" }]
                        }))
                    }
                }),
            )
            .route(
                "/v2/checkout/orders/{id}/capture",
                post(|Path(id): Path<String>| async move {
                    if id == "missing" {
                        return (StatusCode::NOT_FOUND, Json(json!({ "name": "RESOURCE_NOT_FOUND" })));
                    }
                    (StatusCode::CREATED, Json(json!({ "id": id, "status": "COMPLETED" })))
                }),
            )
    }

    #[test]
    fn test_validate_amount() {
        assert_eq!(validate_amount("10").unwrap(), "10");
        assert_eq!(validate_amount(" 9.99 ").unwrap(), "9.99");
        assert_eq!(validate_amount("0.5").unwrap(), "0.5");
        for bad in ["", "0", "0.00", "-1", "1.234", "abc", "1e3", "1,00", ".5"] {
            assert!(validate_amount(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[tokio::test]
    async fn test_create_order_uses_default_currency() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let app = app_with_provider(provider(seen.clone()), CheckoutSettings::default()).await;

        let (status, body) = call(
            app,
            post_json("/api/orders", json!({ "amount": "19.90", "description": "Credits pack" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["orderId"], "ORDER-1");
        assert_eq!(body["data"]["approveUrl"], "https://paypal.test/approve/ORDER-1");

        let sent = seen.lock().unwrap();
        assert_eq!(sent[0]["intent"], "CAPTURE");
        assert_eq!(sent[0]["purchase_units"][0]["amount"]["currency_code"], "USD");
        assert_eq!(sent[0]["purchase_units"][0]["amount"]["value"], "19.90");
        assert_eq!(sent[0]["purchase_units"][0]["description"], "Credits pack");
    }

    #[tokio::test]
    async fn test_invalid_amount_never_reaches_provider() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let app = app_with_provider(provider(seen.clone()), CheckoutSettings::default()).await;

        let (status, body) = call(app, post_json("/api/orders", json!({ "amount": "0" }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_capture_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let app = app_with_provider(provider(seen), CheckoutSettings::default()).await;

        let (status, body) = call(app.clone(), post_json("/api/orders/ORDER-1/capture", json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "COMPLETED");

        let (status, body) = call(app, post_json("/api/orders/missing/capture", json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }
}
