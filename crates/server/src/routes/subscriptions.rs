use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use services::services::paypal_checkout::{ApplicationContext, CreateSubscription, Subscription};
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    pub plan_id: String,
}

#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSubscription {
    pub subscription_id: String,
    pub status: String,
    pub approve_url: Option<String>,
}

/// POST /api/subscriptions
pub async fn create_subscription(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateSubscriptionRequest>,
) -> Result<ResponseJson<ApiResponse<CreatedSubscription>>, ApiError> {
    let plan_id = payload.plan_id.trim();
    if plan_id.is_empty() {
        return Err(ApiError::BadRequest("planId is required".to_string()));
    }

    // Redirects are only sent when both ends are configured.
    let checkout = state.checkout();
    let application_context = match (&checkout.return_url, &checkout.cancel_url) {
        (Some(return_url), Some(cancel_url)) => Some(ApplicationContext {
            return_url: return_url.clone(),
            cancel_url: cancel_url.clone(),
        }),
        _ => None,
    };

    let subscription = state
        .paypal()
        .create_subscription(&CreateSubscription {
            plan_id: plan_id.to_string(),
            application_context,
        })
        .await?;

    Ok(ResponseJson(ApiResponse::success(CreatedSubscription {
        approve_url: subscription.approve_link().map(str::to_string),
        subscription_id: subscription.id,
        status: subscription.status,
    })))
}

/// GET /api/subscriptions/{subscription_id}
pub async fn get_subscription(
    State(state): State<AppState>,
    Path(subscription_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Subscription>>, ApiError> {
    let subscription = state.paypal().get_subscription(&subscription_id).await?;
    Ok(ResponseJson(ApiResponse::success(subscription)))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/subscriptions",
        Router::new()
            .route("/", post(create_subscription))
            .route("/{subscription_id}", get(get_subscription)),
    )
}
