use axum::{Router, extract::State, response::Json as ResponseJson, routing::post};
use services::services::paypal_checkout::ClientToken;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

/// POST /api/paypal/client-token
/// Token for rendering the hosted card fields in the browser.
pub async fn client_token(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<ClientToken>>, ApiError> {
    let token = state.paypal().generate_client_token().await?;
    Ok(ResponseJson(ApiResponse::success(token)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/paypal/client-token", post(client_token))
}
