use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use services::services::paypal_checkout::PaypalError;
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Paypal(#[from] PaypalError),
    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Paypal(PaypalError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "Resource not found".to_string())
            }
            ApiError::Paypal(PaypalError::InvalidCredentials | PaypalError::InvalidUrl(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Payment provider is misconfigured".to_string(),
            ),
            ApiError::Paypal(_) => (
                StatusCode::BAD_GATEWAY,
                "Payment provider request failed".to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, ResponseJson(ApiResponse::<()>::error(message))).into_response()
    }
}
