//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fundpulse_core::errors::Error as CoreError;
use fundpulse_core::estimator::EstimateError;
use serde_json::json;

pub type ApiResult<T> = Result<T, ApiError>;

/// Wraps core errors for axum handlers so `?` works end to end.
pub struct ApiError(CoreError);

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError(CoreError::Unexpected(err.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            CoreError::Estimate(EstimateError::UnknownFund(code)) => {
                (StatusCode::NOT_FOUND, format!("Unknown fund: {}", code))
            }
            CoreError::Estimate(EstimateError::Unavailable { .. }) => {
                (StatusCode::SERVICE_UNAVAILABLE, self.0.to_string())
            }
            CoreError::Provider(_) => (StatusCode::SERVICE_UNAVAILABLE, self.0.to_string()),
            CoreError::Validation(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            CoreError::Database(_) | CoreError::Repository(_) | CoreError::Unexpected(_) => {
                // Internal detail stays in the log, not the response body.
                tracing::error!("request failed: {}", self.0);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
