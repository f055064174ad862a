//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use verdant_domain::error::{ValidationError, VerdantError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`VerdantError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(VerdantError);

impl From<VerdantError> for ApiError {
    fn from(err: VerdantError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            VerdantError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            VerdantError::Unauthorized(err) => (StatusCode::FORBIDDEN, err.to_string()),
            VerdantError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            VerdantError::Conflict(err) => (StatusCode::CONFLICT, err.to_string()),
            VerdantError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            VerdantError::Notification(err) => {
                tracing::error!(error = %err, "notification error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
