//! HTTP error envelope and status mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use taskbin_core::error::TaskbinError;

/// Error message attached to a response as an extension so the audit
/// middleware can record it.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

/// An error ready to render at the HTTP boundary.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<TaskbinError> for ApiError {
    fn from(err: TaskbinError) -> Self {
        let status = match &err {
            TaskbinError::Validation { .. } => StatusCode::BAD_REQUEST,
            TaskbinError::NotFound { .. } => StatusCode::NOT_FOUND,
            TaskbinError::InvalidKey | TaskbinError::Unauthorized { .. } => {
                StatusCode::UNAUTHORIZED
            }
            TaskbinError::Crypto(_) | TaskbinError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.status.as_u16(),
                "message": self.message.clone(),
            }
        }));
        let mut response = (self.status, body).into_response();
        response.extensions_mut().insert(ErrorDetail(self.message));
        response
    }
}
