//! JSON error responses for the gateway.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use pixdrop_core::UploadError;

const GENERIC_ERROR: &str = "Internal server error";

/// An error rendered as `{"error": message}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// A 500 carrying `message`, or the generic text when it is blank.
    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self::new(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR)
        } else {
            Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            e if e.is_validation() => Self::new(StatusCode::BAD_REQUEST, e.to_string()),
            UploadError::AllUploadsFailed => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, UploadError::AllUploadsFailed.to_string())
            }
            UploadError::Unexpected(message) => Self::internal(message),
            other => Self::internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
