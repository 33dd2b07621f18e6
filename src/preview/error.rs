//! Preview Error Types
//!
//! Error types for the preview server and their HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::app::AppError;
use crate::fragment::FragmentError;

/// Preview server errors
#[derive(Error, Debug)]
pub enum PreviewError {
    /// Path does not name a page or asset
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request
    #[error("Validation error: {0}")]
    Validation(String),

    /// Booting the dashboard failed
    #[error("Render error: {0}")]
    Render(#[from] AppError),

    /// Asset fetch failed
    #[error("Asset error: {0}")]
    Asset(#[from] FragmentError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for PreviewError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            PreviewError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            PreviewError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            PreviewError::Render(_) => (StatusCode::INTERNAL_SERVER_ERROR, "RENDER_ERROR"),
            PreviewError::Asset(FragmentError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "ASSET_NOT_FOUND")
            }
            PreviewError::Asset(FragmentError::InvalidLocator(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_PATH")
            }
            PreviewError::Asset(_) => (StatusCode::BAD_GATEWAY, "ASSET_ERROR"),
            PreviewError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        };

        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "Preview error occurred"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for preview handlers
pub type PreviewResult<T> = Result<T, PreviewError>;
