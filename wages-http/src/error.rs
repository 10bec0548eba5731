//! Error types for wages-http
//!
//! Calculation failures are not errors at this level: they are reported
//! in-band with status 200 so the page can show the message next to the
//! table. `ApiError` covers requests that could not be processed at all.

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use wages_common::report::SalaryReport;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Request is not `multipart/form-data` or has no usable boundary
    #[error("upload failed: {}", .0.body_text())]
    NotMultipart(#[from] MultipartRejection),

    /// Malformed or oversized multipart body
    #[error("upload failed: {0}")]
    Multipart(#[from] MultipartError),

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotMultipart(rejection) => rejection.status(),
            ApiError::Multipart(err) => err.status(),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }

        (status, Json(SalaryReport::failed(self.to_string()))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
