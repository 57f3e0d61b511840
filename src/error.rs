//! HTTP error mapping
//!
//! Every failure is returned as `{"detail": "<message>"}`.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::service::ReplaceError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Missing form field '{0}'")]
    MissingField(&'static str),

    #[error("Failed to read multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Replace(#[from] ReplaceError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::MissingField(_) => StatusCode::BAD_REQUEST,
            AppError::Multipart(e) => e.status(),
            AppError::Replace(e) => e.status_code(),
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.to_string();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", detail);
        } else {
            tracing::warn!("Rejected request: {}", detail);
        }

        (status, Json(ErrorResponse { detail })).into_response()
    }
}
