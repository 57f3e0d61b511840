//! Replacement service errors

use axum::http::StatusCode;
use thiserror::Error;

use crate::pdf::PdfError;
use crate::replacement::ReplacementImageError;

/// Errors raised while processing one replacement request
#[derive(Debug, Error)]
pub enum ReplaceError {
    /// The detections field is not a JSON array of detections
    #[error("Invalid detections JSON: {0}")]
    InvalidDetections(#[source] serde_json::Error),

    #[error(transparent)]
    Image(#[from] ReplacementImageError),

    #[error(transparent)]
    Pdf(#[from] PdfError),

    /// The blocking worker panicked or was cancelled
    #[error("Processing task failed: {0}")]
    Task(String),
}

impl ReplaceError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ReplaceError::InvalidDetections(_) => StatusCode::BAD_REQUEST,
            ReplaceError::Image(_) | ReplaceError::Pdf(_) | ReplaceError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
