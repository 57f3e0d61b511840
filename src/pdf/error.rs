//! PDF error types

use thiserror::Error;

/// Errors raised while reading, compositing into or writing a PDF
#[derive(Debug, Error)]
pub enum PdfError {
    /// Input bytes are not a readable PDF
    #[error("Failed to open PDF: {0}")]
    Load(String),

    /// Detection refers to a page the document does not have
    #[error("Page {page} is out of range: document has {page_count} page(s) (valid range: 1-{page_count})")]
    PageOutOfRange { page: i64, page_count: usize },

    /// Page tree or resource dictionary is not shaped as expected
    #[error("Malformed page structure: {0}")]
    Structure(String),

    /// Content stream could not be parsed
    #[error("Content stream error: {0}")]
    Content(String),

    /// Target rectangle encloses no area
    #[error("Target rectangle {0} is empty")]
    EmptyRect(String),

    /// Serializing the document failed
    #[error("Failed to save PDF: {0}")]
    Save(String),
}

/// Result type alias for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

impl PdfError {
    pub(crate) fn structure(err: impl std::fmt::Display) -> Self {
        PdfError::Structure(err.to_string())
    }
}
