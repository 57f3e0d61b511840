//! Logo replacement endpoint
//!
//! `POST /replace-logos` takes a multipart form:
//! - `pdf_file`: the document
//! - `detections`: JSON array of `{page, x, y, width?, height?}`
//! - `replace_logo`: base64 or data URL encoded image
//! - `policy`, `strategy` (optional): override the configured defaults
//!
//! and answers with the rewritten PDF as an attachment.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};

use crate::compositor::PlacementPolicy;
use crate::error::{AppError, Result};
use crate::pdf::ReplacementStrategy;
use crate::service::{parse_detections, replace_logos_blocking, ReplaceOptions, ReplaceRequest};
use crate::state::AppState;

const DEFAULT_FILENAME: &str = "document.pdf";

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/replace-logos", post(replace_logos))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// Raw form fields of one request
#[derive(Debug, Default)]
struct ReplaceForm {
    pdf_file: Option<Vec<u8>>,
    filename: Option<String>,
    detections: Option<String>,
    replace_logo: Option<String>,
    policy: Option<String>,
    strategy: Option<String>,
}

impl ReplaceForm {
    async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut form = ReplaceForm::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "pdf_file" => {
                    form.filename = field.file_name().map(|s| s.to_string());
                    form.pdf_file = Some(field.bytes().await?.to_vec());
                }
                "detections" => form.detections = Some(field.text().await?),
                "replace_logo" => form.replace_logo = Some(field.text().await?),
                "policy" => form.policy = Some(field.text().await?),
                "strategy" => form.strategy = Some(field.text().await?),
                other => tracing::debug!("Ignoring form field '{}'", other),
            }
        }
        Ok(form)
    }

    /// Configured defaults with any per-request override applied
    fn options(&self, defaults: ReplaceOptions) -> Result<ReplaceOptions> {
        let mut options = defaults;
        if let Some(policy) = non_empty(&self.policy) {
            options.policy = policy
                .parse::<PlacementPolicy>()
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
        }
        if let Some(strategy) = non_empty(&self.strategy) {
            options.strategy = strategy
                .parse::<ReplacementStrategy>()
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
        }
        Ok(options)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// POST /replace-logos
async fn replace_logos(State(state): State<AppState>, multipart: Multipart) -> Result<Response> {
    let form = ReplaceForm::read(multipart).await?;
    let options = form.options(state.default_options())?;

    let ReplaceForm {
        pdf_file,
        filename,
        detections,
        replace_logo,
        ..
    } = form;
    let pdf = pdf_file.ok_or(AppError::MissingField("pdf_file"))?;
    let detections = detections.ok_or(AppError::MissingField("detections"))?;
    let replace_logo = replace_logo.ok_or(AppError::MissingField("replace_logo"))?;

    let filename = filename
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string());
    tracing::info!("Received PDF: {} ({} bytes)", filename, pdf.len());

    let detections = parse_detections(&detections)?;
    let outcome = replace_logos_blocking(ReplaceRequest {
        pdf,
        detections,
        replace_logo,
        options,
    })
    .await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&filename)),
        ],
        outcome.pdf,
    )
        .into_response())
}

/// `attachment; filename=modified_<name>` with characters that cannot go
/// into a header value replaced
fn content_disposition(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
        .collect();
    format!("attachment; filename=modified_{}", safe)
}
