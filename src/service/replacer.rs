//! One logo replacement pass over a document
//!
//! Decode the logo, open the PDF, place and composite every detection in
//! input order, then write a compacted copy. Any failure discards the
//! document; there is no partial output.

use super::error::ReplaceError;
use crate::compositor::{compute_placement, Detection, PlacementPolicy};
use crate::pdf::{
    compositor_for, CompositeOutcome, CompositeTarget, ImageXObject, PdfDocument,
    ReplacementStrategy,
};
use crate::replacement::ReplacementImage;

/// Policy and strategy applied to every detection of a request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceOptions {
    pub policy: PlacementPolicy,
    pub strategy: ReplacementStrategy,
}

/// Everything one `/replace-logos` call carries
#[derive(Debug, Clone)]
pub struct ReplaceRequest {
    pub pdf: Vec<u8>,
    pub detections: Vec<Detection>,
    /// Base64 or `data:image/...;base64,` encoded logo
    pub replace_logo: String,
    pub options: ReplaceOptions,
}

/// Result of a successful pass
#[derive(Debug)]
pub struct ReplaceOutcome {
    pub pdf: Vec<u8>,
    pub page_count: usize,
    /// One entry per detection, in input order
    pub composites: Vec<CompositeOutcome>,
}

/// Parse the `detections` form field
pub fn parse_detections(raw: &str) -> Result<Vec<Detection>, ReplaceError> {
    serde_json::from_str(raw).map_err(ReplaceError::InvalidDetections)
}

/// Run a replacement pass synchronously
pub fn replace_logos(request: ReplaceRequest) -> Result<ReplaceOutcome, ReplaceError> {
    let ReplaceRequest {
        pdf,
        detections,
        replace_logo,
        options,
    } = request;
    tracing::info!(
        detections = detections.len(),
        policy = %options.policy,
        strategy = %options.strategy,
        "Processing logo replacement"
    );

    let logo = ReplacementImage::from_encoded(&replace_logo)?;
    let native = logo.native_size();
    tracing::debug!("Replacement logo: {}x{}", native.width, native.height);

    let mut document = PdfDocument::load(&pdf)?;
    drop(pdf);
    let page_count = document.page_count();
    tracing::debug!("PDF opened: {} pages", page_count);

    let mut compositor = compositor_for(options.strategy, ImageXObject::from_replacement(&logo));
    let mut composites = Vec::with_capacity(detections.len());

    for (index, detection) in detections.iter().enumerate() {
        let page_id = document.page_id(detection.page)?;
        let geometry = document.page_geometry(page_id);
        let placement = compute_placement(&geometry, detection, native, options.policy);

        tracing::debug!(
            logo = index + 1,
            of = detections.len(),
            page = detection.page,
            x = detection.x,
            y = detection.y,
            width = ?detection.width,
            height = ?detection.height,
            "Page size {:.1}x{:.1}, rect {}{}",
            geometry.width,
            geometry.height,
            placement.rect,
            if placement.aspect_adjusted { " (height adjusted to logo aspect)" } else { "" }
        );

        let target = CompositeTarget {
            page_id,
            geometry,
            placement,
        };
        composites.push(compositor.composite(&mut document, &target)?);
    }

    let output = document.save_compacted()?;
    tracing::info!(
        pages = page_count,
        logos = composites.len(),
        "PDF processing complete, output size: {} bytes",
        output.len()
    );

    Ok(ReplaceOutcome {
        pdf: output,
        page_count,
        composites,
    })
}

/// Run a replacement pass on the blocking thread pool
pub async fn replace_logos_blocking(
    request: ReplaceRequest,
) -> Result<ReplaceOutcome, ReplaceError> {
    tokio::task::spawn_blocking(move || replace_logos(request))
        .await
        .map_err(|e| ReplaceError::Task(e.to_string()))?
}
