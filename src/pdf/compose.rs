//! Compositing strategies
//!
//! Two ways of putting the replacement logo into a page:
//!
//! - [`ReplacementStrategy::Overlay`] draws a new image on top of the
//!   existing content
//! - [`ReplacementStrategy::SwapExisting`] rewrites the bytes of an embedded
//!   image already painted under the target rectangle, and overlays when
//!   there is none

use std::fmt;
use std::str::FromStr;

use lopdf::ObjectId;
use serde::{Deserialize, Serialize};

use super::document::PdfDocument;
use super::error::{PdfError, Result};
use super::image::ImageXObject;
use super::overlay::OverlayCompositor;
use super::swap::SwapCompositor;
use crate::compositor::{PageGeometry, Placement, PlacementRect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacementStrategy {
    /// Always insert a new overlay image
    #[default]
    Overlay,
    /// Replace the embedded image under the target, overlay as fallback
    SwapExisting,
}

impl ReplacementStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overlay => "overlay",
            Self::SwapExisting => "swap_existing",
        }
    }
}

impl fmt::Display for ReplacementStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown replacement strategy name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown replacement strategy '{0}' (expected one of: overlay, swap_existing)")]
pub struct ParseStrategyError(pub String);

impl FromStr for ReplacementStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "overlay" => Ok(Self::Overlay),
            "swap_existing" | "swap" => Ok(Self::SwapExisting),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}

/// Where one detection's logo goes
#[derive(Debug, Clone, Copy)]
pub struct CompositeTarget {
    pub page_id: ObjectId,
    pub geometry: PageGeometry,
    pub placement: Placement,
}

impl CompositeTarget {
    /// Placement rectangle in the page's user space (MediaBox origin applied).
    ///
    /// The rectangle is taken as computed, never re-oriented: an inverted,
    /// zero-area or non-finite rectangle is an [`PdfError::EmptyRect`].
    pub fn user_space_rect(&self) -> Result<PlacementRect> {
        let rect = self
            .placement
            .rect
            .translate(self.geometry.origin_x, self.geometry.origin_y);
        if self.placement.rect.is_empty() || rect.is_empty() {
            return Err(PdfError::EmptyRect(self.placement.rect.to_string()));
        }
        Ok(rect)
    }
}

/// What a compositor did for one detection
#[derive(Debug, Clone, PartialEq)]
pub enum CompositeOutcome {
    /// New image painted at `drawn` under resource name `resource`
    Overlaid { resource: String, drawn: PlacementRect },
    /// Embedded image `object_id`, painted at `placed`, now holds the logo
    Swapped {
        object_id: ObjectId,
        placed: PlacementRect,
    },
}

/// Puts the replacement image into a page
pub trait Compositor: Send {
    fn composite(&mut self, pdf: &mut PdfDocument, target: &CompositeTarget)
        -> Result<CompositeOutcome>;
}

/// Build the compositor for `strategy`; the image is embedded lazily, once
/// per document
pub fn compositor_for(strategy: ReplacementStrategy, image: ImageXObject) -> Box<dyn Compositor> {
    match strategy {
        ReplacementStrategy::Overlay => Box::new(OverlayCompositor::new(image)),
        ReplacementStrategy::SwapExisting => Box::new(SwapCompositor::new(image)),
    }
}
