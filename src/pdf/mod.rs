//! PDF editing
//!
//! Loading, page lookup, image embedding, the two compositing strategies
//! and compacted output, all on top of `lopdf`.

mod compose;
mod document;
mod error;
mod image;
mod matrix;
mod overlay;
mod resources;
mod swap;

#[cfg(test)]
pub(crate) mod fixtures;

pub use compose::{
    compositor_for, CompositeOutcome, CompositeTarget, Compositor, ParseStrategyError,
    ReplacementStrategy,
};
pub use document::PdfDocument;
pub use error::{PdfError, Result};
pub use image::{ColorSpace, EmbeddedImage, ImageXObject};
pub use matrix::Transform;
pub use overlay::OverlayCompositor;
pub use resources::{page_image_xobjects, register_xobject};
pub use swap::{placed_images, PlacedImage, SwapCompositor};
