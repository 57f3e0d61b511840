//! Swap-existing compositing
//!
//! Finds the embedded image painted under the target rectangle and replaces
//! its stream with the logo, keeping the object id so every `Do` that paints
//! it now shows the logo at the original position. Pages with no image under
//! the target fall back to an overlay.

use lopdf::content::Content;
use lopdf::{Object, ObjectId};

use super::compose::{CompositeOutcome, CompositeTarget, Compositor};
use super::document::PdfDocument;
use super::error::{PdfError, Result};
use super::image::ImageXObject;
use super::matrix::Transform;
use super::overlay::OverlayCompositor;
use super::resources::page_image_xobjects;
use crate::compositor::PlacementRect;

/// An image XObject painted by a page's content stream
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedImage {
    pub name: Vec<u8>,
    pub object_id: ObjectId,
    /// Page-space bounding box of the painted unit square
    pub bounds: PlacementRect,
}

pub struct SwapCompositor {
    fallback: OverlayCompositor,
}

impl SwapCompositor {
    pub fn new(image: ImageXObject) -> Self {
        Self {
            fallback: OverlayCompositor::new(image),
        }
    }
}

impl Compositor for SwapCompositor {
    fn composite(
        &mut self,
        pdf: &mut PdfDocument,
        target: &CompositeTarget,
    ) -> Result<CompositeOutcome> {
        let rect = target.user_space_rect()?;
        let placed = placed_images(pdf, target.page_id)?;

        let best = placed
            .into_iter()
            .map(|image| {
                let overlap = image.bounds.intersection_area(&rect);
                (image, overlap)
            })
            .filter(|(_, overlap)| *overlap > 0.0)
            .max_by(|a, b| a.1.total_cmp(&b.1));

        let Some((image, _)) = best else {
            tracing::debug!(
                page_id = ?target.page_id,
                "No embedded image under {}, overlaying instead",
                rect
            );
            return self.fallback.composite(pdf, target);
        };

        let embedded = self.fallback.embedded(pdf);
        let replacement = pdf
            .inner()
            .get_object(embedded.id)
            .map_err(PdfError::structure)?
            .clone();
        pdf.inner_mut().objects.insert(image.object_id, replacement);

        tracing::debug!(
            object_id = ?image.object_id,
            name = %String::from_utf8_lossy(&image.name),
            "Swapped embedded image at {}",
            image.bounds
        );
        Ok(CompositeOutcome::Swapped {
            object_id: image.object_id,
            placed: image.bounds,
        })
    }
}

/// Every image XObject a page paints, in content-stream order
pub fn placed_images(pdf: &PdfDocument, page_id: ObjectId) -> Result<Vec<PlacedImage>> {
    let images = page_image_xobjects(pdf, page_id);
    if images.is_empty() {
        return Ok(Vec::new());
    }

    let raw = pdf.page_content(page_id);
    let content = Content::decode(&raw).map_err(|e| PdfError::Content(e.to_string()))?;

    let mut ctm = Transform::IDENTITY;
    let mut saved = Vec::new();
    let mut placed = Vec::new();
    for operation in &content.operations {
        match operation.operator.as_str() {
            "q" => saved.push(ctm),
            "Q" => {
                if let Some(previous) = saved.pop() {
                    ctm = previous;
                }
            }
            "cm" => {
                if let Some(matrix) = Transform::from_operands(&operation.operands) {
                    ctm = ctm.then_inner(matrix);
                }
            }
            "Do" => {
                let Some(Object::Name(name)) = operation.operands.first() else {
                    continue;
                };
                if let Some(object_id) = images.get(name) {
                    placed.push(PlacedImage {
                        name: name.clone(),
                        object_id: *object_id,
                        bounds: ctm.unit_square_bounds(),
                    });
                }
            }
            _ => {}
        }
    }
    Ok(placed)
}
