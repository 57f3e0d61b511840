//! Overlay compositing
//!
//! Paints the replacement image on top of a page. The image is embedded
//! once per document and registered once per page; every detection then
//! adds a small content stream of the form `q w 0 0 h x y cm /LogoN Do Q`.
//! The page's original content is bracketed by `q`/`Q` the first time the
//! page is touched so a dangling transform cannot leak into the overlay.

use std::collections::HashMap;

use lopdf::{Dictionary, Object, ObjectId, Stream};

use super::compose::{CompositeOutcome, CompositeTarget, Compositor};
use super::document::PdfDocument;
use super::error::{PdfError, Result};
use super::image::{EmbeddedImage, ImageXObject};
use super::resources::register_xobject;
use crate::compositor::PlacementRect;

const RESOURCE_PREFIX: &str = "Logo";

pub struct OverlayCompositor {
    image: ImageXObject,
    embedded: Option<EmbeddedImage>,
    /// Resource name of the logo on each page it was drawn on
    page_names: HashMap<ObjectId, String>,
}

impl OverlayCompositor {
    pub fn new(image: ImageXObject) -> Self {
        Self {
            image,
            embedded: None,
            page_names: HashMap::new(),
        }
    }

    /// Embed the image on first use and reuse the object afterwards
    pub(crate) fn embedded(&mut self, pdf: &mut PdfDocument) -> EmbeddedImage {
        match self.embedded {
            Some(embedded) => embedded,
            None => {
                let embedded = self.image.embed(pdf.inner_mut());
                self.embedded = Some(embedded);
                embedded
            }
        }
    }
}

impl Compositor for OverlayCompositor {
    fn composite(
        &mut self,
        pdf: &mut PdfDocument,
        target: &CompositeTarget,
    ) -> Result<CompositeOutcome> {
        let rect = target.user_space_rect()?;
        let embedded = self.embedded(pdf);
        let drawn = draw_box(
            &rect,
            embedded.width,
            embedded.height,
            target.placement.exact_fit,
        );

        let first_on_page = !self.page_names.contains_key(&target.page_id);
        let name = match self.page_names.get(&target.page_id) {
            Some(name) => name.clone(),
            None => {
                let name = register_xobject(pdf, target.page_id, RESOURCE_PREFIX, embedded.id)?;
                self.page_names.insert(target.page_id, name.clone());
                name
            }
        };

        append_content(
            pdf,
            target.page_id,
            image_operators(&name, &drawn),
            first_on_page,
        )?;
        pdf.mark_touched(target.page_id);

        Ok(CompositeOutcome::Overlaid {
            resource: name,
            drawn,
        })
    }
}

/// Where the image is actually painted inside `rect`.
///
/// Exact fit fills the rectangle. Otherwise the image is scaled uniformly
/// to fit within it and centered.
pub(crate) fn draw_box(
    rect: &PlacementRect,
    width: u32,
    height: u32,
    exact_fit: bool,
) -> PlacementRect {
    if exact_fit || width == 0 || height == 0 {
        return *rect;
    }

    let (image_w, image_h) = (f64::from(width), f64::from(height));
    let scale = (rect.width() / image_w).min(rect.height() / image_h);
    let (w, h) = (image_w * scale, image_h * scale);
    let x0 = rect.x0 + (rect.width() - w) / 2.0;
    let y0 = rect.y0 + (rect.height() - h) / 2.0;
    PlacementRect::new(x0, y0, x0 + w, y0 + h)
}

fn image_operators(name: &str, rect: &PlacementRect) -> Vec<u8> {
    format!(
        "q\n{} 0 0 {} {} {} cm\n/{} Do\nQ\n",
        format_number(rect.width()),
        format_number(rect.height()),
        format_number(rect.x0),
        format_number(rect.y0),
        name
    )
    .into_bytes()
}

/// Up to four decimals, trailing zeros dropped
fn format_number(value: f64) -> String {
    let text = format!("{:.4}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Append `operators` as a new content stream of the page
fn append_content(
    pdf: &mut PdfDocument,
    page_id: ObjectId,
    operators: Vec<u8>,
    wrap_existing: bool,
) -> Result<()> {
    let existing = existing_contents(pdf, page_id)?;

    let doc = pdf.inner_mut();
    let mut contents = Vec::with_capacity(existing.len() + 2);
    let mut overlay = Vec::new();
    if wrap_existing && !existing.is_empty() {
        let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        contents.push(Object::Reference(save_id));
        overlay.extend_from_slice(b"Q\n");
    }
    contents.extend(existing);
    overlay.extend(operators);

    let overlay_id = doc.add_object(Stream::new(Dictionary::new(), overlay));
    contents.push(Object::Reference(overlay_id));

    doc.get_dictionary_mut(page_id)
        .map_err(PdfError::structure)?
        .set("Contents", Object::Array(contents));
    Ok(())
}

/// Current `/Contents` of a page as a flat list of stream references
fn existing_contents(pdf: &PdfDocument, page_id: ObjectId) -> Result<Vec<Object>> {
    let page = pdf
        .inner()
        .get_dictionary(page_id)
        .map_err(PdfError::structure)?;
    let contents = match page.get(b"Contents") {
        Ok(Object::Reference(id)) => match pdf.inner().get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    };
    Ok(contents)
}
