//! Page resource dictionary helpers
//!
//! `/Resources` may sit directly on the page, behind an indirect reference,
//! or be inherited from an ancestor `/Pages` node. Writers copy inherited
//! resources onto the page first so sibling pages are left untouched;
//! indirect dictionaries are edited in place.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Object, ObjectId};

use super::document::PdfDocument;
use super::error::{PdfError, Result};

/// Where a page's resource dictionary lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResourcesLocation {
    /// Direct dictionary in the page's `/Resources` entry
    Inline,
    /// Separate indirect object
    Object(ObjectId),
}

/// Image XObjects visible to a page, keyed by resource name
pub fn page_image_xobjects(pdf: &PdfDocument, page_id: ObjectId) -> BTreeMap<Vec<u8>, ObjectId> {
    let mut images = BTreeMap::new();
    let Some(resources) = pdf
        .inherited_attribute(page_id, b"Resources")
        .and_then(|obj| pdf.resolve(obj).as_dict().ok())
    else {
        return images;
    };
    let Some(xobjects) = resources
        .get(b"XObject")
        .ok()
        .and_then(|obj| pdf.resolve(obj).as_dict().ok())
    else {
        return images;
    };

    for (name, value) in xobjects.iter() {
        let Object::Reference(id) = value else {
            continue;
        };
        let is_image = pdf
            .inner()
            .get_object(*id)
            .and_then(Object::as_stream)
            .map(|stream| {
                matches!(stream.dict.get(b"Subtype"), Ok(Object::Name(n)) if n == b"Image")
            })
            .unwrap_or(false);
        if is_image {
            images.insert(name.clone(), *id);
        }
    }
    images
}

/// Register `xobject_id` in the page's `/XObject` resources under a fresh
/// `/<prefix>N` name and return that name
pub fn register_xobject(
    pdf: &mut PdfDocument,
    page_id: ObjectId,
    prefix: &str,
    xobject_id: ObjectId,
) -> Result<String> {
    let location = ensure_page_resources(pdf, page_id)?;

    let indirect = match resources_mut(pdf, page_id, location)?.get(b"XObject") {
        Ok(Object::Reference(id)) => Some(*id),
        _ => None,
    };

    let xobjects: &mut Dictionary = match indirect {
        Some(id) => pdf
            .inner_mut()
            .get_dictionary_mut(id)
            .map_err(PdfError::structure)?,
        None => {
            let resources = resources_mut(pdf, page_id, location)?;
            if !matches!(resources.get(b"XObject"), Ok(Object::Dictionary(_))) {
                resources.set("XObject", Object::Dictionary(Dictionary::new()));
            }
            resources
                .get_mut(b"XObject")
                .and_then(Object::as_dict_mut)
                .map_err(PdfError::structure)?
        }
    };

    let name = (1..)
        .map(|n| format!("{prefix}{n}"))
        .find(|candidate| !xobjects.has(candidate.as_bytes()))
        .unwrap_or_else(|| prefix.to_string());
    xobjects.set(name.clone(), Object::Reference(xobject_id));
    Ok(name)
}

/// Make sure the page carries its own `/Resources` entry
fn ensure_page_resources(pdf: &mut PdfDocument, page_id: ObjectId) -> Result<ResourcesLocation> {
    let page = pdf
        .inner()
        .get_dictionary(page_id)
        .map_err(PdfError::structure)?;
    match page.get(b"Resources") {
        Ok(Object::Reference(id)) => return Ok(ResourcesLocation::Object(*id)),
        Ok(Object::Dictionary(_)) => return Ok(ResourcesLocation::Inline),
        _ => {}
    }

    let inherited = pdf
        .inherited_attribute(page_id, b"Resources")
        .and_then(|obj| pdf.resolve(obj).as_dict().ok())
        .cloned()
        .unwrap_or_default();
    pdf.inner_mut()
        .get_dictionary_mut(page_id)
        .map_err(PdfError::structure)?
        .set("Resources", Object::Dictionary(inherited));
    Ok(ResourcesLocation::Inline)
}

fn resources_mut(
    pdf: &mut PdfDocument,
    page_id: ObjectId,
    location: ResourcesLocation,
) -> Result<&mut Dictionary> {
    let doc = pdf.inner_mut();
    let resources = match location {
        ResourcesLocation::Object(id) => doc.get_dictionary_mut(id),
        ResourcesLocation::Inline => doc
            .get_dictionary_mut(page_id)
            .and_then(|page| page.get_mut(b"Resources"))
            .and_then(Object::as_dict_mut),
    };
    resources.map_err(PdfError::structure)
}
