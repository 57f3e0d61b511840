//! Loaded PDF document
//!
//! Thin wrapper around `lopdf::Document` that knows how to look up pages by
//! their 1-based number, read page geometry and write a compacted copy.

use std::collections::{BTreeMap, HashSet};

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::error::{PdfError, Result};
use crate::compositor::PageGeometry;

/// US Letter, used when no MediaBox can be found in the page tree
const DEFAULT_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// Guards against cyclic `/Parent` chains
const MAX_TREE_DEPTH: usize = 32;

/// A PDF held in memory for the duration of one request
pub struct PdfDocument {
    doc: Document,
    pages: BTreeMap<u32, ObjectId>,
    touched: HashSet<ObjectId>,
}

impl PdfDocument {
    /// Parse a document from raw bytes
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(bytes).map_err(|e| PdfError::Load(e.to_string()))?;
        Ok(Self::from_document(doc))
    }

    pub fn from_document(doc: Document) -> Self {
        let pages = doc.get_pages();
        Self {
            doc,
            pages,
            touched: HashSet::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Object id of a page, `page` being 1-based. Zero, negative and
    /// past-the-end numbers are all out of range.
    pub fn page_id(&self, page: i64) -> Result<ObjectId> {
        let out_of_range = || PdfError::PageOutOfRange {
            page,
            page_count: self.pages.len(),
        };
        let number = u32::try_from(page).map_err(|_| out_of_range())?;
        self.pages.get(&number).copied().ok_or_else(out_of_range)
    }

    /// Effective page size, following `/Parent` for an inherited MediaBox
    pub fn page_geometry(&self, page_id: ObjectId) -> PageGeometry {
        PageGeometry::from_box(self.media_box(page_id).unwrap_or(DEFAULT_MEDIA_BOX))
    }

    fn media_box(&self, page_id: ObjectId) -> Option<[f64; 4]> {
        let value = self.inherited_attribute(page_id, b"MediaBox")?;
        let array = match value {
            Object::Array(array) => array,
            Object::Reference(id) => self.doc.get_object(*id).ok()?.as_array().ok()?,
            _ => return None,
        };
        if array.len() != 4 {
            return None;
        }

        let mut bounds = [0.0; 4];
        for (slot, item) in bounds.iter_mut().zip(array) {
            *slot = number(self.resolve(item))?;
        }
        Some(bounds)
    }

    /// Look up a page attribute, walking up the page tree when absent
    pub fn inherited_attribute(&self, page_id: ObjectId, key: &[u8]) -> Option<&Object> {
        let mut current = self.doc.get_dictionary(page_id).ok()?;
        for _ in 0..MAX_TREE_DEPTH {
            if let Ok(value) = current.get(key) {
                return Some(value);
            }
            let parent = current.get(b"Parent").ok()?.as_reference().ok()?;
            current = self.doc.get_dictionary(parent).ok()?;
        }
        None
    }

    /// Follow an indirect reference, returning the object itself otherwise
    pub fn resolve<'a>(&'a self, object: &'a Object) -> &'a Object {
        match object {
            Object::Reference(id) => self.doc.get_object(*id).unwrap_or(object),
            other => other,
        }
    }

    pub fn inner(&self) -> &Document {
        &self.doc
    }

    pub fn inner_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Record that a page's content was modified so it is normalized on save
    pub fn mark_touched(&mut self, page_id: ObjectId) {
        self.touched.insert(page_id);
    }

    /// Serialize with maximum structural compaction.
    ///
    /// Modified pages get their content streams merged and re-encoded,
    /// unreferenced objects and empty streams are dropped, objects are
    /// renumbered and every stream without a filter is deflated.
    pub fn save_compacted(mut self) -> Result<Vec<u8>> {
        let mut touched: Vec<ObjectId> = self.touched.iter().copied().collect();
        touched.sort();
        for page_id in touched {
            if let Err(e) = self.normalize_page_content(page_id) {
                tracing::debug!(?page_id, "Keeping content streams as-is: {}", e);
            }
        }

        self.doc.prune_objects();
        self.doc.delete_zero_length_streams();
        self.doc.renumber_objects();
        self.doc.compress();

        let mut output = Vec::new();
        self.doc
            .save_to(&mut output)
            .map_err(|e| PdfError::Save(e.to_string()))?;
        Ok(output)
    }

    /// Decoded content of all of a page's streams, newline separated so
    /// tokens at stream boundaries stay apart
    pub fn page_content(&self, page_id: ObjectId) -> Vec<u8> {
        let mut content = Vec::new();
        for stream_id in self.doc.get_page_contents(page_id) {
            let Ok(stream) = self.doc.get_object(stream_id).and_then(Object::as_stream) else {
                continue;
            };
            match stream.decompressed_content() {
                Ok(data) => content.extend_from_slice(&data),
                Err(_) => content.extend_from_slice(&stream.content),
            }
            content.push(b'\n');
        }
        content
    }

    /// Merge a page's content streams into a single re-encoded stream
    fn normalize_page_content(&mut self, page_id: ObjectId) -> Result<()> {
        let raw = self.page_content(page_id);
        let content = Content::decode(&raw).map_err(|e| PdfError::Content(e.to_string()))?;
        let encoded = content
            .encode()
            .map_err(|e| PdfError::Content(e.to_string()))?;

        let stream_id = self
            .doc
            .add_object(Object::Stream(Stream::new(Dictionary::new(), encoded)));
        self.doc
            .get_dictionary_mut(page_id)
            .map_err(PdfError::structure)?
            .set("Contents", Object::Reference(stream_id));
        Ok(())
    }
}

/// Numeric value of an integer or real operand
pub(crate) fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}
