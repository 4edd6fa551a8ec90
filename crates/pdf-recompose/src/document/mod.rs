//! PDF document handling
//!
//! Everything that touches the PDF object model lives here:
//! - Parsing uploaded bytes into a [`ParsedSource`]
//! - Reading page attributes (geometry, rotation), honoring page tree inheritance
//! - Copying pages into a fresh [`OutputDocument`] and serializing it

mod copy;
mod output;

pub use output::OutputDocument;

use crate::constants::{DEFAULT_PAGE_DIMENSIONS, MAX_PAGE_TREE_DEPTH};
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId};

/// A source document parsed into memory.
///
/// Shared read-only between the registry and any assembly that uses it.
#[derive(Debug)]
pub struct ParsedSource {
    id: SourceId,
    name: String,
    document: Document,
    page_ids: Vec<ObjectId>,
}

impl ParsedSource {
    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Object id of the page at `index` (0-based)
    pub fn page_object(&self, index: usize) -> Result<ObjectId> {
        self.page_ids
            .get(index)
            .copied()
            .ok_or(RecomposeError::ReferenceOutOfRange {
                source_id: self.id,
                index,
                page_count: self.page_ids.len(),
            })
    }

    /// Visible size of the page at `index`
    pub fn page_geometry(&self, index: usize) -> Result<PageGeometry> {
        let page_id = self.page_object(index)?;
        Ok(page_geometry(&self.document, page_id))
    }

    /// Rotation stored in the page's own (or inherited) `/Rotate` entry
    pub fn page_rotation(&self, index: usize) -> Result<i64> {
        let page_id = self.page_object(index)?;
        Ok(inherited_attribute(&self.document, page_id, b"Rotate")
            .and_then(|obj| obj.as_i64().ok())
            .unwrap_or(0))
    }
}

/// Parse raw bytes into a [`ParsedSource`].
///
/// This is CPU bound; async callers run it on a blocking thread.
pub fn parse_document(id: SourceId, name: &str, bytes: &[u8]) -> Result<ParsedSource> {
    let unreadable = |reason: String| RecomposeError::SourceUnreadable {
        name: name.to_string(),
        reason,
    };

    let document = Document::load_mem(bytes).map_err(|e| unreadable(e.to_string()))?;
    if document.is_encrypted() {
        return Err(unreadable("encrypted documents are not supported".to_string()));
    }

    let page_ids: Vec<ObjectId> = document.get_pages().values().copied().collect();
    log::debug!("Parsed {} ({} pages)", name, page_ids.len());

    Ok(ParsedSource {
        id,
        name: name.to_string(),
        document,
        page_ids,
    })
}

/// Look up a page attribute, walking up the page tree for inheritable keys.
pub(crate) fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut dict = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_PAGE_TREE_DEPTH {
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        dict = parent_dictionary(doc, dict)?;
    }
    None
}

fn parent_dictionary<'a>(doc: &'a Document, dict: &Dictionary) -> Option<&'a Dictionary> {
    let parent_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
    doc.get_dictionary(parent_id).ok()
}

/// Page size from the (possibly inherited) CropBox, falling back to the MediaBox
pub(crate) fn page_geometry(doc: &Document, page_id: ObjectId) -> PageGeometry {
    page_box(doc, page_id, b"CropBox")
        .or_else(|| page_box(doc, page_id, b"MediaBox"))
        .unwrap_or_else(|| PageGeometry::new(DEFAULT_PAGE_DIMENSIONS.0, DEFAULT_PAGE_DIMENSIONS.1))
}

fn page_box(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<PageGeometry> {
    let rect = inherited_attribute(doc, page_id, key).and_then(|obj| match obj {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_array().ok(),
        other => other.as_array().ok(),
    })?;

    let coords: Vec<f32> = rect.iter().filter_map(extract_number).collect();
    if coords.len() != 4 {
        return None;
    }
    Some(PageGeometry::new(
        (coords[2] - coords[0]).abs(),
        (coords[3] - coords[1]).abs(),
    ))
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::Stream;

    fn document_with_inherited_box() -> (Document, ObjectId) {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));
        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
        ]));
        doc.objects.insert(
            pages_id,
            Object::Dictionary(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Pages".to_vec())),
                ("Kids", Object::Array(vec![Object::Reference(page_id)])),
                ("Count", Object::Integer(1)),
                ("Rotate", Object::Integer(90)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Real(841.9),
                        Object::Real(595.3),
                    ]),
                ),
            ])),
        );
        (doc, page_id)
    }

    #[test]
    fn test_inherited_rotation_and_media_box() {
        let (doc, page_id) = document_with_inherited_box();

        let rotate = inherited_attribute(&doc, page_id, b"Rotate").unwrap();
        assert_eq!(rotate.as_i64().unwrap(), 90);

        let geometry = page_geometry(&doc, page_id);
        assert_eq!(geometry.rounded(), (842, 595));
        assert_eq!(geometry.orientation(), Orientation::Landscape);
    }

    #[test]
    fn test_crop_box_takes_precedence() {
        let (mut doc, page_id) = document_with_inherited_box();
        doc.get_dictionary_mut(page_id).unwrap().set(
            "CropBox",
            Object::Array(vec![
                Object::Integer(36),
                Object::Integer(36),
                Object::Integer(432),
                Object::Integer(648),
            ]),
        );

        let geometry = page_geometry(&doc, page_id);
        assert_eq!(geometry.rounded(), (396, 612));
        assert_eq!(geometry.orientation(), Orientation::Portrait);
    }

    #[test]
    fn test_malformed_crop_box_falls_back_to_media_box() {
        let (mut doc, page_id) = document_with_inherited_box();
        doc.get_dictionary_mut(page_id)
            .unwrap()
            .set("CropBox", Object::Array(vec![Object::Integer(0)]));

        assert_eq!(page_geometry(&doc, page_id).rounded(), (842, 595));
    }

    #[test]
    fn test_missing_media_box_uses_default() {
        let mut doc = Document::with_version("1.7");
        let page_id = doc.add_object(Dictionary::from_iter(vec![(
            "Type",
            Object::Name(b"Page".to_vec()),
        )]));

        let geometry = page_geometry(&doc, page_id);
        assert_eq!(geometry, PageGeometry::default());
    }

    #[test]
    fn test_parse_garbage_is_unreadable() {
        let result = parse_document(SourceId(1), "junk.pdf", b"definitely not a pdf");
        match result {
            Err(RecomposeError::SourceUnreadable { name, .. }) => assert_eq!(name, "junk.pdf"),
            other => panic!("Expected SourceUnreadable, got {:?}", other.map(|_| ())),
        }
    }
}
