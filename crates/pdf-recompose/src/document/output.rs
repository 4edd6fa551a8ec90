//! Output document construction
//!
//! An [`OutputDocument`] starts empty and grows one copied page at a time. The
//! page tree and catalog are only written when the document is serialized, so an
//! abandoned output never produces bytes.

use super::ParsedSource;
use super::copy::{CopyCache, copy_dictionary, copy_object_deep};
use super::inherited_attribute;
use crate::constants::{INHERITABLE_PAGE_KEYS, OUTPUT_PDF_VERSION};
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashMap;

/// A document being assembled from pages of one or more sources
pub struct OutputDocument {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
    caches: HashMap<SourceId, CopyCache>,
}

impl Default for OutputDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputDocument {
    pub fn new() -> Self {
        let mut doc = Document::with_version(OUTPUT_PDF_VERSION);
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
            caches: HashMap::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Copy page `page_index` of `source` to the end of this document.
    ///
    /// Inherited attributes are written onto the copy, since the copy's parent is
    /// this document's page tree rather than the source's.
    pub fn copy_page(&mut self, source: &ParsedSource, page_index: usize) -> Result<ObjectId> {
        let source_page_id = source.page_object(page_index)?;
        let source_doc = source.document();
        let page_dict = source_doc.get_dictionary(source_page_id)?;

        let cache = self
            .caches
            .entry(source.id())
            .or_insert_with(|| CopyCache::new(source_doc));

        let new_page_id = self.doc.new_object_id();
        cache.reserve(source_page_id, new_page_id);

        // Annotations belong to one page, so every copy of the page gets its own
        let annotations = annotation_ids(source_doc, page_dict);
        let mut owned = Vec::with_capacity(annotations.len());
        for source_id in annotations {
            let output_id = self.doc.new_object_id();
            cache.reserve(source_id, output_id);
            owned.push((source_id, output_id));
        }

        let mut own_entries = Dictionary::new();
        for (key, value) in page_dict.iter() {
            match key.as_slice() {
                b"Parent" => {}
                b"Annots" => {
                    if let Some(annots) = resolve_array(source_doc, value) {
                        own_entries.set(key.clone(), Object::Array(annots.clone()));
                    }
                }
                _ => own_entries.set(key.clone(), value.clone()),
            }
        }
        let mut new_page = copy_dictionary(&mut self.doc, source_doc, &own_entries, cache)?;

        for (source_id, output_id) in owned {
            let annotation = source_doc.get_object(source_id)?;
            let copied = copy_object_deep(&mut self.doc, source_doc, annotation, cache)?;
            self.doc.objects.insert(output_id, copied);
        }

        for key in INHERITABLE_PAGE_KEYS {
            if new_page.has(key) {
                continue;
            }
            if let Some(value) = inherited_attribute(source_doc, source_page_id, key) {
                let copied = copy_object_deep(&mut self.doc, source_doc, value, cache)?;
                new_page.set(key.to_vec(), copied);
            }
        }

        new_page.set("Type", Object::Name(b"Page".to_vec()));
        new_page.set("Parent", Object::Reference(self.pages_id));
        self.doc
            .objects
            .insert(new_page_id, Object::Dictionary(new_page));
        self.kids.push(new_page_id);

        Ok(new_page_id)
    }

    /// Current `/Rotate` value of a page in this document
    pub fn page_rotation(&self, page_id: ObjectId) -> Result<i64> {
        let page = self.doc.get_dictionary(page_id)?;
        let rotate = match page.get(b"Rotate") {
            Ok(Object::Reference(id)) => self.doc.get_object(*id).ok(),
            Ok(obj) => Some(obj),
            Err(_) => None,
        };
        Ok(rotate.and_then(|obj| obj.as_i64().ok()).unwrap_or(0))
    }

    /// Set a page's `/Rotate`, normalized into `0..360`
    pub fn set_page_rotation(&mut self, page_id: ObjectId, degrees: i64) -> Result<()> {
        let page = self.doc.get_dictionary_mut(page_id)?;
        page.set("Rotate", Object::Integer(degrees.rem_euclid(360)));
        Ok(())
    }

    /// Compose `rotation` onto whatever rotation the page already carries.
    pub fn rotate_page(&mut self, page_id: ObjectId, rotation: Rotation) -> Result<()> {
        if rotation.is_none() {
            return Ok(());
        }
        let existing = self.page_rotation(page_id)?;
        self.set_page_rotation(page_id, existing + i64::from(rotation.degrees()))
    }

    /// Finish the page tree and write the document to bytes.
    pub fn to_bytes(mut self) -> Result<Vec<u8>> {
        let kids: Vec<Object> = self.kids.iter().map(|id| Object::Reference(*id)).collect();
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(kids.len() as i64)),
            ("Kids", Object::Array(kids)),
        ]);
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]));
        self.doc.trailer.set("Root", catalog_id);

        let mut writer = Vec::new();
        self.doc.save_to(&mut writer)?;
        Ok(writer)
    }
}

/// Ids of the annotations a page refers to indirectly, skipping dangling ones
fn annotation_ids(doc: &Document, page: &Dictionary) -> Vec<ObjectId> {
    let Some(annots) = page.get(b"Annots").ok().and_then(|obj| resolve_array(doc, obj)) else {
        return Vec::new();
    };
    let mut ids = Vec::new();
    for item in annots {
        if let Ok(id) = item.as_reference() {
            if doc.get_object(id).is_ok() && !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

fn resolve_array<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Vec<Object>> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_array().ok(),
        other => other.as_array().ok(),
    }
}
