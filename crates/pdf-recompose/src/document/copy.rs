//! Deep copy of PDF objects between documents
//!
//! Objects are copied by following references from a page's own entries. The
//! source page tree is never followed: references to `/Pages` nodes and to pages
//! other than those being copied are replaced with `null`, so copying one page
//! never drags the rest of its source document along.

use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::{HashMap, HashSet};

/// Per-source copy state kept for the lifetime of one output document.
///
/// Maps source object ids to the ids already allocated in the output, so a font
/// or image shared by several pages of the same source is copied only once.
#[derive(Debug, Default)]
pub(crate) struct CopyCache {
    mapped: HashMap<ObjectId, ObjectId>,
    page_ids: HashSet<ObjectId>,
}

impl CopyCache {
    pub(crate) fn new(source: &Document) -> Self {
        Self {
            mapped: HashMap::new(),
            page_ids: source.get_pages().values().copied().collect(),
        }
    }

    /// Point `source_id` at `output_id` before the object's body is copied.
    ///
    /// Replaces any earlier mapping, so objects owned by one page copy (the page
    /// itself, its annotations) are never shared with another copy of that page.
    pub(crate) fn reserve(&mut self, source_id: ObjectId, output_id: ObjectId) {
        self.mapped.insert(source_id, output_id);
    }
}

/// Deep copy an object from source to output document, following references.
pub(crate) fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut CopyCache,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => copy_reference(output, source, *id, cache),
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary(
            output, source, dict, cache,
        )?)),
        Object::Array(arr) => {
            let new_arr: Result<Vec<_>> = arr
                .iter()
                .map(|item| copy_object_deep(output, source, item, cache))
                .collect();
            Ok(Object::Array(new_arr?))
        }
        Object::Stream(stream) => Ok(Object::Stream(Stream {
            dict: copy_dictionary(output, source, &stream.dict, cache)?,
            content: stream.content.clone(),
            allows_compression: stream.allows_compression,
            start_position: None,
        })),
        // Primitive types: just clone
        _ => Ok(obj.clone()),
    }
}

pub(crate) fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    cache: &mut CopyCache,
) -> Result<Dictionary> {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }
    Ok(new_dict)
}

fn copy_reference(
    output: &mut Document,
    source: &Document,
    id: ObjectId,
    cache: &mut CopyCache,
) -> Result<Object> {
    if let Some(&new_id) = cache.mapped.get(&id) {
        return Ok(Object::Reference(new_id));
    }

    // Dangling references are legal in PDF and read as null
    let Ok(referenced) = source.get_object(id) else {
        return Ok(Object::Null);
    };

    if cache.page_ids.contains(&id) || is_page_tree_node(referenced) {
        return Ok(Object::Null);
    }

    // Allocate first so reference cycles terminate
    let new_id = output.new_object_id();
    cache.mapped.insert(id, new_id);
    let copied = copy_object_deep(output, source, referenced, cache)?;
    output.objects.insert(new_id, copied);

    Ok(Object::Reference(new_id))
}

fn is_page_tree_node(obj: &Object) -> bool {
    obj.as_dict()
        .and_then(|dict| dict.get(b"Type"))
        .and_then(|ty| ty.as_name())
        .map(|name| name == b"Pages")
        .unwrap_or(false)
}
