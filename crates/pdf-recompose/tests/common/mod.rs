#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Options for a generated test document
pub struct TestPdf<'a> {
    pub label: &'a str,
    pub pages: usize,
    pub size: (i64, i64),
    pub rotate: Option<i64>,
    /// Give every page one text annotation pointing back at it
    pub annotated: bool,
    /// Put MediaBox, Resources and Rotate on the `/Pages` node instead of each page
    pub inherited: bool,
}

impl<'a> TestPdf<'a> {
    pub fn new(label: &'a str, pages: usize) -> Self {
        Self {
            label,
            pages,
            size: (612, 792),
            rotate: None,
            annotated: false,
            inherited: false,
        }
    }

    pub fn size(mut self, width: i64, height: i64) -> Self {
        self.size = (width, height);
        self
    }

    pub fn rotate(mut self, degrees: i64) -> Self {
        self.rotate = Some(degrees);
        self
    }

    pub fn annotated(mut self) -> Self {
        self.annotated = true;
        self
    }

    pub fn inherited(mut self) -> Self {
        self.inherited = true;
        self
    }

    /// Serialized document; page N's content stream is `% <label><N>`.
    pub fn bytes(&self) -> Vec<u8> {
        let mut doc = self.document();
        let mut writer = Vec::new();
        doc.save_to(&mut writer).unwrap();
        writer
    }

    pub fn document(&self) -> Document {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(b"Helvetica".to_vec())),
        ]));

        let mut inheritable = Dictionary::from_iter(vec![
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(self.size.0),
                    Object::Integer(self.size.1),
                ]),
            ),
            (
                "Resources",
                Object::Dictionary(Dictionary::from_iter(vec![(
                    "Font",
                    Object::Dictionary(Dictionary::from_iter(vec![(
                        "F1",
                        Object::Reference(font_id),
                    )])),
                )])),
            ),
        ]);
        if let Some(rotate) = self.rotate {
            inheritable.set("Rotate", Object::Integer(rotate));
        }

        let mut kids = Vec::new();
        for n in 0..self.pages {
            let content = format!("% {}{}\nq Q", self.label, n);
            let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
            let page_id = doc.new_object_id();

            let mut page = Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(pages_id)),
                ("Contents", Object::Reference(content_id)),
            ]);
            if !self.inherited {
                for (key, value) in inheritable.iter() {
                    page.set(key.clone(), value.clone());
                }
            }
            if self.annotated {
                let annot_id = doc.add_object(Dictionary::from_iter(vec![
                    ("Type", Object::Name(b"Annot".to_vec())),
                    ("Subtype", Object::Name(b"Text".to_vec())),
                    (
                        "Rect",
                        Object::Array(vec![
                            Object::Integer(10),
                            Object::Integer(10),
                            Object::Integer(30),
                            Object::Integer(30),
                        ]),
                    ),
                    (
                        "Contents",
                        Object::string_literal(format!("{}{}", self.label, n)),
                    ),
                    ("P", Object::Reference(page_id)),
                ]));
                page.set("Annots", Object::Array(vec![Object::Reference(annot_id)]));
            }
            doc.objects.insert(page_id, Object::Dictionary(page));
            kids.push(Object::Reference(page_id));
        }

        let mut pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(self.pages as i64)),
        ]);
        if self.inherited {
            for (key, value) in inheritable.iter() {
                pages_dict.set(key.clone(), value.clone());
            }
        }
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        doc.trailer.set("Root", catalog_id);

        doc
    }
}

/// Page ids of a serialized document, in page order
pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().values().copied().collect()
}

/// The `% <label><N>` marker of every page, in page order
pub fn page_markers(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    page_ids(&doc)
        .into_iter()
        .map(|id| {
            let content = doc.get_page_content(id).unwrap();
            let text = String::from_utf8_lossy(&content);
            text.lines()
                .next()
                .unwrap_or_default()
                .trim_start_matches("% ")
                .to_string()
        })
        .collect()
}

/// The `/Rotate` of every page, in page order (0 when absent)
pub fn page_rotations(bytes: &[u8]) -> Vec<i64> {
    let doc = Document::load_mem(bytes).unwrap();
    page_ids(&doc)
        .into_iter()
        .map(|id| {
            doc.get_dictionary(id)
                .unwrap()
                .get(b"Rotate")
                .and_then(|obj| obj.as_i64())
                .unwrap_or(0)
        })
        .collect()
}

/// `(annotation id, its /P target)` for every page, in page order
pub fn page_annotations(bytes: &[u8]) -> Vec<Vec<(ObjectId, ObjectId)>> {
    let doc = Document::load_mem(bytes).unwrap();
    page_ids(&doc)
        .into_iter()
        .map(|page_id| {
            let page = doc.get_dictionary(page_id).unwrap();
            let Ok(annots) = page.get(b"Annots").and_then(|a| a.as_array()) else {
                return Vec::new();
            };
            annots
                .iter()
                .map(|annot| {
                    let annot_id = annot.as_reference().unwrap();
                    let target = doc
                        .get_dictionary(annot_id)
                        .unwrap()
                        .get(b"P")
                        .and_then(|p| p.as_reference())
                        .unwrap();
                    (annot_id, target)
                })
                .collect()
        })
        .collect()
}
