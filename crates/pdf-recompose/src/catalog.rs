//! The page catalog: an ordered list of references into source documents
//!
//! The catalog is the document the user is building. It never owns document
//! data; each entry names a source by id and a page by index within it.

use crate::document::ParsedSource;
use crate::types::*;
use std::sync::Arc;

/// One page of the virtual document
#[derive(Debug, Clone, PartialEq)]
pub struct PageReference {
    pub id: PageId,
    pub source_id: SourceId,
    /// 0-based page index within the source
    pub source_page_index: usize,
    /// Rotation added on top of the source page's own rotation
    pub rotation: Rotation,
    /// Source file name, for display
    pub label: String,
    /// MediaBox size of the source page, captured when the reference was created
    pub geometry: PageGeometry,
}

/// Immutable copy of the catalog order, taken when an assembly starts
pub type CatalogSnapshot = Arc<[PageReference]>;

#[derive(Debug, Clone, Default)]
pub struct PageCatalog {
    pub(crate) pages: Vec<PageReference>,
    next_page_id: u64,
}

impl PageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn pages(&self) -> &[PageReference] {
        &self.pages
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageReference> {
        self.pages.iter()
    }

    pub fn get(&self, id: PageId) -> Option<&PageReference> {
        self.pages.iter().find(|page| page.id == id)
    }

    /// Current index of `id`
    pub fn position(&self, id: PageId) -> Option<usize> {
        self.pages.iter().position(|page| page.id == id)
    }

    /// Append one reference per page of `source`, in natural page order.
    ///
    /// Existing entries keep their positions.
    pub fn append_source(&mut self, source: &ParsedSource) -> Vec<PageId> {
        let mut added = Vec::with_capacity(source.page_count());
        for index in 0..source.page_count() {
            // Indices come from the source itself, so this cannot fail
            if let Ok(id) = self.append_page(source, index, Rotation::None) {
                added.push(id);
            }
        }
        added
    }

    /// Append a single reference to page `index` of `source`.
    pub fn append_page(
        &mut self,
        source: &ParsedSource,
        index: usize,
        rotation: Rotation,
    ) -> Result<PageId> {
        let geometry = source.page_geometry(index)?;
        let id = self.mint_page_id();
        self.pages.push(PageReference {
            id,
            source_id: source.id(),
            source_page_index: index,
            rotation,
            label: source.name().to_string(),
            geometry,
        });
        Ok(id)
    }

    /// Remove the entry with `id`. Returns `false` (and changes nothing) if absent.
    pub fn remove(&mut self, id: PageId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.pages.remove(index);
                true
            }
            None => false,
        }
    }

    /// Add `degrees` to the entry's rotation. `degrees` must be a multiple of 90.
    ///
    /// Returns `Ok(false)` when `id` is not in the catalog.
    pub fn rotate(&mut self, id: PageId, degrees: i32) -> Result<bool> {
        let delta = Rotation::from_degrees(degrees)?;
        match self.pages.iter_mut().find(|page| page.id == id) {
            Some(page) => {
                page.rotation = page.rotation.compose(delta);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        self.pages.clone().into()
    }

    fn mint_page_id(&mut self) -> PageId {
        self.next_page_id += 1;
        PageId(self.next_page_id)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Build a catalog without parsing any documents: `(source, pages)` pairs
    pub(crate) fn catalog_of(sources: &[(u64, usize)]) -> PageCatalog {
        let mut catalog = PageCatalog::new();
        for &(source, pages) in sources {
            for index in 0..pages {
                let id = catalog.mint_page_id();
                catalog.pages.push(PageReference {
                    id,
                    source_id: SourceId(source),
                    source_page_index: index,
                    rotation: Rotation::None,
                    label: format!("source-{source}.pdf"),
                    geometry: PageGeometry::default(),
                });
            }
        }
        catalog
    }

    /// `(source, index)` pairs in catalog order
    pub(crate) fn order(catalog: &PageCatalog) -> Vec<(u64, usize)> {
        catalog
            .iter()
            .map(|page| (page.source_id.0, page.source_page_index))
            .collect()
    }
}
