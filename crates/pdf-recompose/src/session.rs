//! The session: one registry, one catalog, one controlling owner
//!
//! Mutations take `&mut self` and assembly takes `&self` with a snapshot captured
//! before its first await, so an in-flight assembly can never observe a catalog
//! change.

use crate::assembly::{self, RangeOutput};
use crate::catalog::{PageCatalog, PageReference};
use crate::diagnostics::{Advisory, analyze};
use crate::io::{display_name, load_pdf_bytes};
use crate::options::{MergeOptions, SplitOptions};
use crate::reorder::Direction;
use crate::source::{SourceInfo, SourceRegistry};
use crate::types::*;

/// Opaque key a preview renderer can use to draw a thumbnail of a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewHandle {
    pub source_id: SourceId,
    pub page_index: usize,
}

/// A catalog entry as shown to the user
#[derive(Debug, Clone, PartialEq)]
pub struct PageListing {
    pub page_id: PageId,
    pub source_label: String,
    pub rotation: Rotation,
    pub preview: PreviewHandle,
}

impl From<&PageReference> for PageListing {
    fn from(page: &PageReference) -> Self {
        Self {
            page_id: page.id,
            source_label: page.label.clone(),
            rotation: page.rotation,
            preview: PreviewHandle {
                source_id: page.source_id,
                page_index: page.source_page_index,
            },
        }
    }
}

#[derive(Default)]
pub struct Session {
    registry: SourceRegistry,
    catalog: PageCatalog,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a session from a merge configuration.
    ///
    /// With an empty page list every input is appended whole; otherwise exactly
    /// the listed pages are appended, in the listed order.
    pub async fn from_merge_options(options: &MergeOptions) -> Result<Self> {
        options.validate()?;

        let mut files = Vec::with_capacity(options.input_files.len());
        for path in &options.input_files {
            files.push((display_name(path), load_pdf_bytes(path).await?));
        }

        let mut session = Self::new();
        if options.pages.is_empty() {
            for result in session.add_sources(files).await {
                result?;
            }
            return Ok(session);
        }

        let mut ids = Vec::with_capacity(files.len());
        for (name, bytes) in files {
            ids.push(session.register_source(bytes, name).await?);
        }
        for spec in &options.pages {
            let source_id = ids[spec.file - 1];
            session
                .append_page(source_id, spec.page - 1, spec.rotation)
                .await?;
        }
        Ok(session)
    }

    /// Split one file according to `options`, one output per range.
    pub async fn split(options: &SplitOptions) -> Result<Vec<RangeOutput>> {
        let bytes = load_pdf_bytes(&options.input_file).await?;
        let mut session = Self::new();
        let id = session
            .register_source(bytes, display_name(&options.input_file))
            .await?;
        let page_count = session.registry.page_count(id).await?;
        let ranges = options.mode.to_ranges(page_count)?;
        session.assemble_ranges(id, ranges).await
    }

    pub fn catalog(&self) -> &PageCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn sources(&self) -> Vec<SourceInfo> {
        self.registry.sources()
    }

    /// Load a source and append all of its pages to the catalog.
    ///
    /// A source that does not parse is dropped again and the catalog is left
    /// exactly as it was.
    pub async fn add_source(&mut self, bytes: Vec<u8>, name: impl Into<String>) -> Result<SourceId> {
        let id = self.register_source(bytes, name).await?;
        self.append_source_pages(id).await?;
        Ok(id)
    }

    /// Load several sources, parsing them concurrently.
    ///
    /// Pages are appended in the order the files were given, whatever order the
    /// parses finish in. Each file gets its own result.
    pub async fn add_sources(&mut self, files: Vec<(String, Vec<u8>)>) -> Vec<Result<SourceId>> {
        let ids: Vec<SourceId> = files
            .into_iter()
            .map(|(name, bytes)| self.registry.add_source(bytes, name))
            .collect();

        let resolved = self.registry.resolve_many(&ids).await;

        let mut results = Vec::with_capacity(ids.len());
        for (id, parsed) in ids.into_iter().zip(resolved) {
            match parsed {
                Ok(source) => {
                    let added = self.catalog.append_source(&source);
                    log::info!("Added {} ({} pages)", source.name(), added.len());
                    results.push(Ok(id));
                }
                Err(e) => {
                    log::warn!("Dropping unreadable source {}: {}", id, e);
                    self.registry.remove_source(id);
                    results.push(Err(e));
                }
            }
        }
        results
    }

    /// Load and parse a source without adding any of its pages to the catalog.
    pub async fn register_source(
        &mut self,
        bytes: Vec<u8>,
        name: impl Into<String>,
    ) -> Result<SourceId> {
        let id = self.registry.add_source(bytes, name);
        if let Err(e) = self.registry.resolve(id).await {
            log::warn!("Dropping unreadable source {}: {}", id, e);
            self.registry.remove_source(id);
            return Err(e);
        }
        Ok(id)
    }

    /// Append every page of an already registered source.
    pub async fn append_source_pages(&mut self, id: SourceId) -> Result<Vec<PageId>> {
        let source = self.registry.resolve(id).await?;
        let added = self.catalog.append_source(&source);
        log::info!("Added {} ({} pages)", source.name(), added.len());
        Ok(added)
    }

    /// Append one page of a registered source (0-based `index`).
    pub async fn append_page(
        &mut self,
        id: SourceId,
        index: usize,
        rotation: Rotation,
    ) -> Result<PageId> {
        let source = self.registry.resolve(id).await?;
        self.catalog.append_page(&source, index, rotation)
    }

    pub fn list_pages(&self) -> Vec<PageListing> {
        self.catalog.iter().map(PageListing::from).collect()
    }

    pub fn move_page(&mut self, id: PageId, direction: Direction) -> bool {
        self.catalog.move_one_step(id, direction)
    }

    pub fn drag_page(&mut self, from: usize, to: usize) -> bool {
        self.catalog.drag_to(from, to)
    }

    pub fn rotate_page(&mut self, id: PageId, degrees: i32) -> Result<bool> {
        self.catalog.rotate(id, degrees)
    }

    pub fn remove_page(&mut self, id: PageId) -> bool {
        self.catalog.remove(id)
    }

    pub fn analyze(&self) -> Vec<Advisory> {
        analyze(&self.catalog)
    }

    pub fn advisories(&self) -> Vec<String> {
        self.analyze().iter().map(ToString::to_string).collect()
    }

    /// Assemble the catalog as it is right now.
    pub async fn assemble(&self) -> Result<Vec<u8>> {
        let snapshot = self.catalog.snapshot();
        assembly::assemble(snapshot, &self.registry).await
    }

    /// Extract ranges of one registered source into separate documents.
    pub async fn assemble_ranges(
        &self,
        id: SourceId,
        ranges: Vec<Vec<usize>>,
    ) -> Result<Vec<RangeOutput>> {
        assembly::assemble_ranges(&self.registry, id, ranges).await
    }
}
