//! Source document registry
//!
//! Holds the raw bytes of every loaded source and parses each one lazily, at most
//! once. Parsed handles are shared as `Arc<ParsedSource>`, so an assembly can keep
//! using a source even while the session goes on mutating its catalog.

use crate::document::{ParsedSource, parse_document};
use crate::types::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::OnceCell;

static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// Registry entry for one source.
///
/// Cloning is cheap and shares both the bytes and the parse cell, which is what
/// lets resolution run on a spawned task.
#[derive(Clone)]
struct SourceSlot {
    id: SourceId,
    name: Arc<str>,
    bytes: Arc<[u8]>,
    parsed: Arc<OnceCell<Arc<ParsedSource>>>,
}

impl SourceSlot {
    async fn resolve(self) -> Result<Arc<ParsedSource>> {
        let parsed = self
            .parsed
            .get_or_try_init(|| async {
                log::debug!("Parsing {} ({})", self.name, self.id);
                let (id, name, bytes) = (self.id, self.name.clone(), self.bytes.clone());
                let source =
                    tokio::task::spawn_blocking(move || parse_document(id, &name, &bytes))
                        .await??;
                Ok::<_, RecomposeError>(Arc::new(source))
            })
            .await?;
        Ok(parsed.clone())
    }
}

/// Summary of a registered source
#[derive(Debug, Clone, PartialEq)]
pub struct SourceInfo {
    pub id: SourceId,
    pub name: String,
    pub byte_len: usize,
    /// `None` until the source has been parsed
    pub page_count: Option<usize>,
}

#[derive(Default)]
pub struct SourceRegistry {
    sources: HashMap<SourceId, SourceSlot>,
    order: Vec<SourceId>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` under a new id. Nothing is parsed yet.
    pub fn add_source(&mut self, bytes: Vec<u8>, name: impl Into<String>) -> SourceId {
        let id = SourceId(NEXT_SOURCE_ID.fetch_add(1, Ordering::SeqCst));
        let name: String = name.into();
        log::debug!("Registered {} as {} ({} bytes)", name, id, bytes.len());

        self.sources.insert(
            id,
            SourceSlot {
                id,
                name: name.into(),
                bytes: bytes.into(),
                parsed: Arc::new(OnceCell::new()),
            },
        );
        self.order.push(id);
        id
    }

    /// Drop a source's bytes and parsed handle.
    ///
    /// Handles already given out stay valid until their last `Arc` is dropped.
    pub fn remove_source(&mut self, id: SourceId) -> bool {
        self.order.retain(|existing| *existing != id);
        self.sources.remove(&id).is_some()
    }

    pub fn contains(&self, id: SourceId) -> bool {
        self.sources.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Whether `id` has been parsed already
    pub fn is_resolved(&self, id: SourceId) -> bool {
        self.sources
            .get(&id)
            .map(|slot| slot.parsed.initialized())
            .unwrap_or(false)
    }

    pub fn name(&self, id: SourceId) -> Option<&str> {
        self.sources.get(&id).map(|slot| &*slot.name)
    }

    /// Registered sources in registration order
    pub fn sources(&self) -> Vec<SourceInfo> {
        self.order
            .iter()
            .filter_map(|id| self.sources.get(id))
            .map(|slot| SourceInfo {
                id: slot.id,
                name: slot.name.to_string(),
                byte_len: slot.bytes.len(),
                page_count: slot.parsed.get().map(|parsed| parsed.page_count()),
            })
            .collect()
    }

    /// Parse `id` if needed and return the shared handle.
    ///
    /// Concurrent calls for the same id wait on a single parse.
    pub async fn resolve(&self, id: SourceId) -> Result<Arc<ParsedSource>> {
        let slot = self.slot(id)?;
        if slot.parsed.initialized() {
            log::debug!("Using cached parse of {}", id);
        }
        slot.resolve().await
    }

    /// Resolve several sources concurrently. Results come back in `ids` order.
    pub async fn resolve_many(&self, ids: &[SourceId]) -> Vec<Result<Arc<ParsedSource>>> {
        let mut handles = Vec::with_capacity(ids.len());
        for id in ids {
            handles.push(self.slot(*id).map(|slot| tokio::spawn(slot.resolve())));
        }

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(match handle {
                Ok(handle) => handle.await.map_err(RecomposeError::from).and_then(|r| r),
                Err(e) => Err(e),
            });
        }
        results
    }

    /// Page count of `id`, parsing it first if needed
    pub async fn page_count(&self, id: SourceId) -> Result<usize> {
        Ok(self.resolve(id).await?.page_count())
    }

    fn slot(&self, id: SourceId) -> Result<SourceSlot> {
        self.sources
            .get(&id)
            .cloned()
            .ok_or(RecomposeError::UnknownSource(id))
    }
}
