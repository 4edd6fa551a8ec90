//! Assembly - copying referenced pages into new documents
//!
//! Two plans share one copy-and-serialize path:
//! 1. A catalog snapshot: pages from any number of sources, in catalog order
//! 2. Ranges over a single source: one independent output per range
//!
//! Every output is built on a blocking thread and either completes or yields no
//! bytes at all. Neither the catalog nor the registry is modified.

mod extract;
mod merge;

use crate::catalog::{CatalogSnapshot, PageReference};
use crate::document::{OutputDocument, ParsedSource};
use crate::ranges::check_disjoint;
use crate::source::SourceRegistry;
use crate::types::*;
use std::collections::HashMap;
use std::sync::Arc;

/// What to assemble
#[derive(Debug, Clone)]
pub enum AssemblyPlan {
    /// Every page of a catalog snapshot, in order
    Catalog(CatalogSnapshot),
    /// One output per range of page indices of a single source
    Ranges {
        source_id: SourceId,
        ranges: Vec<Vec<usize>>,
    },
}

/// Result of one output of a range plan
pub type RangeOutput = Result<Vec<u8>>;

/// Assemble a catalog snapshot into a single document.
pub async fn assemble(snapshot: CatalogSnapshot, registry: &SourceRegistry) -> Result<Vec<u8>> {
    if snapshot.is_empty() {
        return Err(RecomposeError::EmptyPlan);
    }

    let sources = resolve_sources(&snapshot, registry).await?;
    log::info!(
        "Assembling {} pages from {} sources",
        snapshot.len(),
        sources.len()
    );

    tokio::task::spawn_blocking(move || merge::assemble_sync(&snapshot, &sources))
        .await?
        .map_err(into_assembly_failure)
}

/// Assemble one document per range of `source_id`.
///
/// The outer error covers the plan as a whole (no ranges, overlapping ranges,
/// unreadable source). A range that fails on its own is reported in its slot and
/// does not affect the others.
pub async fn assemble_ranges(
    registry: &SourceRegistry,
    source_id: SourceId,
    ranges: Vec<Vec<usize>>,
) -> Result<Vec<RangeOutput>> {
    if ranges.is_empty() {
        return Err(RecomposeError::EmptyPlan);
    }
    check_disjoint(&ranges)?;

    let source = registry.resolve(source_id).await?;
    log::info!(
        "Extracting {} ranges from {}",
        ranges.len(),
        source.name()
    );

    let handles: Vec<_> = ranges
        .into_iter()
        .map(|range| {
            let source = source.clone();
            tokio::task::spawn_blocking(move || extract::extract_range_sync(&source, &range))
        })
        .collect();

    let mut outputs = Vec::with_capacity(handles.len());
    for (n, handle) in handles.into_iter().enumerate() {
        let output = match handle.await {
            Ok(result) => result.map_err(into_assembly_failure),
            Err(e) => Err(RecomposeError::from(e)),
        };
        if let Err(e) = &output {
            log::warn!("Range {} failed: {}", n + 1, e);
        }
        outputs.push(output);
    }
    Ok(outputs)
}

/// Run either kind of plan, producing one entry per output.
pub async fn execute(plan: AssemblyPlan, registry: &SourceRegistry) -> Result<Vec<RangeOutput>> {
    match plan {
        AssemblyPlan::Catalog(snapshot) => Ok(vec![assemble(snapshot, registry).await]),
        AssemblyPlan::Ranges { source_id, ranges } => {
            assemble_ranges(registry, source_id, ranges).await
        }
    }
}

/// Resolve each distinct source of the snapshot once.
async fn resolve_sources(
    snapshot: &[PageReference],
    registry: &SourceRegistry,
) -> Result<Arc<HashMap<SourceId, Arc<ParsedSource>>>> {
    let mut ids: Vec<SourceId> = Vec::new();
    for page in snapshot {
        if !ids.contains(&page.source_id) {
            ids.push(page.source_id);
        }
    }

    let mut sources = HashMap::with_capacity(ids.len());
    for (id, resolved) in ids.iter().zip(registry.resolve_many(&ids).await) {
        let source = resolved.map_err(into_assembly_failure)?;
        sources.insert(*id, source);
    }
    Ok(Arc::new(sources))
}

/// Copy `index` of `source` into `output` and compose `rotation` onto it.
fn append_page(
    output: &mut OutputDocument,
    source: &ParsedSource,
    index: usize,
    rotation: Rotation,
) -> Result<()> {
    let page_id = output.copy_page(source, index)?;
    output.rotate_page(page_id, rotation)
}

fn into_assembly_failure(error: RecomposeError) -> RecomposeError {
    match error {
        RecomposeError::AssemblyFailed(_) | RecomposeError::EmptyPlan => error,
        other => RecomposeError::AssemblyFailed(other.to_string()),
    }
}
