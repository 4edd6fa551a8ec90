//! Full-catalog assembly

use super::append_page;
use crate::catalog::PageReference;
use crate::document::{OutputDocument, ParsedSource};
use crate::types::*;
use std::collections::HashMap;
use std::sync::Arc;

pub(super) fn assemble_sync(
    pages: &[PageReference],
    sources: &HashMap<SourceId, Arc<ParsedSource>>,
) -> Result<Vec<u8>> {
    let mut output = OutputDocument::new();

    for page in pages {
        let source = sources
            .get(&page.source_id)
            .ok_or(RecomposeError::UnknownSource(page.source_id))?;
        append_page(&mut output, source, page.source_page_index, page.rotation)?;
    }

    log::debug!("Serializing {} assembled pages", output.page_count());
    output.to_bytes()
}
