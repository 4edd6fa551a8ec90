//! Range extraction from a single source

use super::append_page;
use crate::document::{OutputDocument, ParsedSource};
use crate::types::*;

pub(super) fn extract_range_sync(source: &ParsedSource, range: &[usize]) -> Result<Vec<u8>> {
    if range.is_empty() {
        return Err(RecomposeError::EmptyPlan);
    }

    let mut output = OutputDocument::new();
    for &index in range {
        append_page(&mut output, source, index, Rotation::None)?;
    }
    output.to_bytes()
}
