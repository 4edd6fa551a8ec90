//! Page range selection for single-source extraction
//!
//! Users write ranges 1-based and inclusive ("1-5, 6-10", "3"); everything past
//! this module works with 0-based page indices.

use crate::types::*;

/// How a single source is split into outputs
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SplitMode {
    /// One output per page
    Individual,
    /// One output per comma-separated range, e.g. "1-2, 3-5"
    Ranges(String),
    /// A single output containing the listed pages (1-based) in document order
    Selection(Vec<usize>),
}

impl SplitMode {
    /// Expand into 0-based index ranges for a source with `page_count` pages.
    pub fn to_ranges(&self, page_count: usize) -> Result<Vec<Vec<usize>>> {
        match self {
            SplitMode::Individual => Ok((0..page_count).map(|i| vec![i]).collect()),
            SplitMode::Ranges(text) => parse_ranges(text, page_count),
            SplitMode::Selection(pages) => {
                if pages.is_empty() {
                    return Err(RecomposeError::InvalidRange("No pages selected".to_string()));
                }
                let mut indices = pages
                    .iter()
                    .map(|&page| to_index(page, page_count))
                    .collect::<Result<Vec<_>>>()?;
                // A selection is a set of pages
                indices.sort_unstable();
                indices.dedup();
                Ok(vec![indices])
            }
        }
    }
}

/// Parse "1-5, 6-10" style ranges into 0-based index lists.
pub fn parse_ranges(text: &str, page_count: usize) -> Result<Vec<Vec<usize>>> {
    let mut ranges = Vec::new();
    for part in text.split(',').map(str::trim) {
        if part.is_empty() {
            continue;
        }
        let (start, end) = match part.split_once('-') {
            Some((start, end)) => (parse_page(start)?, parse_page(end)?),
            None => {
                let page = parse_page(part)?;
                (page, page)
            }
        };
        if start > end {
            return Err(RecomposeError::InvalidRange(format!(
                "Range {part} runs backwards"
            )));
        }
        let first = to_index(start, page_count)?;
        let last = to_index(end, page_count)?;
        ranges.push((first..=last).collect());
    }

    if ranges.is_empty() {
        return Err(RecomposeError::InvalidRange("No ranges given".to_string()));
    }
    check_disjoint(&ranges)?;
    Ok(ranges)
}

/// Fail if any page index appears in more than one place.
pub fn check_disjoint(ranges: &[Vec<usize>]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for index in ranges.iter().flatten() {
        if !seen.insert(*index) {
            return Err(RecomposeError::InvalidRange(format!(
                "Page {} is selected more than once",
                index + 1
            )));
        }
    }
    Ok(())
}

fn parse_page(text: &str) -> Result<usize> {
    text.trim()
        .parse::<usize>()
        .map_err(|_| RecomposeError::InvalidRange(format!("\"{}\" is not a page number", text.trim())))
}

fn to_index(page: usize, page_count: usize) -> Result<usize> {
    if page == 0 || page > page_count {
        return Err(RecomposeError::InvalidRange(format!(
            "Page {page} does not exist (document has {page_count} pages)"
        )));
    }
    Ok(page - 1)
}
