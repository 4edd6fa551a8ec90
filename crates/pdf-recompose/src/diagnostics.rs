//! Advisory checks over the page catalog
//!
//! Nothing here affects assembly; the messages are meant for display.

use crate::catalog::PageCatalog;
use std::collections::HashSet;
use std::fmt;

/// A heterogeneity found among the catalog's pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Advisory {
    /// Both portrait and landscape pages are present
    MixedOrientations,
    /// Pages do not all share the same size
    MixedPageSizes,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::MixedOrientations => {
                f.write_str("Mixed orientations detected (portrait and landscape).")
            }
            Advisory::MixedPageSizes => f.write_str("Multiple page dimensions found."),
        }
    }
}

/// Compare the geometry of every page in the catalog.
pub fn analyze(catalog: &PageCatalog) -> Vec<Advisory> {
    let orientations: HashSet<_> = catalog
        .iter()
        .map(|page| page.geometry.orientation())
        .collect();
    let sizes: HashSet<_> = catalog.iter().map(|page| page.geometry.rounded()).collect();

    let mut advisories = Vec::new();
    if orientations.len() > 1 {
        advisories.push(Advisory::MixedOrientations);
    }
    if sizes.len() > 1 {
        advisories.push(Advisory::MixedPageSizes);
    }
    advisories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::catalog_of;
    use crate::types::PageGeometry;

    #[test]
    fn test_uniform_catalog_has_no_advisories() {
        assert!(analyze(&catalog_of(&[(1, 3), (2, 2)])).is_empty());
        assert!(analyze(&PageCatalog::new()).is_empty());
    }

    #[test]
    fn test_mixed_orientation_and_size() {
        let mut catalog = catalog_of(&[(1, 2)]);
        catalog.pages[1].geometry = PageGeometry::new(792.0, 612.0);

        assert_eq!(
            analyze(&catalog),
            vec![Advisory::MixedOrientations, Advisory::MixedPageSizes]
        );
    }

    #[test]
    fn test_mixed_size_same_orientation() {
        let mut catalog = catalog_of(&[(1, 3)]);
        // A4 portrait next to letter portrait
        catalog.pages[2].geometry = PageGeometry::new(595.28, 841.89);

        assert_eq!(analyze(&catalog), vec![Advisory::MixedPageSizes]);
    }

    #[test]
    fn test_sub_point_differences_are_ignored() {
        let mut catalog = catalog_of(&[(1, 2)]);
        catalog.pages[1].geometry = PageGeometry::new(612.2, 791.9);

        assert!(analyze(&catalog).is_empty());
    }
}
