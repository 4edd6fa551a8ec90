//! Shared constants for page recomposition

// =============================================================================
// Default Page Dimensions
// =============================================================================

/// Default page width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Default page dimensions as tuple (width, height)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);

// =============================================================================
// Output Documents
// =============================================================================

/// PDF version written into assembled documents
pub const OUTPUT_PDF_VERSION: &str = "1.7";

/// Page attributes a page may inherit from its ancestors in the page tree
pub const INHERITABLE_PAGE_KEYS: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Upper bound on page tree depth followed when resolving inherited attributes
pub const MAX_PAGE_TREE_DEPTH: usize = 64;
