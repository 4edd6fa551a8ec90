pub mod assembly;
mod catalog;
pub mod constants;
mod diagnostics;
pub mod document;
mod io;
mod options;
mod ranges;
mod reorder;
mod session;
mod source;
mod types;

pub use assembly::{AssemblyPlan, RangeOutput, assemble, assemble_ranges};
pub use catalog::{CatalogSnapshot, PageCatalog, PageReference};
pub use diagnostics::{Advisory, analyze};
pub use document::{OutputDocument, ParsedSource, parse_document};
pub use io::{display_name, load_pdf_bytes, save_pdf_bytes};
pub use options::*;
pub use ranges::{SplitMode, check_disjoint, parse_ranges};
pub use reorder::{Direction, DragGesture};
pub use session::{PageListing, PreviewHandle, Session};
pub use source::{SourceInfo, SourceRegistry};
pub use types::*;
