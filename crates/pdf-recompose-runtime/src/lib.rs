use std::path::PathBuf;

mod handlers;
mod worker;

pub use worker::{spawn_worker, worker_task};

// Re-export types from the library crate
pub use pdf_recompose::{Direction, PageId, PageListing, SourceId};

/// Commands sent from UI to worker
#[derive(Debug)]
pub enum RecomposeCommand {
    AddSource {
        name: String,
        bytes: Vec<u8>,
    },
    LoadFile {
        path: PathBuf,
    },
    ListPages,
    MovePage {
        page_id: PageId,
        direction: Direction,
    },
    DragPage {
        from: usize,
        to: usize,
    },
    RotatePage {
        page_id: PageId,
        degrees: i32,
    },
    RemovePage {
        page_id: PageId,
    },
    Advise,
    Assemble,
    AssembleRanges {
        source_id: SourceId,
        ranges: Vec<Vec<usize>>,
    },
}

/// Updates sent from worker to UI
#[derive(Debug, Clone)]
pub enum RecomposeUpdate {
    Progress {
        operation: String,
        current: usize,
        total: usize,
    },
    SourceAdded {
        source_id: SourceId,
        name: String,
        page_count: usize,
    },
    PagesChanged {
        pages: Vec<PageListing>,
    },
    Advisories {
        messages: Vec<String>,
    },
    Assembled {
        bytes: Vec<u8>,
    },
    RangesAssembled {
        /// One entry per requested range, in request order
        outputs: Vec<Result<Vec<u8>, String>>,
    },
    Error {
        message: String,
    },
}
