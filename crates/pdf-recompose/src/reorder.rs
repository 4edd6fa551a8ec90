//! Reordering operations on the page catalog
//!
//! All operations are total: out-of-range indices and unknown ids leave the
//! catalog unchanged instead of failing.

use crate::catalog::PageCatalog;
use crate::types::PageId;

/// Direction of a single-step move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Towards the start of the document
    Left,
    /// Towards the end of the document
    Right,
}

impl PageCatalog {
    /// Swap the entry with its neighbour in `direction`.
    ///
    /// Returns `false` at either boundary or for an unknown id.
    pub fn move_one_step(&mut self, id: PageId, direction: Direction) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let target = match direction {
            Direction::Left => index.checked_sub(1),
            Direction::Right => Some(index + 1).filter(|&i| i < self.pages.len()),
        };
        match target {
            Some(target) => {
                self.pages.swap(index, target);
                true
            }
            None => false,
        }
    }

    /// Take the entry at `from` out and reinsert it at `to`.
    ///
    /// Entries between the two positions shift by one and keep their relative
    /// order. Returns `false` if nothing moved.
    pub fn drag_to(&mut self, from: usize, to: usize) -> bool {
        let len = self.pages.len();
        if from == to || from >= len || to >= len {
            return false;
        }
        let page = self.pages.remove(from);
        self.pages.insert(to, page);
        true
    }
}

/// Tracks one pointer drag across drop slots.
///
/// Every hover splices the dragged entry into the hovered slot immediately, so
/// the catalog order is always the order on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragGesture {
    current: Option<usize>,
}

impl DragGesture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start dragging the entry at `index`.
    pub fn begin(&mut self, index: usize) {
        self.current = Some(index);
    }

    /// Index of the dragged entry, if a drag is in progress
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// The pointer is over slot `index`. Returns `true` if the catalog changed.
    pub fn hover(&mut self, catalog: &mut PageCatalog, index: usize) -> bool {
        let Some(current) = self.current else {
            return false;
        };
        if catalog.drag_to(current, index) {
            self.current = Some(index);
            true
        } else {
            false
        }
    }

    /// Finish the drag, returning the dragged entry's final index.
    pub fn end(&mut self) -> Option<usize> {
        self.current.take()
    }
}
