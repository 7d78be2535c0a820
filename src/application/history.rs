// Undo history - LIFO of layout and stash snapshots
use crate::domain::layout::Layout;
use crate::domain::stash::Stash;
use std::sync::Arc;

/// Layout and stash as they were before a layout command ran.
///
/// Both parts are shared with the revision they came from, so recording an
/// entry never copies the document.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoEntry {
    pub layout: Arc<Layout>,
    pub stash: Arc<Stash>,
    pub command: &'static str,
    pub correlation_id: String,
}

#[derive(Debug, Default, Clone)]
pub struct UndoHistory {
    entries: Vec<UndoEntry>,
}

impl UndoHistory {
    pub fn push(&mut self, entry: UndoEntry) {
        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> Option<UndoEntry> {
        self.entries.pop()
    }

    pub fn peek(&self) -> Option<&UndoEntry> {
        self.entries.last()
    }

    /// Entries from the newest to the oldest.
    pub fn newest_first(&self) -> impl Iterator<Item = &UndoEntry> {
        self.entries.iter().rev()
    }

    /// Drops the newest `count` entries and returns the oldest one dropped.
    pub fn pop_many(&mut self, count: usize) -> Option<UndoEntry> {
        let keep = self.entries.len().saturating_sub(count);
        self.entries.drain(keep..).next()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
