use crate::history::types::HistoryEntry;
use std::collections::VecDeque;

/// Append-only log of completed sessions, newest first.
pub trait HistoryStore: Send {
    /// Prepends. Never fails.
    fn append(&mut self, entry: HistoryEntry);
    fn list(&self) -> Vec<&HistoryEntry>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime store. Nothing is written to disk.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    entries: VecDeque<HistoryEntry>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn append(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
    }

    fn list(&self) -> Vec<&HistoryEntry> {
        self.entries.iter().collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
