//! EntrySnapshot: immutable point-in-time copy of the store
//!
//! Snapshots copy the entries at creation time and never observe later
//! mutations. They are cheap to clone (the copy is shared behind an `Arc`)
//! and safe to hand across threads.

use std::ops::Deref;
use std::sync::Arc;

use entrystore_core::Entry;

/// Immutable copy of the store's entries at a given `seq`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySnapshot {
    seq: u64,
    entries: Arc<[Entry]>,
}

impl EntrySnapshot {
    /// Copy `entries` into a new snapshot taken at `seq`
    pub fn new(seq: u64, entries: &[Entry]) -> Self {
        EntrySnapshot {
            seq,
            entries: Arc::from(entries),
        }
    }

    /// Number of mutations reflected in this snapshot
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Number of positions
    pub fn len(&self) -> u64 {
        self.entries.len() as u64
    }

    /// True if the snapshot holds no positions
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value at `index`, if present
    pub fn get(&self, index: u64) -> Option<Entry> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.entries.get(i).copied())
    }

    /// Owned copy of the entries
    pub fn to_vec(&self) -> Vec<Entry> {
        self.entries.to_vec()
    }
}

impl Deref for EntrySnapshot {
    type Target = [Entry];

    fn deref(&self) -> &[Entry] {
        &self.entries
    }
}
