//! EntryStore: ordered mutable sequence of entries
//!
//! ## Operations
//!
//! | Operation | Length | Failure |
//! |-----------|--------|---------|
//! | `append` | +1 | `LimitExceeded` only when a cap is configured |
//! | `read_at` | - | `OutOfBounds` when `index >= len` |
//! | `remove_leaving_gaps` | 0 | `InvalidIndex` when `index >= len` |
//! | `remove_shift_compact` | -1 | `InvalidIndex` when `index >= len` |
//! | `remove_swap_compact` | -1 | `EmptyStore` when `len == 0`, else `InvalidIndex` |
//!
//! ## Atomicity
//!
//! Every mutation is checked in full before the backing vector is touched,
//! so a rejected call leaves the store byte-for-byte unchanged.
//!
//! ## Sequence numbers
//!
//! `seq` counts applied mutations. It is the watermark a checkpoint records
//! and the id each log record carries.

use entrystore_core::{Entry, Error, Limits, Mutation, RemovalPolicy, Result};

use crate::snapshot::EntrySnapshot;

/// Ordered, append-grown sequence of entries
#[derive(Debug, Clone, Default)]
pub struct EntryStore {
    entries: Vec<Entry>,
    limits: Limits,
    seq: u64,
}

impl EntryStore {
    /// Create an empty store with no limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with the given limits
    pub fn with_limits(limits: Limits) -> Self {
        EntryStore {
            entries: Vec::new(),
            limits,
            seq: 0,
        }
    }

    /// Rebuild a store from a checkpointed image.
    ///
    /// `seq` is the number of mutations the image reflects. Limits are not
    /// re-checked against the image: a lowered cap only blocks future appends.
    pub fn from_parts(entries: Vec<Entry>, seq: u64, limits: Limits) -> Self {
        EntryStore {
            entries,
            limits,
            seq,
        }
    }

    /// Number of positions, gaps included
    pub fn len(&self) -> u64 {
        self.entries.len() as u64
    }

    /// True when no positions exist
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of mutations applied so far
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Configured limits
    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Borrow the current entries
    pub fn as_slice(&self) -> &[Entry] {
        &self.entries
    }

    // ========== Reads ==========

    /// Copy of every position, gaps read back as zero
    pub fn read_all(&self) -> Vec<Entry> {
        self.entries.clone()
    }

    /// Immutable point-in-time view tagged with the current `seq`
    pub fn snapshot(&self) -> EntrySnapshot {
        EntrySnapshot::new(self.seq, &self.entries)
    }

    /// Value at `index`
    pub fn read_at(&self, index: u64) -> Result<Entry> {
        self.slot(index)
            .map(|i| self.entries[i])
            .ok_or(Error::OutOfBounds {
                index,
                len: self.len(),
            })
    }

    // ========== Mutations ==========

    /// Push `value` onto the end
    pub fn append(&mut self, value: Entry) -> Result<()> {
        self.apply(Mutation::Append(value))
    }

    /// Zero the slot at `index`; length unchanged
    pub fn remove_leaving_gaps(&mut self, index: u64) -> Result<()> {
        self.apply(Mutation::remove(RemovalPolicy::LeaveGap, index))
    }

    /// Remove the slot at `index` and shift the tail toward the front
    pub fn remove_shift_compact(&mut self, index: u64) -> Result<()> {
        self.apply(Mutation::remove(RemovalPolicy::ShiftCompact, index))
    }

    /// Move the last entry into `index` and drop the last position
    pub fn remove_swap_compact(&mut self, index: u64) -> Result<()> {
        self.apply(Mutation::remove(RemovalPolicy::SwapCompact, index))
    }

    /// Remove the entry at `index` under `policy`
    pub fn remove(&mut self, policy: RemovalPolicy, index: u64) -> Result<()> {
        self.apply(Mutation::remove(policy, index))
    }

    /// Check a mutation against the current state without applying it.
    pub fn validate(&self, mutation: &Mutation) -> Result<()> {
        match *mutation {
            Mutation::Append(_) => self.limits.check_append(self.len()),
            Mutation::Remove { policy, index } => {
                if policy == RemovalPolicy::SwapCompact && self.is_empty() {
                    return Err(Error::EmptyStore);
                }
                match self.slot(index) {
                    Some(_) => Ok(()),
                    None => Err(Error::InvalidIndex {
                        index,
                        len: self.len(),
                    }),
                }
            }
        }
    }

    /// Validate and apply a mutation as one step.
    pub fn apply(&mut self, mutation: Mutation) -> Result<()> {
        self.validate(&mutation)?;
        self.apply_validated(mutation);
        Ok(())
    }

    /// Apply a mutation that has already passed [`validate`](Self::validate)
    /// against the current state.
    ///
    /// # Panics
    ///
    /// Panics if a removal index is out of range. Debug builds re-run
    /// `validate` and panic on any mutation it rejects.
    pub fn apply_validated(&mut self, mutation: Mutation) {
        debug_assert!(
            self.validate(&mutation).is_ok(),
            "apply_validated called with a mutation that fails validation: {:?}",
            mutation
        );
        match mutation {
            Mutation::Append(value) => self.entries.push(value),
            Mutation::Remove { policy, index } => {
                let i = index as usize;
                match policy {
                    RemovalPolicy::LeaveGap => self.entries[i] = 0,
                    RemovalPolicy::ShiftCompact => {
                        self.entries.remove(i);
                    }
                    // swap_remove only pops when `i` is the last position
                    RemovalPolicy::SwapCompact => {
                        self.entries.swap_remove(i);
                    }
                }
            }
        }
        self.seq += 1;
    }

    /// Position of `index` in the backing vector, if it is in range
    fn slot(&self, index: u64) -> Option<usize> {
        if index < self.len() {
            Some(index as usize)
        } else {
            None
        }
    }
}
