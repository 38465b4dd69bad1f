//! Storage layer for EntryStore
//!
//! This crate implements the in-memory structure behind the database:
//! - EntryStore: growable contiguous sequence with three removal policies
//! - EntrySnapshot: immutable point-in-time copy handed to readers
//!
//! The store has no internal locking. Callers that share it across threads
//! must serialise access; the engine does so with a single mutex.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod snapshot;
pub mod store;

pub use snapshot::EntrySnapshot;
pub use store::EntryStore;
