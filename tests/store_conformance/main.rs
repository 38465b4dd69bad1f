//! End-to-end conformance tests for the entry store.
//!
//! Every scenario runs against an on-disk database and is checked again
//! after a reopen, so the in-memory result and the recovered result must
//! agree.

mod common;

mod errors;
mod persistence;
mod policies;
