//! Database engine for EntryStore
//!
//! This crate orchestrates the lower layers:
//! - Database: open/close, the mutation path, checkpoints
//! - Recovery: checkpoint load plus WAL replay on open
//! - Configuration: `entrystore.toml` and the fluent builder
//!
//! The engine is the only component that knows about both the in-memory
//! store and the write-ahead log.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod database;
pub mod recovery;

pub use database::{Database, DatabaseBuilder, DatabaseConfig, DatabaseInfo, CONFIG_FILE_NAME};
pub use recovery::{RecoveredState, RecoveryStats};
