//! EntryStore - durable ordered store of unsigned integers
//!
//! EntryStore keeps a growable sequence of `u64` entries and offers three
//! ways to remove one, each with a different cost/order trade-off:
//!
//! | Policy | Length | Order |
//! |--------|--------|-------|
//! | leave gap | unchanged | positions stable, slot zeroed |
//! | shift compact | -1 | preserved |
//! | swap compact | -1 | last entry moves into the hole |
//!
//! # Quick Start
//!
//! ```ignore
//! use entrystore::Database;
//!
//! let db = Database::open("/path/to/data")?;
//! db.append(10)?;
//! db.append(20)?;
//! db.append(30)?;
//! db.remove_swap_compact(0)?;
//! assert_eq!(db.read_all(), vec![30, 20]);
//! ```
//!
//! # Architecture
//!
//! - [`Database`]: durable, thread-safe handle (WAL + checkpoints)
//! - [`Executor`]: serializable [`Command`]/[`Output`] interface
//! - [`EntryStore`]: the in-memory structure, usable on its own

pub use entrystore_core::{Entry, Error, Limits, Mutation, RemovalPolicy, Result};
pub use entrystore_durability::DurabilityMode;
pub use entrystore_engine::{Database, DatabaseBuilder, DatabaseConfig, DatabaseInfo};
pub use entrystore_executor::{Command, Executor, Output};
pub use entrystore_storage::{EntrySnapshot, EntryStore};

/// Structured, serializable errors returned by the [`Executor`].
pub use entrystore_executor::Error as CommandError;
