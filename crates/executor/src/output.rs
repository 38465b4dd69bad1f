//! Output enum for command execution results.
//!
//! Every command produces exactly one output variant. The mapping is
//! deterministic: the same command always produces the same variant.

use entrystore_engine::DatabaseInfo;
use serde::{Deserialize, Serialize};

/// Successful command execution results.
///
/// ```text
/// match executor.execute(Command::ReadAt { index: 0 })? {
///     Output::Entry(v) => println!("{}", v),
///     _ => unreachable!("ReadAt always returns Entry"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Output {
    /// No return value (append, removals, checkpoint, flush)
    Unit,

    /// A single entry
    Entry(u64),

    /// Every entry in position order
    Entries(Vec<u64>),

    /// Store length
    Len(u64),

    /// Database state summary
    DatabaseInfo(DatabaseInfo),

    /// Ping response
    Pong {
        /// Crate version
        version: String,
    },
}
