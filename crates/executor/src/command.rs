//! Command enum defining all EntryStore operations.
//!
//! Commands are the instruction set of the executor. Every operation that
//! can be performed on a database is a variant here. Commands are plain
//! data and serialize to/from JSON, one per line in the CLI's pipe mode.

use serde::{Deserialize, Serialize};

/// A self-contained, serializable operation.
///
/// # Command Categories
///
/// | Category | Count | Description |
/// |----------|-------|-------------|
/// | Entries | 7 | Append, read, remove |
/// | Database | 4 | Ping, info, checkpoint, flush |
///
/// # JSON form
///
/// ```text
/// "Ping"
/// {"Append": {"value": 42}}
/// {"RemoveSwapCompact": {"index": 0}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Command {
    // ==================== Entries (7) ====================
    /// Push a value onto the end.
    /// Returns: `Output::Unit`
    Append {
        /// Value to store
        value: u64,
    },

    /// Every entry in position order.
    /// Returns: `Output::Entries`
    ReadAll,

    /// Entry at one position.
    /// Returns: `Output::Entry`
    ReadAt {
        /// Position to read
        index: u64,
    },

    /// Number of entries.
    /// Returns: `Output::Len`
    Len,

    /// Zero the entry at `index`, keeping the length.
    /// Returns: `Output::Unit`
    RemoveLeavingGaps {
        /// Position to clear
        index: u64,
    },

    /// Remove the entry at `index`, shifting later entries forward.
    /// Returns: `Output::Unit`
    RemoveShiftCompact {
        /// Position to remove
        index: u64,
    },

    /// Remove the entry at `index` by moving the last entry into its place.
    /// Returns: `Output::Unit`
    RemoveSwapCompact {
        /// Position to remove
        index: u64,
    },

    // ==================== Database (4) ====================
    /// Liveness check.
    /// Returns: `Output::Pong`
    Ping,

    /// Database state summary.
    /// Returns: `Output::DatabaseInfo`
    Info,

    /// Write a checkpoint and prune the WAL.
    /// Returns: `Output::Unit`
    Checkpoint,

    /// Force logged mutations to disk.
    /// Returns: `Output::Unit`
    Flush,
}

impl Command {
    /// Whether executing this command can change the entries.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::Append { .. }
                | Command::RemoveLeavingGaps { .. }
                | Command::RemoveShiftCompact { .. }
                | Command::RemoveSwapCompact { .. }
        )
    }

    /// Variant name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Append { .. } => "Append",
            Command::ReadAll => "ReadAll",
            Command::ReadAt { .. } => "ReadAt",
            Command::Len => "Len",
            Command::RemoveLeavingGaps { .. } => "RemoveLeavingGaps",
            Command::RemoveShiftCompact { .. } => "RemoveShiftCompact",
            Command::RemoveSwapCompact { .. } => "RemoveSwapCompact",
            Command::Ping => "Ping",
            Command::Info => "Info",
            Command::Checkpoint => "Checkpoint",
            Command::Flush => "Flush",
        }
    }
}
