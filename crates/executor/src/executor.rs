//! The Executor - single entry point to the engine.
//!
//! The Executor is a stateless dispatcher that routes commands to the
//! matching handler and converts results to outputs.

use std::sync::Arc;

use entrystore_core::RemovalPolicy;
use entrystore_engine::Database;
use tracing::debug;

use crate::handlers::{database, entries};
use crate::{Command, Output, Result};

/// The command executor.
///
/// The Executor is **stateless**: it holds a reference to the database but
/// keeps no state of its own.
///
/// # Thread Safety
///
/// Executor is `Send + Sync` and can be shared across threads.
///
/// # Example
///
/// ```ignore
/// use entrystore_executor::{Command, Executor};
/// use entrystore_engine::Database;
///
/// let executor = Executor::new(Database::cache());
///
/// executor.execute(Command::Append { value: 7 })?;
///
/// let results = executor.execute_many(vec![
///     Command::ReadAt { index: 0 },
///     Command::ReadAt { index: 1 },
/// ]);
/// ```
pub struct Executor {
    db: Arc<Database>,
}

impl Executor {
    /// Create a new executor wrapping a database.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// The wrapped database.
    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// Execute a single command.
    pub fn execute(&self, cmd: Command) -> Result<Output> {
        let name = cmd.name();
        let result = self.dispatch(cmd);
        if let Err(ref e) = result {
            debug!(target: "entrystore::executor", command = name, error = %e, "Command failed");
        }
        result
    }

    fn dispatch(&self, cmd: Command) -> Result<Output> {
        match cmd {
            // Entries
            Command::Append { value } => entries::append(&self.db, value),
            Command::ReadAll => entries::read_all(&self.db),
            Command::ReadAt { index } => entries::read_at(&self.db, index),
            Command::Len => entries::len(&self.db),
            Command::RemoveLeavingGaps { index } => {
                entries::remove(&self.db, RemovalPolicy::LeaveGap, index)
            }
            Command::RemoveShiftCompact { index } => {
                entries::remove(&self.db, RemovalPolicy::ShiftCompact, index)
            }
            Command::RemoveSwapCompact { index } => {
                entries::remove(&self.db, RemovalPolicy::SwapCompact, index)
            }

            // Database
            Command::Ping => database::ping(),
            Command::Info => database::info(&self.db),
            Command::Checkpoint => database::checkpoint(&self.db),
            Command::Flush => database::flush(&self.db),
        }
    }

    /// Execute multiple commands sequentially.
    ///
    /// Each command runs independently: a failure does not stop the batch.
    /// Results are returned in command order.
    pub fn execute_many(&self, cmds: Vec<Command>) -> Vec<Result<Output>> {
        cmds.into_iter().map(|cmd| self.execute(cmd)).collect()
    }
}
