//! Database-level command handlers.

use std::sync::Arc;

use entrystore_engine::Database;

use crate::{Output, Result};

/// Handle Ping command.
pub fn ping() -> Result<Output> {
    Ok(Output::Pong {
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle Info command.
pub fn info(db: &Arc<Database>) -> Result<Output> {
    Ok(Output::DatabaseInfo(db.info()))
}

/// Handle Checkpoint command.
pub fn checkpoint(db: &Arc<Database>) -> Result<Output> {
    db.checkpoint()?;
    Ok(Output::Unit)
}

/// Handle Flush command.
pub fn flush(db: &Arc<Database>) -> Result<Output> {
    db.flush()?;
    Ok(Output::Unit)
}
