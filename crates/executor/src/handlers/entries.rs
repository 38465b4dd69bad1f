//! Entry command handlers.
//!
//! Reads and the three removal policies. Each handler is a thin call into
//! the engine; rejections come back as structured errors with the store
//! unchanged.

use std::sync::Arc;

use entrystore_core::RemovalPolicy;
use entrystore_engine::Database;

use crate::{Output, Result};

/// Handle Append command.
pub fn append(db: &Arc<Database>, value: u64) -> Result<Output> {
    db.append(value)?;
    Ok(Output::Unit)
}

/// Handle ReadAll command.
pub fn read_all(db: &Arc<Database>) -> Result<Output> {
    Ok(Output::Entries(db.read_all()))
}

/// Handle ReadAt command.
pub fn read_at(db: &Arc<Database>, index: u64) -> Result<Output> {
    Ok(Output::Entry(db.read_at(index)?))
}

/// Handle Len command.
pub fn len(db: &Arc<Database>) -> Result<Output> {
    Ok(Output::Len(db.len()))
}

/// Handle the three Remove* commands.
pub fn remove(db: &Arc<Database>, policy: RemovalPolicy, index: u64) -> Result<Output> {
    db.remove(policy, index)?;
    Ok(Output::Unit)
}
