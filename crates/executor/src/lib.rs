//! # EntryStore Executor
//!
//! Command interface over an EntryStore database.
//!
//! - [`Command`]/[`Output`] - serializable instruction set and results
//! - [`Executor`] - stateless dispatcher from commands to the engine
//! - [`Error`] - structured, serializable errors
//!
//! ## Quick Start
//!
//! ```text
//! use entrystore_executor::{Command, Executor, Output};
//! use entrystore_engine::Database;
//!
//! let executor = Executor::new(Database::open("/path/to/data")?);
//!
//! executor.execute(Command::Append { value: 42 })?;
//! let out = executor.execute(Command::ReadAt { index: 0 })?;
//! assert_eq!(out, Output::Entry(42));
//! ```

#![warn(missing_docs)]

mod command;
mod convert;
mod error;
mod executor;
mod output;

mod handlers;

#[cfg(test)]
mod tests;

pub use command::Command;
pub use error::Error;
pub use executor::Executor;
pub use output::Output;

// Re-export so users don't need entrystore-engine directly
pub use entrystore_engine::{Database, DatabaseConfig, DatabaseInfo};

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;
