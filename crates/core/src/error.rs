//! Error types for the entry store
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! ## Rejections vs failures
//!
//! `OutOfBounds`, `InvalidIndex`, `EmptyStore` and `LimitExceeded` are
//! rejections: the caller asked for something the current state cannot
//! satisfy, and the store is left exactly as it was. Everything else is an
//! infrastructure failure (disk, encoding, corruption).

use std::io;
use thiserror::Error;

/// Result type alias for entry store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the entry store
#[derive(Debug, Error)]
pub enum Error {
    /// Read of a position that does not exist
    #[error("index out of bounds: index {index}, len {len}")]
    OutOfBounds {
        /// Requested index
        index: u64,
        /// Store length at the time of the call
        len: u64,
    },

    /// Mutation targeting a position that does not exist
    #[error("invalid index: index {index}, len {len}")]
    InvalidIndex {
        /// Requested index
        index: u64,
        /// Store length at the time of the call
        len: u64,
    },

    /// Swap-compact removal on a store with no entries
    #[error("no entries")]
    EmptyStore,

    /// Append would grow the store past the configured cap
    #[error("entry limit exceeded: max {max}")]
    LimitExceeded {
        /// Configured maximum number of entries
        max: u64,
    },

    /// Invalid caller input (bad policy name, malformed config, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Data corruption detected
    #[error("Data corruption: {0}")]
    Corruption(String),
}

impl Error {
    /// Build an `InvalidInput` error from anything string-like.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Build a `Corruption` error from anything string-like.
    pub fn corruption(msg: impl Into<String>) -> Self {
        Error::Corruption(msg.into())
    }

    /// True for errors caused by the request rather than the environment.
    ///
    /// A rejected call never changes state.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::OutOfBounds { .. }
                | Error::InvalidIndex { .. }
                | Error::EmptyStore
                | Error::LimitExceeded { .. }
                | Error::InvalidInput(_)
        )
    }
}
