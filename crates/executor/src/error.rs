//! Error types for command execution.
//!
//! All errors from command execution are represented by the [`Error`] enum.
//! These errors are:
//! - **Structured**: Each variant has typed fields for error details
//! - **Serializable**: Can be converted to/from JSON
//! - **Lossless**: No error information is lost in conversion from internal errors

use serde::{Deserialize, Serialize};

/// Command execution errors.
///
/// # Categories
///
/// | Category | Variants | Description |
/// |----------|----------|-------------|
/// | Rejection | `OutOfBounds`, `InvalidIndex`, `EmptyStore`, `LimitExceeded` | State unchanged |
/// | Validation | `InvalidInput` | Bad input |
/// | System | `Io`, `Serialization`, `Corruption` | Infrastructure errors |
///
/// # Example
///
/// ```ignore
/// match executor.execute(cmd) {
///     Ok(output) => { /* handle success */ }
///     Err(Error::InvalidIndex { index, len }) => {
///         println!("no entry at {} (len {})", index, len);
///     }
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    // ==================== Rejections ====================
    /// Read past the end
    #[error("index out of bounds: index {index}, len {len}")]
    OutOfBounds {
        /// Requested index
        index: u64,
        /// Store length
        len: u64,
    },

    /// Removal past the end
    #[error("invalid index: index {index}, len {len}")]
    InvalidIndex {
        /// Requested index
        index: u64,
        /// Store length
        len: u64,
    },

    /// Swap-compact removal on an empty store
    #[error("no entries")]
    EmptyStore,

    /// Append past the configured cap
    #[error("entry limit exceeded: max {max}")]
    LimitExceeded {
        /// Configured cap
        max: u64,
    },

    // ==================== Validation ====================
    /// Invalid input
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong
        reason: String,
    },

    // ==================== System ====================
    /// I/O error
    #[error("I/O error: {reason}")]
    Io {
        /// Underlying error text
        reason: String,
    },

    /// Serialization error
    #[error("serialization error: {reason}")]
    Serialization {
        /// Underlying error text
        reason: String,
    },

    /// Data corruption detected
    #[error("data corruption: {reason}")]
    Corruption {
        /// What failed to read back
        reason: String,
    },
}

impl Error {
    /// True for errors caused by the request rather than the environment.
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            Error::Io { .. } | Error::Serialization { .. } | Error::Corruption { .. }
        )
    }
}
