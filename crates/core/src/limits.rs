//! Size limits for the store
//!
//! Limits are set at database open time. Violations result in
//! `Error::LimitExceeded` and leave the store unchanged.

use crate::error::{Error, Result};

/// Size limits for the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of entries (default: unlimited)
    pub max_entries: Option<u64>,
}

impl Limits {
    /// No limits
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Cap the store at `max` entries
    pub fn with_max_entries(max: u64) -> Self {
        Limits {
            max_entries: Some(max),
        }
    }

    /// Check that a store of length `len` may grow by one.
    pub fn check_append(&self, len: u64) -> Result<()> {
        match self.max_entries {
            Some(max) if len >= max => Err(Error::LimitExceeded { max }),
            _ => Ok(()),
        }
    }
}
