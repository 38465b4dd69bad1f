//! Durability mode configuration
//!
//! Controls WAL sync behavior (Cache, Standard, Always).

/// Durability mode for WAL operations
///
/// Controls when the WAL is fsynced to disk.
///
/// # Modes
///
/// | Mode | fsync | Data Loss Window |
/// |------|-------|-----------------|
/// | Cache | Never | Everything |
/// | Always | Every mutation | Zero |
/// | Standard | Periodic | Up to interval/batch |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurabilityMode {
    /// In-memory only, all data lost on exit
    ///
    /// Bypasses the WAL entirely. No fsync, no file I/O.
    /// Use case: tests, scratch stores.
    Cache,

    /// fsync after every mutation (slow, maximum durability)
    ///
    /// Use when data loss is unacceptable, even for a single mutation.
    Always,

    /// fsync every N mutations OR every T milliseconds (the default)
    ///
    /// May lose up to `batch_size` mutations or `interval_ms` of data on crash.
    Standard {
        /// Maximum time between fsyncs in milliseconds
        interval_ms: u64,
        /// Maximum writes between fsyncs
        batch_size: usize,
    },
}

impl DurabilityMode {
    /// Check if this mode requires WAL persistence
    ///
    /// Returns false for Cache mode, true for all others.
    pub fn requires_wal(&self) -> bool {
        !matches!(self, DurabilityMode::Cache)
    }

    /// Check if this mode requires immediate fsync on every mutation
    ///
    /// Returns true only for Always mode.
    pub fn requires_immediate_fsync(&self) -> bool {
        matches!(self, DurabilityMode::Always)
    }

    /// Human-readable description of the mode
    pub fn description(&self) -> &'static str {
        match self {
            DurabilityMode::Cache => "Cache (in-memory, nothing persisted)",
            DurabilityMode::Always => "Always sync (safest, slowest)",
            DurabilityMode::Standard { .. } => "Standard (balanced speed/safety)",
        }
    }

    /// `Standard { interval_ms: 100, batch_size: 1000 }`; whichever
    /// threshold is reached first triggers the fsync.
    pub fn standard_default() -> Self {
        DurabilityMode::Standard {
            interval_ms: 100,
            batch_size: 1000,
        }
    }
}

impl Default for DurabilityMode {
    fn default() -> Self {
        Self::standard_default()
    }
}
