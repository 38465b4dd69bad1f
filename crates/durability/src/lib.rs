//! Durability layer for EntryStore
//!
//! This crate handles everything that touches disk:
//!
//! - WAL: Segmented write-ahead log with one record per applied mutation
//! - Durability modes: Always, Standard (default), Cache
//! - Checkpoints: atomic image of the entries plus the seq they cover
//! - Binary on-disk formats (segment header, WAL record, checkpoint file)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod checkpoint;
pub mod format;
pub mod wal;

pub use checkpoint::{Checkpoint, CheckpointError, CHECKPOINT_FILE_NAME};
pub use format::{SegmentHeader, WalRecord, WalRecordError, WalSegment};
pub use wal::{
    DurabilityMode, ReadStopReason, TruncateInfo, WalConfig, WalConfigError, WalCounters,
    WalReadResult, WalReader, WalReaderError, WalWriter,
};
