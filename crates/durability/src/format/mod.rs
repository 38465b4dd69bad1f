//! Binary on-disk formats.
//!
//! - `segment`: WAL segment files and their 32-byte header
//! - `wal_record`: self-delimiting, checksummed mutation records

pub mod segment;
pub mod wal_record;

pub use segment::{
    SegmentHeader, WalSegment, SEGMENT_FORMAT_VERSION, SEGMENT_HEADER_SIZE, SEGMENT_MAGIC,
};
pub use wal_record::{
    WalRecord, WalRecordError, RECORD_KIND_APPEND, RECORD_KIND_REMOVE, WAL_RECORD_FORMAT_VERSION,
};
