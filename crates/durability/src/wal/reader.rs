//! WAL reader for recovery and replay.
//!
//! The reader scans segments in order and returns every intact record.
//! A partial record at the very end of the last segment is the normal
//! footprint of a crash mid-append and is reported for truncation. Any
//! other damage stops the scan and is reported as such.

use crate::format::{WalRecord, WalRecordError, WalSegment, SEGMENT_HEADER_SIZE};
use std::path::Path;
use tracing::warn;

/// WAL reader for iterating over records in segments.
#[derive(Debug, Default)]
pub struct WalReader;

impl WalReader {
    /// Create a new WAL reader.
    pub fn new() -> Self {
        WalReader
    }

    /// Read all records from a single segment.
    ///
    /// Returns records in order, stopping at the first invalid/incomplete
    /// record. The returned position is where valid records end.
    pub fn read_segment(
        &self,
        wal_dir: &Path,
        segment_number: u64,
    ) -> Result<SegmentScan, WalReaderError> {
        let mut segment = WalSegment::open_read(wal_dir, segment_number)?;
        let buffer = segment.read_body()?;

        let mut records = Vec::new();
        let mut offset = 0;
        let mut stop_reason = ReadStopReason::EndOfData;

        while offset < buffer.len() {
            let remaining = &buffer[offset..];
            match WalRecord::from_bytes(remaining) {
                Ok((record, consumed)) => {
                    records.push(record);
                    offset += consumed;
                }
                Err(WalRecordError::InsufficientData) => {
                    stop_reason = ReadStopReason::PartialRecord;
                    break;
                }
                // Zero-filled tail left by a torn append
                Err(WalRecordError::InvalidFormat) if remaining.iter().all(|b| *b == 0) => {
                    stop_reason = ReadStopReason::PartialRecord;
                    break;
                }
                Err(WalRecordError::ChecksumMismatch { .. }) => {
                    stop_reason = ReadStopReason::ChecksumMismatch { offset };
                    break;
                }
                Err(e) => {
                    stop_reason = ReadStopReason::ParseError {
                        offset,
                        detail: e.to_string(),
                    };
                    break;
                }
            }
        }

        Ok(SegmentScan {
            records,
            valid_end: (SEGMENT_HEADER_SIZE + offset) as u64,
            size: segment.size(),
            stop_reason,
            database_uuid: segment.database_uuid(),
        })
    }

    /// Read all records from all segments in a WAL directory.
    ///
    /// A missing directory reads as an empty log. Damage in any segment but
    /// the last is always fatal: those segments were closed cleanly.
    pub fn read_all(&self, wal_dir: &Path) -> Result<WalReadResult, WalReaderError> {
        if !wal_dir.exists() {
            return Ok(WalReadResult::default());
        }

        let segments = WalSegment::list(wal_dir)?;
        let mut result = WalReadResult::default();

        for (idx, &segment_number) in segments.iter().enumerate() {
            let scan = self.read_segment(wal_dir, segment_number)?;
            let is_last = idx == segments.len() - 1;

            match result.database_uuid {
                Some(uuid) if uuid != scan.database_uuid => {
                    return Err(WalReaderError::DatabaseMismatch { segment_number });
                }
                _ => result.database_uuid = Some(scan.database_uuid),
            }

            if scan.stop_reason != ReadStopReason::EndOfData {
                if !is_last || scan.stop_reason != ReadStopReason::PartialRecord {
                    return Err(WalReaderError::Corrupted {
                        segment_number,
                        reason: scan.stop_reason,
                    });
                }
                warn!(
                    target: "entrystore::wal",
                    segment = segment_number,
                    valid_end = scan.valid_end,
                    size = scan.size,
                    "Partial record at WAL tail"
                );
                result.truncate_info = Some(TruncateInfo {
                    segment_number,
                    valid_end: scan.valid_end,
                    original_size: scan.size,
                });
            }

            result.records.extend(scan.records);
            result.stop_reason = scan.stop_reason;
        }

        Ok(result)
    }

    /// Read all records with `seq` above a checkpoint watermark.
    pub fn read_all_after_watermark(
        &self,
        wal_dir: &Path,
        watermark: u64,
    ) -> Result<WalReadResult, WalReaderError> {
        let mut result = self.read_all(wal_dir)?;
        result.records.retain(|r| r.seq > watermark);
        Ok(result)
    }

    /// Cut a segment back to its last intact record.
    pub fn truncate(&self, wal_dir: &Path, info: &TruncateInfo) -> Result<(), WalReaderError> {
        let mut segment = WalSegment::open_append(wal_dir, info.segment_number)?;
        segment.truncate(info.valid_end)?;
        segment.sync()?;
        Ok(())
    }
}

/// Outcome of scanning one segment.
#[derive(Debug, Clone)]
pub struct SegmentScan {
    /// Intact records in order
    pub records: Vec<WalRecord>,
    /// Byte offset where intact records end
    pub valid_end: u64,
    /// Segment size on disk
    pub size: u64,
    /// Why the scan stopped
    pub stop_reason: ReadStopReason,
    /// Database UUID from the segment header
    pub database_uuid: [u8; 16],
}

/// Reason why record reading stopped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReadStopReason {
    /// Successfully read all records to end of data
    #[default]
    EndOfData,
    /// Partial record at end of segment (expected after crash)
    PartialRecord,
    /// CRC checksum mismatch - data is corrupted
    ChecksumMismatch {
        /// Byte offset past the header where the mismatch was detected
        offset: usize,
    },
    /// CRC was valid but payload could not be parsed
    ParseError {
        /// Byte offset past the header where parsing failed
        offset: usize,
        /// Human-readable error description
        detail: String,
    },
}

/// Where the last segment must be cut to drop a partial record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncateInfo {
    /// Segment to truncate
    pub segment_number: u64,
    /// Offset where valid records end
    pub valid_end: u64,
    /// Size before truncation
    pub original_size: u64,
}

/// Result of reading the whole WAL.
#[derive(Debug, Clone, Default)]
pub struct WalReadResult {
    /// All intact records, in seq order
    pub records: Vec<WalRecord>,
    /// Set when the last segment ends in a partial record
    pub truncate_info: Option<TruncateInfo>,
    /// Stop reason of the last segment
    pub stop_reason: ReadStopReason,
    /// Database UUID shared by every segment (None if there are none)
    pub database_uuid: Option<[u8; 16]>,
}

/// WAL reader errors.
#[derive(Debug, thiserror::Error)]
pub enum WalReaderError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A segment is damaged somewhere other than a torn tail
    #[error("WAL segment {segment_number} corrupted: {reason:?}")]
    Corrupted {
        /// Damaged segment
        segment_number: u64,
        /// What the scan hit
        reason: ReadStopReason,
    },

    /// A segment belongs to a different database
    #[error("WAL segment {segment_number} belongs to a different database")]
    DatabaseMismatch {
        /// Offending segment
        segment_number: u64,
    },
}
