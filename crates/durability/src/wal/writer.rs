//! WAL writer with durability mode support.
//!
//! The writer handles appending WAL records to segments with proper
//! durability guarantees based on the configured mode.

use super::DurabilityMode;
use crate::format::{WalRecord, WalSegment, SEGMENT_HEADER_SIZE};
use crate::wal::config::WalConfig;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, warn};

/// Cumulative WAL operation counters.
///
/// These counters accumulate over the lifetime of the WalWriter
/// and are never reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalCounters {
    /// Total WAL record appends
    pub wal_appends: u64,
    /// Total sync/fsync calls
    pub sync_calls: u64,
    /// Total bytes written to WAL segments
    pub bytes_written: u64,
    /// Total segment rotations
    pub rotations: u64,
}

/// WAL writer with configurable durability modes.
///
/// # Durability Modes
///
/// - `Cache`: No persistence, records are not written to disk
/// - `Always`: fsync after every record
/// - `Standard`: fsync once `batch_size` records or `interval_ms` have
///   accumulated, whichever comes first
///
/// # Segment Rotation
///
/// When a record would push the current segment past the configured size
/// limit, the writer closes it and starts a new one. Closed segments are
/// immutable.
///
/// # Failed Appends
///
/// A record whose write or fsync fails is cut back off the segment before
/// `append` returns, so the log never holds a record its caller was told
/// failed. After a failed fsync, or a rollback that itself failed, the
/// writer is poisoned: every later append or flush errors until the
/// database is reopened and recovery rebuilds the log state.
pub struct WalWriter {
    /// Current active segment (None in Cache mode)
    segment: Option<WalSegment>,
    durability: DurabilityMode,
    wal_dir: PathBuf,
    database_uuid: [u8; 16],
    config: WalConfig,
    writes_since_sync: usize,
    last_sync_time: Instant,
    current_segment_number: u64,
    has_unsynced_data: bool,
    poisoned: bool,
    counters: WalCounters,
    #[cfg(test)]
    fail_syncs: bool,
}

impl WalWriter {
    /// Create a new WAL writer.
    ///
    /// If the WAL directory contains existing segments, the writer opens the
    /// last one for appending (or starts the next one if it can't).
    pub fn new(
        wal_dir: PathBuf,
        database_uuid: [u8; 16],
        durability: DurabilityMode,
        config: WalConfig,
    ) -> io::Result<Self> {
        let mut writer = WalWriter {
            segment: None,
            durability,
            wal_dir,
            database_uuid,
            config,
            writes_since_sync: 0,
            last_sync_time: Instant::now(),
            current_segment_number: 0,
            has_unsynced_data: false,
            poisoned: false,
            counters: WalCounters::default(),
            #[cfg(test)]
            fail_syncs: false,
        };

        if !durability.requires_wal() {
            return Ok(writer);
        }

        std::fs::create_dir_all(&writer.wal_dir)?;

        let (segment, segment_number) = match WalSegment::list(&writer.wal_dir)?.last() {
            Some(&num) => match WalSegment::open_append(&writer.wal_dir, num) {
                Ok(seg) => (seg, num),
                Err(e) => {
                    warn!(
                        target: "entrystore::wal",
                        segment = num,
                        error = %e,
                        "Cannot append to last segment, starting a new one"
                    );
                    let seg = WalSegment::create(&writer.wal_dir, num + 1, database_uuid)?;
                    (seg, num + 1)
                }
            },
            None => (WalSegment::create(&writer.wal_dir, 1, database_uuid)?, 1),
        };

        writer.segment = Some(segment);
        writer.current_segment_number = segment_number;
        Ok(writer)
    }

    /// Append a record to the WAL.
    ///
    /// - `Cache`: No-op
    /// - `Always`: Writes and fsyncs before returning
    /// - `Standard`: Writes, fsyncs when a threshold is reached
    pub fn append(&mut self, record: &WalRecord) -> io::Result<()> {
        if !self.durability.requires_wal() {
            return Ok(());
        }
        self.check_poisoned()?;

        let bytes = record.to_bytes();

        let needs_rotation = match self.segment.as_ref() {
            Some(segment) => {
                segment.size() > SEGMENT_HEADER_SIZE as u64
                    && segment.size() + bytes.len() as u64 > self.config.segment_size
            }
            None => true,
        };
        if needs_rotation {
            self.rotate_segment()?;
        }

        let Some(segment) = self.segment.as_mut() else {
            return Err(io::Error::new(io::ErrorKind::Other, "WAL segment not open"));
        };
        let start = segment.size();
        if let Err(e) = segment.write(&bytes) {
            self.rollback(start, record.seq);
            return Err(e);
        }

        self.writes_since_sync += 1;
        self.has_unsynced_data = true;

        if let Err(e) = self.maybe_sync() {
            self.rollback(start, record.seq);
            return Err(e);
        }

        self.counters.wal_appends += 1;
        self.counters.bytes_written += bytes.len() as u64;
        Ok(())
    }

    /// Cut the active segment back to `position`, dropping a failed record.
    fn rollback(&mut self, position: u64, seq: u64) {
        let result = match self.segment.as_mut() {
            Some(segment) => segment.truncate(position),
            None => Ok(()),
        };
        match result {
            Ok(()) => warn!(
                target: "entrystore::wal",
                seq,
                position,
                "Rolled back failed WAL append"
            ),
            Err(e) => {
                self.poisoned = true;
                warn!(
                    target: "entrystore::wal",
                    seq,
                    error = %e,
                    "Cannot roll back failed WAL append, refusing further writes"
                );
            }
        }
    }

    fn check_poisoned(&self) -> io::Result<()> {
        if self.poisoned {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "WAL writer disabled after a failed write, reopen the database",
            ));
        }
        Ok(())
    }

    /// Handle fsync based on durability mode.
    fn maybe_sync(&mut self) -> io::Result<()> {
        match self.durability {
            DurabilityMode::Always => self.sync_now(),
            DurabilityMode::Standard {
                interval_ms,
                batch_size,
            } => {
                let overdue = self.last_sync_time.elapsed().as_millis() as u64 >= interval_ms;
                if self.writes_since_sync >= batch_size || overdue {
                    self.sync_now()?;
                }
                Ok(())
            }
            DurabilityMode::Cache => Ok(()),
        }
    }

    fn sync_now(&mut self) -> io::Result<()> {
        if let Some(ref mut segment) = self.segment {
            #[cfg(test)]
            let result = if self.fail_syncs {
                Err(io::Error::new(io::ErrorKind::Other, "simulated fsync failure"))
            } else {
                segment.sync()
            };
            #[cfg(not(test))]
            let result = segment.sync();

            if let Err(e) = result {
                // Page cache state is unknown after a failed fsync
                self.poisoned = true;
                return Err(e);
            }
            self.counters.sync_calls += 1;
        }
        self.writes_since_sync = 0;
        self.last_sync_time = Instant::now();
        self.has_unsynced_data = false;
        Ok(())
    }

    /// Close the current segment and start the next one.
    fn rotate_segment(&mut self) -> io::Result<()> {
        if let Some(ref mut segment) = self.segment {
            segment.close()?;
        }

        self.current_segment_number += 1;
        let new_segment = WalSegment::create(
            &self.wal_dir,
            self.current_segment_number,
            self.database_uuid,
        )?;
        debug!(
            target: "entrystore::wal",
            segment = self.current_segment_number,
            "Rotated WAL segment"
        );

        self.segment = Some(new_segment);
        self.counters.rotations += 1;
        self.writes_since_sync = 0;
        self.last_sync_time = Instant::now();
        self.has_unsynced_data = false;
        Ok(())
    }

    /// Start a fresh segment and delete every older one.
    ///
    /// Call only after a checkpoint covering every record written so far has
    /// been made durable. Returns the number of segments removed.
    pub fn prune_after_checkpoint(&mut self) -> io::Result<usize> {
        if !self.durability.requires_wal() {
            return Ok(0);
        }

        self.rotate_segment()?;

        let mut removed = 0;
        for num in WalSegment::list(&self.wal_dir)? {
            if num < self.current_segment_number {
                std::fs::remove_file(WalSegment::segment_path(&self.wal_dir, num))?;
                removed += 1;
            }
        }
        debug!(
            target: "entrystore::wal",
            removed,
            active = self.current_segment_number,
            "Pruned WAL segments after checkpoint"
        );
        Ok(removed)
    }

    /// Force any written records to disk, regardless of durability mode.
    pub fn flush(&mut self) -> io::Result<()> {
        self.check_poisoned()?;
        self.sync_now()
    }

    /// Sync if the Standard interval has elapsed and there is unsynced data.
    ///
    /// Returns `true` if a sync was performed.
    pub fn sync_if_overdue(&mut self) -> io::Result<bool> {
        if !self.has_unsynced_data || self.poisoned {
            return Ok(false);
        }

        if let DurabilityMode::Standard { interval_ms, .. } = self.durability {
            if self.last_sync_time.elapsed().as_millis() as u64 >= interval_ms {
                self.sync_now()?;
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Whether an earlier failure disabled this writer.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Whether records have been written but not yet fsynced.
    pub fn has_unsynced_data(&self) -> bool {
        self.has_unsynced_data
    }

    /// Current segment number (0 in Cache mode).
    pub fn current_segment(&self) -> u64 {
        self.current_segment_number
    }

    /// Durability mode this writer was opened with.
    pub fn durability(&self) -> DurabilityMode {
        self.durability
    }

    /// Snapshot of cumulative WAL counters.
    pub fn counters(&self) -> WalCounters {
        self.counters.clone()
    }

    /// WAL directory path.
    pub fn wal_dir(&self) -> &Path {
        &self.wal_dir
    }

    /// Close the writer, ensuring all data is flushed.
    pub fn close(mut self) -> io::Result<()> {
        self.flush()?;
        if let Some(ref mut segment) = self.segment {
            segment.close()?;
        }
        Ok(())
    }
}

impl Drop for WalWriter {
    fn drop(&mut self) {
        if self.has_unsynced_data && !self.poisoned {
            if let Some(ref mut segment) = self.segment {
                let _ = segment.sync();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wal::reader::WalReader;
    use entrystore_core::{Mutation, RemovalPolicy};
    use tempfile::tempdir;

    const UUID: [u8; 16] = [7u8; 16];

    fn append_n(writer: &mut WalWriter, n: u64) {
        for seq in 1..=n {
            writer
                .append(&WalRecord::new(seq, Mutation::Append(seq * 10)))
                .unwrap();
        }
    }

    #[test]
    fn test_cache_mode_writes_nothing() {
        let dir = tempdir().unwrap();
        let wal_dir = dir.path().join("wal");
        let mut writer =
            WalWriter::new(wal_dir.clone(), UUID, DurabilityMode::Cache, WalConfig::default())
                .unwrap();

        append_n(&mut writer, 5);
        assert!(!wal_dir.exists());
        assert_eq!(writer.counters().wal_appends, 0);
    }

    #[test]
    fn test_always_mode_syncs_every_record() {
        let dir = tempdir().unwrap();
        let mut writer = WalWriter::new(
            dir.path().to_path_buf(),
            UUID,
            DurabilityMode::Always,
            WalConfig::default(),
        )
        .unwrap();

        append_n(&mut writer, 3);
        let counters = writer.counters();
        assert_eq!(counters.wal_appends, 3);
        assert_eq!(counters.sync_calls, 3);
        assert!(!writer.has_unsynced_data());
    }

    #[test]
    fn test_standard_mode_syncs_on_batch_size() {
        let dir = tempdir().unwrap();
        let mut writer = WalWriter::new(
            dir.path().to_path_buf(),
            UUID,
            DurabilityMode::Standard {
                interval_ms: 60_000,
                batch_size: 4,
            },
            WalConfig::default(),
        )
        .unwrap();

        append_n(&mut writer, 3);
        assert_eq!(writer.counters().sync_calls, 0);
        assert!(writer.has_unsynced_data());

        writer
            .append(&WalRecord::new(4, Mutation::remove(RemovalPolicy::LeaveGap, 0)))
            .unwrap();
        assert_eq!(writer.counters().sync_calls, 1);
        assert!(!writer.has_unsynced_data());
    }

    #[test]
    fn test_rotation_and_readback() {
        let dir = tempdir().unwrap();
        let mut writer = WalWriter::new(
            dir.path().to_path_buf(),
            UUID,
            DurabilityMode::Always,
            WalConfig::new().with_segment_size(1024),
        )
        .unwrap();

        // 26-byte records, ~38 per segment
        append_n(&mut writer, 100);
        assert!(writer.current_segment() > 1);
        assert!(writer.counters().rotations >= 2);
        drop(writer);

        let result = WalReader::new().read_all(dir.path()).unwrap();
        let seqs: Vec<u64> = result.records.iter().map(|r| r.seq).collect();
        assert_eq!(seqs, (1..=100).collect::<Vec<_>>());
    }

    #[test]
    fn test_reopen_appends_to_last_segment() {
        let dir = tempdir().unwrap();
        {
            let mut writer = WalWriter::new(
                dir.path().to_path_buf(),
                UUID,
                DurabilityMode::Always,
                WalConfig::default(),
            )
            .unwrap();
            append_n(&mut writer, 2);
        }
        {
            let mut writer = WalWriter::new(
                dir.path().to_path_buf(),
                UUID,
                DurabilityMode::Always,
                WalConfig::default(),
            )
            .unwrap();
            assert_eq!(writer.current_segment(), 1);
            writer
                .append(&WalRecord::new(3, Mutation::Append(30)))
                .unwrap();
        }

        let result = WalReader::new().read_all(dir.path()).unwrap();
        assert_eq!(result.records.len(), 3);
        assert_eq!(result.records[2].mutation, Mutation::Append(30));
    }

    #[test]
    fn test_prune_after_checkpoint() {
        let dir = tempdir().unwrap();
        let mut writer = WalWriter::new(
            dir.path().to_path_buf(),
            UUID,
            DurabilityMode::Always,
            WalConfig::new().with_segment_size(1024),
        )
        .unwrap();

        append_n(&mut writer, 100);
        let before = WalSegment::list(dir.path()).unwrap().len();
        assert!(before > 1);

        let removed = writer.prune_after_checkpoint().unwrap();
        assert_eq!(removed, before);
        assert_eq!(
            WalSegment::list(dir.path()).unwrap(),
            vec![writer.current_segment()]
        );

        let result = WalReader::new().read_all(dir.path()).unwrap();
        assert!(result.records.is_empty());
    }
    #[test]
    fn test_failed_sync_rolls_back_record_and_poisons() {
        let dir = tempdir().unwrap();
        let mut writer = WalWriter::new(
            dir.path().to_path_buf(),
            UUID,
            DurabilityMode::Always,
            WalConfig::default(),
        )
        .unwrap();
        append_n(&mut writer, 1);
        let size_before = writer.segment.as_ref().unwrap().size();

        writer.fail_syncs = true;
        assert!(writer
            .append(&WalRecord::new(2, Mutation::Append(2)))
            .is_err());
        assert!(writer.is_poisoned());
        assert_eq!(writer.segment.as_ref().unwrap().size(), size_before);
        assert_eq!(writer.counters().wal_appends, 1);

        // Poisoned even once fsync works again
        writer.fail_syncs = false;
        assert!(writer
            .append(&WalRecord::new(2, Mutation::Append(3)))
            .is_err());
        assert!(writer.flush().is_err());
        assert!(!writer.sync_if_overdue().unwrap());
        drop(writer);

        let result = WalReader::new().read_all(dir.path()).unwrap();
        assert!(result.truncate_info.is_none());
        assert_eq!(
            result.records,
            vec![WalRecord::new(1, Mutation::Append(10))]
        );
    }

    #[test]
    fn test_standard_mode_failed_sync_rolls_back() {
        let dir = tempdir().unwrap();
        let mut writer = WalWriter::new(
            dir.path().to_path_buf(),
            UUID,
            DurabilityMode::Standard {
                interval_ms: 60_000,
                batch_size: 2,
            },
            WalConfig::default(),
        )
        .unwrap();
        append_n(&mut writer, 1);

        writer.fail_syncs = true;
        assert!(writer
            .append(&WalRecord::new(2, Mutation::Append(20)))
            .is_err());
        assert!(writer.is_poisoned());
        writer.fail_syncs = false;

        // Close without the final sync; record 1 is still in the file
        drop(writer);
        let result = WalReader::new().read_all(dir.path()).unwrap();
        let seqs: Vec<u64> = result.records.iter().map(|r| r.seq).collect();
        assert_eq!(seqs, vec![1]);
    }
}
