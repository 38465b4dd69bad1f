//! Recovery on open
//!
//! Rebuilds the store from the last checkpoint plus every WAL record past
//! its watermark. A partial record at the tail of the last segment is cut
//! off; anything else that does not read back cleanly is corruption.

use entrystore_core::{Error, Limits, Result};
use entrystore_durability::{Checkpoint, CheckpointError, WalReader, WalReaderError};
use entrystore_storage::EntryStore;
use std::path::Path;
use tracing::{info, warn};

/// Outcome of recovery.
#[derive(Debug)]
pub struct RecoveredState {
    /// Rebuilt store, limits applied
    pub store: EntryStore,
    /// Database UUID found on disk, if any
    pub database_uuid: Option<[u8; 16]>,
    /// Watermark of the checkpoint that was loaded (0 if none)
    pub checkpoint_seq: u64,
    /// Counters for logging and `info`
    pub stats: RecoveryStats,
}

/// Recovery counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecoveryStats {
    /// Entries loaded from the checkpoint
    pub checkpoint_entries: u64,
    /// WAL records replayed on top of the checkpoint
    pub records_replayed: u64,
    /// Whether a partial tail record was truncated
    pub truncated_tail: bool,
}

pub(crate) fn checkpoint_error(e: CheckpointError) -> Error {
    match e {
        CheckpointError::Io(io) => Error::IoError(io),
        CheckpointError::Encode(msg) => Error::SerializationError(msg),
        other => Error::corruption(other.to_string()),
    }
}

pub(crate) fn wal_reader_error(e: WalReaderError) -> Error {
    match e {
        WalReaderError::Io(io) => Error::IoError(io),
        other => Error::corruption(other.to_string()),
    }
}

/// Recover the store persisted in `data_dir`.
///
/// Replay runs without limits so that lowering `max_entries` in the config
/// never makes an existing database unreadable; `limits` applies to new
/// appends only.
pub fn recover(data_dir: &Path, limits: Limits) -> Result<RecoveredState> {
    let wal_dir = data_dir.join("wal");
    let checkpoint = Checkpoint::load(data_dir).map_err(checkpoint_error)?;

    let reader = WalReader::new();
    let wal = reader.read_all(&wal_dir).map_err(wal_reader_error)?;

    let mut database_uuid = wal.database_uuid;
    let mut stats = RecoveryStats::default();

    let (mut store, checkpoint_seq) = match checkpoint {
        Some(cp) => {
            if let Some(wal_uuid) = database_uuid {
                if wal_uuid != cp.database_uuid {
                    return Err(Error::corruption(
                        "checkpoint and WAL belong to different databases",
                    ));
                }
            }
            database_uuid = Some(cp.database_uuid);
            stats.checkpoint_entries = cp.entries.len() as u64;
            let seq = cp.seq;
            (EntryStore::from_parts(cp.entries, seq, Limits::unlimited()), seq)
        }
        None => (EntryStore::new(), 0),
    };

    for record in wal.records {
        // Left behind by a prune that did not finish
        if record.seq <= checkpoint_seq {
            continue;
        }
        if record.seq != store.seq() + 1 {
            let kind = if record.seq <= store.seq() {
                "repeated"
            } else {
                "gap"
            };
            return Err(Error::corruption(format!(
                "WAL sequence {}: expected {}, found {}",
                kind,
                store.seq() + 1,
                record.seq
            )));
        }
        store.validate(&record.mutation).map_err(|e| {
            Error::corruption(format!(
                "WAL record {} does not apply to recovered state: {}",
                record.seq, e
            ))
        })?;
        store.apply_validated(record.mutation);
        stats.records_replayed += 1;
    }

    if let Some(info) = wal.truncate_info {
        warn!(
            target: "entrystore::engine",
            segment = info.segment_number,
            dropped_bytes = info.original_size - info.valid_end,
            "Truncating partial record at WAL tail"
        );
        reader.truncate(&wal_dir, &info).map_err(wal_reader_error)?;
        stats.truncated_tail = true;
    }

    info!(
        target: "entrystore::engine",
        checkpoint_seq,
        checkpoint_entries = stats.checkpoint_entries,
        records_replayed = stats.records_replayed,
        final_seq = store.seq(),
        "Recovery complete"
    );

    let seq = store.seq();
    let store = EntryStore::from_parts(store.read_all(), seq, limits);

    Ok(RecoveredState {
        store,
        database_uuid,
        checkpoint_seq,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use entrystore_core::{Mutation, RemovalPolicy};
    use entrystore_durability::{DurabilityMode, WalConfig, WalRecord, WalWriter};
    use tempfile::TempDir;

    fn write_wal(data_dir: &Path, uuid: [u8; 16], records: &[WalRecord]) {
        let mut wal = WalWriter::new(
            data_dir.join("wal"),
            uuid,
            DurabilityMode::Always,
            WalConfig::default(),
        )
        .unwrap();
        for r in records {
            wal.append(r).unwrap();
        }
        wal.close().unwrap();
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        let state = recover(dir.path(), Limits::unlimited()).unwrap();
        assert!(state.store.is_empty());
        assert_eq!(state.store.seq(), 0);
        assert!(state.database_uuid.is_none());
    }

    #[test]
    fn test_wal_only_replay() {
        let dir = TempDir::new().unwrap();
        write_wal(
            dir.path(),
            [1; 16],
            &[
                WalRecord::new(1, Mutation::Append(10)),
                WalRecord::new(2, Mutation::Append(20)),
                WalRecord::new(3, Mutation::Append(30)),
                WalRecord::new(4, Mutation::remove(RemovalPolicy::SwapCompact, 0)),
            ],
        );

        let state = recover(dir.path(), Limits::unlimited()).unwrap();
        assert_eq!(state.store.read_all(), vec![30, 20]);
        assert_eq!(state.store.seq(), 4);
        assert_eq!(state.stats.records_replayed, 4);
        assert_eq!(state.database_uuid, Some([1; 16]));
    }

    #[test]
    fn test_checkpoint_plus_tail() {
        let dir = TempDir::new().unwrap();
        Checkpoint::new([2; 16], 2, vec![5, 6])
            .write_atomic(dir.path())
            .unwrap();
        write_wal(
            dir.path(),
            [2; 16],
            &[
                WalRecord::new(2, Mutation::Append(6)),
                WalRecord::new(3, Mutation::Append(7)),
            ],
        );

        let state = recover(dir.path(), Limits::unlimited()).unwrap();
        assert_eq!(state.store.read_all(), vec![5, 6, 7]);
        assert_eq!(state.checkpoint_seq, 2);
        assert_eq!(state.stats.records_replayed, 1);
    }

    #[test]
    fn test_sequence_gap_is_corruption() {
        let dir = TempDir::new().unwrap();
        write_wal(
            dir.path(),
            [1; 16],
            &[
                WalRecord::new(1, Mutation::Append(1)),
                WalRecord::new(3, Mutation::Append(3)),
            ],
        );
        assert!(matches!(
            recover(dir.path(), Limits::unlimited()),
            Err(Error::Corruption(_))
        ));
    }

    #[test]
    fn test_repeated_sequence_is_corruption() {
        // A record the caller saw fail, followed by the mutation that
        // reused its seq
        let dir = TempDir::new().unwrap();
        write_wal(
            dir.path(),
            [1; 16],
            &[
                WalRecord::new(1, Mutation::Append(1)),
                WalRecord::new(2, Mutation::Append(2)),
                WalRecord::new(2, Mutation::Append(3)),
            ],
        );
        match recover(dir.path(), Limits::unlimited()) {
            Err(Error::Corruption(msg)) => assert!(msg.contains("repeated"), "{}", msg),
            other => panic!("expected corruption, got {:?}", other.map(|s| s.store.read_all())),
        }
    }

    #[test]
    fn test_repeated_sequence_after_checkpoint_is_corruption() {
        let dir = TempDir::new().unwrap();
        Checkpoint::new([1; 16], 1, vec![1])
            .write_atomic(dir.path())
            .unwrap();
        write_wal(
            dir.path(),
            [1; 16],
            &[
                WalRecord::new(1, Mutation::Append(1)),
                WalRecord::new(2, Mutation::Append(2)),
                WalRecord::new(2, Mutation::Append(3)),
            ],
        );
        assert!(matches!(
            recover(dir.path(), Limits::unlimited()),
            Err(Error::Corruption(_))
        ));
    }

    #[test]
    fn test_unappliable_record_is_corruption() {
        let dir = TempDir::new().unwrap();
        write_wal(
            dir.path(),
            [1; 16],
            &[WalRecord::new(1, Mutation::remove(RemovalPolicy::ShiftCompact, 0))],
        );
        assert!(matches!(
            recover(dir.path(), Limits::unlimited()),
            Err(Error::Corruption(_))
        ));
    }

    #[test]
    fn test_uuid_mismatch_is_corruption() {
        let dir = TempDir::new().unwrap();
        Checkpoint::new([1; 16], 0, vec![])
            .write_atomic(dir.path())
            .unwrap();
        write_wal(dir.path(), [9; 16], &[WalRecord::new(1, Mutation::Append(1))]);
        assert!(matches!(
            recover(dir.path(), Limits::unlimited()),
            Err(Error::Corruption(_))
        ));
    }

    #[test]
    fn test_lowered_limit_still_recovers() {
        let dir = TempDir::new().unwrap();
        write_wal(
            dir.path(),
            [1; 16],
            &[
                WalRecord::new(1, Mutation::Append(1)),
                WalRecord::new(2, Mutation::Append(2)),
            ],
        );

        let mut state = recover(dir.path(), Limits::with_max_entries(1)).unwrap();
        assert_eq!(state.store.len(), 2);
        assert!(matches!(
            state.store.append(3),
            Err(Error::LimitExceeded { max: 1 })
        ));
    }
}
