//! Checkpoint file.
//!
//! A checkpoint is a full image of the entries together with the `seq`
//! watermark it covers. Recovery loads the checkpoint and replays only WAL
//! records with `seq` above the watermark.
//!
//! # Layout
//!
//! ```text
//! ┌───────────┬───────────────┬──────────┬──────────────────┬──────────────┬─────────────┬──────────┐
//! │ Magic (4) │ Format Ver (4)│ Seq (8)  │ Database UUID(16)│ Body Len (4) │ Body (var)  │ CRC32 (4)│
//! └───────────┴───────────────┴──────────┴──────────────────┴──────────────┴─────────────┴──────────┘
//! ```
//!
//! The body is MessagePack (rmp-serde). The CRC covers every preceding byte.
//!
//! # Crash Safety
//!
//! 1. Write to `checkpoint.bin.tmp`
//! 2. fsync the temporary file
//! 3. Atomic rename to `checkpoint.bin`
//! 4. fsync the parent directory

use byteorder::{ByteOrder, LittleEndian};
use entrystore_core::Entry;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Checkpoint file name inside the data directory
pub const CHECKPOINT_FILE_NAME: &str = "checkpoint.bin";

/// Magic bytes identifying a checkpoint file: "ENTC"
pub const CHECKPOINT_MAGIC: [u8; 4] = *b"ENTC";

/// Current checkpoint format version
pub const CHECKPOINT_FORMAT_VERSION: u32 = 1;

/// Fixed-size prefix: magic + version + seq + uuid + body length
const HEADER_SIZE: usize = 4 + 4 + 8 + 16 + 4;

#[derive(Serialize, Deserialize)]
struct CheckpointBody {
    entries: Vec<Entry>,
}

/// In-memory image of a checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    /// Database the checkpoint belongs to
    pub database_uuid: [u8; 16],
    /// Number of mutations folded into `entries`
    pub seq: u64,
    /// Entries at `seq`
    pub entries: Vec<Entry>,
}

impl Checkpoint {
    /// Create a checkpoint image.
    pub fn new(database_uuid: [u8; 16], seq: u64, entries: Vec<Entry>) -> Self {
        Checkpoint {
            database_uuid,
            seq,
            entries,
        }
    }

    /// Checkpoint path inside `dir`.
    pub fn path(dir: &Path) -> PathBuf {
        dir.join(CHECKPOINT_FILE_NAME)
    }

    /// Serialize to the on-disk layout.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        let body = rmp_serde::to_vec(&CheckpointBody {
            entries: self.entries.clone(),
        })
        .map_err(|e| CheckpointError::Encode(e.to_string()))?;

        let mut bytes = Vec::with_capacity(HEADER_SIZE + body.len() + 4);
        bytes.extend_from_slice(&CHECKPOINT_MAGIC);
        bytes.extend_from_slice(&CHECKPOINT_FORMAT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&self.seq.to_le_bytes());
        bytes.extend_from_slice(&self.database_uuid);
        bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&body);

        let crc = crc32fast::hash(&bytes);
        bytes.extend_from_slice(&crc.to_le_bytes());
        Ok(bytes)
    }

    /// Parse the on-disk layout.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        if bytes.len() < HEADER_SIZE + 4 {
            return Err(CheckpointError::Truncated);
        }
        if bytes[0..4] != CHECKPOINT_MAGIC {
            return Err(CheckpointError::InvalidMagic);
        }
        let version = LittleEndian::read_u32(&bytes[4..8]);
        if version != CHECKPOINT_FORMAT_VERSION {
            return Err(CheckpointError::UnsupportedVersion(version));
        }

        let body_len = LittleEndian::read_u32(&bytes[32..36]) as usize;
        let total = HEADER_SIZE + body_len + 4;
        if bytes.len() != total {
            return Err(CheckpointError::Truncated);
        }

        let stored_crc = LittleEndian::read_u32(&bytes[total - 4..]);
        let computed_crc = crc32fast::hash(&bytes[..total - 4]);
        if stored_crc != computed_crc {
            return Err(CheckpointError::ChecksumMismatch {
                expected: stored_crc,
                computed: computed_crc,
            });
        }

        let seq = LittleEndian::read_u64(&bytes[8..16]);
        let mut database_uuid = [0u8; 16];
        database_uuid.copy_from_slice(&bytes[16..32]);

        let body: CheckpointBody = rmp_serde::from_slice(&bytes[HEADER_SIZE..total - 4])
            .map_err(|e| CheckpointError::Decode(e.to_string()))?;

        Ok(Checkpoint {
            database_uuid,
            seq,
            entries: body.entries,
        })
    }

    /// Write the checkpoint to `dir` with write-fsync-rename.
    pub fn write_atomic(&self, dir: &Path) -> Result<(), CheckpointError> {
        let bytes = self.to_bytes()?;
        let final_path = Self::path(dir);
        let temp_path = dir.join(format!("{}.tmp", CHECKPOINT_FILE_NAME));

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&temp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        drop(file);

        std::fs::rename(&temp_path, &final_path)?;

        let parent = File::open(dir)?;
        parent.sync_all()?;
        Ok(())
    }

    /// Load the checkpoint from `dir`, if one exists.
    pub fn load(dir: &Path) -> Result<Option<Self>, CheckpointError> {
        let path = Self::path(dir);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Self::from_bytes(&bytes).map(Some)
    }
}

/// Checkpoint errors.
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// File shorter than its declared layout
    #[error("Checkpoint file truncated")]
    Truncated,

    /// Wrong magic bytes
    #[error("Invalid checkpoint magic")]
    InvalidMagic,

    /// Unknown format version
    #[error("Unsupported checkpoint version: {0}")]
    UnsupportedVersion(u32),

    /// CRC mismatch
    #[error("Checkpoint checksum mismatch: expected {expected:08x}, computed {computed:08x}")]
    ChecksumMismatch {
        /// Stored checksum
        expected: u32,
        /// Computed checksum
        computed: u32,
    },

    /// Body could not be encoded
    #[error("Checkpoint encode error: {0}")]
    Encode(String),

    /// Body could not be decoded
    #[error("Checkpoint decode error: {0}")]
    Decode(String),
}
