//! WAL segment files.
//!
//! WAL segments are named `wal-NNNNNN.seg` where `NNNNNN` is a zero-padded segment number.
//!
//! # Segment Layout
//!
//! ```text
//! ┌────────────────────────────────────┐
//! │ Segment Header (32 bytes)          │
//! ├────────────────────────────────────┤
//! │ Record 1                           │
//! ├────────────────────────────────────┤
//! │ ...                                │
//! └────────────────────────────────────┘
//! ```
//!
//! # Header Layout
//!
//! ```text
//! ┌───────────┬───────────────┬──────────────────┬──────────────────┐
//! │ Magic (4) │ Format Ver (4)│ Segment No. (8)  │ Database UUID(16)│
//! └───────────┴───────────────┴──────────────────┴──────────────────┘
//! ```

use byteorder::{ByteOrder, LittleEndian};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Magic bytes identifying a WAL segment file: "ENTS"
pub const SEGMENT_MAGIC: [u8; 4] = *b"ENTS";

/// Current segment format version
pub const SEGMENT_FORMAT_VERSION: u32 = 1;

/// Size of segment header in bytes
pub const SEGMENT_HEADER_SIZE: usize = 32;

/// WAL segment header (32 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentHeader {
    /// Magic bytes: "ENTS"
    pub magic: [u8; 4],

    /// Format version for forward compatibility
    pub format_version: u32,

    /// Segment number (monotonically increasing)
    pub segment_number: u64,

    /// Database UUID (for integrity checking across segments)
    pub database_uuid: [u8; 16],
}

impl SegmentHeader {
    /// Create a new segment header.
    pub fn new(segment_number: u64, database_uuid: [u8; 16]) -> Self {
        SegmentHeader {
            magic: SEGMENT_MAGIC,
            format_version: SEGMENT_FORMAT_VERSION,
            segment_number,
            database_uuid,
        }
    }

    /// Serialize header to bytes.
    pub fn to_bytes(&self) -> [u8; SEGMENT_HEADER_SIZE] {
        let mut bytes = [0u8; SEGMENT_HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        LittleEndian::write_u32(&mut bytes[4..8], self.format_version);
        LittleEndian::write_u64(&mut bytes[8..16], self.segment_number);
        bytes[16..32].copy_from_slice(&self.database_uuid);
        bytes
    }

    /// Deserialize header from bytes.
    pub fn from_bytes(bytes: &[u8; SEGMENT_HEADER_SIZE]) -> Self {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        let mut database_uuid = [0u8; 16];
        database_uuid.copy_from_slice(&bytes[16..32]);

        SegmentHeader {
            magic,
            format_version: LittleEndian::read_u32(&bytes[4..8]),
            segment_number: LittleEndian::read_u64(&bytes[8..16]),
            database_uuid,
        }
    }

    /// Validate magic bytes and format version.
    pub fn is_valid(&self) -> bool {
        self.magic == SEGMENT_MAGIC && self.format_version == SEGMENT_FORMAT_VERSION
    }
}

/// WAL segment file handle.
///
/// A segment is a single WAL file containing multiple records.
/// Only the active segment is writable; closed segments are immutable.
pub struct WalSegment {
    file: File,
    segment_number: u64,
    write_position: u64,
    path: PathBuf,
    closed: bool,
    database_uuid: [u8; 16],
}

impl WalSegment {
    /// Create a new segment file and write its header.
    pub fn create(dir: &Path, segment_number: u64, database_uuid: [u8; 16]) -> io::Result<Self> {
        let path = Self::segment_path(dir, segment_number);

        let mut file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .read(true)
            .open(&path)?;

        let header = SegmentHeader::new(segment_number, database_uuid);
        file.write_all(&header.to_bytes())?;

        Ok(WalSegment {
            file,
            segment_number,
            write_position: SEGMENT_HEADER_SIZE as u64,
            path,
            closed: false,
            database_uuid,
        })
    }

    /// Open an existing segment for reading.
    pub fn open_read(dir: &Path, segment_number: u64) -> io::Result<Self> {
        let path = Self::segment_path(dir, segment_number);
        let file = OpenOptions::new().read(true).open(&path)?;
        Self::open_existing(file, path, segment_number, true)
    }

    /// Open an existing segment for appending.
    ///
    /// Used when resuming writes to the last segment after a restart.
    pub fn open_append(dir: &Path, segment_number: u64) -> io::Result<Self> {
        let path = Self::segment_path(dir, segment_number);
        let file = OpenOptions::new().read(true).write(true).open(&path)?;
        Self::open_existing(file, path, segment_number, false)
    }

    fn open_existing(
        mut file: File,
        path: PathBuf,
        segment_number: u64,
        closed: bool,
    ) -> io::Result<Self> {
        let mut header_bytes = [0u8; SEGMENT_HEADER_SIZE];
        file.read_exact(&mut header_bytes)?;
        let header = SegmentHeader::from_bytes(&header_bytes);

        if !header.is_valid() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid segment header in {}", path.display()),
            ));
        }

        if header.segment_number != segment_number {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Segment number mismatch: expected {}, got {}",
                    segment_number, header.segment_number
                ),
            ));
        }

        let write_position = file.seek(SeekFrom::End(0))?;

        Ok(WalSegment {
            file,
            segment_number,
            write_position,
            path,
            closed,
            database_uuid: header.database_uuid,
        })
    }

    /// Segment file path: `wal-NNNNNN.seg`.
    pub fn segment_path(dir: &Path, segment_number: u64) -> PathBuf {
        dir.join(format!("wal-{:06}.seg", segment_number))
    }

    /// Parse a segment number out of a file name, if it is a segment file.
    pub fn parse_segment_name(name: &str) -> Option<u64> {
        name.strip_prefix("wal-")?
            .strip_suffix(".seg")
            .filter(|digits| digits.len() >= 6)?
            .parse()
            .ok()
    }

    /// List all segment numbers in `dir`, ascending.
    pub fn list(dir: &Path) -> io::Result<Vec<u64>> {
        let mut segments = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if let Some(num) = Self::parse_segment_name(&name.to_string_lossy()) {
                segments.push(num);
            }
        }
        segments.sort_unstable();
        Ok(segments)
    }

    /// Segment number.
    pub fn segment_number(&self) -> u64 {
        self.segment_number
    }

    /// Current segment size in bytes, header included.
    pub fn size(&self) -> u64 {
        self.write_position
    }

    /// File path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Database UUID from the header.
    pub fn database_uuid(&self) -> [u8; 16] {
        self.database_uuid
    }

    /// Append bytes. Fails if the segment is closed.
    pub fn write(&mut self, data: &[u8]) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "Cannot write to closed segment",
            ));
        }

        self.file.write_all(data)?;
        self.write_position += data.len() as u64;
        Ok(())
    }

    /// Sync segment data to disk.
    pub fn sync(&mut self) -> io::Result<()> {
        self.file.sync_data()
    }

    /// Sync and mark the segment immutable.
    pub fn close(&mut self) -> io::Result<()> {
        if !self.closed {
            self.file.sync_all()?;
            self.closed = true;
        }
        Ok(())
    }

    /// Whether the segment is closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Read everything after the header.
    pub fn read_body(&mut self) -> io::Result<Vec<u8>> {
        self.file.seek(SeekFrom::Start(SEGMENT_HEADER_SIZE as u64))?;
        let mut buffer = Vec::new();
        self.file.read_to_end(&mut buffer)?;
        Ok(buffer)
    }

    /// Truncate at `position`, dropping a partial tail record.
    pub fn truncate(&mut self, position: u64) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "Cannot truncate closed segment",
            ));
        }

        self.file.set_len(position)?;
        self.write_position = position;
        self.file.seek(SeekFrom::Start(position))?;
        Ok(())
    }
}
