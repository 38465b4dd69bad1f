//! WAL record format.
//!
//! One record per applied mutation. Records are self-delimiting with a
//! length prefix and a CRC32 over everything between the length and the
//! checksum.
//!
//! # Record Layout
//!
//! ```text
//! ┌─────────────────┬──────────────────┬──────────┬──────────┬─────────────┬──────────┐
//! │ Length (4 bytes)│ Format Ver (1)   │ Seq (8)  │ Kind (1) │ Body (var)  │ CRC32 (4)│
//! └─────────────────┴──────────────────┴──────────┴──────────┴─────────────┴──────────┘
//!
//! Body:
//!   Kind 1 (append): Value (8)
//!   Kind 2 (remove): Policy (1) │ Index (8)
//! ```
//!
//! All integers are little-endian. The length field covers
//! format version + seq + kind + body + CRC32.

use byteorder::{ByteOrder, LittleEndian};
use crc32fast::Hasher;
use entrystore_core::{Mutation, RemovalPolicy};

/// Current WAL record format version
pub const WAL_RECORD_FORMAT_VERSION: u8 = 1;

/// Record kind tag for `Mutation::Append`
pub const RECORD_KIND_APPEND: u8 = 1;

/// Record kind tag for `Mutation::Remove`
pub const RECORD_KIND_REMOVE: u8 = 2;

/// Bytes before the body: format version (1) + seq (8) + kind (1)
const PAYLOAD_PREFIX_LEN: usize = 10;

/// WAL record for one applied mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalRecord {
    /// Sequence number assigned by the engine (1-based, strictly increasing)
    pub seq: u64,

    /// The mutation that was applied
    pub mutation: Mutation,
}

impl WalRecord {
    /// Create a new WAL record.
    pub fn new(seq: u64, mutation: Mutation) -> Self {
        WalRecord { seq, mutation }
    }

    /// Serialize record to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(PAYLOAD_PREFIX_LEN + 9);
        payload.push(WAL_RECORD_FORMAT_VERSION);
        payload.extend_from_slice(&self.seq.to_le_bytes());

        match self.mutation {
            Mutation::Append(value) => {
                payload.push(RECORD_KIND_APPEND);
                payload.extend_from_slice(&value.to_le_bytes());
            }
            Mutation::Remove { policy, index } => {
                payload.push(RECORD_KIND_REMOVE);
                payload.push(policy.as_byte());
                payload.extend_from_slice(&index.to_le_bytes());
            }
        }

        let crc = Self::compute_crc(&payload);

        let total_len = payload.len() + 4;
        let mut record = Vec::with_capacity(4 + total_len);
        record.extend_from_slice(&(total_len as u32).to_le_bytes());
        record.extend_from_slice(&payload);
        record.extend_from_slice(&crc.to_le_bytes());

        record
    }

    /// Deserialize record from bytes.
    ///
    /// Returns (record, bytes_consumed) on success.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, usize), WalRecordError> {
        if bytes.len() < 4 {
            return Err(WalRecordError::InsufficientData);
        }

        let length = LittleEndian::read_u32(&bytes[0..4]) as usize;

        if length == 0 {
            return Err(WalRecordError::InvalidFormat);
        }

        if bytes.len() < 4 + length {
            return Err(WalRecordError::InsufficientData);
        }

        // Minimum: prefix + CRC
        if length < PAYLOAD_PREFIX_LEN + 4 {
            return Err(WalRecordError::InvalidFormat);
        }

        let payload = &bytes[4..4 + length - 4];
        let stored_crc = LittleEndian::read_u32(&bytes[4 + length - 4..4 + length]);

        let computed_crc = Self::compute_crc(payload);
        if computed_crc != stored_crc {
            return Err(WalRecordError::ChecksumMismatch {
                expected: stored_crc,
                computed: computed_crc,
            });
        }

        let format_version = payload[0];
        if format_version != WAL_RECORD_FORMAT_VERSION {
            return Err(WalRecordError::UnsupportedVersion(format_version));
        }

        let seq = LittleEndian::read_u64(&payload[1..9]);
        let kind = payload[9];
        let body = &payload[PAYLOAD_PREFIX_LEN..];

        let mutation = match kind {
            RECORD_KIND_APPEND => {
                if body.len() != 8 {
                    return Err(WalRecordError::InvalidFormat);
                }
                Mutation::Append(LittleEndian::read_u64(body))
            }
            RECORD_KIND_REMOVE => {
                if body.len() != 9 {
                    return Err(WalRecordError::InvalidFormat);
                }
                let policy = RemovalPolicy::from_byte(body[0])
                    .ok_or(WalRecordError::UnknownPolicy(body[0]))?;
                Mutation::Remove {
                    policy,
                    index: LittleEndian::read_u64(&body[1..9]),
                }
            }
            other => return Err(WalRecordError::UnknownKind(other)),
        };

        Ok((WalRecord { seq, mutation }, 4 + length))
    }

    fn compute_crc(data: &[u8]) -> u32 {
        let mut hasher = Hasher::new();
        hasher.update(data);
        hasher.finalize()
    }
}

/// WAL record parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalRecordError {
    /// Not enough data to parse record
    #[error("Insufficient data to parse record")]
    InsufficientData,

    /// Record format is invalid
    #[error("Invalid record format")]
    InvalidFormat,

    /// Checksum verification failed
    #[error("Checksum mismatch: expected {expected:08x}, computed {computed:08x}")]
    ChecksumMismatch {
        /// Expected checksum from record
        expected: u32,
        /// Computed checksum
        computed: u32,
    },

    /// Unsupported format version
    #[error("Unsupported format version: {0}")]
    UnsupportedVersion(u8),

    /// Unknown record kind tag
    #[error("Unknown record kind: {0}")]
    UnknownKind(u8),

    /// Unknown removal policy tag
    #[error("Unknown removal policy: {0}")]
    UnknownPolicy(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_record_layout() {
        let bytes = WalRecord::new(7, Mutation::Append(42)).to_bytes();
        // len + version + seq + kind + value + crc
        assert_eq!(bytes.len(), 4 + 1 + 8 + 1 + 8 + 4);
        assert_eq!(LittleEndian::read_u32(&bytes[0..4]) as usize, bytes.len() - 4);
        assert_eq!(bytes[4], WAL_RECORD_FORMAT_VERSION);
        assert_eq!(bytes[13], RECORD_KIND_APPEND);

        let (parsed, consumed) = WalRecord::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, WalRecord::new(7, Mutation::Append(42)));
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn test_remove_record_carries_policy() {
        for policy in RemovalPolicy::ALL {
            let record = WalRecord::new(9, Mutation::remove(policy, 3));
            let (parsed, _) = WalRecord::from_bytes(&record.to_bytes()).unwrap();
            assert_eq!(parsed, record);
        }
    }

    #[test]
    fn test_checksum_failure() {
        let mut bytes = WalRecord::new(42, Mutation::Append(1)).to_bytes();
        bytes[10] ^= 0xFF;

        assert!(matches!(
            WalRecord::from_bytes(&bytes),
            Err(WalRecordError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_insufficient_data() {
        assert!(matches!(
            WalRecord::from_bytes(&[1, 2, 3]),
            Err(WalRecordError::InsufficientData)
        ));
        assert!(matches!(
            WalRecord::from_bytes(&[100, 0, 0, 0, 1, 2, 3]),
            Err(WalRecordError::InsufficientData)
        ));

        let bytes = WalRecord::new(1, Mutation::Append(5)).to_bytes();
        assert!(matches!(
            WalRecord::from_bytes(&bytes[..bytes.len() - 1]),
            Err(WalRecordError::InsufficientData)
        ));
    }

    #[test]
    fn test_zero_length_is_invalid() {
        assert!(matches!(
            WalRecord::from_bytes(&[0, 0, 0, 0, 0, 0]),
            Err(WalRecordError::InvalidFormat)
        ));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let mut payload = vec![WAL_RECORD_FORMAT_VERSION];
        payload.extend_from_slice(&1u64.to_le_bytes());
        payload.push(9);
        payload.extend_from_slice(&0u64.to_le_bytes());
        let crc = WalRecord::compute_crc(&payload);

        let mut bytes = ((payload.len() + 4) as u32).to_le_bytes().to_vec();
        bytes.extend_from_slice(&payload);
        bytes.extend_from_slice(&crc.to_le_bytes());

        assert!(matches!(
            WalRecord::from_bytes(&bytes),
            Err(WalRecordError::UnknownKind(9))
        ));
    }

    #[test]
    fn test_multiple_records_in_sequence() {
        let records = vec![
            WalRecord::new(1, Mutation::Append(10)),
            WalRecord::new(2, Mutation::Append(20)),
            WalRecord::new(3, Mutation::remove(RemovalPolicy::SwapCompact, 0)),
        ];

        let mut all_bytes = Vec::new();
        for record in &records {
            all_bytes.extend_from_slice(&record.to_bytes());
        }

        let mut offset = 0;
        for expected in &records {
            let (parsed, consumed) = WalRecord::from_bytes(&all_bytes[offset..]).unwrap();
            assert_eq!(&parsed, expected);
            offset += consumed;
        }
        assert_eq!(offset, all_bytes.len());
    }
}
