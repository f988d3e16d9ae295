//! Journal record types and framing.

use crate::error::{CoreError, CoreResult};
use crate::state::{Mutation, Tables};
use crate::types::SequenceNumber;

/// Magic bytes identifying a journal record.
pub const JOURNAL_MAGIC: [u8; 4] = *b"TDBJ";

/// Current journal format version.
pub const JOURNAL_VERSION: u16 = 1;

/// magic (4) + version (2) + kind (1) + length (4)
const HEADER_FIELDS: usize = 11;

/// Header fields followed by their own crc32, so a damaged length is
/// caught instead of being read as a torn tail.
pub(crate) const HEADER_SIZE: usize = HEADER_FIELDS + 4;

pub(crate) const CRC_SIZE: usize = 4;

/// Kind byte of a journal record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordKind {
    /// An atomic set of row mutations.
    Commit = 1,
    /// Every table of the store, written by compaction.
    Snapshot = 2,
}

impl RecordKind {
    /// Converts a byte to a record kind.
    #[must_use]
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            1 => Some(Self::Commit),
            2 => Some(Self::Snapshot),
            _ => None,
        }
    }

    /// Converts the record kind to a byte.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }
}

/// One framed unit of the journal. Replaying a record either applies all
/// of it or, for a torn tail, none of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum JournalRecord {
    Commit {
        sequence: SequenceNumber,
        mutations: Vec<Mutation>,
    },
    Snapshot {
        sequence: SequenceNumber,
        tables: Tables,
    },
}

impl JournalRecord {
    pub(crate) fn kind(&self) -> RecordKind {
        match self {
            Self::Commit { .. } => RecordKind::Commit,
            Self::Snapshot { .. } => RecordKind::Snapshot,
        }
    }

    pub(crate) fn sequence(&self) -> SequenceNumber {
        match self {
            Self::Commit { sequence, .. } | Self::Snapshot { sequence, .. } => *sequence,
        }
    }

    /// Mutations carried by a commit; a snapshot carries none.
    pub(crate) fn mutations(&self) -> &[Mutation] {
        match self {
            Self::Commit { mutations, .. } => mutations,
            Self::Snapshot { .. } => &[],
        }
    }

    fn encode_payload(&self) -> CoreResult<Vec<u8>> {
        let mut buf = Vec::new();
        let result = match self {
            Self::Commit {
                sequence,
                mutations,
            } => ciborium::into_writer(&(sequence, mutations), &mut buf),
            Self::Snapshot { sequence, tables } => {
                ciborium::into_writer(&(sequence, tables), &mut buf)
            }
        };
        result.map_err(|e| CoreError::codec(e.to_string()))?;
        Ok(buf)
    }

    fn decode_payload(kind: RecordKind, payload: &[u8]) -> CoreResult<Self> {
        match kind {
            RecordKind::Commit => {
                let (sequence, mutations): (SequenceNumber, Vec<Mutation>) =
                    ciborium::from_reader(payload).map_err(|e| CoreError::codec(e.to_string()))?;
                Ok(Self::Commit {
                    sequence,
                    mutations,
                })
            }
            RecordKind::Snapshot => {
                let (sequence, tables): (SequenceNumber, Tables) =
                    ciborium::from_reader(payload).map_err(|e| CoreError::codec(e.to_string()))?;
                Ok(Self::Snapshot { sequence, tables })
            }
        }
    }

    /// Builds the full frame: header, payload and checksum.
    pub(crate) fn encode_frame(&self) -> CoreResult<Vec<u8>> {
        let payload = self.encode_payload()?;
        let len = u32::try_from(payload.len())
            .map_err(|_| CoreError::codec("journal record payload too large"))?;

        let mut data = Vec::with_capacity(HEADER_SIZE + payload.len() + CRC_SIZE);
        data.extend_from_slice(&JOURNAL_MAGIC);
        data.extend_from_slice(&JOURNAL_VERSION.to_le_bytes());
        data.push(self.kind().as_byte());
        data.extend_from_slice(&len.to_le_bytes());
        let header_crc = compute_crc32(&data);
        data.extend_from_slice(&header_crc.to_le_bytes());
        data.extend_from_slice(&payload);

        // CRC32 over everything before it
        let crc = compute_crc32(&data);
        data.extend_from_slice(&crc.to_le_bytes());
        Ok(data)
    }

    /// Decodes the frame at the start of `bytes`.
    ///
    /// Returns `Ok(None)` when `bytes` ends before the frame does (a torn
    /// write), and the record with its frame length otherwise. The length
    /// is only trusted once the header checksum matches.
    ///
    /// # Errors
    ///
    /// Bad magic, a header or payload checksum mismatch, an unknown kind, a
    /// future version or an undecodable payload are errors.
    pub(crate) fn decode_frame(bytes: &[u8], offset: u64) -> CoreResult<Option<(Self, usize)>> {
        if bytes.len() < HEADER_SIZE {
            return Ok(None);
        }

        if bytes[0..4] != JOURNAL_MAGIC {
            return Err(CoreError::journal_corruption(format!(
                "invalid magic at offset {offset}"
            )));
        }

        let stored_header = read_u32(bytes, HEADER_FIELDS);
        let computed_header = compute_crc32(&bytes[..HEADER_FIELDS]);
        if stored_header != computed_header {
            return Err(CoreError::ChecksumMismatch {
                expected: stored_header,
                actual: computed_header,
            });
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version > JOURNAL_VERSION {
            return Err(CoreError::journal_corruption(format!(
                "unsupported version {version} at offset {offset}"
            )));
        }

        let kind = RecordKind::from_byte(bytes[6]).ok_or_else(|| {
            CoreError::journal_corruption(format!(
                "unknown record kind {} at offset {offset}",
                bytes[6]
            ))
        })?;

        let len = read_u32(bytes, 7) as usize;
        let frame_len = HEADER_SIZE + len + CRC_SIZE;
        if bytes.len() < frame_len {
            return Ok(None);
        }

        let body_end = HEADER_SIZE + len;
        let stored = read_u32(bytes, body_end);
        let computed = compute_crc32(&bytes[..body_end]);
        if stored != computed {
            return Err(CoreError::ChecksumMismatch {
                expected: stored,
                actual: computed,
            });
        }

        let record = Self::decode_payload(kind, &bytes[HEADER_SIZE..body_end])?;
        Ok(Some((record, frame_len)))
    }
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Computes the CRC32 (IEEE) checksum of `data`.
#[must_use]
pub fn compute_crc32(data: &[u8]) -> u32 {
    const CRC32_TABLE: [u32; 256] = {
        let mut table = [0u32; 256];
        let mut i = 0;
        while i < 256 {
            let mut crc = i as u32;
            let mut j = 0;
            while j < 8 {
                if crc & 1 != 0 {
                    crc = (crc >> 1) ^ 0xEDB8_8320;
                } else {
                    crc >>= 1;
                }
                j += 1;
            }
            table[i] = crc;
            i += 1;
        }
        table
    };

    let mut crc = 0xFFFF_FFFF_u32;
    for &byte in data {
        let index = ((crc ^ u32::from(byte)) & 0xFF) as usize;
        crc = (crc >> 8) ^ CRC32_TABLE[index];
    }
    !crc
}
