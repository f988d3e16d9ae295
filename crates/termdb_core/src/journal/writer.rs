//! Journal writer and reader.

use crate::error::CoreResult;
use crate::journal::record::JournalRecord;
use parking_lot::Mutex;
use termdb_storage::StorageBackend;

/// Outcome of reading the whole journal.
#[derive(Debug)]
pub(crate) struct JournalScan {
    /// Every complete record with its offset.
    pub records: Vec<(u64, JournalRecord)>,
    /// Length of the prefix made of complete records.
    pub valid_len: u64,
    /// Length of the journal as found.
    pub total_len: u64,
}

impl JournalScan {
    /// Returns true when a partial record follows the last complete one.
    pub(crate) fn has_torn_tail(&self) -> bool {
        self.valid_len < self.total_len
    }
}

/// Append-only access to the journal of one store.
pub(crate) struct Journal {
    backend: Mutex<Box<dyn StorageBackend>>,
    sync_on_write: bool,
}

impl Journal {
    pub(crate) fn new(backend: Box<dyn StorageBackend>, sync_on_write: bool) -> Self {
        Self {
            backend: Mutex::new(backend),
            sync_on_write,
        }
    }

    /// Appends one record and returns the offset it was written at.
    ///
    /// On failure the journal is cut back to its previous length so that no
    /// partial frame is left behind.
    pub(crate) fn append(&self, record: &JournalRecord) -> CoreResult<u64> {
        let frame = record.encode_frame()?;

        let mut backend = self.backend.lock();
        let before = backend.size()?;

        let written = backend.append(&frame).and_then(|offset| {
            if self.sync_on_write {
                backend.flush()?;
            }
            Ok(offset)
        });

        match written {
            Ok(offset) => Ok(offset),
            Err(err) => {
                if let Err(truncate_err) = backend.truncate(before) {
                    tracing::warn!(
                        error = %truncate_err,
                        size = before,
                        "failed to cut back journal after a failed append"
                    );
                }
                Err(err.into())
            }
        }
    }

    /// Reads every complete record.
    ///
    /// A record cut short at the end of the journal ends the scan without
    /// error. Corruption anywhere is an error.
    pub(crate) fn scan(&self) -> CoreResult<JournalScan> {
        let bytes = self.backend.lock().read_all()?;
        let mut records = Vec::new();
        let mut offset = 0usize;

        while offset < bytes.len() {
            match JournalRecord::decode_frame(&bytes[offset..], offset as u64)? {
                Some((record, len)) => {
                    records.push((offset as u64, record));
                    offset += len;
                }
                None => break,
            }
        }

        Ok(JournalScan {
            records,
            valid_len: offset as u64,
            total_len: bytes.len() as u64,
        })
    }

    /// Cuts the journal to `len` bytes.
    pub(crate) fn truncate(&self, len: u64) -> CoreResult<()> {
        self.backend.lock().truncate(len)?;
        Ok(())
    }

    /// Atomically replaces the whole journal with a single record.
    pub(crate) fn rewrite(&self, record: &JournalRecord) -> CoreResult<u64> {
        let frame = record.encode_frame()?;
        let mut backend = self.backend.lock();
        backend.rewrite(&frame)?;
        backend.sync()?;
        Ok(frame.len() as u64)
    }

    /// Pushes buffered writes to durable storage.
    pub(crate) fn sync(&self) -> CoreResult<()> {
        let mut backend = self.backend.lock();
        backend.flush()?;
        backend.sync()?;
        Ok(())
    }

    pub(crate) fn size(&self) -> CoreResult<u64> {
        Ok(self.backend.lock().size()?)
    }
}

impl std::fmt::Debug for Journal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Journal")
            .field("sync_on_write", &self.sync_on_write)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::state::{Mutation, RowKey, Tables};
    use crate::types::{EntryId, SequenceNumber};
    use termdb_storage::InMemoryBackend;

    fn commit(seq: u64) -> JournalRecord {
        JournalRecord::Commit {
            sequence: SequenceNumber::new(seq),
            mutations: vec![Mutation::Delete(RowKey::Entry(EntryId::new(seq)))],
        }
    }

    #[test]
    fn append_then_scan() {
        let journal = Journal::new(Box::new(InMemoryBackend::new()), true);
        assert_eq!(journal.append(&commit(1)).unwrap(), 0);
        let second = journal.append(&commit(2)).unwrap();
        assert!(second > 0);

        let scan = journal.scan().unwrap();
        assert_eq!(scan.records.len(), 2);
        assert_eq!(scan.records[1].0, second);
        assert_eq!(scan.records[1].1, commit(2));
        assert!(!scan.has_torn_tail());
    }

    #[test]
    fn torn_tail_is_reported_not_fatal() {
        let backend = InMemoryBackend::new();
        let journal = Journal::new(Box::new(backend.clone()), false);
        journal.append(&commit(1)).unwrap();
        let good = journal.size().unwrap();

        let frame = commit(2).encode_frame().unwrap();
        let mut raw = backend.clone();
        raw.append(&frame[..frame.len() / 2]).unwrap();

        let scan = journal.scan().unwrap();
        assert_eq!(scan.records.len(), 1);
        assert_eq!(scan.valid_len, good);
        assert!(scan.has_torn_tail());

        journal.truncate(scan.valid_len).unwrap();
        assert_eq!(journal.size().unwrap(), good);
    }

    #[test]
    fn corrupted_record_is_fatal() {
        let backend = InMemoryBackend::new();
        let journal = Journal::new(Box::new(backend.clone()), false);
        journal.append(&commit(1)).unwrap();
        backend.corrupt_byte(12, 0x00);
        backend.corrupt_byte(13, 0xFF);

        assert!(matches!(
            journal.scan(),
            Err(CoreError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn rewrite_leaves_one_snapshot() {
        let journal = Journal::new(Box::new(InMemoryBackend::new()), false);
        for seq in 1..=5 {
            journal.append(&commit(seq)).unwrap();
        }
        let snapshot = JournalRecord::Snapshot {
            sequence: SequenceNumber::new(5),
            tables: Tables::default(),
        };
        journal.rewrite(&snapshot).unwrap();

        let scan = journal.scan().unwrap();
        assert_eq!(scan.records.len(), 1);
        assert_eq!(scan.records[0].1, snapshot);
    }
}
