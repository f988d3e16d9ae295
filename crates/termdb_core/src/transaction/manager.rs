//! Transaction manager.

use crate::error::{CoreError, CoreResult};
use crate::journal::{Journal, JournalRecord};
use crate::state::State;
use crate::transaction::state::WriteTransaction;
use crate::types::SequenceNumber;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};

/// Outcome of a journal compaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CompactionStats {
    /// Journal size before compaction, in bytes.
    pub bytes_before: u64,
    /// Journal size after compaction, in bytes.
    pub bytes_after: u64,
    /// Records in the journal before compaction.
    pub records_before: u64,
}

/// What replaying the journal found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct RecoveryInfo {
    pub records: u64,
    pub sequence: SequenceNumber,
    pub truncated_bytes: u64,
}

/// Serializes writers and publishes their changes atomically.
///
/// ## Commit pipeline
///
/// Under the writer lock a [`WriteTransaction`] validates against the
/// committed state and stages mutations. The staged mutations are written
/// as one journal record, and only then applied under the state write
/// lock. Readers hold the state read lock for a whole query, so they never
/// see part of a unit.
pub(crate) struct TransactionManager {
    journal: Journal,
    state: RwLock<State>,
    write_lock: Mutex<()>,
    committed_seq: AtomicU64,
    records: AtomicU64,
    compact_after: u64,
    read_only: bool,
}

impl TransactionManager {
    /// Replays the journal into a fresh state.
    ///
    /// A torn record at the tail is cut away; any other damage fails. A
    /// read-only manager skips the torn record without touching the journal
    /// and refuses every write.
    pub(crate) fn recover(
        journal: Journal,
        compact_after: u64,
        read_only: bool,
    ) -> CoreResult<(Self, RecoveryInfo)> {
        let scan = journal.scan()?;
        let mut info = RecoveryInfo::default();

        if scan.has_torn_tail() {
            info.truncated_bytes = scan.total_len - scan.valid_len;
            if read_only {
                tracing::warn!(
                    valid = scan.valid_len,
                    ignored = info.truncated_bytes,
                    "ignoring torn record at end of read-only journal"
                );
            } else {
                tracing::warn!(
                    valid = scan.valid_len,
                    discarded = info.truncated_bytes,
                    "discarding torn record at end of journal"
                );
                journal.truncate(scan.valid_len)?;
            }
        }

        let mut state = State::new();
        for (_, record) in scan.records {
            info.records += 1;
            info.sequence = info.sequence.max(record.sequence());
            match record {
                JournalRecord::Commit { ref mutations, .. } => {
                    for mutation in mutations {
                        state.apply(mutation);
                    }
                }
                JournalRecord::Snapshot { tables, .. } => {
                    state = State::from_tables(tables);
                }
            }
        }

        let manager = Self {
            journal,
            state: RwLock::new(state),
            write_lock: Mutex::new(()),
            committed_seq: AtomicU64::new(info.sequence.as_u64()),
            records: AtomicU64::new(info.records),
            compact_after,
            read_only,
        };
        Ok((manager, info))
    }

    /// Runs `f` against the committed state.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        let state = self.state.read();
        f(&state)
    }

    /// Runs `f` as one atomic unit of work.
    ///
    /// If `f` fails nothing is written. If it stages no mutation nothing is
    /// written either and the sequence does not advance.
    pub(crate) fn write<R>(
        &self,
        f: impl FnOnce(&mut WriteTransaction<'_>) -> CoreResult<R>,
    ) -> CoreResult<R> {
        if self.read_only {
            return Err(CoreError::ReadOnly);
        }
        let _writer = self.write_lock.lock();

        let (value, next_ids, mutations) = {
            let state = self.state.read();
            let mut txn = WriteTransaction::new(&state);
            let value = f(&mut txn)?;
            let (next_ids, mutations) = txn.into_parts();
            (value, next_ids, mutations)
        };

        if mutations.is_empty() {
            return Ok(value);
        }

        let sequence = SequenceNumber::new(self.committed_seq.load(Ordering::SeqCst)).next();
        let record = JournalRecord::Commit {
            sequence,
            mutations,
        };
        let offset = self.journal.append(&record)?;

        {
            let mut state = self.state.write();
            for mutation in record.mutations() {
                state.apply(mutation);
            }
            state.set_next_ids(next_ids);
        }

        self.committed_seq.store(sequence.as_u64(), Ordering::SeqCst);
        let records = self.records.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(%sequence, offset, mutations = record.mutations().len(), "committed");

        if self.compact_after > 0 && records >= self.compact_after {
            // The commit is durable already; a failed compaction only leaves a longer journal.
            if let Err(err) = self.compact_locked() {
                tracing::warn!(error = %err, "automatic compaction failed");
            }
        }

        Ok(value)
    }

    /// Rewrites the journal as a single snapshot of the current state.
    pub(crate) fn compact(&self) -> CoreResult<CompactionStats> {
        if self.read_only {
            return Err(CoreError::ReadOnly);
        }
        let _writer = self.write_lock.lock();
        self.compact_locked()
    }

    fn compact_locked(&self) -> CoreResult<CompactionStats> {
        let bytes_before = self.journal.size()?;
        let records_before = self.records.load(Ordering::SeqCst);

        let tables = self.state.read().to_tables();
        let rows = tables.row_count();
        let record = JournalRecord::Snapshot {
            sequence: self.committed_seq(),
            tables,
        };
        let bytes_after = self.journal.rewrite(&record)?;
        self.records.store(1, Ordering::SeqCst);

        tracing::info!(bytes_before, bytes_after, records_before, rows, "compacted journal");
        Ok(CompactionStats {
            bytes_before,
            bytes_after,
            records_before,
        })
    }

    /// Flushes and syncs the journal.
    pub(crate) fn sync(&self) -> CoreResult<()> {
        if self.read_only {
            return Ok(());
        }
        let _writer = self.write_lock.lock();
        self.journal.sync()
    }

    pub(crate) fn committed_seq(&self) -> SequenceNumber {
        SequenceNumber::new(self.committed_seq.load(Ordering::SeqCst))
    }

    pub(crate) fn record_count(&self) -> u64 {
        self.records.load(Ordering::SeqCst)
    }

    pub(crate) fn journal_size(&self) -> CoreResult<u64> {
        self.journal.size()
    }
}

impl std::fmt::Debug for TransactionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionManager")
            .field("committed_seq", &self.committed_seq())
            .field("records", &self.record_count())
            .finish_non_exhaustive()
    }
}
