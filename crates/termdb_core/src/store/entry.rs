//! Entry store.

use crate::cascade::DeletePlan;
use crate::error::{CoreError, CoreResult};
use crate::model::{EntityKind, Entry};
use crate::state::{Row, RowKey};
use crate::store::require_termbase;
use crate::transaction::TransactionManager;
use crate::types::{EntryId, TermbaseId};

/// CRUD over concept entries.
#[derive(Debug, Clone, Copy)]
pub struct EntryStore<'db> {
    tm: &'db TransactionManager,
}

impl<'db> EntryStore<'db> {
    pub(crate) fn new(tm: &'db TransactionManager) -> Self {
        Self { tm }
    }

    /// Stores a new entry and returns its id.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the termbase does not exist.
    pub fn create(&self, entry: &Entry) -> CoreResult<EntryId> {
        self.tm.write(|txn| {
            require_termbase(txn.state(), entry.termbase_id)?;
            let id = txn.allocate(EntityKind::Entry);
            txn.put(Row::Entry(Entry {
                id,
                termbase_id: entry.termbase_id,
            }));
            Ok(id)
        })
    }

    /// Returns the entry with the given id.
    #[must_use]
    pub fn get_by_id(&self, id: EntryId) -> Option<Entry> {
        self.tm.read(|state| state.entry(id).copied())
    }

    /// Returns every entry of a termbase, in id order.
    #[must_use]
    pub fn get_all(&self, termbase_id: TermbaseId) -> Vec<Entry> {
        self.tm
            .read(|state| state.entries_of(termbase_id).copied().collect())
    }

    /// Replaces a stored entry.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id and a validation error if the
    /// entry would move to another termbase.
    pub fn update(&self, entry: &Entry) -> CoreResult<()> {
        self.tm.write(|txn| {
            let old = txn
                .state()
                .entry(entry.id)
                .ok_or_else(|| CoreError::not_found(EntityKind::Entry, entry.id.as_u64()))?;
            if old.termbase_id != entry.termbase_id {
                return Err(CoreError::validation(
                    "an entry cannot be moved to another termbase",
                ));
            }
            txn.put(Row::Entry(*entry));
            Ok(())
        })
    }

    /// Deletes an entry with its terms and every value attached to them.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub fn delete(&self, id: EntryId) -> CoreResult<()> {
        self.tm.write(|txn| {
            let state = txn.state();
            if state.entry(id).is_none() {
                return Err(CoreError::not_found(EntityKind::Entry, id.as_u64()));
            }
            DeletePlan::for_root(state, RowKey::Entry(id)).stage(txn);
            Ok(())
        })
    }
}
