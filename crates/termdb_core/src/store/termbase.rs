//! Termbase store.

use crate::cascade::DeletePlan;
use crate::error::{CoreError, CoreResult};
use crate::model::{EntityKind, Termbase};
use crate::state::{Row, RowKey};
use crate::store::require_text;
use crate::transaction::TransactionManager;
use crate::types::TermbaseId;

/// CRUD over termbases.
#[derive(Debug, Clone, Copy)]
pub struct TermbaseStore<'db> {
    tm: &'db TransactionManager,
}

impl<'db> TermbaseStore<'db> {
    pub(crate) fn new(tm: &'db TransactionManager) -> Self {
        Self { tm }
    }

    /// Stores a new termbase and returns its id. The id of `termbase` is
    /// ignored.
    ///
    /// A store holds a single termbase; open another store for the next one.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name is blank and `Conflict` if the
    /// store already holds a termbase.
    pub fn create(&self, termbase: &Termbase) -> CoreResult<TermbaseId> {
        require_text("termbase name", &termbase.name)?;
        self.tm.write(|txn| {
            if let Some(existing) = txn.state().termbases().next() {
                return Err(CoreError::conflict(format!(
                    "store already holds termbase {} '{}'",
                    existing.id, existing.name
                )));
            }
            let id = txn.allocate(EntityKind::Termbase);
            txn.put(Row::Termbase(Termbase {
                id,
                ..termbase.clone()
            }));
            Ok(id)
        })
    }

    /// Returns the termbase with the given id.
    #[must_use]
    pub fn get_by_id(&self, id: TermbaseId) -> Option<Termbase> {
        self.tm.read(|state| state.termbase(id).cloned())
    }

    /// Returns every termbase, in id order. This is at most one.
    #[must_use]
    pub fn get_all(&self) -> Vec<Termbase> {
        self.tm.read(|state| state.termbases().cloned().collect())
    }

    /// Replaces a stored termbase.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no termbase has this id and a validation error
    /// for a blank name.
    pub fn update(&self, termbase: &Termbase) -> CoreResult<()> {
        require_text("termbase name", &termbase.name)?;
        self.tm.write(|txn| {
            if txn.state().termbase(termbase.id).is_none() {
                return Err(CoreError::not_found(EntityKind::Termbase, termbase.id.as_u64()));
            }
            txn.put(Row::Termbase(termbase.clone()));
            Ok(())
        })
    }

    /// Deletes a termbase together with its languages, entries, terms,
    /// properties, picklist values and property values.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no termbase has this id.
    pub fn delete(&self, id: TermbaseId) -> CoreResult<()> {
        self.tm.write(|txn| {
            let state = txn.state();
            if state.termbase(id).is_none() {
                return Err(CoreError::not_found(EntityKind::Termbase, id.as_u64()));
            }
            DeletePlan::for_root(state, RowKey::Termbase(id)).stage(txn);
            Ok(())
        })
    }
}
