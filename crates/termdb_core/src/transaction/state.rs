//! Write transaction state.

use crate::model::EntityKind;
use crate::state::{Mutation, NextIds, Row, RowKey, State};

/// A unit of work being assembled under the writer lock.
///
/// Validation reads the committed state through [`WriteTransaction::state`];
/// changes are only staged here and reach the state after the journal
/// record holding them is written.
pub(crate) struct WriteTransaction<'a> {
    state: &'a State,
    ids: NextIds,
    mutations: Vec<Mutation>,
}

impl<'a> WriteTransaction<'a> {
    pub(crate) fn new(state: &'a State) -> Self {
        Self {
            state,
            ids: state.next_ids(),
            mutations: Vec::new(),
        }
    }

    /// The committed state this transaction validates against.
    pub(crate) fn state(&self) -> &'a State {
        self.state
    }

    /// Reserves a fresh id. Ids are burnt even if the unit later fails.
    pub(crate) fn allocate<I: From<u64>>(&mut self, kind: EntityKind) -> I {
        I::from(self.ids.allocate(kind))
    }

    /// Stages an insert or full replacement.
    pub(crate) fn put(&mut self, row: Row) {
        self.mutations.push(Mutation::Put(row));
    }

    /// Stages a removal.
    pub(crate) fn delete(&mut self, key: RowKey) {
        self.mutations.push(Mutation::Delete(key));
    }

    pub(crate) fn into_parts(self) -> (NextIds, Vec<Mutation>) {
        (self.ids, self.mutations)
    }
}

impl std::fmt::Debug for WriteTransaction<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteTransaction")
            .field("mutations", &self.mutations.len())
            .finish_non_exhaustive()
    }
}
