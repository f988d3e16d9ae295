//! Cascade delete planning.
//!
//! Deleting a record removes everything that hangs off it:
//!
//! | Root | Also removed |
//! |---|---|
//! | termbase | languages, entries (with terms and values), properties (with picklist and property values) |
//! | entry | terms with their values, then entry-level values |
//! | term | term-level values |
//! | property | picklist values, then every value of the property |
//!
//! The planner only reads the state. It lists every row to remove with
//! children before parents, and the caller commits the list as one unit.

use crate::model::{EntityKind, OwnerRef};
use crate::state::{RowKey, State};
use crate::transaction::WriteTransaction;
use crate::types::{EntryId, PropertyId, TermId, TermbaseId};
use std::collections::{BTreeMap, HashSet};

/// Ordered, deduplicated list of rows to delete.
#[derive(Debug, Default)]
pub(crate) struct DeletePlan {
    keys: Vec<RowKey>,
    seen: HashSet<RowKey>,
}

impl DeletePlan {
    /// Plans the removal of `root` and all of its descendants.
    pub(crate) fn for_root(state: &State, root: RowKey) -> Self {
        let mut plan = Self::default();
        match root {
            RowKey::Termbase(id) => plan.termbase(state, id),
            RowKey::Entry(id) => plan.entry(state, id),
            RowKey::Term(id) => plan.term(state, id),
            RowKey::Property(id) => plan.property(state, id),
            other => plan.push(other),
        }
        plan
    }

    fn push(&mut self, key: RowKey) {
        if self.seen.insert(key) {
            self.keys.push(key);
        }
    }

    fn owner_values(&mut self, state: &State, owner: OwnerRef) {
        for value in state.values_of_owner(owner) {
            self.push(RowKey::PropertyValue(value.id));
        }
    }

    fn term(&mut self, state: &State, id: TermId) {
        self.owner_values(state, OwnerRef::Term(id));
        self.push(RowKey::Term(id));
    }

    fn entry(&mut self, state: &State, id: EntryId) {
        for term in state.terms_of_entry(id) {
            self.term(state, term.id);
        }
        self.owner_values(state, OwnerRef::Entry(id));
        self.push(RowKey::Entry(id));
    }

    fn property(&mut self, state: &State, id: PropertyId) {
        for value in state.values_of_property(id) {
            self.push(RowKey::PropertyValue(value.id));
        }
        for value in state.picklist_values_of(id) {
            self.push(RowKey::PicklistValue(value.id));
        }
        self.push(RowKey::Property(id));
    }

    fn termbase(&mut self, state: &State, id: TermbaseId) {
        for entry in state.entries_of(id) {
            self.entry(state, entry.id);
        }
        for property in state.properties_of(id) {
            self.property(state, property.id);
        }
        for language in state.languages_of(id) {
            self.push(RowKey::Language(language.id));
        }
        self.push(RowKey::Termbase(id));
    }

    /// Rows to delete, children first.
    #[cfg(test)]
    pub(crate) fn keys(&self) -> &[RowKey] {
        &self.keys
    }

    /// Rows per table.
    pub(crate) fn summary(&self) -> BTreeMap<EntityKind, usize> {
        let mut summary = BTreeMap::new();
        for key in &self.keys {
            *summary.entry(key.kind()).or_insert(0) += 1;
        }
        summary
    }

    /// Stages every delete into `txn`.
    pub(crate) fn stage(self, txn: &mut WriteTransaction<'_>) {
        if let Some(root) = self.keys.last() {
            tracing::debug!(
                root = %root.kind(),
                id = root.raw(),
                rows = self.keys.len(),
                per_table = ?self.summary(),
                "cascading delete"
            );
        }
        for key in self.keys {
            txn.delete(key);
        }
    }
}
