//! Row-level mutations recorded in the journal.

use crate::model::{
    Entry, EntityKind, Language, PicklistValue, Property, PropertyValue, Term, Termbase,
};
use crate::types::{
    EntryId, LanguageId, PicklistValueId, PropertyId, PropertyValueId, TermId, TermbaseId,
};
use serde::{Deserialize, Serialize};

/// A property value as persisted: the owner is a bare id whose kind is
/// given by the property's level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StoredPropertyValue {
    pub id: PropertyValueId,
    pub property_id: PropertyId,
    pub owner_id: u64,
    pub value: String,
}

impl StoredPropertyValue {
    pub(crate) fn to_model(&self) -> PropertyValue {
        PropertyValue {
            id: self.id,
            property_id: self.property_id,
            value: self.value.clone(),
        }
    }
}

/// A full row of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum Row {
    Termbase(Termbase),
    Language(Language),
    Entry(Entry),
    Term(Term),
    Property(Property),
    PicklistValue(PicklistValue),
    PropertyValue(StoredPropertyValue),
}

impl Row {
    pub(crate) fn key(&self) -> RowKey {
        match self {
            Self::Termbase(r) => RowKey::Termbase(r.id),
            Self::Language(r) => RowKey::Language(r.id),
            Self::Entry(r) => RowKey::Entry(r.id),
            Self::Term(r) => RowKey::Term(r.id),
            Self::Property(r) => RowKey::Property(r.id),
            Self::PicklistValue(r) => RowKey::PicklistValue(r.id),
            Self::PropertyValue(r) => RowKey::PropertyValue(r.id),
        }
    }
}

/// Primary key of a row, tagged with its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub(crate) enum RowKey {
    Termbase(TermbaseId),
    Language(LanguageId),
    Entry(EntryId),
    Term(TermId),
    Property(PropertyId),
    PicklistValue(PicklistValueId),
    PropertyValue(PropertyValueId),
}

impl RowKey {
    pub(crate) fn kind(self) -> EntityKind {
        match self {
            Self::Termbase(_) => EntityKind::Termbase,
            Self::Language(_) => EntityKind::Language,
            Self::Entry(_) => EntityKind::Entry,
            Self::Term(_) => EntityKind::Term,
            Self::Property(_) => EntityKind::Property,
            Self::PicklistValue(_) => EntityKind::PicklistValue,
            Self::PropertyValue(_) => EntityKind::PropertyValue,
        }
    }

    pub(crate) fn raw(self) -> u64 {
        match self {
            Self::Termbase(id) => id.as_u64(),
            Self::Language(id) => id.as_u64(),
            Self::Entry(id) => id.as_u64(),
            Self::Term(id) => id.as_u64(),
            Self::Property(id) => id.as_u64(),
            Self::PicklistValue(id) => id.as_u64(),
            Self::PropertyValue(id) => id.as_u64(),
        }
    }
}

/// One change inside a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum Mutation {
    /// Insert or fully replace a row.
    Put(Row),
    /// Remove a row.
    Delete(RowKey),
}

/// Next free id of every table. Ids are never handed out twice, even
/// after the row holding them was deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct NextIds {
    pub termbase: u64,
    pub language: u64,
    pub entry: u64,
    pub term: u64,
    pub property: u64,
    pub picklist_value: u64,
    pub property_value: u64,
}

impl Default for NextIds {
    fn default() -> Self {
        Self {
            termbase: 1,
            language: 1,
            entry: 1,
            term: 1,
            property: 1,
            picklist_value: 1,
            property_value: 1,
        }
    }
}

impl NextIds {
    fn slot_mut(&mut self, kind: EntityKind) -> &mut u64 {
        match kind {
            EntityKind::Termbase => &mut self.termbase,
            EntityKind::Language => &mut self.language,
            EntityKind::Entry => &mut self.entry,
            EntityKind::Term => &mut self.term,
            EntityKind::Property => &mut self.property,
            EntityKind::PicklistValue => &mut self.picklist_value,
            EntityKind::PropertyValue => &mut self.property_value,
        }
    }

    /// Hands out the next id of a table.
    pub(crate) fn allocate(&mut self, kind: EntityKind) -> u64 {
        let slot = self.slot_mut(kind);
        let id = *slot;
        *slot += 1;
        id
    }

    /// Advances the counter past an id seen in a stored row.
    pub(crate) fn observe(&mut self, key: RowKey) {
        let slot = self.slot_mut(key.kind());
        *slot = (*slot).max(key.raw() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_is_monotonic_per_table() {
        let mut ids = NextIds::default();
        assert_eq!(ids.allocate(EntityKind::Term), 1);
        assert_eq!(ids.allocate(EntityKind::Term), 2);
        assert_eq!(ids.allocate(EntityKind::Entry), 1);
    }

    #[test]
    fn observe_never_moves_backwards() {
        let mut ids = NextIds::default();
        ids.observe(RowKey::Term(TermId::new(10)));
        ids.observe(RowKey::Term(TermId::new(3)));
        assert_eq!(ids.allocate(EntityKind::Term), 11);
    }
}
