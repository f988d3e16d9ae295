//! In-memory tables of an open store.
//!
//! The journal is the durable form; `State` is what it replays into. Every
//! table is a `BTreeMap` keyed by id, and the secondary indexes below are
//! what the cascade planner and the search engine walk. Indexes are only
//! touched by [`State::apply`], so they cannot drift from the tables.

mod integrity;
mod mutation;
mod tables;

pub use integrity::{IntegrityIssue, IntegrityReport};
pub(crate) use mutation::{Mutation, NextIds, Row, RowKey, StoredPropertyValue};
pub(crate) use tables::Tables;

use crate::model::{Entry, Language, OwnerRef, PicklistValue, Property, Term, Termbase};
use crate::types::{
    EntryId, LanguageId, PicklistValueId, PropertyId, PropertyValueId, TermId, TermbaseId,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::Hash;

fn index_insert<K: Hash + Eq, I: Ord>(index: &mut HashMap<K, BTreeSet<I>>, key: K, id: I) {
    index.entry(key).or_default().insert(id);
}

fn index_remove<K: Hash + Eq, I: Ord>(index: &mut HashMap<K, BTreeSet<I>>, key: &K, id: &I) {
    if let Some(set) = index.get_mut(key) {
        set.remove(id);
        if set.is_empty() {
            index.remove(key);
        }
    }
}

fn index_get<'a, K: Hash + Eq, I: Ord + Copy>(
    index: &'a HashMap<K, BTreeSet<I>>,
    key: &K,
) -> impl Iterator<Item = I> + 'a {
    index.get(key).into_iter().flat_map(|set| set.iter().copied())
}

/// Row counts of every table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct TableCounts {
    /// Termbases.
    pub termbases: usize,
    /// Languages.
    pub languages: usize,
    /// Entries.
    pub entries: usize,
    /// Terms.
    pub terms: usize,
    /// Properties.
    pub properties: usize,
    /// Picklist values.
    pub picklist_values: usize,
    /// Property values.
    pub property_values: usize,
}

#[derive(Debug, Default)]
pub(crate) struct State {
    termbases: BTreeMap<TermbaseId, Termbase>,
    languages: BTreeMap<LanguageId, Language>,
    entries: BTreeMap<EntryId, Entry>,
    terms: BTreeMap<TermId, Term>,
    properties: BTreeMap<PropertyId, Property>,
    picklist_values: BTreeMap<PicklistValueId, PicklistValue>,
    property_values: BTreeMap<PropertyValueId, StoredPropertyValue>,
    next_ids: NextIds,

    languages_by_termbase: HashMap<TermbaseId, BTreeSet<LanguageId>>,
    entries_by_termbase: HashMap<TermbaseId, BTreeSet<EntryId>>,
    properties_by_termbase: HashMap<TermbaseId, BTreeSet<PropertyId>>,
    terms_by_entry: HashMap<EntryId, BTreeSet<TermId>>,
    terms_by_language: HashMap<(TermbaseId, String), BTreeSet<TermId>>,
    term_termbase: HashMap<TermId, TermbaseId>,
    picklist_by_property: HashMap<PropertyId, BTreeSet<PicklistValueId>>,
    values_by_property: HashMap<PropertyId, BTreeSet<PropertyValueId>>,
    values_by_owner: HashMap<OwnerRef, BTreeSet<PropertyValueId>>,
    value_owner: HashMap<PropertyValueId, OwnerRef>,
}

impl State {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a state from a snapshot.
    pub(crate) fn from_tables(tables: Tables) -> Self {
        let mut state = Self::new();
        let next_ids = tables.next_ids;
        for mutation in tables.into_mutations() {
            state.apply(&mutation);
        }
        // Counters may be ahead of every surviving row.
        state.next_ids = next_ids;
        state
    }

    /// Captures every table for a snapshot record.
    pub(crate) fn to_tables(&self) -> Tables {
        Tables {
            termbases: self.termbases.values().cloned().collect(),
            languages: self.languages.values().cloned().collect(),
            entries: self.entries.values().copied().collect(),
            terms: self.terms.values().cloned().collect(),
            properties: self.properties.values().cloned().collect(),
            picklist_values: self.picklist_values.values().cloned().collect(),
            property_values: self.property_values.values().cloned().collect(),
            next_ids: self.next_ids,
        }
    }

    pub(crate) fn next_ids(&self) -> NextIds {
        self.next_ids
    }

    pub(crate) fn set_next_ids(&mut self, next_ids: NextIds) {
        self.next_ids = next_ids;
    }

    /// Applies one mutation. Mutations are validated before they reach
    /// the journal, so applying never fails; deleting a missing row is a
    /// no-op.
    pub(crate) fn apply(&mut self, mutation: &Mutation) {
        match mutation {
            Mutation::Put(row) => {
                self.next_ids.observe(row.key());
                self.remove(row.key());
                self.insert(row.clone());
            }
            Mutation::Delete(key) => self.remove(*key),
        }
    }

    fn insert(&mut self, row: Row) {
        match row {
            Row::Termbase(tb) => {
                self.termbases.insert(tb.id, tb);
            }
            Row::Language(lang) => {
                index_insert(&mut self.languages_by_termbase, lang.termbase_id, lang.id);
                self.languages.insert(lang.id, lang);
            }
            Row::Entry(entry) => {
                index_insert(&mut self.entries_by_termbase, entry.termbase_id, entry.id);
                self.entries.insert(entry.id, entry);
            }
            Row::Term(term) => {
                index_insert(&mut self.terms_by_entry, term.entry_id, term.id);
                if let Some(entry) = self.entries.get(&term.entry_id) {
                    let termbase_id = entry.termbase_id;
                    self.term_termbase.insert(term.id, termbase_id);
                    index_insert(
                        &mut self.terms_by_language,
                        (termbase_id, term.lang.clone()),
                        term.id,
                    );
                }
                self.terms.insert(term.id, term);
            }
            Row::Property(property) => {
                index_insert(
                    &mut self.properties_by_termbase,
                    property.termbase_id,
                    property.id,
                );
                self.properties.insert(property.id, property);
            }
            Row::PicklistValue(value) => {
                index_insert(&mut self.picklist_by_property, value.property_id, value.id);
                self.picklist_values.insert(value.id, value);
            }
            Row::PropertyValue(value) => {
                index_insert(&mut self.values_by_property, value.property_id, value.id);
                if let Some(property) = self.properties.get(&value.property_id) {
                    let owner = OwnerRef::from_raw(property.level, value.owner_id);
                    self.value_owner.insert(value.id, owner);
                    index_insert(&mut self.values_by_owner, owner, value.id);
                }
                self.property_values.insert(value.id, value);
            }
        }
    }

    fn remove(&mut self, key: RowKey) {
        match key {
            RowKey::Termbase(id) => {
                self.termbases.remove(&id);
            }
            RowKey::Language(id) => {
                if let Some(lang) = self.languages.remove(&id) {
                    index_remove(&mut self.languages_by_termbase, &lang.termbase_id, &id);
                }
            }
            RowKey::Entry(id) => {
                if let Some(entry) = self.entries.remove(&id) {
                    index_remove(&mut self.entries_by_termbase, &entry.termbase_id, &id);
                }
            }
            RowKey::Term(id) => {
                if let Some(term) = self.terms.remove(&id) {
                    index_remove(&mut self.terms_by_entry, &term.entry_id, &id);
                    if let Some(termbase_id) = self.term_termbase.remove(&id) {
                        index_remove(&mut self.terms_by_language, &(termbase_id, term.lang), &id);
                    }
                }
            }
            RowKey::Property(id) => {
                if let Some(property) = self.properties.remove(&id) {
                    index_remove(&mut self.properties_by_termbase, &property.termbase_id, &id);
                }
            }
            RowKey::PicklistValue(id) => {
                if let Some(value) = self.picklist_values.remove(&id) {
                    index_remove(&mut self.picklist_by_property, &value.property_id, &id);
                }
            }
            RowKey::PropertyValue(id) => {
                if let Some(value) = self.property_values.remove(&id) {
                    index_remove(&mut self.values_by_property, &value.property_id, &id);
                    if let Some(owner) = self.value_owner.remove(&id) {
                        index_remove(&mut self.values_by_owner, &owner, &id);
                    }
                }
            }
        }
    }

    // --- termbases -------------------------------------------------------

    pub(crate) fn termbase(&self, id: TermbaseId) -> Option<&Termbase> {
        self.termbases.get(&id)
    }

    pub(crate) fn termbases(&self) -> impl Iterator<Item = &Termbase> + '_ {
        self.termbases.values()
    }

    // --- languages -------------------------------------------------------

    pub(crate) fn language(&self, id: LanguageId) -> Option<&Language> {
        self.languages.get(&id)
    }

    pub(crate) fn languages(&self) -> impl Iterator<Item = &Language> + '_ {
        self.languages.values()
    }

    pub(crate) fn languages_of(&self, termbase_id: TermbaseId) -> impl Iterator<Item = &Language> + '_ {
        index_get(&self.languages_by_termbase, &termbase_id).filter_map(|id| self.languages.get(&id))
    }

    pub(crate) fn language_by_code(&self, termbase_id: TermbaseId, code: &str) -> Option<&Language> {
        self.languages_of(termbase_id).find(|lang| lang.code == code)
    }

    // --- entries ---------------------------------------------------------

    pub(crate) fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries.get(&id)
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.entries.values()
    }

    pub(crate) fn entries_of(&self, termbase_id: TermbaseId) -> impl Iterator<Item = &Entry> + '_ {
        index_get(&self.entries_by_termbase, &termbase_id).filter_map(|id| self.entries.get(&id))
    }

    // --- terms -----------------------------------------------------------

    pub(crate) fn term(&self, id: TermId) -> Option<&Term> {
        self.terms.get(&id)
    }

    pub(crate) fn terms(&self) -> impl Iterator<Item = &Term> + '_ {
        self.terms.values()
    }

    pub(crate) fn terms_of_entry(&self, entry_id: EntryId) -> impl Iterator<Item = &Term> + '_ {
        index_get(&self.terms_by_entry, &entry_id).filter_map(|id| self.terms.get(&id))
    }

    /// Terms of a termbase in one language, in ascending id order.
    pub(crate) fn terms_in_language(
        &self,
        termbase_id: TermbaseId,
        code: &str,
    ) -> impl Iterator<Item = &Term> + '_ {
        index_get(&self.terms_by_language, &(termbase_id, code.to_string()))
            .filter_map(|id| self.terms.get(&id))
    }

    pub(crate) fn count_terms_in_language(&self, termbase_id: TermbaseId, code: &str) -> usize {
        self.terms_by_language
            .get(&(termbase_id, code.to_string()))
            .map_or(0, BTreeSet::len)
    }

    pub(crate) fn count_terms_of_termbase(&self, termbase_id: TermbaseId) -> usize {
        index_get(&self.entries_by_termbase, &termbase_id)
            .map(|entry_id| self.terms_by_entry.get(&entry_id).map_or(0, BTreeSet::len))
            .sum()
    }

    pub(crate) fn termbase_of_term(&self, id: TermId) -> Option<TermbaseId> {
        self.term_termbase.get(&id).copied()
    }

    // --- schema ----------------------------------------------------------

    pub(crate) fn property(&self, id: PropertyId) -> Option<&Property> {
        self.properties.get(&id)
    }

    pub(crate) fn properties(&self) -> impl Iterator<Item = &Property> + '_ {
        self.properties.values()
    }

    pub(crate) fn properties_of(&self, termbase_id: TermbaseId) -> impl Iterator<Item = &Property> + '_ {
        index_get(&self.properties_by_termbase, &termbase_id).filter_map(|id| self.properties.get(&id))
    }

    pub(crate) fn picklist_value(&self, id: PicklistValueId) -> Option<&PicklistValue> {
        self.picklist_values.get(&id)
    }

    pub(crate) fn picklist_values(&self) -> impl Iterator<Item = &PicklistValue> + '_ {
        self.picklist_values.values()
    }

    pub(crate) fn picklist_values_of(
        &self,
        property_id: PropertyId,
    ) -> impl Iterator<Item = &PicklistValue> + '_ {
        index_get(&self.picklist_by_property, &property_id)
            .filter_map(|id| self.picklist_values.get(&id))
    }

    // --- property values -------------------------------------------------

    pub(crate) fn property_value(&self, id: PropertyValueId) -> Option<&StoredPropertyValue> {
        self.property_values.get(&id)
    }

    pub(crate) fn property_values(&self) -> impl Iterator<Item = &StoredPropertyValue> + '_ {
        self.property_values.values()
    }

    pub(crate) fn value_owner(&self, id: PropertyValueId) -> Option<OwnerRef> {
        self.value_owner.get(&id).copied()
    }

    pub(crate) fn values_of_owner(
        &self,
        owner: OwnerRef,
    ) -> impl Iterator<Item = &StoredPropertyValue> + '_ {
        index_get(&self.values_by_owner, &owner).filter_map(|id| self.property_values.get(&id))
    }

    pub(crate) fn values_of_property(
        &self,
        property_id: PropertyId,
    ) -> impl Iterator<Item = &StoredPropertyValue> + '_ {
        index_get(&self.values_by_property, &property_id)
            .filter_map(|id| self.property_values.get(&id))
    }

    pub(crate) fn has_values(&self, property_id: PropertyId) -> bool {
        self.values_by_property.contains_key(&property_id)
    }

    /// Whether an owner of the given kind exists.
    pub(crate) fn owner_exists(&self, owner: OwnerRef) -> bool {
        match owner {
            OwnerRef::Entry(id) => self.entries.contains_key(&id),
            OwnerRef::Term(id) => self.terms.contains_key(&id),
        }
    }

    /// Termbase an owner belongs to.
    pub(crate) fn termbase_of_owner(&self, owner: OwnerRef) -> Option<TermbaseId> {
        match owner {
            OwnerRef::Entry(id) => self.entries.get(&id).map(|e| e.termbase_id),
            OwnerRef::Term(id) => self.termbase_of_term(id),
        }
    }

    pub(crate) fn counts(&self) -> TableCounts {
        TableCounts {
            termbases: self.termbases.len(),
            languages: self.languages.len(),
            entries: self.entries.len(),
            terms: self.terms.len(),
            properties: self.properties.len(),
            picklist_values: self.picklist_values.len(),
            property_values: self.property_values.len(),
        }
    }

    pub(crate) fn check_integrity(&self) -> IntegrityReport {
        integrity::check(self)
    }
}
