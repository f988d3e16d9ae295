//! Whole-store snapshot written by compaction.

use crate::model::{Entry, Language, PicklistValue, Property, Term, Termbase};
use crate::state::mutation::{Mutation, NextIds, Row, StoredPropertyValue};
use serde::{Deserialize, Serialize};

/// Every table of a store, in dependency order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Tables {
    pub termbases: Vec<Termbase>,
    pub languages: Vec<Language>,
    pub entries: Vec<Entry>,
    pub terms: Vec<Term>,
    pub properties: Vec<Property>,
    pub picklist_values: Vec<PicklistValue>,
    pub property_values: Vec<StoredPropertyValue>,
    pub next_ids: NextIds,
}

impl Tables {
    /// Converts the snapshot into puts ordered parents first, so that
    /// replaying them rebuilds every index.
    pub(crate) fn into_mutations(self) -> impl Iterator<Item = Mutation> {
        let Self {
            termbases,
            languages,
            entries,
            terms,
            properties,
            picklist_values,
            property_values,
            next_ids: _,
        } = self;

        termbases
            .into_iter()
            .map(Row::Termbase)
            .chain(languages.into_iter().map(Row::Language))
            .chain(entries.into_iter().map(Row::Entry))
            .chain(terms.into_iter().map(Row::Term))
            .chain(properties.into_iter().map(Row::Property))
            .chain(picklist_values.into_iter().map(Row::PicklistValue))
            .chain(property_values.into_iter().map(Row::PropertyValue))
            .map(Mutation::Put)
    }

    pub(crate) fn row_count(&self) -> usize {
        self.termbases.len()
            + self.languages.len()
            + self.entries.len()
            + self.terms.len()
            + self.properties.len()
            + self.picklist_values.len()
            + self.property_values.len()
    }
}
