//! Structured term search.
//!
//! A query selects the terms of one termbase in a main language and keeps
//! those that meet every criterion. A criterion is met when one of its
//! descriptors applies to the term's language and one of the inspected
//! fields matches the text.
//!
//! Results are ordered by ascending term id.

mod criteria;
mod matcher;

pub use criteria::{MatchDescriptor, SearchCriterion};

use crate::config::FuzzyMode;
use crate::model::{OwnerRef, PropertyLevel, Term};
use crate::state::State;
use crate::transaction::TransactionManager;
use crate::types::{EntryId, TermbaseId};
use matcher::TextMatcher;
use serde::Serialize;

/// A matching term with the other terms of its entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermWithContext {
    /// The matching term.
    pub term: Term,
    /// Entry the term realizes.
    pub entry_id: EntryId,
    /// Every other term of the entry, in id order.
    pub translations: Vec<Term>,
}

struct Query<'q> {
    criteria: Vec<(&'q SearchCriterion, TextMatcher)>,
}

impl<'q> Query<'q> {
    fn new(criteria: &'q [SearchCriterion], fuzzy: FuzzyMode) -> Self {
        Self {
            criteria: criteria
                .iter()
                .map(|criterion| (criterion, TextMatcher::new(criterion, fuzzy)))
                .collect(),
        }
    }

    fn accepts(&self, state: &State, term: &Term) -> bool {
        self.criteria.iter().all(|(criterion, matcher)| {
            criterion
                .matching()
                .iter()
                .filter(|descriptor| descriptor.lang == term.lang)
                .any(|descriptor| descriptor_matches(state, term, descriptor, matcher))
        })
    }

    fn run<'s>(
        &'s self,
        state: &'s State,
        termbase_id: TermbaseId,
        main_lang: &str,
    ) -> impl Iterator<Item = &'s Term> + 's {
        state
            .terms_in_language(termbase_id, main_lang)
            .filter(move |term| self.accepts(state, term))
    }
}

fn descriptor_matches(
    state: &State,
    term: &Term,
    descriptor: &MatchDescriptor,
    matcher: &TextMatcher,
) -> bool {
    if descriptor.lemma && matcher.matches(&term.lemma) {
        return true;
    }
    descriptor.properties.iter().any(|&property_id| {
        let Some(property) = state.property(property_id) else {
            return false;
        };
        let owner = match property.level {
            PropertyLevel::Term => OwnerRef::Term(term.id),
            PropertyLevel::Entry => OwnerRef::Entry(term.entry_id),
        };
        state
            .values_of_owner(owner)
            .filter(|value| value.property_id == property_id)
            .any(|value| matcher.matches(&value.value))
    })
}

/// Runs searches and counting queries against a store.
#[derive(Debug, Clone, Copy)]
pub struct SearchEngine<'db> {
    tm: &'db TransactionManager,
    fuzzy: FuzzyMode,
}

impl<'db> SearchEngine<'db> {
    pub(crate) fn new(tm: &'db TransactionManager, fuzzy: FuzzyMode) -> Self {
        Self { tm, fuzzy }
    }

    /// Returns the terms of `termbase_id` in `main_lang` that meet every
    /// criterion. With no criteria every such term is returned.
    #[must_use]
    pub fn get_all(
        &self,
        termbase_id: TermbaseId,
        main_lang: &str,
        criteria: &[SearchCriterion],
    ) -> Vec<TermWithContext> {
        let query = Query::new(criteria, self.fuzzy);
        self.tm.read(|state| {
            query
                .run(state, termbase_id, main_lang)
                .map(|term| TermWithContext {
                    term: term.clone(),
                    entry_id: term.entry_id,
                    translations: state
                        .terms_of_entry(term.entry_id)
                        .filter(|other| other.id != term.id)
                        .cloned()
                        .collect(),
                })
                .collect()
        })
    }

    /// Counts what [`SearchEngine::get_all`] would return.
    #[must_use]
    pub fn count_matching(
        &self,
        termbase_id: TermbaseId,
        main_lang: &str,
        criteria: &[SearchCriterion],
    ) -> usize {
        let query = Query::new(criteria, self.fuzzy);
        self.tm
            .read(|state| query.run(state, termbase_id, main_lang).count())
    }

    /// Counts every term of a termbase.
    #[must_use]
    pub fn count_all(&self, termbase_id: TermbaseId) -> usize {
        self.tm
            .read(|state| state.count_terms_of_termbase(termbase_id))
    }

    /// Counts the terms of a termbase in one language.
    #[must_use]
    pub fn count_by_language(&self, code: &str, termbase_id: TermbaseId) -> usize {
        self.tm
            .read(|state| state.count_terms_in_language(termbase_id, code))
    }
}
