//! Term store.

use crate::cascade::DeletePlan;
use crate::error::{CoreError, CoreResult};
use crate::model::{EntityKind, LemmaPolicy, Term};
use crate::state::{Row, RowKey, State};
use crate::store::require_entry;
use crate::transaction::{TransactionManager, WriteTransaction};
use crate::types::{EntryId, TermId};

/// CRUD over terms.
///
/// A term's `lang` must be a code defined in the termbase of its entry.
#[derive(Debug, Clone, Copy)]
pub struct TermStore<'db> {
    tm: &'db TransactionManager,
}

fn validate(state: &State, term: &Term, policy: LemmaPolicy) -> CoreResult<()> {
    let entry = require_entry(state, term.entry_id)?;
    if policy == LemmaPolicy::Required && term.lemma.trim().is_empty() {
        return Err(CoreError::validation("term lemma must not be empty"));
    }
    if state.language_by_code(entry.termbase_id, &term.lang).is_none() {
        return Err(CoreError::validation(format!(
            "language '{}' is not defined in termbase {}",
            term.lang, entry.termbase_id
        )));
    }
    Ok(())
}

fn stage_create(txn: &mut WriteTransaction<'_>, term: &Term, policy: LemmaPolicy) -> CoreResult<TermId> {
    validate(txn.state(), term, policy)?;
    let id = txn.allocate(EntityKind::Term);
    txn.put(Row::Term(Term {
        id,
        ..term.clone()
    }));
    Ok(id)
}

impl<'db> TermStore<'db> {
    pub(crate) fn new(tm: &'db TransactionManager) -> Self {
        Self { tm }
    }

    /// Stores a new term and returns its id. The lemma must not be blank.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing entry, a blank lemma or a
    /// language the termbase does not define.
    pub fn create(&self, term: &Term) -> CoreResult<TermId> {
        self.create_with_policy(term, LemmaPolicy::Required)
    }

    /// Stores a new term, applying `policy` to the lemma.
    ///
    /// # Errors
    ///
    /// See [`TermStore::create`].
    pub fn create_with_policy(&self, term: &Term, policy: LemmaPolicy) -> CoreResult<TermId> {
        self.tm.write(|txn| stage_create(txn, term, policy))
    }

    /// Stores several terms as one unit. Either all are stored or none
    /// is; ids are returned in input order.
    ///
    /// # Errors
    ///
    /// Fails on the first term that [`TermStore::create`] would reject.
    pub fn insert_all(&self, terms: &[Term]) -> CoreResult<Vec<TermId>> {
        self.tm.write(|txn| {
            terms
                .iter()
                .map(|term| stage_create(txn, term, LemmaPolicy::Required))
                .collect()
        })
    }

    /// Returns the term with the given id.
    #[must_use]
    pub fn get_by_id(&self, id: TermId) -> Option<Term> {
        self.tm.read(|state| state.term(id).cloned())
    }

    /// Returns every term of an entry, in id order.
    #[must_use]
    pub fn get_all(&self, entry_id: EntryId) -> Vec<Term> {
        self.tm
            .read(|state| state.terms_of_entry(entry_id).cloned().collect())
    }

    /// Replaces a stored term. The lemma must not be blank.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id and the errors of
    /// [`TermStore::create`]. A term may move to any other entry.
    pub fn update(&self, term: &Term) -> CoreResult<()> {
        self.update_with_policy(term, LemmaPolicy::Required)
    }

    /// Replaces a stored term, applying `policy` to the lemma.
    ///
    /// # Errors
    ///
    /// See [`TermStore::update`].
    pub fn update_with_policy(&self, term: &Term, policy: LemmaPolicy) -> CoreResult<()> {
        self.tm.write(|txn| {
            let state = txn.state();
            if state.term(term.id).is_none() {
                return Err(CoreError::not_found(EntityKind::Term, term.id.as_u64()));
            }
            validate(state, term, policy)?;
            txn.put(Row::Term(term.clone()));
            Ok(())
        })
    }

    /// Deletes a term and its term-level values.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub fn delete(&self, id: TermId) -> CoreResult<()> {
        self.tm.write(|txn| {
            let state = txn.state();
            if state.term(id).is_none() {
                return Err(CoreError::not_found(EntityKind::Term, id.as_u64()));
            }
            DeletePlan::for_root(state, RowKey::Term(id)).stage(txn);
            Ok(())
        })
    }
}
