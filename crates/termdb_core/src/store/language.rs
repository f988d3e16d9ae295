//! Language store.

use crate::error::{CoreError, CoreResult};
use crate::model::{EntityKind, Language, Term};
use crate::state::{Row, RowKey, State};
use crate::store::{require_termbase, require_text};
use crate::transaction::TransactionManager;
use crate::types::{LanguageId, TermbaseId};

/// CRUD over the languages of termbases.
///
/// Codes are unique within a termbase. Renaming a code renames the `lang`
/// of every term that used it, in the same unit of work.
#[derive(Debug, Clone, Copy)]
pub struct LanguageStore<'db> {
    tm: &'db TransactionManager,
}

fn check_code_free(state: &State, language: &Language) -> CoreResult<()> {
    match state.language_by_code(language.termbase_id, &language.code) {
        Some(existing) if existing.id != language.id => Err(CoreError::conflict(format!(
            "language code '{}' already exists in termbase {}",
            language.code, language.termbase_id
        ))),
        _ => Ok(()),
    }
}

impl<'db> LanguageStore<'db> {
    pub(crate) fn new(tm: &'db TransactionManager) -> Self {
        Self { tm }
    }

    /// Stores a new language and returns its id.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank code or a missing termbase,
    /// and a conflict if the code is already used in the termbase.
    pub fn create(&self, language: &Language) -> CoreResult<LanguageId> {
        require_text("language code", &language.code)?;
        self.tm.write(|txn| {
            let state = txn.state();
            require_termbase(state, language.termbase_id)?;
            let id = txn.allocate(EntityKind::Language);
            let row = Language {
                id,
                ..language.clone()
            };
            check_code_free(state, &row)?;
            txn.put(Row::Language(row));
            Ok(id)
        })
    }

    /// Returns the language with the given id.
    #[must_use]
    pub fn get_by_id(&self, id: LanguageId) -> Option<Language> {
        self.tm.read(|state| state.language(id).cloned())
    }

    /// Returns the language with `code` in a termbase.
    #[must_use]
    pub fn get_by_code(&self, code: &str, termbase_id: TermbaseId) -> Option<Language> {
        self.tm
            .read(|state| state.language_by_code(termbase_id, code).cloned())
    }

    /// Returns every language of a termbase, in id order.
    #[must_use]
    pub fn get_all(&self, termbase_id: TermbaseId) -> Vec<Language> {
        self.tm
            .read(|state| state.languages_of(termbase_id).cloned().collect())
    }

    /// Replaces a stored language.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, a validation error for a blank
    /// code or a changed termbase, and a conflict for a duplicate code.
    pub fn update(&self, language: &Language) -> CoreResult<()> {
        require_text("language code", &language.code)?;
        self.tm.write(|txn| {
            let state = txn.state();
            let old = state
                .language(language.id)
                .ok_or_else(|| CoreError::not_found(EntityKind::Language, language.id.as_u64()))?;
            if old.termbase_id != language.termbase_id {
                return Err(CoreError::validation(
                    "a language cannot be moved to another termbase",
                ));
            }
            check_code_free(state, language)?;

            if old.code != language.code {
                let renamed: Vec<Term> = state
                    .terms_in_language(old.termbase_id, &old.code)
                    .map(|term| Term {
                        lang: language.code.clone(),
                        ..term.clone()
                    })
                    .collect();
                tracing::debug!(
                    from = %old.code,
                    to = %language.code,
                    terms = renamed.len(),
                    "renaming language code"
                );
                for term in renamed {
                    txn.put(Row::Term(term));
                }
            }
            txn.put(Row::Language(language.clone()));
            Ok(())
        })
    }

    /// Deletes a language.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id and a conflict while terms of
    /// the termbase still use the code.
    pub fn delete(&self, id: LanguageId) -> CoreResult<()> {
        self.tm.write(|txn| {
            let state = txn.state();
            let language = state
                .language(id)
                .ok_or_else(|| CoreError::not_found(EntityKind::Language, id.as_u64()))?;
            let used = state.count_terms_in_language(language.termbase_id, &language.code);
            if used > 0 {
                return Err(CoreError::conflict(format!(
                    "language '{}' is used by {used} term(s)",
                    language.code
                )));
            }
            txn.delete(RowKey::Language(id));
            Ok(())
        })
    }
}
