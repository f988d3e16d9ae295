//! Entity stores for termbases, languages, entries and terms.
//!
//! Each store is a thin borrowed view over the store's transaction
//! manager. Reads return plain values; every mutating call is one atomic
//! unit of work.

mod entry;
mod language;
mod term;
mod termbase;

pub use entry::EntryStore;
pub use language::LanguageStore;
pub use term::TermStore;
pub use termbase::TermbaseStore;

use crate::error::{CoreError, CoreResult};
use crate::model::{Entry, Termbase};
use crate::state::State;
use crate::types::{EntryId, TermbaseId};

/// Rejects blank required text.
pub(crate) fn require_text(field: &str, value: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Resolves a termbase referenced as a foreign key.
pub(crate) fn require_termbase(state: &State, id: TermbaseId) -> CoreResult<&Termbase> {
    state
        .termbase(id)
        .ok_or_else(|| CoreError::validation(format!("termbase {id} does not exist")))
}

/// Resolves an entry referenced as a foreign key.
pub(crate) fn require_entry(state: &State, id: EntryId) -> CoreResult<&Entry> {
    state
        .entry(id)
        .ok_or_else(|| CoreError::validation(format!("entry {id} does not exist")))
}
