//! Shared fixtures for the integration suites.

#![allow(dead_code)]

pub mod faults;

use termdb_core::{Database, Entry, EntryId, Language, Termbase, TermbaseId};

/// A store holding one termbase with `en` and `it` defined and one entry.
pub struct Fixture {
    pub db: Database,
    pub termbase: TermbaseId,
    pub entry: EntryId,
}

impl Fixture {
    pub fn new() -> Self {
        let db = Database::open_in_memory().unwrap();
        let termbase = db.termbases().create(&Termbase::new("test")).unwrap();
        db.languages().create(&Language::new("en", termbase)).unwrap();
        db.languages().create(&Language::new("it", termbase)).unwrap();
        let entry = db.entries().create(&Entry::new(termbase)).unwrap();
        Self {
            db,
            termbase,
            entry,
        }
    }

    /// Adds another entry to the termbase.
    pub fn entry(&self) -> EntryId {
        self.db.entries().create(&Entry::new(self.termbase)).unwrap()
    }
}

/// A termbase id no fixture store ever assigns.
pub const MISSING: TermbaseId = TermbaseId::new(999);
