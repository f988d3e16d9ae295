mod common;

use common::Fixture;
use termdb_core::{CoreError, Entry, EntryId, TermbaseId};

#[test]
fn create_requires_existing_termbase() {
    let fx = Fixture::new();
    assert!(matches!(
        fx.db.entries().create(&Entry::new(TermbaseId::new(500))),
        Err(CoreError::Validation { .. })
    ));
}

#[test]
fn get_all_is_scoped_to_termbase() {
    let fx = Fixture::new();
    let second = fx.entry();
    assert!(fx.db.entries().get_all(common::MISSING).is_empty());

    let ids: Vec<EntryId> = fx
        .db
        .entries()
        .get_all(fx.termbase)
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec![fx.entry, second]);
}

#[test]
fn entry_cannot_change_termbase() {
    let fx = Fixture::new();
    let moved = Entry {
        id: fx.entry,
        termbase_id: common::MISSING,
    };
    assert!(matches!(
        fx.db.entries().update(&moved),
        Err(CoreError::Validation { .. })
    ));

    let missing = Entry {
        id: EntryId::new(999),
        termbase_id: fx.termbase,
    };
    assert!(matches!(
        fx.db.entries().update(&missing),
        Err(CoreError::NotFound { .. })
    ));
}

#[test]
fn delete_then_read_is_none() {
    let fx = Fixture::new();
    fx.db.entries().delete(fx.entry).unwrap();
    assert!(fx.db.entries().get_by_id(fx.entry).is_none());
    assert!(matches!(
        fx.db.entries().delete(fx.entry),
        Err(CoreError::NotFound { .. })
    ));
}
