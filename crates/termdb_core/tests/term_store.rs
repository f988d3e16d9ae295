mod common;

use common::Fixture;
use termdb_core::{CoreError, Entry, LemmaPolicy, Term, TermId};

#[test]
fn create_and_update_lemma() {
    let fx = Fixture::new();
    let id = fx.db.terms().create(&Term::new(fx.entry, "test", "en")).unwrap();

    let mut term = fx.db.terms().get_by_id(id).unwrap();
    assert_eq!(term.lemma, "test");
    term.lemma = "test 2".to_string();
    fx.db.terms().update(&term).unwrap();
    assert_eq!(fx.db.terms().get_by_id(id).unwrap().lemma, "test 2");
}

#[test]
fn language_must_be_defined_in_termbase() {
    let fx = Fixture::new();
    let err = fx
        .db
        .terms()
        .create(&Term::new(fx.entry, "essai", "fr"))
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }));
    assert!(fx.db.terms().get_all(fx.entry).is_empty());
}

#[test]
fn empty_lemma_needs_explicit_policy() {
    let fx = Fixture::new();
    let placeholder = Term::new(fx.entry, "  ", "en");
    assert!(matches!(
        fx.db.terms().create(&placeholder),
        Err(CoreError::Validation { .. })
    ));

    let id = fx
        .db
        .terms()
        .create_with_policy(&placeholder, LemmaPolicy::AllowEmpty)
        .unwrap();
    let mut stored = fx.db.terms().get_by_id(id).unwrap();
    stored.lemma = String::new();
    assert!(fx.db.terms().update(&stored).is_err());
    fx.db
        .terms()
        .update_with_policy(&stored, LemmaPolicy::AllowEmpty)
        .unwrap();
}

#[test]
fn get_all_returns_terms_of_entry() {
    let fx = Fixture::new();
    let other = fx.entry();
    fx.db.terms().create(&Term::new(fx.entry, "test", "en")).unwrap();
    fx.db.terms().create(&Term::new(fx.entry, "prova", "it")).unwrap();
    fx.db.terms().create(&Term::new(other, "another", "en")).unwrap();

    let lemmas: Vec<String> = fx
        .db
        .terms()
        .get_all(fx.entry)
        .into_iter()
        .map(|t| t.lemma)
        .collect();
    assert_eq!(lemmas, ["test", "prova"]);
}

#[test]
fn insert_all_is_all_or_nothing() {
    let fx = Fixture::new();
    let batch = [
        Term::new(fx.entry, "test", "en"),
        Term::new(fx.entry, "prova", "it"),
        Term::new(fx.entry, "essai", "fr"),
    ];
    assert!(fx.db.terms().insert_all(&batch).is_err());
    assert!(fx.db.terms().get_all(fx.entry).is_empty());

    let ids = fx.db.terms().insert_all(&batch[..2]).unwrap();
    assert_eq!(ids.len(), 2);
    assert!(ids[0] < ids[1]);
    assert_eq!(fx.db.terms().get_all(fx.entry).len(), 2);
}

#[test]
fn term_moves_only_to_existing_entries() {
    let fx = Fixture::new();
    let id = fx.db.terms().create(&Term::new(fx.entry, "test", "en")).unwrap();

    let sibling = fx.entry();
    let mut term = fx.db.terms().get_by_id(id).unwrap();
    term.entry_id = sibling;
    fx.db.terms().update(&term).unwrap();
    assert_eq!(fx.db.terms().get_all(sibling).len(), 1);

    let gone = fx.db.entries().create(&Entry::new(fx.termbase)).unwrap();
    fx.db.entries().delete(gone).unwrap();
    term.entry_id = gone;
    assert!(matches!(
        fx.db.terms().update(&term),
        Err(CoreError::Validation { .. })
    ));
}

#[test]
fn update_and_delete_unknown_term() {
    let fx = Fixture::new();
    let ghost = Term {
        id: TermId::new(404),
        ..Term::new(fx.entry, "ghost", "en")
    };
    assert!(matches!(
        fx.db.terms().update(&ghost),
        Err(CoreError::NotFound { .. })
    ));
    assert!(matches!(
        fx.db.terms().delete(ghost.id),
        Err(CoreError::NotFound { .. })
    ));
}
