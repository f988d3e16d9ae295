mod common;

use common::Fixture;
use termdb_core::{CoreError, Language, LanguageId, Term, TermbaseId};

#[test]
fn create_and_lookup_by_code() {
    let fx = Fixture::new();
    let id = fx
        .db
        .languages()
        .create(&Language::new("de", fx.termbase).with_name("German"))
        .unwrap();

    let by_code = fx.db.languages().get_by_code("de", fx.termbase).unwrap();
    assert_eq!(by_code.id, id);
    assert_eq!(by_code.name, "German");
    assert_eq!(fx.db.languages().get_by_id(id), Some(by_code));
    assert!(fx.db.languages().get_by_code("de", TermbaseId::new(77)).is_none());
}

#[test]
fn duplicate_code_is_a_conflict() {
    let fx = Fixture::new();
    let err = fx
        .db
        .languages()
        .create(&Language::new("en", fx.termbase))
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict { .. }));
    assert_eq!(fx.db.languages().get_all(fx.termbase).len(), 2);
}

#[test]
fn same_code_in_another_store_is_allowed() {
    let fx = Fixture::new();
    let other = Fixture::new();
    assert_eq!(fx.db.languages().get_all(fx.termbase).len(), 2);
    assert_eq!(other.db.languages().get_all(other.termbase).len(), 2);
    assert!(other.db.languages().get_by_code("en", other.termbase).is_some());
}

#[test]
fn empty_code_and_missing_termbase_are_rejected() {
    let fx = Fixture::new();
    assert!(matches!(
        fx.db.languages().create(&Language::new("", fx.termbase)),
        Err(CoreError::Validation { .. })
    ));
    assert!(matches!(
        fx.db.languages().create(&Language::new("fr", TermbaseId::new(42))),
        Err(CoreError::Validation { .. })
    ));
}

#[test]
fn renaming_code_carries_terms_along() {
    let fx = Fixture::new();
    let term = fx
        .db
        .terms()
        .create(&Term::new(fx.entry, "prova", "it"))
        .unwrap();

    let mut italian = fx.db.languages().get_by_code("it", fx.termbase).unwrap();
    italian.code = "it-IT".to_string();
    fx.db.languages().update(&italian).unwrap();

    assert_eq!(fx.db.terms().get_by_id(term).unwrap().lang, "it-IT");
    assert_eq!(fx.db.search().count_by_language("it-IT", fx.termbase), 1);
    assert_eq!(fx.db.search().count_by_language("it", fx.termbase), 0);
}

#[test]
fn renaming_onto_existing_code_is_a_conflict() {
    let fx = Fixture::new();
    let mut italian = fx.db.languages().get_by_code("it", fx.termbase).unwrap();
    italian.code = "en".to_string();
    assert!(matches!(
        fx.db.languages().update(&italian),
        Err(CoreError::Conflict { .. })
    ));
}

#[test]
fn language_in_use_cannot_be_deleted() {
    let fx = Fixture::new();
    fx.db
        .terms()
        .create(&Term::new(fx.entry, "test", "en"))
        .unwrap();
    let english = fx.db.languages().get_by_code("en", fx.termbase).unwrap();
    assert!(matches!(
        fx.db.languages().delete(english.id),
        Err(CoreError::Conflict { .. })
    ));

    let italian = fx.db.languages().get_by_code("it", fx.termbase).unwrap();
    fx.db.languages().delete(italian.id).unwrap();
    assert!(fx.db.languages().get_by_id(italian.id).is_none());
    assert!(matches!(
        fx.db.languages().delete(LanguageId::new(1000)),
        Err(CoreError::NotFound { .. })
    ));
}
