mod common;

use common::Fixture;
use termdb_core::{OwnerRef, PropertyLevel, PropertyType, PropertyValue, Term};

/// Fills the fixture entry with two terms, a term-level and an
/// entry-level value.
fn populated() -> (Fixture, termdb_core::PropertyId, termdb_core::PropertyId) {
    let fx = Fixture::new();
    let usage = fx
        .db
        .schema()
        .create_property("usage", PropertyType::Text, PropertyLevel::Term, fx.termbase)
        .unwrap();
    let status = fx
        .db
        .schema()
        .create_property("status", PropertyType::Picklist, PropertyLevel::Entry, fx.termbase)
        .unwrap();
    fx.db.schema().create_picklist_value(status, "approved").unwrap();

    let ids = fx
        .db
        .terms()
        .insert_all(&[
            Term::new(fx.entry, "test", "en"),
            Term::new(fx.entry, "prova", "it"),
        ])
        .unwrap();
    fx.db
        .property_values()
        .create(&PropertyValue::new(usage, "formal"), OwnerRef::Term(ids[0]))
        .unwrap();
    fx.db
        .property_values()
        .create(&PropertyValue::new(status, "approved"), OwnerRef::Entry(fx.entry))
        .unwrap();
    (fx, usage, status)
}

#[test]
fn deleting_term_removes_its_values() {
    let (fx, usage, status) = populated();
    let term = fx.db.terms().get_all(fx.entry)[0].id;

    fx.db.terms().delete(term).unwrap();
    assert!(fx.db.property_values().get_all_for_property(usage).is_empty());
    assert_eq!(fx.db.property_values().get_all_for_property(status).len(), 1);
    assert_eq!(fx.db.terms().get_all(fx.entry).len(), 1);
    assert!(fx.db.verify().is_clean());
}

#[test]
fn deleting_entry_removes_terms_and_values() {
    let (fx, usage, status) = populated();
    let survivor = fx.entry();
    fx.db
        .terms()
        .create(&Term::new(survivor, "another", "en"))
        .unwrap();

    fx.db.entries().delete(fx.entry).unwrap();

    let counts = fx.db.stats().unwrap().tables;
    assert_eq!(counts.entries, 1);
    assert_eq!(counts.terms, 1);
    assert_eq!(counts.property_values, 0);
    assert!(fx.db.property_values().get_all_for_property(usage).is_empty());
    assert!(fx.db.property_values().get_all_for_property(status).is_empty());
    assert_eq!(fx.db.search().count_all(fx.termbase), 1);
    assert!(fx.db.verify().is_clean());
}

#[test]
fn deleting_property_removes_choices_and_assignments() {
    let (fx, usage, status) = populated();
    fx.db.schema().delete_property(status).unwrap();

    assert!(fx.db.schema().get_property(status).is_none());
    assert!(fx.db.schema().list_picklist_values(status).is_empty());
    assert!(fx
        .db
        .property_values()
        .get_all(OwnerRef::Entry(fx.entry))
        .is_empty());
    assert_eq!(fx.db.property_values().get_all_for_property(usage).len(), 1);
    assert_eq!(fx.db.terms().get_all(fx.entry).len(), 2);
}

#[test]
fn deleting_termbase_removes_everything_under_it() {
    let (fx, _, _) = populated();
    fx.db.termbases().delete(fx.termbase).unwrap();

    let counts = fx.db.stats().unwrap().tables;
    assert_eq!(counts.termbases, 0);
    assert_eq!(counts.languages, 0);
    assert_eq!(counts.entries, 0);
    assert_eq!(counts.terms, 0);
    assert_eq!(counts.properties, 0);
    assert_eq!(counts.picklist_values, 0);
    assert_eq!(counts.property_values, 0);
    assert!(fx.db.verify().is_clean());

    // The emptied store can take a fresh termbase.
    let next = fx
        .db
        .termbases()
        .create(&termdb_core::Termbase::new("next"))
        .unwrap();
    assert!(next > fx.termbase);
}
