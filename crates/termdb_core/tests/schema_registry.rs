mod common;

use common::Fixture;
use termdb_core::{
    CoreError, OwnerRef, PropertyLevel, PropertyType, PropertyValue, TermbaseId,
};

#[test]
fn list_properties_filters_by_level() {
    let fx = Fixture::new();
    let schema = fx.db.schema();
    let note = schema
        .create_property("note", PropertyType::Text, PropertyLevel::Entry, fx.termbase)
        .unwrap();
    let usage = schema
        .create_property("usage", PropertyType::Picklist, PropertyLevel::Term, fx.termbase)
        .unwrap();
    assert!(schema.list_properties(common::MISSING, None).is_empty());

    let all: Vec<_> = schema
        .list_properties(fx.termbase, None)
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(all, vec![note, usage]);

    let term_level = schema.list_properties(fx.termbase, Some(PropertyLevel::Term));
    assert_eq!(term_level.len(), 1);
    assert_eq!(term_level[0].name, "usage");
    assert_eq!(term_level[0].property_type, PropertyType::Picklist);
}

#[test]
fn create_property_validates_input() {
    let fx = Fixture::new();
    let schema = fx.db.schema();
    assert!(matches!(
        schema.create_property(" ", PropertyType::Text, PropertyLevel::Entry, fx.termbase),
        Err(CoreError::Validation { .. })
    ));
    assert!(matches!(
        schema.create_property("x", PropertyType::Text, PropertyLevel::Entry, TermbaseId::new(8)),
        Err(CoreError::Validation { .. })
    ));
}

#[test]
fn rename_is_always_allowed() {
    let fx = Fixture::new();
    let schema = fx.db.schema();
    let id = schema
        .create_property("note", PropertyType::Text, PropertyLevel::Entry, fx.termbase)
        .unwrap();
    fx.db
        .property_values()
        .create(&PropertyValue::new(id, "x"), OwnerRef::Entry(fx.entry))
        .unwrap();

    let mut property = schema.get_property(id).unwrap();
    property.name = "comment".to_string();
    schema.update_property(&property).unwrap();
    assert_eq!(schema.get_property(id).unwrap().name, "comment");
}

#[test]
fn level_and_type_are_frozen_once_used() {
    let fx = Fixture::new();
    let schema = fx.db.schema();
    let id = schema
        .create_property("status", PropertyType::Picklist, PropertyLevel::Entry, fx.termbase)
        .unwrap();

    // Unused: both may change.
    let mut property = schema.get_property(id).unwrap();
    property.level = PropertyLevel::Term;
    schema.update_property(&property).unwrap();
    property.level = PropertyLevel::Entry;
    schema.update_property(&property).unwrap();

    schema.create_picklist_value(id, "approved").unwrap();
    property.property_type = PropertyType::Text;
    assert!(matches!(
        schema.update_property(&property),
        Err(CoreError::TypeMismatch { .. })
    ));

    fx.db
        .property_values()
        .create(&PropertyValue::new(id, "approved"), OwnerRef::Entry(fx.entry))
        .unwrap();
    let mut property = schema.get_property(id).unwrap();
    property.level = PropertyLevel::Term;
    assert!(matches!(
        schema.update_property(&property),
        Err(CoreError::LevelMismatch { .. })
    ));
}

#[test]
fn property_cannot_change_termbase() {
    let fx = Fixture::new();
    let schema = fx.db.schema();
    let id = schema
        .create_property("note", PropertyType::Text, PropertyLevel::Entry, fx.termbase)
        .unwrap();
    let mut property = schema.get_property(id).unwrap();
    property.termbase_id = common::MISSING;
    assert!(matches!(
        schema.update_property(&property),
        Err(CoreError::Validation { .. })
    ));
}
