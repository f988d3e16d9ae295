use termdb_core::{CoreError, Database, EntityKind, Termbase, TermbaseId};

#[test]
fn create_assigns_id_and_round_trips() {
    let db = Database::open_in_memory().unwrap();
    let model = Termbase::new("medical").with_description("clinical vocabulary");
    let id = db.termbases().create(&model).unwrap();
    assert!(!id.is_unassigned());

    let stored = db.termbases().get_by_id(id).unwrap();
    assert_eq!(stored, Termbase { id, ..model });
}

#[test]
fn create_ignores_supplied_id() {
    let db = Database::open_in_memory().unwrap();
    let model = Termbase {
        id: TermbaseId::new(99),
        ..Termbase::new("legal")
    };
    let id = db.termbases().create(&model).unwrap();
    assert_ne!(id, TermbaseId::new(99));
    assert!(db.termbases().get_by_id(TermbaseId::new(99)).is_none());
}

#[test]
fn blank_name_is_rejected() {
    let db = Database::open_in_memory().unwrap();
    let err = db.termbases().create(&Termbase::new("   ")).unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }));
    assert!(db.termbases().get_all().is_empty());
}

#[test]
fn update_replaces_stored_fields() {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .termbases()
        .create(&Termbase::new("a").with_description("draft"))
        .unwrap();

    db.termbases()
        .update(&Termbase {
            id,
            ..Termbase::new("renamed")
        })
        .unwrap();

    let stored = db.termbases().get_by_id(id).unwrap();
    assert_eq!(stored, Termbase { id, ..Termbase::new("renamed") });
}

#[test]
fn update_and_delete_of_missing_id_are_not_found() {
    let db = Database::open_in_memory().unwrap();
    let missing = Termbase {
        id: TermbaseId::new(5),
        ..Termbase::new("x")
    };
    assert!(matches!(
        db.termbases().update(&missing),
        Err(CoreError::NotFound {
            kind: EntityKind::Termbase,
            id: 5
        })
    ));
    assert!(matches!(
        db.termbases().delete(TermbaseId::new(5)),
        Err(CoreError::NotFound { .. })
    ));
}

#[test]
fn store_holds_a_single_termbase() {
    let db = Database::open_in_memory().unwrap();
    let first = db.termbases().create(&Termbase::new("medical")).unwrap();
    let seq = db.committed_seq();

    assert!(matches!(
        db.termbases().create(&Termbase::new("legal")),
        Err(CoreError::Conflict { .. })
    ));
    assert_eq!(db.committed_seq(), seq);
    let names: Vec<String> = db.termbases().get_all().into_iter().map(|t| t.name).collect();
    assert_eq!(names, ["medical"]);
    assert!(db.termbases().get_by_id(first).is_some());
}

#[test]
fn deleted_ids_are_not_reused() {
    let db = Database::open_in_memory().unwrap();
    let first = db.termbases().create(&Termbase::new("a")).unwrap();
    db.termbases().delete(first).unwrap();
    assert!(db.termbases().get_by_id(first).is_none());

    let second = db.termbases().create(&Termbase::new("b")).unwrap();
    assert!(second > first);
}
