//! Tests for the SQLite variable catalog

use shared::{NewVariable, SharedError, VariableKind};

use super::common::{memory_stores, temperature, yield_variable};
use crate::error::OrchestratorError;
use crate::services::seed::default_variables;
use crate::traits::VariableCatalog;

#[tokio::test]
async fn test_seed_inserts_fixtures_once() {
    let (_db, catalog, _runs) = memory_stores();
    let fixtures = default_variables();

    let inserted = catalog.seed_if_empty(fixtures.clone()).await.unwrap();
    assert_eq!(inserted, fixtures.len());
    assert_eq!(catalog.list_all().await.unwrap().len(), fixtures.len());

    // Second boot finds rows and inserts nothing
    let inserted_again = catalog.seed_if_empty(fixtures.clone()).await.unwrap();
    assert_eq!(inserted_again, 0);
    assert_eq!(catalog.list_all().await.unwrap().len(), fixtures.len());
}

#[tokio::test]
async fn test_seed_skipped_when_catalog_has_rows() {
    let (_db, catalog, _runs) = memory_stores();
    catalog.insert(temperature()).await.unwrap();

    let inserted = catalog.seed_if_empty(default_variables()).await.unwrap();
    assert_eq!(inserted, 0);
    assert_eq!(catalog.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_fixture_leaves_catalog_empty() {
    let (_db, catalog, _runs) = memory_stores();
    let mut fixtures = default_variables();
    fixtures.push(NewVariable::new("Broken", VariableKind::Input).with_bounds(10.0, 1.0));

    let result = catalog.seed_if_empty(fixtures).await;
    assert!(matches!(
        result,
        Err(OrchestratorError::SharedError(SharedError::InvalidVariable { .. }))
    ));
    assert!(catalog.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_seed_rolls_back_partial_batch() {
    let (db, catalog, _runs) = memory_stores();
    // Reject the third insert at the storage layer
    db.call(|conn| {
        conn.execute_batch(
            "CREATE TRIGGER reject_catalyst BEFORE INSERT ON variables
             WHEN NEW.name = '触媒量'
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
    })
    .await
    .unwrap();

    let result = catalog.seed_if_empty(default_variables()).await;
    assert!(matches!(result, Err(OrchestratorError::StorageError { .. })));
    assert!(catalog.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_inserted_variable_is_listed_with_identical_fields() {
    let (_db, catalog, _runs) = memory_stores();
    let stored = catalog.insert(temperature()).await.unwrap();

    let inputs = catalog.list_by_kind("X").await.unwrap();
    assert_eq!(inputs.len(), 1);
    let listed = &inputs[0];
    assert_eq!(listed, &stored);
    assert_eq!(listed.name, "Temperature");
    assert_eq!(listed.kind, VariableKind::Input);
    assert_eq!(listed.min_value, Some(50.0));
    assert_eq!(listed.max_value, Some(150.0));
    assert_eq!(listed.default_value, Some(100.0));
    assert_eq!(listed.unit.as_deref(), Some("°C"));
}

#[tokio::test]
async fn test_list_by_kind_is_case_insensitive() {
    let (_db, catalog, _runs) = memory_stores();
    catalog.seed_if_empty(default_variables()).await.unwrap();

    let upper = catalog.list_by_kind("Y").await.unwrap();
    let lower = catalog.list_by_kind("y").await.unwrap();
    assert_eq!(upper, lower);
    assert_eq!(upper.len(), 1);
    assert_eq!(upper[0].name, "収率");

    let inputs = catalog.list_by_kind("x").await.unwrap();
    assert_eq!(inputs.len(), 4);
    assert!(inputs.iter().all(|v| v.kind == VariableKind::Input));
}

#[tokio::test]
async fn test_unknown_kind_yields_empty_list() {
    let (_db, catalog, _runs) = memory_stores();
    catalog.seed_if_empty(default_variables()).await.unwrap();

    assert!(catalog.list_by_kind("Z").await.unwrap().is_empty());
    assert!(catalog.list_by_kind("").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_all_keeps_insertion_order() {
    let (_db, catalog, _runs) = memory_stores();
    let first = catalog.insert(yield_variable()).await.unwrap();
    let second = catalog.insert(temperature()).await.unwrap();
    assert!(second.id > first.id);

    let names: Vec<String> = catalog.list_all().await.unwrap().into_iter().map(|v| v.name).collect();
    assert_eq!(names, vec!["Yield".to_string(), "Temperature".to_string()]);
}

#[tokio::test]
async fn test_insert_rejects_default_outside_bounds() {
    let (_db, catalog, _runs) = memory_stores();
    let invalid = temperature().with_default(200.0);

    let err = catalog.insert(invalid).await.unwrap_err();
    assert_eq!(err.kind(), crate::error::FailureKind::Validation);
    assert!(catalog.list_all().await.unwrap().is_empty());
}
