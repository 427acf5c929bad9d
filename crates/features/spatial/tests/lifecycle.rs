use geocat_domain::{BoundingBox, Record, RecordId, SpatialExtra};
use geocat_spatial::{SpatialError, SpatialMetadata};
use geocat_storage::{ExtentStore, StoreError};
use tempfile::TempDir;

const SQUARE: &str = r#"{"type": "Polygon", "coordinates":
    [[[10.0, 10.0], [20.0, 10.0], [20.0, 20.0], [10.0, 20.0], [10.0, 10.0]]]}"#;
const SMALL_SQUARE: &str = r#"{"type": "Polygon", "coordinates":
    [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]]}"#;

async fn slice(temp: &TempDir) -> SpatialMetadata {
    let store = ExtentStore::builder().root(temp.path()).connect().await.unwrap();
    SpatialMetadata::new(store)
}

#[tokio::test]
async fn create_with_valid_declaration_stores_extent() {
    let temp = TempDir::new().unwrap();
    let spatial = slice(&temp).await;

    let record = Record::new("dataset-a", Some(SpatialExtra::active(SQUARE)));
    spatial.on_create(&record).await.unwrap();

    let extent = spatial.store().get(&record.id).await.unwrap().expect("extent stored");
    assert_eq!(extent.bounding_box, BoundingBox::checked(10.0, 10.0, 20.0, 20.0).unwrap());
}

#[tokio::test]
async fn edit_replaces_extent_wholesale() {
    let temp = TempDir::new().unwrap();
    let spatial = slice(&temp).await;

    spatial.on_create(&Record::new("dataset-a", Some(SpatialExtra::active(SQUARE)))).await.unwrap();
    spatial
        .on_edit(&Record::new("dataset-a", Some(SpatialExtra::active(SMALL_SQUARE))))
        .await
        .unwrap();

    let extent = spatial.store().get(&"dataset-a".into()).await.unwrap().expect("extent stored");
    assert_eq!(extent.bounding_box, BoundingBox::checked(0.0, 0.0, 1.0, 1.0).unwrap());
    assert_eq!(spatial.store().len(), 1);
}

#[tokio::test]
async fn deleted_declaration_removes_extent() {
    let temp = TempDir::new().unwrap();
    let spatial = slice(&temp).await;

    spatial.on_create(&Record::new("dataset-a", Some(SpatialExtra::active(SQUARE)))).await.unwrap();
    spatial.on_edit(&Record::new("dataset-a", Some(SpatialExtra::deleted()))).await.unwrap();

    assert!(spatial.store().get(&"dataset-a".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn record_deletion_removes_extent() {
    let temp = TempDir::new().unwrap();
    let spatial = slice(&temp).await;

    spatial.on_create(&Record::new("dataset-a", Some(SpatialExtra::active(SQUARE)))).await.unwrap();
    spatial.on_delete(&Record::new("dataset-a", None)).await.unwrap();

    assert!(spatial.store().is_empty());

    // Deleting a record that never declared an extent is fine too.
    spatial.on_delete(&Record::new("dataset-b", None)).await.unwrap();
}

#[tokio::test]
async fn record_without_declaration_is_ignored() {
    let temp = TempDir::new().unwrap();
    let spatial = slice(&temp).await;

    spatial.on_create(&Record::new("dataset-a", None)).await.unwrap();
    spatial.on_edit(&Record::new("dataset-a", None)).await.unwrap();

    assert!(spatial.store().is_empty());
}

#[tokio::test]
async fn record_without_id_is_skipped_not_failed() {
    let temp = TempDir::new().unwrap();
    let spatial = slice(&temp).await;

    let record = Record::new("", Some(SpatialExtra::active(SQUARE)));
    spatial.on_create(&record).await.unwrap();
    spatial.on_delete(&record).await.unwrap();

    assert!(spatial.store().is_empty());
}

#[tokio::test]
async fn malformed_payload_fails_before_persistence() {
    let temp = TempDir::new().unwrap();
    let spatial = slice(&temp).await;

    let record = Record::new("dataset-a", Some(SpatialExtra::active("{ not json")));
    let err = spatial.on_create(&record).await.unwrap_err();

    assert!(matches!(err, SpatialError::MalformedPayload { .. }));
    assert!(err.field_errors().contains_key("spatial"));
    assert!(spatial.store().is_empty(), "no row may exist for an invalid declaration");
}

#[tokio::test]
async fn invalid_geometry_fails_before_persistence() {
    let temp = TempDir::new().unwrap();
    let spatial = slice(&temp).await;

    let short_ring = r#"{"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]}"#;
    let record = Record::new("dataset-a", Some(SpatialExtra::active(short_ring)));
    let err = spatial.on_create(&record).await.unwrap_err();

    assert!(matches!(err, SpatialError::InvalidGeometry { .. }));
    assert!(spatial.store().is_empty());
}

#[tokio::test]
async fn persist_failure_is_summarized_by_default() {
    let temp = TempDir::new().unwrap();
    let spatial = slice(&temp).await;

    // An id the store refuses as an on-disk key reaches the persistence path
    // (it is non-empty, so the slice does not skip it).
    let record = Record::new("bad id", Some(SpatialExtra::active(SQUARE)));
    let err = spatial.on_create(&record).await.unwrap_err();

    assert!(matches!(err, SpatialError::PersistFailed { .. }), "unexpected error: {err:?}");
    assert!(err.field_errors()["spatial"][0].starts_with("Error persisting extent"));
}

#[tokio::test]
async fn persist_failure_propagates_raw_in_diagnostics_mode() {
    let temp = TempDir::new().unwrap();
    let spatial = slice(&temp).await.diagnostics(true);

    let record = Record::new("bad id", Some(SpatialExtra::active(SQUARE)));
    let err = spatial.on_create(&record).await.unwrap_err();

    match err {
        SpatialError::Store { source: StoreError::InvalidRecordId { .. } } => {},
        other => panic!("expected raw store error, got: {other:?}"),
    }
}

#[tokio::test]
async fn lifecycle_state_machine_roundtrip() {
    let temp = TempDir::new().unwrap();
    let spatial = slice(&temp).await;
    let id = RecordId::new("dataset-a");

    // NONE -> ACTIVE
    spatial.on_create(&Record::new("dataset-a", Some(SpatialExtra::active(SQUARE)))).await.unwrap();
    assert!(spatial.store().get(&id).await.unwrap().is_some());

    // ACTIVE -> ACTIVE
    spatial
        .on_edit(&Record::new("dataset-a", Some(SpatialExtra::active(SMALL_SQUARE))))
        .await
        .unwrap();
    assert_eq!(spatial.store().len(), 1);

    // ACTIVE -> NONE
    spatial.on_delete(&Record::new("dataset-a", None)).await.unwrap();
    assert!(spatial.store().get(&id).await.unwrap().is_none());
}
