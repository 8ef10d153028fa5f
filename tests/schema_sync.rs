//! Schema sync tests
//!
//! `SnapshotSchemaTool` is compared against mapped tables, join columns and
//! implicit many-to-many join tables.

use std::fs;

use ormcheck::mapping::{
    AssociationMapping, EntityMetadata, FieldMapping, JoinColumn, MetadataRegistry,
    MetadataSource,
};
use ormcheck::schema_drift::{DatabaseSnapshot, SchemaDriftError, SchemaTool, SnapshotSchemaTool};
use ormcheck::validator::MappingValidator;
use tempfile::TempDir;

fn library() -> MetadataRegistry {
    MetadataRegistry::from_entities([
        EntityMetadata::new("Book")
            .with_table("books")
            .with_id_field(FieldMapping::new("id").typed("integer"))
            .with_field(FieldMapping::new("title"))
            .with_association(
                AssociationMapping::many_to_one("publisher", "Publisher")
                    .join_column(JoinColumn::new("publisher_ref", "id")),
            )
            .with_association(AssociationMapping::many_to_many("tags", "Tag")),
        EntityMetadata::new("Publisher")
            .with_table("publishers")
            .with_id_field(FieldMapping::new("id").typed("integer")),
        EntityMetadata::new("Tag")
            .with_table("tags")
            .with_id_field(FieldMapping::new("id").typed("integer"))
            .with_field(FieldMapping::new("label").column("tag_label")),
    ])
    .unwrap()
}

fn complete_snapshot() -> DatabaseSnapshot {
    DatabaseSnapshot::new()
        .with_table("books", ["id", "title", "publisher_ref", "legacy_isbn"])
        .with_table("publishers", ["id"])
        .with_table("tags", ["id", "tag_label"])
        .with_table("books_tags", ["books_id", "tags_id"])
        .with_table("audit_log", ["id"])
}

#[test]
fn test_complete_snapshot_is_in_sync() {
    let registry = library();
    let tool = SnapshotSchemaTool::new(complete_snapshot());

    let validator = MappingValidator::new(&registry);
    assert!(validator.is_mapping_valid());
    assert!(validator.schema_in_sync_with_metadata(&tool).unwrap());
}

#[test]
fn test_missing_columns_and_join_table() {
    let registry = library();
    let snapshot = DatabaseSnapshot::new()
        .with_table("books", ["id", "title"])
        .with_table("publishers", ["id"])
        .with_table("tags", ["id", "label"]);
    let tool = SnapshotSchemaTool::new(snapshot);

    assert!(!MappingValidator::new(&registry)
        .schema_in_sync_with_metadata(&tool)
        .unwrap());

    let changes = tool.pending_changes(&registry.all_metadata()).unwrap();
    assert!(changes.contains(&"missing table 'books_tags' for Book#tags".to_string()));
    assert!(changes.contains(&"missing column 'books.publisher_ref' for entity Book".to_string()));
    assert!(changes.contains(&"missing column 'tags.tag_label' for entity Tag".to_string()));
    assert_eq!(changes.len(), 3);
}

#[test]
fn test_snapshot_file_round_trip() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("snapshot.json");
    fs::write(&path, serde_json::to_string(&complete_snapshot()).unwrap()).unwrap();

    let loaded = DatabaseSnapshot::load(&path).unwrap();
    assert!(loaded.has_column("books_tags", "tags_id"));
    assert!(!loaded.has_column("books", "tags_id"));
    assert!(!loaded.has_table("reviews"));
}

#[test]
fn test_snapshot_errors() {
    let tmp = TempDir::new().unwrap();

    let err = DatabaseSnapshot::load(&tmp.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, SchemaDriftError::SnapshotIo { .. }));
    assert_eq!(err.code(), "ORM_SNAPSHOT_IO");

    let path = tmp.path().join("bad.json");
    fs::write(&path, r#"{"tables": {"books": "id"}}"#).unwrap();
    let err = DatabaseSnapshot::load(&path).unwrap_err();
    assert_eq!(err.code(), "ORM_SNAPSHOT_MALFORMED");
}
