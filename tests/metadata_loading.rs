//! Metadata loading tests
//!
//! Descriptor directories are built in a TempDir and loaded through the
//! public `MetadataLoader`, then validated the way the CLI does it.

use std::fs;
use std::path::Path;

use ormcheck::mapping::{
    AssociationKind, ClassHierarchy, MappingError, MetadataLoader, MetadataSource,
};
use ormcheck::validator::{MappingValidator, Rule};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

const USER: &str = r#"{
    "name": "User",
    "table": "users",
    "fields": [{"field_name": "id", "type": "integer"},
               {"field_name": "email", "column_name": "email_address"}],
    "identifier": ["id"],
    "associations": [{"field_name": "posts", "target_entity": "Post",
                      "type": "ONE_TO_MANY", "mapped_by": "author",
                      "order_by": [{"field": "published_at", "direction": "DESC"}]}],
    "properties": [{"name": "id", "visibility": "private"},
                   {"name": "email", "visibility": "protected"}]
}"#;

const POST: &str = r#"{
    "name": "Post",
    "table": "posts",
    "fields": [{"field_name": "id", "type": "integer"},
               {"field_name": "published_at", "type": "datetime"}],
    "identifier": ["id"],
    "associations": [{"field_name": "author", "target_entity": "User",
                      "type": "MANY_TO_ONE", "inversed_by": "posts",
                      "join_columns": [{"name": "author_id"}]}]
}"#;

#[test]
fn test_load_and_validate_blog() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "post.json", POST);
    write(tmp.path(), "user.json", USER);

    let registry = MetadataLoader::new(tmp.path()).load().unwrap();
    assert_eq!(registry.len(), 2);

    // Sorted file order: post.json, then user.json
    let all = registry.all_metadata();
    let names: Vec<&str> = all.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Post", "User"]);

    let user = registry.metadata_for("User").unwrap();
    assert_eq!(user.field("email").unwrap().column_name(), "email_address");
    assert_eq!(user.associations[0].kind, AssociationKind::OneToMany);
    assert!(!user.associations[0].is_owning_side());

    let post = registry.metadata_for("Post").unwrap();
    assert_eq!(post.associations[0].join_columns[0].referenced_column_name, "id");

    assert!(MappingValidator::new(&registry).is_mapping_valid());
}

#[test]
fn test_bundle_declares_non_entity_ancestors() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "media.json",
        r#"{"entities": [
                {"name": "Media", "identifier": ["id"], "fields": [{"field_name": "id"}],
                 "sub_classes": ["Photo", "Sticker"]},
                {"name": "Photo", "parent_classes": ["Media"]}
            ],
            "classes": {"Sticker": ["Decoration"]}}"#,
    );

    let registry = MetadataLoader::new(tmp.path()).load().unwrap();
    assert_eq!(registry.ancestors_of("Sticker"), vec!["Decoration".to_string()]);
    assert!(!registry.has_metadata_for("Sticker"));

    let report = MappingValidator::new(&registry).validate_mapping();
    let errors = report.get("Media").unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].rule(), Rule::UnrelatedSubclass);
}

#[test]
fn test_classes_only_bundle() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "a_person.json",
        r#"{"name": "Person", "identifier": ["id"], "fields": [{"field_name": "id"}],
            "sub_classes": ["Guest"]}"#,
    );
    write(tmp.path(), "b_classes.json", r#"{"classes": {"Guest": ["Person"]}}"#);

    let registry = MetadataLoader::new(tmp.path()).load().unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.ancestors_of("Guest"), vec!["Person".to_string()]);
    assert!(MappingValidator::new(&registry).is_mapping_valid());
}

#[test]
fn test_camel_case_association_key_is_rejected() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "post.json", POST);
    write(
        tmp.path(),
        "user.json",
        r#"{"name": "User", "identifier": ["id"], "fields": [{"field_name": "id"}],
            "associations": [{"field_name": "posts", "target_entity": "Post",
                              "type": "ONE_TO_MANY", "mappedBy": "writer"}]}"#,
    );

    let err = MetadataLoader::new(tmp.path()).load().unwrap_err();
    assert_eq!(err.code(), "ORM_METADATA_MALFORMED");
    assert!(err.to_string().contains("user.json"));
    assert!(err.to_string().contains("mappedBy"));
}

#[test]
fn test_unknown_keys_rejected_at_every_level() {
    let cases = [
        r#"{"name": "User", "tableName": "users"}"#,
        r#"{"name": "User", "fields": [{"field_name": "id", "columnName": "user_id"}]}"#,
        r#"{"name": "User", "properties": [{"name": "id", "visibility": "private", "static": true}]}"#,
        r#"{"name": "User", "associations": [{"field_name": "a", "target_entity": "User",
            "type": "MANY_TO_ONE", "join_columns": [{"name": "a_id", "referencedColumnName": "id"}]}]}"#,
        r#"{"entities": [], "classes": {}, "extra": true}"#,
    ];

    for case in cases {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "entity.json", case);
        let err = MetadataLoader::new(tmp.path()).load().unwrap_err();
        assert_eq!(err.code(), "ORM_METADATA_MALFORMED", "accepted: {}", case);
    }
}

#[test]
fn test_duplicate_entity_across_files() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "a.json", r#"{"name": "User"}"#);
    write(tmp.path(), "b.json", r#"[{"name": "User"}]"#);

    let err = MetadataLoader::new(tmp.path()).load().unwrap_err();
    assert!(matches!(err, MappingError::DuplicateEntity { ref name } if name == "User"));
    assert_eq!(err.code(), "ORM_METADATA_DUPLICATE_ENTITY");
}

#[test]
fn test_malformed_descriptor_names_file() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "broken.json", r#"{"name": "User", "associations": [{"field_name": "x"}]}"#);

    let err = MetadataLoader::new(tmp.path()).load().unwrap_err();
    assert_eq!(err.code(), "ORM_METADATA_MALFORMED");
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn test_unknown_association_kind_is_malformed() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "user.json",
        r#"{"name": "User", "associations": [
            {"field_name": "x", "target_entity": "Post", "type": "MANY_TO_SOME"}]}"#,
    );

    let err = MetadataLoader::new(tmp.path()).load().unwrap_err();
    assert_eq!(err.code(), "ORM_METADATA_MALFORMED");
}

#[test]
fn test_non_json_files_are_ignored() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "user.json", r#"{"name": "User"}"#);
    write(tmp.path(), "README.md", "not metadata");
    write(tmp.path(), "snapshot.db", "{}");

    let registry = MetadataLoader::new(tmp.path()).load().unwrap();
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_missing_directory_is_io_error() {
    let tmp = TempDir::new().unwrap();
    let err = MetadataLoader::new(tmp.path().join("absent")).load().unwrap_err();
    assert_eq!(err.code(), "ORM_METADATA_IO");
}
