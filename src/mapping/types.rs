//! Mapping metadata type definitions
//!
//! One `EntityMetadata` describes one mapped class:
//! - field mappings (column name, field name, column type)
//! - identifier (primary key field names)
//! - associations to other entities
//! - inheritance children (discriminator map) and declared ancestors
//! - the precomputed property descriptor used for the visibility rule
//!
//! Metadata is constructed once by the loader and never mutated while
//! validation runs.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Association cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssociationKind {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl AssociationKind {
    /// Returns the human-readable name used in messages
    pub fn as_str(&self) -> &'static str {
        match self {
            AssociationKind::OneToOne => "one-to-one",
            AssociationKind::OneToMany => "one-to-many",
            AssociationKind::ManyToOne => "many-to-one",
            AssociationKind::ManyToMany => "many-to-many",
        }
    }

    /// Single-valued on this side (stores join columns when owning)
    pub fn is_to_one(&self) -> bool {
        matches!(self, AssociationKind::OneToOne | AssociationKind::ManyToOne)
    }

    /// Collection-valued on this side
    pub fn is_to_many(&self) -> bool {
        !self.is_to_one()
    }

    /// The kind the reciprocal side of a bidirectional association must have.
    pub fn reciprocal(&self) -> AssociationKind {
        match self {
            AssociationKind::OneToOne => AssociationKind::OneToOne,
            AssociationKind::ManyToOne => AssociationKind::OneToMany,
            AssociationKind::OneToMany => AssociationKind::ManyToOne,
            AssociationKind::ManyToMany => AssociationKind::ManyToMany,
        }
    }
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Property visibility as declared on the source class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

/// Sort direction of an `order_by` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

fn default_type_name() -> String {
    "string".to_string()
}

fn default_referenced_column() -> String {
    "id".to_string()
}

/// A plain (non-association) field mapped to one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldMapping {
    pub field_name: String,
    /// Physical column, defaults to the field name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,
    /// Column type name
    #[serde(rename = "type", default = "default_type_name")]
    pub type_name: String,
}

impl FieldMapping {
    /// Create a string field whose column matches the field name
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            column_name: None,
            type_name: default_type_name(),
        }
    }

    /// Set the physical column name
    pub fn column(mut self, column_name: impl Into<String>) -> Self {
        self.column_name = Some(column_name.into());
        self
    }

    /// Set the column type name
    pub fn typed(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    /// Returns the physical column name
    pub fn column_name(&self) -> &str {
        self.column_name.as_deref().unwrap_or(&self.field_name)
    }
}

/// A column on the owning side that references a key column of another table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinColumn {
    pub name: String,
    #[serde(default = "default_referenced_column")]
    pub referenced_column_name: String,
}

impl JoinColumn {
    pub fn new(name: impl Into<String>, referenced_column_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            referenced_column_name: referenced_column_name.into(),
        }
    }
}

/// Join table of an owning many-to-many association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinTable {
    pub name: String,
    /// Columns referencing the owning entity
    #[serde(default)]
    pub join_columns: Vec<JoinColumn>,
    /// Columns referencing the target entity
    #[serde(default)]
    pub inverse_join_columns: Vec<JoinColumn>,
}

impl JoinTable {
    pub fn new(
        name: impl Into<String>,
        join_columns: Vec<JoinColumn>,
        inverse_join_columns: Vec<JoinColumn>,
    ) -> Self {
        Self {
            name: name.into(),
            join_columns,
            inverse_join_columns,
        }
    }
}

/// One `order_by` entry of a collection-valued association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderField {
    pub field: String,
    #[serde(default)]
    pub direction: OrderDirection,
}

/// One directional association field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssociationMapping {
    pub field_name: String,
    pub target_entity: String,
    #[serde(rename = "type")]
    pub kind: AssociationKind,
    /// Explicit owning flag; when absent the side owns unless `mapped_by` is set
    #[serde(
        rename = "is_owning_side",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub owning_side: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapped_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inversed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<Vec<OrderField>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub join_columns: Vec<JoinColumn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_table: Option<JoinTable>,
}

impl AssociationMapping {
    /// Create a unidirectional association
    pub fn new(
        field_name: impl Into<String>,
        kind: AssociationKind,
        target_entity: impl Into<String>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            target_entity: target_entity.into(),
            kind,
            owning_side: None,
            mapped_by: None,
            inversed_by: None,
            order_by: None,
            join_columns: Vec::new(),
            join_table: None,
        }
    }

    pub fn one_to_one(field_name: impl Into<String>, target_entity: impl Into<String>) -> Self {
        Self::new(field_name, AssociationKind::OneToOne, target_entity)
    }

    pub fn one_to_many(field_name: impl Into<String>, target_entity: impl Into<String>) -> Self {
        Self::new(field_name, AssociationKind::OneToMany, target_entity)
    }

    pub fn many_to_one(field_name: impl Into<String>, target_entity: impl Into<String>) -> Self {
        Self::new(field_name, AssociationKind::ManyToOne, target_entity)
    }

    pub fn many_to_many(field_name: impl Into<String>, target_entity: impl Into<String>) -> Self {
        Self::new(field_name, AssociationKind::ManyToMany, target_entity)
    }

    /// Mark as the inverse side mirroring `field` on the target
    pub fn mapped_by(mut self, field: impl Into<String>) -> Self {
        self.mapped_by = Some(field.into());
        self
    }

    /// Mark as the owning side whose reciprocal is `field` on the target
    pub fn inversed_by(mut self, field: impl Into<String>) -> Self {
        self.inversed_by = Some(field.into());
        self
    }

    pub fn owning(mut self, owning: bool) -> Self {
        self.owning_side = Some(owning);
        self
    }

    pub fn join_column(mut self, join_column: JoinColumn) -> Self {
        self.join_columns.push(join_column);
        self
    }

    pub fn join_table(mut self, join_table: JoinTable) -> Self {
        self.join_table = Some(join_table);
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: OrderDirection) -> Self {
        self.order_by.get_or_insert_with(Vec::new).push(OrderField {
            field: field.into(),
            direction,
        });
        self
    }

    /// Whether this side holds the join-column / join-table declaration
    pub fn is_owning_side(&self) -> bool {
        self.owning_side.unwrap_or(self.mapped_by.is_none())
    }

    /// Declared join columns, or the implicit `<field>_id -> id` column when
    /// an owning to-one association declares none.
    pub fn resolved_join_columns(&self) -> Cow<'_, [JoinColumn]> {
        if self.join_columns.is_empty() && self.kind.is_to_one() && self.is_owning_side() {
            let implicit = JoinColumn::new(
                format!("{}_id", self.field_name),
                default_referenced_column(),
            );
            return Cow::Owned(vec![implicit]);
        }
        Cow::Borrowed(&self.join_columns)
    }

    /// Declared join table, or the implicit `<source>_<target>` table with
    /// `<source>_id` / `<target>_id` columns when none is declared.
    pub fn resolved_join_table(
        &self,
        source: &EntityMetadata,
        target: &EntityMetadata,
    ) -> Cow<'_, JoinTable> {
        if let Some(join_table) = &self.join_table {
            return Cow::Borrowed(join_table);
        }
        let source_table = source.table_name().to_lowercase();
        let target_table = target.table_name().to_lowercase();
        Cow::Owned(JoinTable::new(
            format!("{}_{}", source_table, target_table),
            vec![JoinColumn::new(format!("{}_id", source_table), default_referenced_column())],
            vec![JoinColumn::new(format!("{}_id", target_table), default_referenced_column())],
        ))
    }
}

/// One property declared directly on the mapped class.
///
/// This is the precomputed reflection descriptor: the loader records what the
/// class declares so that validation never needs live introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyDescriptor {
    pub name: String,
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            name: name.into(),
            visibility,
            is_static: false,
        }
    }

    pub fn static_property(name: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            name: name.into(),
            visibility,
            is_static: true,
        }
    }
}

/// Metadata of one mapped entity class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityMetadata {
    /// Unique entity name
    pub name: String,
    /// Physical table, defaults to the entity name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldMapping>,
    /// Primary key field names, in key order
    #[serde(default)]
    pub identifier: Vec<String>,
    #[serde(default)]
    pub associations: Vec<AssociationMapping>,
    /// Inheritance children named by the discriminator map
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_classes: Vec<String>,
    /// Ancestor chain of this class, nearest parent first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parent_classes: Vec<String>,
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
}

impl EntityMetadata {
    /// Create an entity with no fields
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
            fields: Vec::new(),
            identifier: Vec::new(),
            associations: Vec::new(),
            sub_classes: Vec::new(),
            parent_classes: Vec::new(),
            properties: Vec::new(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_field(mut self, field: FieldMapping) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a field and make it part of the identifier
    pub fn with_id_field(mut self, field: FieldMapping) -> Self {
        self.identifier.push(field.field_name.clone());
        self.fields.push(field);
        self
    }

    pub fn with_association(mut self, association: AssociationMapping) -> Self {
        self.associations.push(association);
        self
    }

    pub fn with_sub_class(mut self, name: impl Into<String>) -> Self {
        self.sub_classes.push(name.into());
        self
    }

    pub fn with_parent_class(mut self, name: impl Into<String>) -> Self {
        self.parent_classes.push(name.into());
        self
    }

    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    /// Returns the physical table name
    pub fn table_name(&self) -> &str {
        self.table.as_deref().unwrap_or(&self.name)
    }

    /// Looks up a plain field mapping by field name
    pub fn field(&self, field_name: &str) -> Option<&FieldMapping> {
        self.fields.iter().find(|f| f.field_name == field_name)
    }

    /// True when `field_name` is a plain (non-association) field
    pub fn has_field(&self, field_name: &str) -> bool {
        self.field(field_name).is_some()
    }

    /// Resolves a physical column to its field name
    pub fn field_name_for_column(&self, column_name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.column_name() == column_name)
            .map(|f| f.field_name.as_str())
    }

    /// Looks up an association by field name
    pub fn association(&self, field_name: &str) -> Option<&AssociationMapping> {
        self.associations.iter().find(|a| a.field_name == field_name)
    }

    pub fn has_association(&self, field_name: &str) -> bool {
        self.association(field_name).is_some()
    }

    /// True when `field_name` is part of the primary key
    pub fn is_identifier(&self, field_name: &str) -> bool {
        self.identifier.iter().any(|id| id == field_name)
    }

    /// Physical columns composing the primary key.
    ///
    /// An identifier that is itself a to-one association contributes its
    /// join columns.
    pub fn identifier_column_names(&self) -> Vec<String> {
        let mut columns = Vec::new();
        for id in &self.identifier {
            if let Some(field) = self.field(id) {
                columns.push(field.column_name().to_string());
            } else if let Some(assoc) = self.association(id) {
                columns.extend(assoc.resolved_join_columns().iter().map(|jc| jc.name.clone()));
            }
        }
        columns
    }

    /// Non-static public properties declared directly on the class
    pub fn public_instance_properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties
            .iter()
            .filter(|p| p.visibility == Visibility::Public && !p.is_static)
    }

    /// Validates the metadata structure itself (not its consistency)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Entity name must not be empty".into());
        }

        let mut seen = std::collections::HashSet::new();
        let names = self
            .fields
            .iter()
            .map(|f| f.field_name.as_str())
            .chain(self.associations.iter().map(|a| a.field_name.as_str()));
        for name in names {
            if name.trim().is_empty() {
                return Err(format!("Entity '{}' declares a field with an empty name", self.name));
            }
            if !seen.insert(name) {
                return Err(format!(
                    "Entity '{}' declares field '{}' more than once",
                    self.name, name
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owning_side_defaults() {
        let owning = AssociationMapping::many_to_one("author", "User");
        assert!(owning.is_owning_side());

        let inverse = AssociationMapping::one_to_many("posts", "Post").mapped_by("author");
        assert!(!inverse.is_owning_side());

        let explicit = AssociationMapping::one_to_one("profile", "Profile").owning(false);
        assert!(!explicit.is_owning_side());
    }

    #[test]
    fn test_implicit_join_columns_and_table() {
        let author = AssociationMapping::many_to_one("author", "User");
        let columns = author.resolved_join_columns();
        assert_eq!(columns.as_ref(), &[JoinColumn::new("author_id", "id")]);

        let explicit = AssociationMapping::many_to_one("author", "User")
            .join_column(JoinColumn::new("writer", "uid"));
        assert_eq!(explicit.resolved_join_columns().len(), 1);
        assert_eq!(explicit.resolved_join_columns()[0].name, "writer");

        let inverse = AssociationMapping::one_to_one("profile", "Profile").mapped_by("user");
        assert!(inverse.resolved_join_columns().is_empty());

        let user = EntityMetadata::new("User");
        let group = EntityMetadata::new("Group").with_table("groups");
        let groups = AssociationMapping::many_to_many("groups", "Group");
        let table = groups.resolved_join_table(&user, &group);
        assert_eq!(table.name, "user_groups");
        assert_eq!(table.join_columns, vec![JoinColumn::new("user_id", "id")]);
        assert_eq!(table.inverse_join_columns, vec![JoinColumn::new("groups_id", "id")]);
    }

    #[test]
    fn test_reciprocal_kinds() {
        assert_eq!(AssociationKind::OneToOne.reciprocal(), AssociationKind::OneToOne);
        assert_eq!(AssociationKind::ManyToOne.reciprocal(), AssociationKind::OneToMany);
        assert_eq!(AssociationKind::OneToMany.reciprocal(), AssociationKind::ManyToOne);
        assert_eq!(AssociationKind::ManyToMany.reciprocal(), AssociationKind::ManyToMany);
    }

    #[test]
    fn test_identifier_columns_use_column_names() {
        let entity = EntityMetadata::new("Order")
            .with_id_field(FieldMapping::new("id").column("order_id").typed("integer"))
            .with_field(FieldMapping::new("total").typed("decimal"));

        assert_eq!(entity.identifier_column_names(), vec!["order_id".to_string()]);
        assert_eq!(entity.field_name_for_column("order_id"), Some("id"));
        assert_eq!(entity.field_name_for_column("id"), None);
    }

    #[test]
    fn test_derived_identity_contributes_join_columns() {
        let mut entity = EntityMetadata::new("Profile").with_association(
            AssociationMapping::one_to_one("user", "User").join_column(JoinColumn::new("user_id", "id")),
        );
        entity.identifier.push("user".into());

        assert_eq!(entity.identifier_column_names(), vec!["user_id".to_string()]);
    }

    #[test]
    fn test_public_instance_properties() {
        let entity = EntityMetadata::new("Account")
            .with_property(PropertyDescriptor::new("balance", Visibility::Public))
            .with_property(PropertyDescriptor::new("owner", Visibility::Private))
            .with_property(PropertyDescriptor::static_property("registry", Visibility::Public));

        let names: Vec<_> = entity.public_instance_properties().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["balance"]);
    }

    #[test]
    fn test_validate_structure_rejects_duplicates() {
        let entity = EntityMetadata::new("User")
            .with_field(FieldMapping::new("name"))
            .with_association(AssociationMapping::many_to_one("name", "Group"));
        assert!(entity.validate_structure().is_err());

        assert!(EntityMetadata::new("  ").validate_structure().is_err());
        assert!(EntityMetadata::new("User").validate_structure().is_ok());
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{
            "name": "Post",
            "fields": [{"field_name": "id", "type": "integer"}, {"field_name": "title"}],
            "identifier": ["id"],
            "associations": [
                {"field_name": "author", "target_entity": "User", "type": "MANY_TO_ONE",
                 "inversed_by": "posts", "join_columns": [{"name": "author_id"}]}
            ]
        }"#;
        let entity: EntityMetadata = serde_json::from_str(json).unwrap();

        assert_eq!(entity.table_name(), "Post");
        assert_eq!(entity.field("title").unwrap().type_name, "string");
        let author = entity.association("author").unwrap();
        assert_eq!(author.kind, AssociationKind::ManyToOne);
        assert!(author.is_owning_side());
        assert_eq!(author.join_columns[0].referenced_column_name, "id");
        assert!(entity.properties.is_empty());
    }
}
