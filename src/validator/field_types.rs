//! Column type registry and the unknown-type rule

use std::collections::BTreeSet;

use crate::mapping::EntityMetadata;

use super::report::ValidationError;
use super::rules::Rule;

/// Built-in column types
pub const BUILTIN_TYPES: &[&str] = &[
    "array",
    "bigint",
    "binary",
    "blob",
    "boolean",
    "date",
    "datetime",
    "datetimetz",
    "decimal",
    "float",
    "guid",
    "integer",
    "json",
    "json_array",
    "object",
    "simple_array",
    "smallint",
    "string",
    "text",
    "time",
];

/// Set of column type names a field mapping may use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRegistry {
    types: BTreeSet<String>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TypeRegistry {
    /// Registry holding only the built-in types
    pub fn builtin() -> Self {
        Self {
            types: BUILTIN_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Built-in types plus `custom`
    pub fn with_custom<I, T>(custom: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut registry = Self::builtin();
        registry.types.extend(custom.into_iter().map(Into::into));
        registry
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains(type_name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

pub(crate) fn validate_field_types(
    entity: &EntityMetadata,
    types: &TypeRegistry,
    errors: &mut Vec<ValidationError>,
) {
    for field in &entity.fields {
        if !types.contains(&field.type_name) {
            errors.push(ValidationError::field(
                Rule::UnknownFieldType,
                &entity.name,
                &field.field_name,
                format!(
                    "The field '{}#{}' uses a non-existent type '{}'.",
                    entity.name, field.field_name, field.type_name
                ),
            ));
        }
    }
}
