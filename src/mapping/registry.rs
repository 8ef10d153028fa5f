//! In-memory metadata registry
//!
//! An arena of `EntityMetadata` plus a name-to-index map. Enumeration order
//! is registration order, which keeps validation reports reproducible.

use std::collections::HashMap;

use super::errors::{MappingError, MappingResult};
use super::source::{ClassHierarchy, MetadataSource};
use super::types::EntityMetadata;

#[derive(Debug, Default)]
pub struct MetadataRegistry {
    entities: Vec<EntityMetadata>,
    by_name: HashMap<String, usize>,
    /// Ancestor chains of classes that are not entities themselves
    classes: HashMap<String, Vec<String>>,
}

impl MetadataRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from entities, failing on the first invalid one.
    pub fn from_entities(entities: impl IntoIterator<Item = EntityMetadata>) -> MappingResult<Self> {
        let mut registry = Self::new();
        for entity in entities {
            registry.register(entity)?;
        }
        Ok(registry)
    }

    /// Registers an entity.
    ///
    /// Structurally broken metadata and duplicate names are rejected.
    pub fn register(&mut self, entity: EntityMetadata) -> MappingResult<()> {
        entity
            .validate_structure()
            .map_err(|e| MappingError::malformed("<in-memory>", e))?;

        if self.by_name.contains_key(&entity.name) {
            return Err(MappingError::DuplicateEntity { name: entity.name });
        }

        self.by_name.insert(entity.name.clone(), self.entities.len());
        self.entities.push(entity);
        Ok(())
    }

    /// Declares the ancestor chain of a non-entity class.
    pub fn declare_class(
        &mut self,
        name: impl Into<String>,
        ancestors: impl IntoIterator<Item = impl Into<String>>,
    ) {
        self.classes
            .insert(name.into(), ancestors.into_iter().map(Into::into).collect());
    }

    /// Returns the number of registered entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterates entities in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &EntityMetadata> {
        self.entities.iter()
    }
}

impl MetadataSource for MetadataRegistry {
    fn all_metadata(&self) -> Vec<&EntityMetadata> {
        self.entities.iter().collect()
    }

    fn has_metadata_for(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    fn metadata_for(&self, name: &str) -> Option<&EntityMetadata> {
        self.by_name.get(name).map(|&idx| &self.entities[idx])
    }
}

impl ClassHierarchy for MetadataRegistry {
    fn ancestors_of(&self, class_name: &str) -> Vec<String> {
        if let Some(entity) = self.metadata_for(class_name) {
            return entity.parent_classes.clone();
        }
        self.classes.get(class_name).cloned().unwrap_or_default()
    }
}
