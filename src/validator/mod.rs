//! Mapping validator
//!
//! Statically checks a metadata graph for problems the mapping engine will
//! not catch at runtime.
//!
//! Per entity, in order:
//! 1. field types are registered
//! 2. every association, in declaration order (see `association`)
//! 3. class shape: visibility, then inheritance (see `class_shape`)
//!
//! # Design Principles
//!
//! - Read-only: metadata is never mutated or fixed
//! - Findings are values, never errors
//! - Entities are independent; results are merged in enumeration order
//! - Deterministic output for a given metadata source

mod association;
mod class_shape;
mod field_types;
mod report;
mod rules;

pub use field_types::{TypeRegistry, BUILTIN_TYPES};
pub use report::{ValidationError, ValidationReport};
pub use rules::Rule;

use rayon::prelude::*;

use crate::mapping::{ClassHierarchy, EntityMetadata, MetadataSource};
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::schema_drift::{SchemaDriftResult, SchemaTool};

/// Validates entities resolved through a metadata source.
pub struct MappingValidator<'a, S: ?Sized> {
    source: &'a S,
    types: TypeRegistry,
}

impl<'a, S> MappingValidator<'a, S>
where
    S: MetadataSource + ClassHierarchy + ?Sized,
{
    /// Creates a validator with the built-in column types.
    pub fn new(source: &'a S) -> Self {
        Self::with_types(source, TypeRegistry::builtin())
    }

    /// Creates a validator accepting the column types in `types`.
    pub fn with_types(source: &'a S, types: TypeRegistry) -> Self {
        Self { source, types }
    }

    /// Validates a single entity.
    ///
    /// An empty list means the entity is consistent.
    pub fn validate_class(&self, entity: &EntityMetadata) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        field_types::validate_field_types(entity, &self.types, &mut errors);

        for assoc in &entity.associations {
            association::validate_association(entity, assoc, self.source, &mut errors);
        }

        class_shape::validate_visibility(entity, &mut errors);
        class_shape::validate_inheritance(entity, self.source, &mut errors);

        errors
    }

    /// Checks the database schema against every entity the source knows.
    pub fn schema_in_sync_with_metadata<T: SchemaTool + ?Sized>(
        &self,
        tool: &T,
    ) -> SchemaDriftResult<bool> {
        Ok(self.pending_schema_changes(tool)?.is_empty())
    }

    /// Differences between the database schema and the metadata; empty when
    /// in sync.
    pub fn pending_schema_changes<T: SchemaTool + ?Sized>(
        &self,
        tool: &T,
    ) -> SchemaDriftResult<Vec<String>> {
        let entities = self.source.all_metadata();
        let changes = tool.pending_changes(&entities)?;

        let in_sync = changes.is_empty().to_string();
        let pending = changes.len().to_string();
        log_event_with_fields(
            Event::SchemaSyncChecked,
            &[("in_sync", in_sync.as_str()), ("pending", pending.as_str())],
        );

        Ok(changes)
    }
}

impl<'a, S> MappingValidator<'a, S>
where
    S: MetadataSource + ClassHierarchy + Sync + ?Sized,
{
    /// Validates every entity, keeping only entities with findings.
    ///
    /// Entities are checked in parallel; the report follows the source's
    /// enumeration order.
    pub fn validate_mapping(&self) -> ValidationReport {
        let entities = self.source.all_metadata();
        let entity_count = entities.len().to_string();
        log_event_with_fields(Event::ValidationBegin, &[("entities", entity_count.as_str())]);

        let results: Vec<(&str, Vec<ValidationError>)> = entities
            .par_iter()
            .map(|entity| (entity.name.as_str(), self.validate_class(entity)))
            .collect();

        let mut report = ValidationReport::new();
        for (name, errors) in results {
            if !errors.is_empty() {
                let count = errors.len().to_string();
                log_event_with_fields(
                    Event::EntityInvalid,
                    &[("entity", name), ("errors", count.as_str())],
                );
            }
            report.insert(name, errors);
        }

        if report.is_valid() {
            log_event(Event::ValidationComplete);
        } else {
            let invalid = report.len().to_string();
            let total = report.error_count().to_string();
            log_event_with_fields(
                Event::ValidationComplete,
                &[("errors", total.as_str()), ("invalid_entities", invalid.as_str())],
            );
        }

        report
    }

    /// True when `validate_mapping` finds nothing.
    pub fn is_mapping_valid(&self) -> bool {
        self.validate_mapping().is_valid()
    }
}
