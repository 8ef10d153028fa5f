//! Validation findings and the aggregated report

use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use super::rules::Rule;

/// One violated rule on one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    #[serde(serialize_with = "serialize_rule")]
    rule: Rule,
    entity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    message: String,
}

fn serialize_rule<S: Serializer>(rule: &Rule, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(rule.code())
}

impl ValidationError {
    /// Finding about a specific field of `entity`
    pub fn field(
        rule: Rule,
        entity: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule,
            entity: entity.into(),
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Finding about `entity` as a whole
    pub fn entity(rule: Rule, entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule,
            entity: entity.into(),
            field: None,
            message: message.into(),
        }
    }

    pub fn rule(&self) -> Rule {
        self.rule
    }

    pub fn entity_name(&self) -> &str {
        &self.entity
    }

    pub fn field_name(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Entity name to its findings, in metadata enumeration order.
///
/// Entities without findings are never present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    entries: Vec<(String, Vec<ValidationError>)>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the findings of one entity; empty lists are dropped.
    pub fn insert(&mut self, entity: impl Into<String>, errors: Vec<ValidationError>) {
        if errors.is_empty() {
            return;
        }
        let entity = entity.into();
        match self.entries.iter_mut().find(|(name, _)| *name == entity) {
            Some((_, existing)) => existing.extend(errors),
            None => self.entries.push((entity, errors)),
        }
    }

    /// True when no entity has findings
    pub fn is_valid(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entities with findings
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Findings of one entity
    pub fn get(&self, entity: &str) -> Option<&[ValidationError]> {
        self.entries
            .iter()
            .find(|(name, _)| name == entity)
            .map(|(_, errors)| errors.as_slice())
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.get(entity).is_some()
    }

    /// Names of entities with findings
    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ValidationError])> {
        self.entries
            .iter()
            .map(|(name, errors)| (name.as_str(), errors.as_slice()))
    }

    /// Total number of findings across all entities
    pub fn error_count(&self) -> usize {
        self.entries.iter().map(|(_, errors)| errors.len()).sum()
    }
}

impl Serialize for ValidationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (entity, errors) in &self.entries {
            map.serialize_entry(entity, errors)?;
        }
        map.end()
    }
}
