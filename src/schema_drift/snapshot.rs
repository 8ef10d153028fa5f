//! Snapshot-backed schema tool
//!
//! Snapshot format:
//! `{"tables": {"<table>": ["<column>", ...]}}`
//!
//! Every mapped table and column must be present. Extra tables and columns
//! in the snapshot are ignored.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::mapping::{AssociationKind, EntityMetadata};

use super::{SchemaDriftError, SchemaDriftResult, SchemaTool};

/// Tables and columns of a live database, as captured by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSnapshot {
    #[serde(default)]
    pub tables: BTreeMap<String, BTreeSet<String>>,
}

impl DatabaseSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table with its columns
    pub fn with_table<I, C>(mut self, table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.tables
            .insert(table.into(), columns.into_iter().map(Into::into).collect());
        self
    }

    /// Reads a snapshot file.
    pub fn load(path: &Path) -> SchemaDriftResult<Self> {
        let display = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|e| SchemaDriftError::SnapshotIo {
            path: display.clone(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| SchemaDriftError::SnapshotMalformed {
            path: display,
            reason: e.to_string(),
        })
    }

    pub fn has_table(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    pub fn has_column(&self, table: &str, column: &str) -> bool {
        self.tables
            .get(table)
            .map_or(false, |columns| columns.contains(column))
    }
}

/// `SchemaTool` comparing metadata against a `DatabaseSnapshot`.
pub struct SnapshotSchemaTool {
    snapshot: DatabaseSnapshot,
}

impl SnapshotSchemaTool {
    pub fn new(snapshot: DatabaseSnapshot) -> Self {
        Self { snapshot }
    }

    fn check_table(&self, owner: &str, table: &str, columns: &[String], changes: &mut Vec<String>) {
        if !self.snapshot.has_table(table) {
            changes.push(format!("missing table '{}' for {}", table, owner));
            return;
        }
        for column in columns {
            if !self.snapshot.has_column(table, column) {
                changes.push(format!("missing column '{}.{}' for {}", table, column, owner));
            }
        }
    }
}

impl SchemaTool for SnapshotSchemaTool {
    fn pending_changes(&self, entities: &[&EntityMetadata]) -> SchemaDriftResult<Vec<String>> {
        let by_name: BTreeMap<&str, &EntityMetadata> =
            entities.iter().map(|e| (e.name.as_str(), *e)).collect();
        let mut changes = Vec::new();

        for entity in entities {
            let mut columns: Vec<String> = entity
                .fields
                .iter()
                .map(|f| f.column_name().to_string())
                .collect();

            for assoc in entity.associations.iter().filter(|a| a.is_owning_side()) {
                match assoc.kind {
                    AssociationKind::OneToOne | AssociationKind::ManyToOne => {
                        columns.extend(assoc.resolved_join_columns().iter().map(|jc| jc.name.clone()));
                    }
                    AssociationKind::ManyToMany => {
                        // Unknown targets are the validator's concern
                        let Some(target) = by_name.get(assoc.target_entity.as_str()) else {
                            continue;
                        };
                        let join_table = assoc.resolved_join_table(entity, target);
                        let join_columns: Vec<String> = join_table
                            .join_columns
                            .iter()
                            .chain(&join_table.inverse_join_columns)
                            .map(|jc| jc.name.clone())
                            .collect();
                        let owner = format!("{}#{}", entity.name, assoc.field_name);
                        self.check_table(&owner, &join_table.name, &join_columns, &mut changes);
                    }
                    AssociationKind::OneToMany => {}
                }
            }

            self.check_table(
                &format!("entity {}", entity.name),
                entity.table_name(),
                &columns,
                &mut changes,
            );
        }

        Ok(changes)
    }
}
