//! Schema drift check
//!
//! Whether the live database structure matches the mapping metadata is
//! decided by a `SchemaTool`. The validator only hands it the entity list.
//! `SnapshotSchemaTool` compares against a JSON description of the live
//! tables; no database connection is made.

mod snapshot;

pub use snapshot::{DatabaseSnapshot, SnapshotSchemaTool};

use thiserror::Error;

use crate::mapping::EntityMetadata;

/// Result type for schema drift checks
pub type SchemaDriftResult<T> = Result<T, SchemaDriftError>;

#[derive(Debug, Clone, Error)]
pub enum SchemaDriftError {
    #[error("Failed to read snapshot '{path}': {reason}")]
    SnapshotIo { path: String, reason: String },

    #[error("Malformed snapshot '{path}': {reason}")]
    SnapshotMalformed { path: String, reason: String },

    #[error("Schema tool failed: {0}")]
    Tool(String),
}

impl SchemaDriftError {
    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        match self {
            SchemaDriftError::SnapshotIo { .. } => "ORM_SNAPSHOT_IO",
            SchemaDriftError::SnapshotMalformed { .. } => "ORM_SNAPSHOT_MALFORMED",
            SchemaDriftError::Tool(_) => "ORM_SCHEMA_TOOL_FAILED",
        }
    }
}

/// Compares live storage structure against mapping metadata.
pub trait SchemaTool {
    /// Human-readable description of every difference, empty when in sync
    fn pending_changes(&self, entities: &[&EntityMetadata]) -> SchemaDriftResult<Vec<String>>;

    /// True when the storage structure matches `entities`
    fn schema_in_sync(&self, entities: &[&EntityMetadata]) -> SchemaDriftResult<bool> {
        Ok(self.pending_changes(entities)?.is_empty())
    }
}
