//! Metadata loading errors
//!
//! Error codes:
//! - ORM_METADATA_IO
//! - ORM_METADATA_MALFORMED
//! - ORM_METADATA_DUPLICATE_ENTITY
//!
//! These are raised while building the metadata graph. Consistency problems
//! inside a well-formed graph are findings, not errors (see `validator`).

use thiserror::Error;

/// Result type for metadata loading
pub type MappingResult<T> = Result<T, MappingError>;

#[derive(Debug, Clone, Error)]
pub enum MappingError {
    #[error("I/O error on '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("Malformed metadata in '{path}': {reason}")]
    Malformed { path: String, reason: String },

    #[error("Entity '{name}' is declared more than once")]
    DuplicateEntity { name: String },
}

impl MappingError {
    pub fn io(path: impl Into<String>, reason: impl ToString) -> Self {
        MappingError::Io {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(path: impl Into<String>, reason: impl ToString) -> Self {
        MappingError::Malformed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        match self {
            MappingError::Io { .. } => "ORM_METADATA_IO",
            MappingError::Malformed { .. } => "ORM_METADATA_MALFORMED",
            MappingError::DuplicateEntity { .. } => "ORM_METADATA_DUPLICATE_ENTITY",
        }
    }
}
