//! Observable events
//!
//! Events are explicit and typed; each maps to a stable event name and a
//! default severity.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file loaded
    ConfigLoaded,

    // Metadata
    /// Descriptor files loaded into the registry
    MetadataLoaded,

    // Validation
    /// Mapping validation begins
    ValidationBegin,
    /// An entity has findings
    EntityInvalid,
    /// Mapping validation complete
    ValidationComplete,

    // Schema drift
    /// Database snapshot loaded
    SnapshotLoaded,
    /// Schema sync check complete
    SchemaSyncChecked,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::MetadataLoaded => "METADATA_LOADED",
            Event::ValidationBegin => "VALIDATION_BEGIN",
            Event::EntityInvalid => "ENTITY_INVALID",
            Event::ValidationComplete => "VALIDATION_COMPLETE",
            Event::SnapshotLoaded => "SNAPSHOT_LOADED",
            Event::SchemaSyncChecked => "SCHEMA_SYNC_CHECKED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::EntityInvalid => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
