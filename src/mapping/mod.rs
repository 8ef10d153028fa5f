//! Mapping metadata subsystem
//!
//! Holds the in-memory metadata graph the validator reasons over:
//! entity descriptions, their associations and the read-only capabilities
//! (`MetadataSource`, `ClassHierarchy`) through which the validator sees them.
//!
//! # Design Principles
//!
//! - Metadata is immutable once loaded
//! - Lookups go through an explicit registry, never global state
//! - Enumeration order is registration order

mod errors;
mod loader;
mod registry;
mod source;
mod types;

pub use errors::{MappingError, MappingResult};
pub use loader::MetadataLoader;
pub use registry::MetadataRegistry;
pub use source::{ClassHierarchy, MetadataSource};
pub use types::{
    AssociationKind, AssociationMapping, EntityMetadata, FieldMapping, JoinColumn, JoinTable,
    OrderDirection, OrderField, PropertyDescriptor, Visibility,
};
