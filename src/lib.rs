//! ormcheck - a strict, deterministic consistency checker for
//! object-relational mapping metadata
//!
//! Given entity descriptions and their associations, reports broken
//! bidirectional links, dangling references, misdeclared join columns and
//! class shapes that break lazy-loading. Metadata is never modified.
//!
//! ```ignore
//! use ormcheck::mapping::MetadataLoader;
//! use ormcheck::validator::MappingValidator;
//!
//! let registry = MetadataLoader::new("./metadata").load()?;
//! let report = MappingValidator::new(&registry).validate_mapping();
//! for (entity, errors) in report.iter() {
//!     for error in errors {
//!         println!("{}: {}", entity, error);
//!     }
//! }
//! ```

pub mod cli;
pub mod mapping;
pub mod observability;
pub mod schema_drift;
pub mod validator;
