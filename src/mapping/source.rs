//! Read-only capabilities the validator needs from its collaborators

use super::types::EntityMetadata;

/// Enumerates and resolves entity metadata by name.
pub trait MetadataSource {
    /// All loaded entities, in a stable enumeration order
    fn all_metadata(&self) -> Vec<&EntityMetadata>;

    fn has_metadata_for(&self, name: &str) -> bool;

    fn metadata_for(&self, name: &str) -> Option<&EntityMetadata>;
}

/// Answers ancestor queries for class names.
pub trait ClassHierarchy {
    /// Full ancestor chain of `class_name`, nearest parent first.
    ///
    /// Unknown classes have no ancestors.
    fn ancestors_of(&self, class_name: &str) -> Vec<String>;
}
