//! Validation rule identifiers
//!
//! Every finding carries one `Rule`. Codes are stable and safe to match on
//! in tooling; messages are for humans.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rule {
    // Field mappings
    UnknownFieldType,

    // Associations
    UnknownTarget,
    AmbiguousSide,
    OwningSideNotAssociation,
    OwningSideMissing,
    MissingInversedBy,
    InverseSideNotAssociation,
    InverseSideMissing,
    MissingMappedBy,
    InconsistentMapping,
    CardinalityMismatch,
    UnknownReferencedColumn,
    ReferencedColumnNotPrimary,
    IncompleteJoinColumns,
    UnknownOrderField,

    // Class shape
    PublicField,
    UnrelatedSubclass,
}

impl Rule {
    /// Every rule, in check order
    pub const ALL: [Rule; 17] = [
        Rule::UnknownFieldType,
        Rule::UnknownTarget,
        Rule::AmbiguousSide,
        Rule::OwningSideNotAssociation,
        Rule::OwningSideMissing,
        Rule::MissingInversedBy,
        Rule::InverseSideNotAssociation,
        Rule::InverseSideMissing,
        Rule::MissingMappedBy,
        Rule::InconsistentMapping,
        Rule::CardinalityMismatch,
        Rule::UnknownReferencedColumn,
        Rule::ReferencedColumnNotPrimary,
        Rule::IncompleteJoinColumns,
        Rule::UnknownOrderField,
        Rule::PublicField,
        Rule::UnrelatedSubclass,
    ];

    /// Returns the machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Rule::UnknownFieldType => "ORM_UNKNOWN_FIELD_TYPE",
            Rule::UnknownTarget => "ORM_UNKNOWN_TARGET",
            Rule::AmbiguousSide => "ORM_AMBIGUOUS_SIDE",
            Rule::OwningSideNotAssociation => "ORM_OWNING_SIDE_NOT_ASSOCIATION",
            Rule::OwningSideMissing => "ORM_OWNING_SIDE_MISSING",
            Rule::MissingInversedBy => "ORM_MISSING_INVERSED_BY",
            Rule::InverseSideNotAssociation => "ORM_INVERSE_SIDE_NOT_ASSOCIATION",
            Rule::InverseSideMissing => "ORM_INVERSE_SIDE_MISSING",
            Rule::MissingMappedBy => "ORM_MISSING_MAPPED_BY",
            Rule::InconsistentMapping => "ORM_INCONSISTENT_MAPPING",
            Rule::CardinalityMismatch => "ORM_CARDINALITY_MISMATCH",
            Rule::UnknownReferencedColumn => "ORM_UNKNOWN_REFERENCED_COLUMN",
            Rule::ReferencedColumnNotPrimary => "ORM_REFERENCED_COLUMN_NOT_PRIMARY",
            Rule::IncompleteJoinColumns => "ORM_INCOMPLETE_JOIN_COLUMNS",
            Rule::UnknownOrderField => "ORM_UNKNOWN_ORDER_FIELD",
            Rule::PublicField => "ORM_PUBLIC_FIELD",
            Rule::UnrelatedSubclass => "ORM_UNRELATED_SUBCLASS",
        }
    }

    /// One-line description for `ormcheck rules`
    pub fn description(&self) -> &'static str {
        match self {
            Rule::UnknownFieldType => "field mapping uses a column type that is not registered",
            Rule::UnknownTarget => "association targets an entity that has no metadata",
            Rule::AmbiguousSide => "association declares both mappedBy and inversedBy",
            Rule::OwningSideNotAssociation => "mappedBy names a plain field on the target",
            Rule::OwningSideMissing => "mappedBy names no association on the target",
            Rule::MissingInversedBy => "owning side named by mappedBy lacks inversedBy",
            Rule::InverseSideNotAssociation => "inversedBy names a plain field on the target",
            Rule::InverseSideMissing => "inversedBy names no association on the target",
            Rule::MissingMappedBy => "inverse side named by inversedBy lacks mappedBy",
            Rule::InconsistentMapping => "the two sides of a bidirectional association disagree",
            Rule::CardinalityMismatch => "the two sides of a bidirectional association have incompatible types",
            Rule::UnknownReferencedColumn => "join column references a column with no mapped field",
            Rule::ReferencedColumnNotPrimary => "join column references a non primary key column",
            Rule::IncompleteJoinColumns => "join columns do not cover all identifier columns",
            Rule::UnknownOrderField => "orderBy names a field that does not exist on the target",
            Rule::PublicField => "public instance field breaks lazy-loading",
            Rule::UnrelatedSubclass => "discriminator map child is not a subclass",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
