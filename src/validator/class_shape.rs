//! Class-shape rules
//!
//! Only what the class declares directly is inspected: inherited properties
//! belong to the ancestor's own metadata.

use crate::mapping::{ClassHierarchy, EntityMetadata};

use super::report::ValidationError;
use super::rules::Rule;

/// Public instance state cannot be intercepted, so lazy-loading breaks.
pub(crate) fn validate_visibility(entity: &EntityMetadata, errors: &mut Vec<ValidationError>) {
    for property in entity.public_instance_properties() {
        errors.push(ValidationError::field(
            Rule::PublicField,
            &entity.name,
            &property.name,
            format!(
                "Field '{}' in class '{}' must be private or protected. Public fields may break lazy-loading.",
                property.name, entity.name
            ),
        ));
    }
}

/// Every discriminator-map child must descend from `entity`.
pub(crate) fn validate_inheritance<H: ClassHierarchy + ?Sized>(
    entity: &EntityMetadata,
    hierarchy: &H,
    errors: &mut Vec<ValidationError>,
) {
    for sub_class in &entity.sub_classes {
        let ancestors = hierarchy.ancestors_of(sub_class);
        if !ancestors.iter().any(|ancestor| *ancestor == entity.name) {
            errors.push(ValidationError::entity(
                Rule::UnrelatedSubclass,
                &entity.name,
                format!(
                    "According to the discriminator map class '{}' has to be a child of '{}' but these entities are not related through inheritance.",
                    sub_class, entity.name
                ),
            ));
        }
    }
}
