//! Association consistency rules
//!
//! For one association `E#f` targeting `T`:
//! 1. T must be known (otherwise nothing else is checked for `f`)
//! 2. `f` is either owning or inverse, never both
//! 3. `mappedBy` must name an association on T that declares `inversedBy = f`
//! 4. `inversedBy` must name an association on T that declares `mappedBy = f`
//! 5. the two sides of a bidirectional association must have reciprocal kinds
//! 6. owning many-to-many join tables reference primary keys and cover them
//! 7. owning to-one join columns reference primary keys and cover them
//! 8. `orderBy` names plain fields of T
//!
//! Findings are appended in the order above.

use std::collections::HashSet;

use crate::mapping::{
    AssociationKind, AssociationMapping, EntityMetadata, JoinColumn, MetadataSource,
};

use super::report::ValidationError;
use super::rules::Rule;

/// Runs every association rule for `assoc` declared on `entity`.
pub(crate) fn validate_association<S: MetadataSource + ?Sized>(
    entity: &EntityMetadata,
    assoc: &AssociationMapping,
    source: &S,
    errors: &mut Vec<ValidationError>,
) {
    let Some(target) = source.metadata_for(&assoc.target_entity) else {
        errors.push(finding(
            Rule::UnknownTarget,
            entity,
            assoc,
            format!(
                "The target entity '{}' specified on {}#{} is unknown.",
                assoc.target_entity, entity.name, assoc.field_name
            ),
        ));
        return;
    };

    if assoc.mapped_by.is_some() && assoc.inversed_by.is_some() {
        errors.push(finding(
            Rule::AmbiguousSide,
            entity,
            assoc,
            format!(
                "The association {}#{} cannot be defined as both inverse and owning.",
                entity.name, assoc.field_name
            ),
        ));
    }

    if let Some(mapped_by) = &assoc.mapped_by {
        check_inverse_side(entity, assoc, target, mapped_by, errors);
    }

    if let Some(inversed_by) = &assoc.inversed_by {
        check_owning_side(entity, assoc, target, inversed_by, errors);
    }

    if assoc.is_owning_side() {
        match assoc.kind {
            AssociationKind::ManyToMany => check_join_table(entity, assoc, target, errors),
            AssociationKind::OneToOne | AssociationKind::ManyToOne => {
                check_join_columns(entity, assoc, target, errors)
            }
            // The "many" side always carries the join columns
            AssociationKind::OneToMany => {}
        }
    }

    if let Some(order_by) = &assoc.order_by {
        for order in order_by {
            if !target.has_field(&order.field) {
                errors.push(finding(
                    Rule::UnknownOrderField,
                    entity,
                    assoc,
                    format!(
                        "The association {}#{} is ordered by a foreign field {} that is not a field on the target entity {}.",
                        entity.name, assoc.field_name, order.field, target.name
                    ),
                ));
            }
        }
    }
}

// `f` is the inverse side; `mapped_by` names the owning side on the target.
fn check_inverse_side(
    entity: &EntityMetadata,
    assoc: &AssociationMapping,
    target: &EntityMetadata,
    mapped_by: &str,
    errors: &mut Vec<ValidationError>,
) {
    if target.has_field(mapped_by) {
        errors.push(finding(
            Rule::OwningSideNotAssociation,
            entity,
            assoc,
            format!(
                "The association {}#{} refers to the owning side field {}#{} which is not defined as association.",
                entity.name, assoc.field_name, target.name, mapped_by
            ),
        ));
    }

    let Some(owning) = target.association(mapped_by) else {
        errors.push(finding(
            Rule::OwningSideMissing,
            entity,
            assoc,
            format!(
                "The association {}#{} refers to the owning side field {}#{} which does not exist.",
                entity.name, assoc.field_name, target.name, mapped_by
            ),
        ));
        return;
    };

    match owning.inversed_by.as_deref() {
        None => errors.push(finding(
            Rule::MissingInversedBy,
            entity,
            assoc,
            format!(
                "The field {}#{} is on the inverse side of a bi-directional relationship, but the specified mappedBy association on the target-entity {}#{} does not contain the required 'inversedBy' attribute.",
                entity.name, assoc.field_name, target.name, mapped_by
            ),
        )),
        Some(inversed_by) if inversed_by != assoc.field_name => {
            errors.push(inconsistent(entity, assoc, target, mapped_by))
        }
        Some(_) => {}
    }
}

// `f` is the owning side; `inversed_by` names the inverse side on the target.
fn check_owning_side(
    entity: &EntityMetadata,
    assoc: &AssociationMapping,
    target: &EntityMetadata,
    inversed_by: &str,
    errors: &mut Vec<ValidationError>,
) {
    if target.has_field(inversed_by) {
        errors.push(finding(
            Rule::InverseSideNotAssociation,
            entity,
            assoc,
            format!(
                "The association {}#{} refers to the inverse side field {}#{} which is not defined as association.",
                entity.name, assoc.field_name, target.name, inversed_by
            ),
        ));
    }

    let Some(inverse) = target.association(inversed_by) else {
        errors.push(finding(
            Rule::InverseSideMissing,
            entity,
            assoc,
            format!(
                "The association {}#{} refers to the inverse side field {}#{} which does not exist.",
                entity.name, assoc.field_name, target.name, inversed_by
            ),
        ));
        return;
    };

    match inverse.mapped_by.as_deref() {
        None => errors.push(finding(
            Rule::MissingMappedBy,
            entity,
            assoc,
            format!(
                "The field {}#{} is on the owning side of a bi-directional relationship, but the specified inversedBy association on the target-entity {}#{} does not contain the required 'mappedBy' attribute.",
                entity.name, assoc.field_name, target.name, inversed_by
            ),
        )),
        Some(mapped_by) if mapped_by != assoc.field_name => {
            errors.push(inconsistent(entity, assoc, target, inversed_by))
        }
        Some(_) => {}
    }

    let expected = assoc.kind.reciprocal();
    if inverse.kind != expected {
        let qualifier = if expected == assoc.kind { " as well" } else { "" };
        errors.push(finding(
            Rule::CardinalityMismatch,
            entity,
            assoc,
            format!(
                "If association {}#{} is {}, then the inversed side {}#{} has to be {}{}, but it is {}.",
                entity.name,
                assoc.field_name,
                assoc.kind,
                target.name,
                inversed_by,
                expected,
                qualifier,
                inverse.kind
            ),
        ));
    }
}

fn check_join_table(
    entity: &EntityMetadata,
    assoc: &AssociationMapping,
    target: &EntityMetadata,
    errors: &mut Vec<ValidationError>,
) {
    let join_table = assoc.resolved_join_table(entity, target);

    check_referenced_columns(entity, assoc, &join_table.join_columns, entity, errors);
    check_referenced_columns(entity, assoc, &join_table.inverse_join_columns, target, errors);

    let missing = uncovered_identifier_columns(target, &join_table.inverse_join_columns);
    if !missing.is_empty() {
        errors.push(finding(
            Rule::IncompleteJoinColumns,
            entity,
            assoc,
            format!(
                "The inverse join columns of the many-to-many table '{}' have to contain to ALL identifier columns of the target entity '{}', however '{}' are missing.",
                join_table.name,
                target.name,
                missing.join(", ")
            ),
        ));
    }

    let missing = uncovered_identifier_columns(entity, &join_table.join_columns);
    if !missing.is_empty() {
        errors.push(finding(
            Rule::IncompleteJoinColumns,
            entity,
            assoc,
            format!(
                "The join columns of the many-to-many table '{}' have to contain to ALL identifier columns of the source entity '{}', however '{}' are missing.",
                join_table.name,
                entity.name,
                missing.join(", ")
            ),
        ));
    }
}

fn check_join_columns(
    entity: &EntityMetadata,
    assoc: &AssociationMapping,
    target: &EntityMetadata,
    errors: &mut Vec<ValidationError>,
) {
    let join_columns = assoc.resolved_join_columns();

    check_referenced_columns(entity, assoc, &join_columns, target, errors);

    let identifier_columns = entity.identifier_column_names();
    if identifier_columns.len() == join_columns.len() {
        return;
    }

    let declared: HashSet<&str> = join_columns.iter().map(|jc| jc.name.as_str()).collect();
    let missing: Vec<&str> = identifier_columns
        .iter()
        .map(String::as_str)
        .filter(|column| !declared.contains(column))
        .collect();

    let problem = if !missing.is_empty() {
        format!("'{}' are missing", missing.join(", "))
    } else {
        // Every identifier column is declared; the rest are surplus
        let identifiers: HashSet<&str> = identifier_columns.iter().map(String::as_str).collect();
        let surplus: Vec<&str> = join_columns
            .iter()
            .map(|jc| jc.name.as_str())
            .filter(|name| !identifiers.contains(name))
            .collect();
        if surplus.is_empty() {
            format!(
                "{} join columns are declared for {} identifier columns",
                join_columns.len(),
                identifier_columns.len()
            )
        } else {
            format!("'{}' are not identifier columns", surplus.join(", "))
        }
    };

    errors.push(finding(
        Rule::IncompleteJoinColumns,
        entity,
        assoc,
        format!(
            "The join columns of the association '{}' have to match to ALL identifier columns of the source entity '{}', however {}.",
            assoc.field_name, entity.name, problem
        ),
    ));
}

// Every referenced column must resolve to an identifier field of `referenced`.
// Scanning stops at the first column that resolves to no field at all.
fn check_referenced_columns(
    entity: &EntityMetadata,
    assoc: &AssociationMapping,
    join_columns: &[JoinColumn],
    referenced: &EntityMetadata,
    errors: &mut Vec<ValidationError>,
) {
    for join_column in join_columns {
        let column = &join_column.referenced_column_name;

        let Some(field) = referenced.field_name_for_column(column) else {
            errors.push(finding(
                Rule::UnknownReferencedColumn,
                entity,
                assoc,
                format!(
                    "The referenced column name '{}' does not have a corresponding field with this column name on the class '{}'.",
                    column, referenced.name
                ),
            ));
            break;
        };

        if !referenced.is_identifier(field) {
            errors.push(finding(
                Rule::ReferencedColumnNotPrimary,
                entity,
                assoc,
                format!(
                    "The referenced column name '{}' has to be a primary key column on the target entity class '{}'.",
                    column, referenced.name
                ),
            ));
        }
    }
}

// Identifier columns of `referenced` that no join column points at.
fn uncovered_identifier_columns(
    referenced: &EntityMetadata,
    join_columns: &[JoinColumn],
) -> Vec<String> {
    let covered: HashSet<&str> = join_columns
        .iter()
        .map(|jc| jc.referenced_column_name.as_str())
        .collect();

    referenced
        .identifier_column_names()
        .into_iter()
        .filter(|column| !covered.contains(column.as_str()))
        .collect()
}

fn inconsistent(
    entity: &EntityMetadata,
    assoc: &AssociationMapping,
    target: &EntityMetadata,
    reciprocal: &str,
) -> ValidationError {
    finding(
        Rule::InconsistentMapping,
        entity,
        assoc,
        format!(
            "The mappings {}#{} and {}#{} are inconsistent with each other.",
            entity.name, assoc.field_name, target.name, reciprocal
        ),
    )
}

fn finding(
    rule: Rule,
    entity: &EntityMetadata,
    assoc: &AssociationMapping,
    message: String,
) -> ValidationError {
    ValidationError::field(rule, &entity.name, &assoc.field_name, message)
}
