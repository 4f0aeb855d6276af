//! Field mapping validation
//!
//! A field mapping redirects an object's writes to a different target
//! object and renames fields on the way. Entries are user-authored and are
//! never dropped here; validation annotates each entry's `errorMessage` in
//! place and reports aggregate flags for the wizard's badges. Re-running
//! validation first clears stale annotations, so fixing the schema or the
//! entry heals the config on the next pass.

use crate::config::ObjectConfig;
use crate::schema::SchemaMap;

/// Aggregate outcome of one validation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingValidation {
    /// Some entry's target object is unknown to the target org.
    pub without_sobject_in_target: bool,
    /// Target fields referenced by entries but missing from their target
    /// object, in entry order.
    pub fields_missing_in_target: Vec<String>,
}

/// Validate every mapping entry against the current schemas.
///
/// `resolvable_fields` is the owning object's resolved field list; source
/// fields must come from it. Each failed condition is reported
/// independently; an entry failing several collects them all in one
/// `errorMessage`.
pub fn validate_mapping(
    config: &mut ObjectConfig,
    resolvable_fields: &[String],
    schemas: &SchemaMap,
) -> MappingValidation {
    let object_name = config.name.clone();
    let mut validation = MappingValidation::default();

    for entry in &mut config.field_mapping {
        entry.error_message = None;
        let mut errors: Vec<String> = Vec::new();

        let target_describe = schemas.get(&entry.target_object);
        let target_known = target_describe
            .map(|describe| describe.known_in_target())
            .unwrap_or(false);
        if !target_known {
            errors.push(format!(
                "Target object {} is not described in the target org",
                entry.target_object
            ));
            validation.without_sobject_in_target = true;
        }

        if !resolvable_fields.contains(&entry.source_field) {
            errors.push(format!(
                "Source field {} is not a resolvable field of {}",
                entry.source_field, object_name
            ));
        }

        let target_field_known = target_describe
            .map(|describe| describe.has_field(&entry.target_field))
            .unwrap_or(false);
        if !target_field_known {
            errors.push(format!(
                "Target field {} is missing from {}",
                entry.target_field, entry.target_object
            ));
            validation.fields_missing_in_target.push(entry.target_field.clone());
        }

        if !errors.is_empty() {
            log::debug!(
                "mapping entry {} -> {}.{} is invalid: {}",
                entry.source_field,
                entry.target_object,
                entry.target_field,
                errors.join("; ")
            );
            entry.error_message = Some(errors.join("; "));
        }
    }

    validation
}

/// Clear every entry's error annotation without validating. Used when the
/// mapping feature is switched off for the object.
pub fn clear_annotations(config: &mut ObjectConfig) {
    for entry in &mut config.field_mapping {
        entry.error_message = None;
    }
}

/// Target-field candidates for the entry at `entry_index`, in the target
/// object's declared field order.
///
/// Fields consumed by other entries are excluded (two sources must not
/// write the same target field), and for a same-object mapping the
/// object's own direct fields are excluded too.
pub fn available_target_fields(
    config: &ObjectConfig,
    entry_index: usize,
    direct_fields: &[String],
    schemas: &SchemaMap,
) -> Vec<String> {
    let Some(entry) = config.field_mapping.get(entry_index) else {
        return Vec::new();
    };
    let Some(target_describe) = schemas.get(&entry.target_object) else {
        return Vec::new();
    };

    let consumed: Vec<&str> = config
        .field_mapping
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != entry_index)
        .map(|(_, other)| other.target_field.as_str())
        .collect();
    let self_mapping = entry.target_object == config.name;

    target_describe
        .fields
        .iter()
        .map(|field| field.name.as_str())
        .filter(|name| !consumed.contains(name))
        .filter(|name| !(self_mapping && direct_fields.iter().any(|f| f == name)))
        .map(str::to_string)
        .collect()
}
