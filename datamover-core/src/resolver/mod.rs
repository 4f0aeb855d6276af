//! Derived-state pipeline
//!
//! One call per object turns (configuration, combined schemas) into
//! everything the wizard displays: concrete field lists, the generated
//! queries, and the validation flags. The pipeline is pure and
//! deterministic; callers re-run it after any config edit or schema
//! refresh, and identical inputs yield identical outputs. The only
//! mutation is re-annotating mapping entries' `errorMessage`, which is
//! itself derived state.

pub mod external_id;
pub mod mapping;
pub mod mock;
pub mod polymorphic;

pub use external_id::default_external_id;
pub use mapping::{available_target_fields, validate_mapping, MappingValidation};
pub use mock::{available_fields_for_mocking, fields_without_descriptions};
pub use polymorphic::{resolve_polymorphic, PolymorphicFieldInfo};

use serde::Serialize;

use crate::config::{MigrationConfig, ObjectConfig};
use crate::constants::{DEFAULT_TEST_ROW_LIMIT, ID_FIELD};
use crate::keywords;
use crate::schema::{SObjectDescribe, SchemaMap};
use crate::soql;

/// Everything derived for one object in one pipeline run. Field names
/// round-trip verbatim with the wizard's stores, so renames here are
/// breaking changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDerived {
    /// Concrete fields the engine will retrieve: resolved tokens plus
    /// external id components, minus exclusions, Id-first sorted.
    pub full_query_fields: Vec<String>,
    pub query: String,
    pub count_query: String,
    pub test_query: String,
    /// Absent when the configuration calls for no old-data deletion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_query: Option<String>,
    /// Selected fields the source org does not describe.
    pub missing_in_source_fields: Vec<String>,
    /// Selected fields the target org does not describe.
    pub missing_in_target_fields: Vec<String>,
    /// Resolution state of every selected polymorphic lookup.
    pub polymorphic_fields: Vec<PolymorphicFieldInfo>,
    pub unresolved_polymorphic_fields: Vec<String>,
    pub polymorphic_fields_missing_reference: Vec<String>,
    #[serde(rename = "mappingWithoutSObjectInTarget")]
    pub mapping_without_sobject_in_target: bool,
    pub mapped_fields_missing_in_target: Vec<String>,
    pub anonymization_without_field_descriptions: Vec<String>,
}

impl ObjectDerived {
    /// Total issues across all validation surfaces, for UI badge counts.
    pub fn error_count(&self) -> usize {
        self.missing_in_source_fields.len()
            + self.missing_in_target_fields.len()
            + self.unresolved_polymorphic_fields.len()
            + self.polymorphic_fields_missing_reference.len()
            + usize::from(self.mapping_without_sobject_in_target)
            + self.mapped_fields_missing_in_target.len()
            + self.anonymization_without_field_descriptions.len()
    }

    /// Whether the object cannot proceed to execution. Undisambiguated
    /// polymorphic lookups block the run unless the object is excluded
    /// from migration.
    pub fn has_blocking_errors(&self, object_excluded: bool) -> bool {
        !object_excluded && !self.unresolved_polymorphic_fields.is_empty()
    }
}

/// Re-derive everything for one object.
///
/// Never fails: an object absent from `schemas` (or described with zero
/// fields) resolves no fields, and every query is still built.
pub fn refresh_derived(config: &mut ObjectConfig, schemas: &SchemaMap) -> ObjectDerived {
    let fallback = SObjectDescribe::default();
    let schema = schemas.get(&config.name).unwrap_or(&fallback);

    // 1. Resolve the concrete field set: configured tokens, plus the
    //    external id components, minus exclusions (Id is not excludable).
    let mut fields = keywords::resolve_fields(&config.fields, schema);
    fields.extend(config.external_id_components());
    fields.retain(|field| {
        field.eq_ignore_ascii_case(ID_FIELD) || !config.excluded_fields.contains(field)
    });

    // 2. Queries. build_query ensures Id, deduplicates and sorts.
    let full = soql::build_query(config, Some(&fields));
    let count_query = soql::build_count_query(config);
    let test = soql::build_test_query(config, schema, DEFAULT_TEST_ROW_LIMIT);
    let delete_query = soql::build_delete_query(config);

    // 3. Source/target divergence over the final field list. Relationship
    //    paths are resolved against other objects and skipped here;
    //    undescribed fields are missing on both sides.
    let mut missing_in_source_fields = Vec::new();
    let mut missing_in_target_fields = Vec::new();
    for field_name in &full.fields {
        if field_name.contains('.') {
            continue;
        }
        match schema.field(field_name) {
            Some(field) => {
                if !field.data_source.in_source() {
                    missing_in_source_fields.push(field_name.clone());
                }
                if !field.data_source.in_target() {
                    missing_in_target_fields.push(field_name.clone());
                }
            }
            None => {
                missing_in_source_fields.push(field_name.clone());
                missing_in_target_fields.push(field_name.clone());
            }
        }
    }

    // 4. Polymorphic lookups.
    let polymorphic_fields =
        polymorphic::resolve_polymorphic(config, &full.fields, schema, schemas);
    let unresolved_polymorphic_fields = polymorphic::unresolved_fields(&polymorphic_fields);
    let polymorphic_fields_missing_reference =
        polymorphic::declarations_missing_reference(config, &polymorphic_fields, schemas);

    // 5. Field mapping, only while the feature is on. Turning it off
    //    clears the annotations but keeps the entries.
    let mapping_validation = if config.use_field_mapping {
        mapping::validate_mapping(config, &full.fields, schemas)
    } else {
        mapping::clear_annotations(config);
        MappingValidation::default()
    };

    // 6. Anonymization rules, only while the feature is on.
    let anonymization_without_field_descriptions = if config.update_with_mock_data {
        mock::fields_without_descriptions(config, schema)
    } else {
        Vec::new()
    };

    let derived = ObjectDerived {
        full_query_fields: full.fields,
        query: full.query,
        count_query,
        test_query: test.query,
        delete_query,
        missing_in_source_fields,
        missing_in_target_fields,
        polymorphic_fields,
        unresolved_polymorphic_fields,
        polymorphic_fields_missing_reference,
        mapping_without_sobject_in_target: mapping_validation.without_sobject_in_target,
        mapped_fields_missing_in_target: mapping_validation.fields_missing_in_target,
        anonymization_without_field_descriptions,
    };

    log::debug!(
        "derived state for {}: {} fields, {} issues",
        config.name,
        derived.full_query_fields.len(),
        derived.error_count()
    );

    derived
}

/// Re-derive every object of a migration config, in configured order.
pub fn refresh_all(config: &mut MigrationConfig, schemas: &SchemaMap) -> Vec<ObjectDerived> {
    config
        .objects
        .iter_mut()
        .map(|object| refresh_derived(object, schemas))
        .collect()
}
