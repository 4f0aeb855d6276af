//! Anonymization planning
//!
//! Objects can replace real values with generated ones on the way to the
//! target org. This module derives which of the configured fields may
//! still get an anonymization rule, and flags rules that point at fields
//! the current describe does not know.

use crate::config::ObjectConfig;
use crate::constants;
use crate::keywords;
use crate::schema::SObjectDescribe;

/// Fields an anonymization rule can still be added for, in configured
/// field order.
///
/// A field is eligible iff it is a described, writable, plain field token:
/// keywords and relationship paths are not mockable, fields already
/// carrying a rule or serving as external id components are taken, and
/// types the generator cannot produce are excluded. The derivation is pure,
/// so adding a rule and removing it again restores the previous answer.
pub fn available_fields_for_mocking(
    config: &ObjectConfig,
    schema: &SObjectDescribe,
) -> Vec<String> {
    let external_id_components = config.external_id_components();
    let mut eligible: Vec<String> = Vec::new();

    for token in &config.fields {
        if token.contains('.') || keywords::is_keyword(token) {
            continue;
        }
        let Some(field) = schema.field(token) else {
            continue;
        };
        if field.readonly() {
            continue;
        }
        if config.has_mock_field(token) {
            continue;
        }
        if external_id_components.contains(token) {
            continue;
        }
        if constants::is_mock_excluded_type(&field.field_type) {
            continue;
        }
        if !eligible.contains(token) {
            eligible.push(token.clone());
        }
    }

    eligible
}

/// Configured anonymization rules whose field is absent from the combined
/// describe, in rule order. These rules would silently do nothing at run
/// time, so the wizard surfaces them.
pub fn fields_without_descriptions(
    config: &ObjectConfig,
    schema: &SObjectDescribe,
) -> Vec<String> {
    config
        .mock_fields
        .iter()
        .filter(|rule| !schema.has_field(&rule.name))
        .map(|rule| rule.name.clone())
        .collect()
}
