//! Polymorphic lookup resolution
//!
//! A polymorphic lookup (WhoId, WhatId, ...) can point at records of
//! several object types, but the engine migrates each field against exactly
//! one declared type. This module surfaces the qualifying fields among the
//! currently-selected ones, carries the user's declared disambiguations,
//! and flags what is still unresolved or stale.

use serde::Serialize;

use crate::config::ObjectConfig;
use crate::constants::PARENT_SOBJECT_NOT_SET;
use crate::schema::{SObjectDescribe, SchemaMap};

/// Resolution state of one selected polymorphic field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolymorphicFieldInfo {
    /// Lookup field name.
    pub name: String,
    /// Raw candidate object names from the describe.
    pub referenced_to: Vec<String>,
    /// The candidates actually described in the combined schemas; only
    /// these are offered for disambiguation.
    #[serde(rename = "referencedToSObjects")]
    pub referenced_to_sobjects: Vec<String>,
    /// Declared disambiguation target, or "not set".
    #[serde(rename = "parentSObject")]
    pub parent_sobject: String,
}

impl PolymorphicFieldInfo {
    pub fn is_resolved(&self) -> bool {
        self.parent_sobject != PARENT_SOBJECT_NOT_SET
    }
}

/// Collect resolution state for every selected polymorphic field, in
/// selection order.
pub fn resolve_polymorphic(
    config: &ObjectConfig,
    selected_fields: &[String],
    schema: &SObjectDescribe,
    schemas: &SchemaMap,
) -> Vec<PolymorphicFieldInfo> {
    let mut infos = Vec::new();

    for field_name in selected_fields {
        let Some(field) = schema.field(field_name) else {
            continue;
        };
        if !field.is_polymorphic() {
            continue;
        }

        let referenced_to_sobjects: Vec<String> = field
            .reference_to
            .iter()
            .filter(|candidate| {
                schemas
                    .get(candidate.as_str())
                    .map(|describe| describe.is_described())
                    .unwrap_or(false)
            })
            .cloned()
            .collect();

        let parent_sobject = config
            .polymorphic_declaration(field_name)
            .map(|declaration| declaration.object_name.clone())
            .unwrap_or_else(|| PARENT_SOBJECT_NOT_SET.to_string());

        infos.push(PolymorphicFieldInfo {
            name: field_name.clone(),
            referenced_to: field.reference_to.clone(),
            referenced_to_sobjects,
            parent_sobject,
        });
    }

    infos
}

/// Selected polymorphic fields the user has not disambiguated yet. These
/// block a migration run unless the object is excluded.
pub fn unresolved_fields(infos: &[PolymorphicFieldInfo]) -> Vec<String> {
    infos
        .iter()
        .filter(|info| !info.is_resolved())
        .map(|info| info.name.clone())
        .collect()
}

/// Declared disambiguations that no longer hold up against the current
/// schemas: the field no longer qualifies, or the declared object is not
/// among its described candidates. Stale declarations stay in the config
/// untouched; they are only reported.
pub fn declarations_missing_reference(
    config: &ObjectConfig,
    infos: &[PolymorphicFieldInfo],
    schemas: &SchemaMap,
) -> Vec<String> {
    let mut missing = Vec::new();

    for declaration in &config.polymorphic_fields {
        let Some(info) = infos.iter().find(|info| info.name == declaration.name) else {
            log::warn!(
                "polymorphic declaration for '{}' no longer matches a selected lookup",
                declaration.name
            );
            missing.push(declaration.name.clone());
            continue;
        };
        let described = schemas
            .get(&declaration.object_name)
            .map(|describe| describe.is_described())
            .unwrap_or(false);
        if !described || !info.referenced_to_sobjects.contains(&declaration.object_name) {
            missing.push(declaration.name.clone());
        }
    }

    missing
}
