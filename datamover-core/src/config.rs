//! Migration configuration types
//!
//! The shapes here round-trip through the external JSON config store, so
//! field names on the wire (camelCase, `where`, `orderBy`, ...) are part of
//! the contract. Everything user-authored is kept verbatim; the resolver
//! only touches clearly-derived annotations such as mapping error messages.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::COMPOSITE_EXTERNAL_ID_SEPARATOR;

/// What the engine should do with an object's records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MigrationOperation {
    Insert,
    Update,
    Upsert,
    /// Read from source only, e.g. to resolve lookups into other objects.
    #[default]
    Readonly,
    Delete,
    HardDelete,
}

impl MigrationOperation {
    /// Get display label for UI
    pub fn label(&self) -> &'static str {
        match self {
            MigrationOperation::Insert => "Insert",
            MigrationOperation::Update => "Update",
            MigrationOperation::Upsert => "Upsert",
            MigrationOperation::Readonly => "Readonly",
            MigrationOperation::Delete => "Delete",
            MigrationOperation::HardDelete => "Hard Delete",
        }
    }

    /// Get all variants for UI selection
    pub fn all_variants() -> &'static [MigrationOperation] {
        &[
            MigrationOperation::Insert,
            MigrationOperation::Update,
            MigrationOperation::Upsert,
            MigrationOperation::Readonly,
            MigrationOperation::Delete,
            MigrationOperation::HardDelete,
        ]
    }

    /// Whether the operation removes target records instead of writing them.
    pub fn is_delete(&self) -> bool {
        matches!(self, MigrationOperation::Delete | MigrationOperation::HardDelete)
    }
}

/// User-declared disambiguation of one polymorphic lookup field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolymorphicMapping {
    /// Lookup field name (e.g. "WhoId").
    pub name: String,
    /// The single object type records of this field should resolve to.
    pub object_name: String,
}

impl PolymorphicMapping {
    pub fn new(name: impl Into<String>, object_name: impl Into<String>) -> Self {
        PolymorphicMapping {
            name: name.into(),
            object_name: object_name.into(),
        }
    }
}

/// One row of a source-to-target field mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMappingEntry {
    /// Target object the whole mapping retargets to. Every entry of one
    /// object's mapping carries the same value.
    pub target_object: String,
    pub source_field: String,
    pub target_field: String,
    /// Set by validation when the entry is inconsistent with the current
    /// schemas; cleared again once the entry validates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl FieldMappingEntry {
    pub fn new(
        target_object: impl Into<String>,
        source_field: impl Into<String>,
        target_field: impl Into<String>,
    ) -> Self {
        FieldMappingEntry {
            target_object: target_object.into(),
            source_field: source_field.into(),
            target_field: target_field.into(),
            error_message: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.error_message.is_none()
    }
}

/// One anonymization rule: generate `pattern` values for field `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockField {
    pub name: String,
    /// Generator pattern understood by the engine (e.g. "first_name").
    pub pattern: String,
}

impl MockField {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        MockField {
            name: name.into(),
            pattern: pattern.into(),
        }
    }
}

/// Per-object migration configuration as authored in the wizard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectConfig {
    /// Object API name.
    pub name: String,
    pub operation: MigrationOperation,
    /// Field name, or `;`-joined composite, used to match records across
    /// orgs. Empty means "not chosen yet".
    pub external_id: String,
    /// Mixed list of literal field names and multiselect keywords.
    pub fields: Vec<String>,
    pub excluded_fields: Vec<String>,
    pub excluded_from_update_fields: Vec<String>,
    pub polymorphic_fields: Vec<PolymorphicMapping>,
    pub field_mapping: Vec<FieldMappingEntry>,
    pub mock_fields: Vec<MockField>,
    /// Raw WHERE fragment, without the keyword.
    #[serde(rename = "where")]
    pub where_clause: String,
    pub delete_where: String,
    pub order_by: String,
    pub limit: u32,
    pub offset: u32,
    /// Master objects push their records; non-master objects are pulled in
    /// to satisfy lookups only.
    pub master: bool,
    pub excluded: bool,
    pub use_field_mapping: bool,
    pub update_with_mock_data: bool,
    pub delete_old_data: bool,
}

impl ObjectConfig {
    pub fn new(name: impl Into<String>) -> Self {
        ObjectConfig {
            name: name.into(),
            master: true,
            ..Default::default()
        }
    }

    /// The parts of the external id, split on `;` and trimmed. Empty for an
    /// unset external id.
    pub fn external_id_components(&self) -> Vec<String> {
        self.external_id
            .split(COMPOSITE_EXTERNAL_ID_SEPARATOR)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Find the declared disambiguation for a polymorphic field.
    pub fn polymorphic_declaration(&self, field_name: &str) -> Option<&PolymorphicMapping> {
        self.polymorphic_fields.iter().find(|m| m.name == field_name)
    }

    pub fn has_mock_field(&self, field_name: &str) -> bool {
        self.mock_fields.iter().any(|m| m.name == field_name)
    }

    /// The mapping's target object, when a mapping is present.
    pub fn mapping_target_object(&self) -> Option<&str> {
        self.field_mapping
            .first()
            .map(|entry| entry.target_object.as_str())
            .filter(|name| !name.is_empty())
    }
}

/// A whole migration job: an ordered list of object configurations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MigrationConfig {
    pub name: String,
    pub objects: Vec<ObjectConfig>,
}

impl MigrationConfig {
    pub fn new(name: impl Into<String>) -> Self {
        MigrationConfig {
            name: name.into(),
            objects: Vec::new(),
        }
    }

    pub fn add_object(&mut self, object: ObjectConfig) {
        self.objects.push(object);
    }

    pub fn object(&self, name: &str) -> Option<&ObjectConfig> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn object_mut(&mut self, name: &str) -> Option<&mut ObjectConfig> {
        self.objects.iter_mut().find(|o| o.name == name)
    }

    /// Parse a config as stored by the wizard's config store.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse migration config")
    }

    /// Serialize back into the config store's JSON shape.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize migration config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_id_components() {
        let mut config = ObjectConfig::new("Contact");
        assert!(config.external_id_components().is_empty());

        config.external_id = "Email".to_string();
        assert_eq!(config.external_id_components(), vec!["Email"]);

        config.external_id = "FirstName; LastName ;".to_string();
        assert_eq!(config.external_id_components(), vec!["FirstName", "LastName"]);
    }

    #[test]
    fn test_operation_defaults_and_deletes() {
        assert_eq!(MigrationOperation::default(), MigrationOperation::Readonly);
        assert!(MigrationOperation::Delete.is_delete());
        assert!(MigrationOperation::HardDelete.is_delete());
        assert!(!MigrationOperation::Upsert.is_delete());
        assert_eq!(MigrationOperation::all_variants().len(), 6);
    }

    #[test]
    fn test_config_json_uses_store_names() {
        let mut config = ObjectConfig::new("Account");
        config.operation = MigrationOperation::Upsert;
        config.external_id = "Name".to_string();
        config.fields = vec!["all".to_string()];
        config.where_clause = "Name != null".to_string();
        config.order_by = "Name ASC".to_string();
        config.field_mapping.push(FieldMappingEntry::new("Account", "Name", "Name"));
        config.mock_fields.push(MockField::new("Phone", "phone"));

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["name"], "Account");
        assert_eq!(json["operation"], "Upsert");
        assert_eq!(json["externalId"], "Name");
        assert_eq!(json["where"], "Name != null");
        assert_eq!(json["orderBy"], "Name ASC");
        assert_eq!(json["fieldMapping"][0]["targetObject"], "Account");
        assert_eq!(json["fieldMapping"][0]["sourceField"], "Name");
        assert_eq!(json["mockFields"][0]["pattern"], "phone");
        // A valid entry serializes without an error annotation.
        assert!(json["fieldMapping"][0].get("errorMessage").is_none());

        let back: ObjectConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: ObjectConfig =
            serde_json::from_str(r#"{"name": "Lead", "fields": ["Id", "all"]}"#).unwrap();
        assert_eq!(config.name, "Lead");
        assert_eq!(config.operation, MigrationOperation::Readonly);
        assert!(config.external_id.is_empty());
        assert_eq!(config.limit, 0);
        assert!(!config.use_field_mapping);
    }

    #[test]
    fn test_mapping_target_object_comes_from_first_entry() {
        let mut config = ObjectConfig::new("Account");
        assert_eq!(config.mapping_target_object(), None);

        config
            .field_mapping
            .push(FieldMappingEntry::new("Account__c", "Name", "Name"));
        config
            .field_mapping
            .push(FieldMappingEntry::new("Account__c", "Phone", "Phone"));
        assert_eq!(config.mapping_target_object(), Some("Account__c"));
    }

    #[test]
    fn test_migration_config_round_trip() {
        let mut config = MigrationConfig::new("prod-to-sandbox");
        config.add_object(ObjectConfig::new("Account"));
        config.add_object(ObjectConfig::new("Contact"));

        let json = config.to_json().unwrap();
        let back = MigrationConfig::from_json(&json).unwrap();
        assert_eq!(back, config);
        assert!(back.object("Contact").is_some());
        assert!(back.object("Opportunity").is_none());
    }
}
