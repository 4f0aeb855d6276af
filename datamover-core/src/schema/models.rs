//! Describe metadata models
//!
//! Field and object describes mirror the metadata payloads returned by the
//! org APIs, plus a `dataSource` tag recording which side of the migration
//! the metadata was seen on. All derived flags (readonly, master-detail,
//! polymorphic, ...) are computed on demand from the raw describe
//! properties, never stored.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::schema::FieldCollection;

/// Which org(s) a describe entry was retrieved from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Not described anywhere yet (e.g. hand-written config entry).
    #[default]
    Unknown,
    /// Described in the source org only.
    Source,
    /// Described in the target org only.
    Target,
    /// Described in both orgs.
    Both,
}

impl DataSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Source => "Source",
            Self::Target => "Target",
            Self::Both => "Both",
        }
    }

    /// Whether the metadata came from anywhere at all.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    pub fn in_source(&self) -> bool {
        matches!(self, Self::Source | Self::Both)
    }

    pub fn in_target(&self) -> bool {
        matches!(self, Self::Target | Self::Both)
    }
}

/// Field-level describe metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SFieldDescribe {
    pub name: String,
    pub label: String,
    /// Raw engine type name (e.g. "string", "reference", "textarea").
    #[serde(rename = "type")]
    pub field_type: String,
    pub updateable: bool,
    pub creatable: bool,
    pub custom: bool,
    pub auto_number: bool,
    pub unique: bool,
    /// Whether this is the object's name field (e.g. Account.Name).
    pub name_field: bool,
    pub calculated: bool,
    /// Whether the field can point at more than one object type.
    pub name_pointing: bool,
    pub lookup: bool,
    pub cascade_delete: bool,
    /// Object types this lookup can reference. Empty for non-lookups.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reference_to: Vec<String>,
    pub data_source: DataSource,
}

impl SFieldDescribe {
    /// Create a plain writable field of the given type.
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            field_type: field_type.into(),
            updateable: true,
            creatable: true,
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_custom(mut self) -> Self {
        self.custom = true;
        self
    }

    pub fn with_auto_number(mut self) -> Self {
        self.auto_number = true;
        self.creatable = false;
        self.updateable = false;
        self
    }

    pub fn with_unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn with_name_field(mut self) -> Self {
        self.name_field = true;
        self
    }

    pub fn with_calculated(mut self) -> Self {
        self.calculated = true;
        self.creatable = false;
        self.updateable = false;
        self
    }

    pub fn with_name_pointing(mut self) -> Self {
        self.name_pointing = true;
        self
    }

    pub fn with_cascade_delete(mut self) -> Self {
        self.cascade_delete = true;
        self
    }

    /// Mark the field as a lookup referencing one more object type.
    /// Call repeatedly to build a polymorphic reference list.
    pub fn with_reference(mut self, object_name: impl Into<String>) -> Self {
        self.lookup = true;
        self.field_type = "reference".to_string();
        self.reference_to.push(object_name.into());
        self
    }

    pub fn with_data_source(mut self, data_source: DataSource) -> Self {
        self.data_source = data_source;
        self
    }

    /// Master-detail relationship: a lookup that is either non-reparentable
    /// or cascade-deletes its children.
    pub fn is_master_detail(&self) -> bool {
        self.lookup && (!self.updateable || self.cascade_delete)
    }

    pub fn is_formula(&self) -> bool {
        self.calculated
    }

    /// A field the engine cannot write: not creatable, a formula, or an
    /// auto-number.
    pub fn readonly(&self) -> bool {
        !(self.creatable && !self.is_formula() && !self.auto_number)
    }

    /// Name-pointing lookup with at least one declared referent, minus the
    /// fields on the engine's ignore list.
    pub fn is_polymorphic(&self) -> bool {
        self.name_pointing
            && !self.reference_to.is_empty()
            && !constants::is_polymorphic_ignored(&self.name)
    }

    /// Whether the field can serve as (part of) an external id for record
    /// matching.
    pub fn can_be_external_id(&self) -> bool {
        self.is_formula()
            || self.name_field
            || self.name == constants::ID_FIELD
            || (!self.readonly() && !self.lookup)
    }

    /// Look up a raw or derived boolean property by its keyword name.
    /// Returns `None` for properties outside the addressable vocabulary.
    pub fn flag(&self, property: &str) -> Option<bool> {
        match property {
            "updateable" => Some(self.updateable),
            "creatable" => Some(self.creatable),
            "custom" => Some(self.custom),
            "autoNumber" => Some(self.auto_number),
            "unique" => Some(self.unique),
            "nameField" => Some(self.name_field),
            "calculated" => Some(self.calculated),
            "namePointing" => Some(self.name_pointing),
            "lookup" => Some(self.lookup),
            "cascadeDelete" => Some(self.cascade_delete),
            "readonly" => Some(self.readonly()),
            "masterDetail" => Some(self.is_master_detail()),
            "formula" => Some(self.is_formula()),
            "polymorphic" => Some(self.is_polymorphic()),
            "canBeExternalId" => Some(self.can_be_external_id()),
            _ => None,
        }
    }
}

/// Object-level describe metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SObjectDescribe {
    pub name: String,
    pub label: String,
    pub updateable: bool,
    pub createable: bool,
    pub custom: bool,
    pub fields: FieldCollection,
}

impl SObjectDescribe {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            updateable: true,
            createable: true,
            custom: false,
            fields: FieldCollection::new(),
        }
    }

    pub fn with_field(mut self, field: SFieldDescribe) -> Self {
        self.fields.insert(field);
        self
    }

    pub fn add_field(&mut self, field: SFieldDescribe) {
        self.fields.insert(field);
    }

    pub fn field(&self, name: &str) -> Option<&SFieldDescribe> {
        self.fields.get(name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains(name)
    }

    /// An object with zero fields is treated as undescribed.
    pub fn is_described(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Whether any field metadata came from the source org.
    pub fn known_in_source(&self) -> bool {
        self.fields.iter().any(|f| f.data_source.in_source())
    }

    /// Whether any field metadata came from the target org.
    pub fn known_in_target(&self) -> bool {
        self.fields.iter().any(|f| f.data_source.in_target())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readonly_derivation() {
        let plain = SFieldDescribe::new("Name", "string");
        assert!(!plain.readonly());

        let formula = SFieldDescribe::new("Total__c", "currency").with_calculated();
        assert!(formula.readonly());
        assert!(formula.is_formula());

        let auto = SFieldDescribe::new("CaseNumber", "string").with_auto_number();
        assert!(auto.readonly());

        let mut not_creatable = SFieldDescribe::new("CreatedDate", "datetime");
        not_creatable.creatable = false;
        assert!(not_creatable.readonly());
    }

    #[test]
    fn test_master_detail_derivation() {
        let mut lookup = SFieldDescribe::new("AccountId", "reference").with_reference("Account");
        assert!(!lookup.is_master_detail());

        lookup.cascade_delete = true;
        assert!(lookup.is_master_detail());

        let mut frozen = SFieldDescribe::new("ParentId", "reference").with_reference("Order");
        frozen.updateable = false;
        assert!(frozen.is_master_detail());
    }

    #[test]
    fn test_polymorphic_requires_referents_and_ignores_owner() {
        let who = SFieldDescribe::new("WhoId", "reference")
            .with_name_pointing()
            .with_reference("Contact")
            .with_reference("Lead");
        assert!(who.is_polymorphic());

        let owner = SFieldDescribe::new("OwnerId", "reference")
            .with_name_pointing()
            .with_reference("User");
        assert!(!owner.is_polymorphic());

        let mut bare = SFieldDescribe::new("Pointer__c", "reference").with_name_pointing();
        bare.reference_to.clear();
        assert!(!bare.is_polymorphic());
    }

    #[test]
    fn test_can_be_external_id() {
        assert!(SFieldDescribe::new("Id", "id").can_be_external_id());
        assert!(SFieldDescribe::new("Name", "string").with_name_field().can_be_external_id());
        assert!(SFieldDescribe::new("Total__c", "currency").with_calculated().can_be_external_id());
        assert!(SFieldDescribe::new("Email", "email").can_be_external_id());
        assert!(!SFieldDescribe::new("AccountId", "reference")
            .with_reference("Account")
            .can_be_external_id());

        let mut readonly = SFieldDescribe::new("SystemModstamp", "datetime");
        readonly.creatable = false;
        assert!(!readonly.can_be_external_id());
    }

    #[test]
    fn test_flag_covers_the_keyword_vocabulary() {
        let field = SFieldDescribe::new("Name", "string");
        for property in constants::FIELD_FLAG_PROPERTIES {
            assert!(
                field.flag(property).is_some(),
                "property {} must be addressable",
                property
            );
        }
        assert_eq!(field.flag("nonsense"), None);
    }

    #[test]
    fn test_field_serde_uses_engine_names() {
        let field = SFieldDescribe::new("AccountId", "reference")
            .with_reference("Account")
            .with_data_source(DataSource::Both);

        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "reference");
        assert_eq!(json["autoNumber"], false);
        assert_eq!(json["nameField"], false);
        assert_eq!(json["namePointing"], false);
        assert_eq!(json["cascadeDelete"], false);
        assert_eq!(json["referenceTo"][0], "Account");
        assert_eq!(json["dataSource"], "both");

        let back: SFieldDescribe = serde_json::from_value(json).unwrap();
        assert_eq!(back, field);
    }

    #[test]
    fn test_field_deserialize_fills_defaults() {
        let field: SFieldDescribe =
            serde_json::from_str(r#"{"name": "Email", "type": "email"}"#).unwrap();
        assert_eq!(field.name, "Email");
        assert_eq!(field.field_type, "email");
        assert!(!field.updateable);
        assert_eq!(field.data_source, DataSource::Unknown);
    }

    #[test]
    fn test_object_described_and_sides() {
        let empty = SObjectDescribe::new("Account");
        assert!(!empty.is_described());

        let described = SObjectDescribe::new("Account")
            .with_field(SFieldDescribe::new("Id", "id").with_data_source(DataSource::Source));
        assert!(described.is_described());
        assert!(described.known_in_source());
        assert!(!described.known_in_target());
    }
}
