//! Fixed vocabularies and defaults shared across the resolver
//!
//! Everything here mirrors behavior of the migration engine the resolved
//! configuration is handed to, so changing a value changes what the engine
//! will accept.

/// Canonical record identifier field. Always selected, never excludable.
pub const ID_FIELD: &str = "Id";

/// Separator between the parts of a composite external id
/// (e.g. "FirstName;LastName").
pub const COMPOSITE_EXTERNAL_ID_SEPARATOR: char = ';';

/// RecordType is always matched on this composite key, whether or not a
/// describe is available.
pub const RECORD_TYPE_OBJECT: &str = "RecordType";
pub const RECORD_TYPE_EXTERNAL_ID: &str = "DeveloperName;NamespacePrefix;SobjectType";

/// Well-known objects whose default external id is fixed rather than
/// derived from describe metadata.
pub const DEFAULT_EXTERNAL_IDS: &[(&str, &str)] = &[
    ("EntityDefinition", "QualifiedApiName"),
    ("Profile", "Name"),
    (RECORD_TYPE_OBJECT, RECORD_TYPE_EXTERNAL_ID),
    ("User", "Username"),
];

/// Look up a fixed default external id for an object, if it has one.
pub fn default_external_id_override(object_name: &str) -> Option<&'static str> {
    DEFAULT_EXTERNAL_IDS
        .iter()
        .find(|(object, _)| *object == object_name)
        .map(|(_, external_id)| *external_id)
}

/// Name-pointing fields that are never treated as polymorphic lookups.
/// The engine resolves these through dedicated logic.
pub const POLYMORPHIC_IGNORED_FIELDS: &[&str] = &["OwnerId", "FeedItemId"];

/// Check if a field name is on the polymorphic ignore list.
pub fn is_polymorphic_ignored(field_name: &str) -> bool {
    POLYMORPHIC_IGNORED_FIELDS.contains(&field_name)
}

/// Describe properties addressable from `<property>_true` / `<property>_false`
/// multiselect keywords. Must stay in sync with [`SFieldDescribe::flag`].
///
/// [`SFieldDescribe::flag`]: crate::schema::SFieldDescribe::flag
pub const FIELD_FLAG_PROPERTIES: &[&str] = &[
    "updateable",
    "creatable",
    "custom",
    "autoNumber",
    "unique",
    "nameField",
    "calculated",
    "namePointing",
    "lookup",
    "cascadeDelete",
    "readonly",
    "masterDetail",
    "formula",
    "polymorphic",
    "canBeExternalId",
];

/// Multiselect keyword selecting every described field.
pub const KEYWORD_ALL: &str = "all";

/// Prefix of the `type_<Type>` multiselect keyword.
pub const KEYWORD_TYPE_PREFIX: &str = "type_";

/// Field types the anonymization engine cannot generate values for.
pub const MOCK_EXCLUDED_TYPES: &[&str] =
    &["textarea", "base64", "address", "location", "complexvalue"];

/// Check if a field type is excluded from anonymization.
pub fn is_mock_excluded_type(field_type: &str) -> bool {
    MOCK_EXCLUDED_TYPES.contains(&field_type)
}

/// Generator patterns offered for anonymization rules.
pub const MOCK_PATTERNS: &[&str] = &[
    "city",
    "country",
    "company_name",
    "date",
    "email",
    "first_name",
    "full_name",
    "ip",
    "last_name",
    "phone",
    "random_number",
    "state",
    "street",
    "title",
    "username",
    "website",
    "word",
    "zip",
];

/// Row cap applied to preview queries when the user has not set a limit.
pub const DEFAULT_TEST_ROW_LIMIT: u32 = 100;

/// Placeholder parent object for polymorphic fields the user has not
/// disambiguated yet.
pub const PARENT_SOBJECT_NOT_SET: &str = "not set";
