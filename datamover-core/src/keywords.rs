//! Multiselect keyword field algebra
//!
//! Object field lists mix literal field names with keyword tokens ("all",
//! "custom_true", "type_string", ...). Keywords are predicates over
//! describe metadata and are expanded at resolution time; they are never
//! part of the resolved output themselves.

use crate::constants::{self, FIELD_FLAG_PROPERTIES, KEYWORD_ALL, KEYWORD_TYPE_PREFIX};
use crate::join;
use crate::schema::{SFieldDescribe, SObjectDescribe};

/// A parsed multiselect keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKeyword {
    /// "all": every described field, overriding any other condition.
    All,
    /// "<property>_true" / "<property>_false" over the addressable
    /// describe properties.
    PropertyFlag { property: String, expected: bool },
    /// "type_<T>": exact match on the raw field type.
    TypeEquals(String),
}

impl FieldKeyword {
    /// Parse a token into a keyword. Tokens outside the closed vocabulary
    /// (including `<property>_true` for unknown properties) return `None`
    /// and are treated as literal field names by the caller.
    pub fn parse(token: &str) -> Option<Self> {
        if token == KEYWORD_ALL {
            return Some(Self::All);
        }
        if let Some(type_name) = token.strip_prefix(KEYWORD_TYPE_PREFIX) {
            if !type_name.is_empty() {
                return Some(Self::TypeEquals(type_name.to_string()));
            }
            return None;
        }
        if let Some(property) = token.strip_suffix("_true") {
            if FIELD_FLAG_PROPERTIES.contains(&property) {
                return Some(Self::PropertyFlag {
                    property: property.to_string(),
                    expected: true,
                });
            }
        }
        if let Some(property) = token.strip_suffix("_false") {
            if FIELD_FLAG_PROPERTIES.contains(&property) {
                return Some(Self::PropertyFlag {
                    property: property.to_string(),
                    expected: false,
                });
            }
        }
        None
    }

    /// Evaluate the keyword's predicate against one field.
    pub fn matches(&self, field: &SFieldDescribe) -> bool {
        match self {
            Self::All => true,
            Self::PropertyFlag { property, expected } => field.flag(property) == Some(*expected),
            Self::TypeEquals(type_name) => field.field_type == *type_name,
        }
    }
}

/// Check if a token is a multiselect keyword.
pub fn is_keyword(token: &str) -> bool {
    FieldKeyword::parse(token).is_some()
}

/// Expand a mixed token list into concrete field names.
///
/// - Literal names are kept only when the schema describes them.
/// - Dot-qualified names (relationship paths) pass through unvalidated.
/// - Keyword conditions on the same run combine by logical AND, except
///   "all", which selects every field and overrides the other conditions.
/// - Output: deduplicated, "Id" first, the rest lexicographically.
pub fn resolve_fields(tokens: &[String], schema: &SObjectDescribe) -> Vec<String> {
    let mut picked: Vec<String> = Vec::new();
    let mut conditions: Vec<FieldKeyword> = Vec::new();

    for token in tokens {
        if token.contains('.') {
            picked.push(token.clone());
        } else if let Some(keyword) = FieldKeyword::parse(token) {
            if !conditions.contains(&keyword) {
                conditions.push(keyword);
            }
        } else if schema.has_field(token) {
            picked.push(token.clone());
        } else {
            log::debug!("dropping unknown field token '{}' on {}", token, schema.name);
        }
    }

    if !conditions.is_empty() {
        // "all" historically wins over any property filter requested next
        // to it, and configs in the wild rely on that.
        let select_all = conditions.contains(&FieldKeyword::All);
        for field in schema.fields.iter() {
            if select_all || conditions.iter().all(|c| c.matches(field)) {
                picked.push(field.name.clone());
            }
        }
    }

    let mut resolved = join::distinct(&picked);
    sort_id_first(&mut resolved);
    resolved
}

/// Canonical field order: "Id" (matched case-insensitively) pinned first,
/// everything else lexicographically ascending.
pub fn sort_id_first(fields: &mut Vec<String>) {
    fields.sort();
    if let Some(position) = fields
        .iter()
        .position(|f| f.eq_ignore_ascii_case(constants::ID_FIELD))
    {
        let id = fields.remove(position);
        fields.insert(0, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SFieldDescribe;

    fn make_schema() -> SObjectDescribe {
        SObjectDescribe::new("Account")
            .with_field(SFieldDescribe::new("Id", "id"))
            .with_field(SFieldDescribe::new("Name", "string").with_name_field())
            .with_field(SFieldDescribe::new("Rating__c", "picklist").with_custom())
            .with_field(
                SFieldDescribe::new("Total__c", "currency")
                    .with_custom()
                    .with_calculated(),
            )
            .with_field(SFieldDescribe::new("NumberOfEmployees", "int"))
    }

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_parse_vocabulary() {
        assert_eq!(FieldKeyword::parse("all"), Some(FieldKeyword::All));
        assert_eq!(
            FieldKeyword::parse("custom_true"),
            Some(FieldKeyword::PropertyFlag {
                property: "custom".to_string(),
                expected: true,
            })
        );
        assert_eq!(
            FieldKeyword::parse("readonly_false"),
            Some(FieldKeyword::PropertyFlag {
                property: "readonly".to_string(),
                expected: false,
            })
        );
        assert_eq!(
            FieldKeyword::parse("type_string"),
            Some(FieldKeyword::TypeEquals("string".to_string()))
        );
        // Outside the vocabulary: literals, not keywords.
        assert_eq!(FieldKeyword::parse("Name"), None);
        assert_eq!(FieldKeyword::parse("shiny_true"), None);
        assert_eq!(FieldKeyword::parse("type_"), None);
        assert!(!is_keyword("Account.Name"));
    }

    #[test]
    fn test_all_selects_everything_id_first() {
        let resolved = resolve_fields(&tokens(&["all"]), &make_schema());
        assert_eq!(
            resolved,
            vec!["Id", "Name", "NumberOfEmployees", "Rating__c", "Total__c"]
        );
    }

    #[test]
    fn test_all_short_circuits_property_filters() {
        let schema = make_schema();
        let with_filter = resolve_fields(&tokens(&["all", "custom_true"]), &schema);
        let all_alone = resolve_fields(&tokens(&["all"]), &schema);
        assert_eq!(with_filter, all_alone);
    }

    #[test]
    fn test_literals_filtered_by_schema() {
        let resolved = resolve_fields(&tokens(&["Name", "NoSuchField__c", "Id"]), &make_schema());
        assert_eq!(resolved, vec!["Id", "Name"]);
    }

    #[test]
    fn test_property_conditions_intersect() {
        let resolved = resolve_fields(&tokens(&["custom_true", "readonly_false"]), &make_schema());
        // Total__c is custom but calculated, hence readonly.
        assert_eq!(resolved, vec!["Rating__c"]);
    }

    #[test]
    fn test_contradictory_conditions_yield_nothing() {
        let resolved = resolve_fields(&tokens(&["custom_true", "custom_false"]), &make_schema());
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_type_condition() {
        let resolved = resolve_fields(&tokens(&["type_currency"]), &make_schema());
        assert_eq!(resolved, vec!["Total__c"]);
    }

    #[test]
    fn test_dot_qualified_passes_through() {
        let resolved = resolve_fields(&tokens(&["Account.Name", "Id"]), &make_schema());
        assert_eq!(resolved, vec!["Id", "Account.Name"]);
    }

    #[test]
    fn test_keywords_never_appear_in_output() {
        let resolved =
            resolve_fields(&tokens(&["all", "type_string", "custom_true"]), &make_schema());
        assert!(resolved.iter().all(|f| !is_keyword(f)));
    }

    #[test]
    fn test_duplicates_collapse() {
        let resolved = resolve_fields(&tokens(&["Name", "Name", "all"]), &make_schema());
        let name_count = resolved.iter().filter(|f| *f == "Name").count();
        assert_eq!(name_count, 1);
    }

    #[test]
    fn test_sort_pins_id_case_insensitively() {
        let mut fields = vec!["Name".to_string(), "id".to_string(), "Email".to_string()];
        sort_id_first(&mut fields);
        assert_eq!(fields, vec!["id", "Email", "Name"]);
    }
}
