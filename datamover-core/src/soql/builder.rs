//! Query generation for migration objects
//!
//! Builders are pure string assembly over an [`ObjectConfig`]: clause
//! syntax is never validated here (see [`fragment`] for the advisory
//! checks) and building never fails. Rebuilding from a previous build's
//! field list yields the identical query.
//!
//! [`fragment`]: crate::soql::fragment

use crate::config::ObjectConfig;
use crate::constants::ID_FIELD;
use crate::join;
use crate::keywords;
use crate::schema::SObjectDescribe;

/// A generated query plus the concrete field list it selects.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub query: String,
    pub fields: Vec<String>,
}

/// Build the object's retrieve query.
///
/// Fields come from `explicit_fields` when given, otherwise from the raw
/// configured field list. "Id" is always selected (matched
/// case-insensitively) and the list is deduplicated and Id-first sorted.
pub fn build_query(config: &ObjectConfig, explicit_fields: Option<&[String]>) -> BuiltQuery {
    let mut fields: Vec<String> = match explicit_fields {
        Some(fields) => fields.to_vec(),
        None => config.fields.clone(),
    };
    ensure_id(&mut fields);
    let mut fields = join::distinct(&fields);
    keywords::sort_id_first(&mut fields);

    let mut query = format!("SELECT {} FROM {}", fields.join(", "), config.name);
    append_clauses(&mut query, config, config.limit);

    BuiltQuery { query, fields }
}

/// Build the record-count query: WHERE is kept, everything else dropped.
pub fn build_count_query(config: &ObjectConfig) -> String {
    let mut query = format!("SELECT COUNT({}) cnt FROM {}", ID_FIELD, config.name);
    let where_clause = config.where_clause.trim();
    if !where_clause.is_empty() {
        query.push_str(&format!(" WHERE {}", where_clause));
    }
    query
}

/// Build the capped preview query.
///
/// Fields are re-derived from the configured tokens via full keyword
/// expansion, extended with the external id components, minus the user's
/// exclusions ("Id" is not excludable). The limit is the configured limit
/// capped at `cap`, or `cap` when none is set.
pub fn build_test_query(config: &ObjectConfig, schema: &SObjectDescribe, cap: u32) -> BuiltQuery {
    let limit = if config.limit > 0 { config.limit.min(cap) } else { cap };

    let mut fields = keywords::resolve_fields(&config.fields, schema);
    fields.extend(config.external_id_components());
    fields.retain(|field| {
        field.eq_ignore_ascii_case(ID_FIELD) || !config.excluded_fields.contains(field)
    });
    ensure_id(&mut fields);
    let mut fields = join::distinct(&fields);
    keywords::sort_id_first(&mut fields);

    let mut query = format!("SELECT {} FROM {}", fields.join(", "), config.name);
    append_clauses(&mut query, config, limit);

    BuiltQuery { query, fields }
}

/// Build the old-data delete query, if the configuration calls for one.
///
/// `None` means "nothing to delete": either the object neither deletes old
/// data nor runs a delete operation, or no delete-where fragment is set.
pub fn build_delete_query(config: &ObjectConfig) -> Option<String> {
    if !config.delete_old_data && !config.operation.is_delete() {
        return None;
    }
    let delete_where = config.delete_where.trim();
    if delete_where.is_empty() {
        return None;
    }
    Some(format!(
        "SELECT {} FROM {} WHERE {}",
        ID_FIELD, config.name, delete_where
    ))
}

fn ensure_id(fields: &mut Vec<String>) {
    if !fields.iter().any(|f| f.eq_ignore_ascii_case(ID_FIELD)) {
        fields.push(ID_FIELD.to_string());
    }
}

// Fixed clause order: WHERE, ORDER BY, LIMIT, OFFSET. Unset clauses are
// omitted entirely.
fn append_clauses(query: &mut String, config: &ObjectConfig, limit: u32) {
    let where_clause = config.where_clause.trim();
    if !where_clause.is_empty() {
        query.push_str(&format!(" WHERE {}", where_clause));
    }
    let order_by = config.order_by.trim();
    if !order_by.is_empty() {
        query.push_str(&format!(" ORDER BY {}", order_by));
    }
    if limit > 0 {
        query.push_str(&format!(" LIMIT {}", limit));
    }
    if config.offset > 0 {
        query.push_str(&format!(" OFFSET {}", config.offset));
    }
}
