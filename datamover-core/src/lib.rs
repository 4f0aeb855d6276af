//! Configuration resolver core for schema-driven org-to-org data migration.
//!
//! This crate is the stateless brain of a migration wizard: given a
//! migration configuration and the field-level schemas of the two orgs
//! involved, it resolves keyword-based field selections into concrete
//! field lists, generates the retrieval queries the migration engine
//! will run, and derives every validation flag the wizard surfaces
//! (missing fields, undisambiguated polymorphic lookups, broken field
//! mappings, unsound anonymization rules).
//!
//! Nothing here talks to an org or touches disk. Callers feed in
//! describe metadata, call [`resolver::refresh_derived`] after every
//! edit, and render the result. Identical inputs always produce
//! identical outputs.

pub mod config;
pub mod constants;
pub mod join;
pub mod keywords;
pub mod resolver;
pub mod schema;
pub mod soql;

pub use config::{
    FieldMappingEntry, MigrationConfig, MigrationOperation, MockField, ObjectConfig,
    PolymorphicMapping,
};
pub use resolver::{
    available_fields_for_mocking, available_target_fields, default_external_id, refresh_all,
    refresh_derived, ObjectDerived, PolymorphicFieldInfo,
};
pub use schema::{
    combine_describes, DataSource, FieldCollection, SFieldDescribe, SObjectDescribe, SchemaMap,
};
pub use soql::{
    build_count_query, build_delete_query, build_query, build_test_query, is_valid_order_by,
    is_valid_where, BuiltQuery,
};
