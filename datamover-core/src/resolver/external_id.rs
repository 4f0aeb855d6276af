//! Default external id selection
//!
//! When the user has not chosen an external id for an object, the wizard
//! proposes one: a fixed composite for a handful of well-known objects,
//! otherwise the most selective readable field the combined describe
//! offers. Each priority tier is a full pass over the fields in declared
//! order, so a name field late in the describe still beats a unique field
//! declared first.

use crate::constants::{self, ID_FIELD};
use crate::schema::SchemaMap;

/// Pick the default external id for an object.
///
/// Priority: fixed override table, then nameField, then autoNumber, then
/// unique, then "Id". Undescribed objects (absent from the map or with an
/// empty field list) fall straight through to "Id".
pub fn default_external_id(object_name: &str, schemas: &SchemaMap) -> String {
    if let Some(external_id) = constants::default_external_id_override(object_name) {
        return external_id.to_string();
    }

    let Some(describe) = schemas.get(object_name) else {
        return ID_FIELD.to_string();
    };
    if !describe.is_described() {
        return ID_FIELD.to_string();
    }

    let fields = describe.fields.as_slice();
    if let Some(field) = fields.iter().find(|f| f.name_field) {
        return field.name.clone();
    }
    if let Some(field) = fields.iter().find(|f| f.auto_number) {
        return field.name.clone();
    }
    if let Some(field) = fields.iter().find(|f| f.unique) {
        return field.name.clone();
    }

    ID_FIELD.to_string()
}
