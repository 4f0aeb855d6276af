//! Describe metadata: models, ordered field storage, and cross-org merging

mod fields;
mod merge;
mod models;

pub use fields::FieldCollection;
pub use merge::combine_describes;
pub use models::{DataSource, SFieldDescribe, SObjectDescribe};

use std::collections::HashMap;

/// Combined describes keyed by object API name.
pub type SchemaMap = HashMap<String, SObjectDescribe>;
