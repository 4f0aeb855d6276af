//! Describe merging across the two orgs
//!
//! The resolver works against a single combined describe per object. Field
//! lists from the source and target orgs are full-joined by exact name and
//! every merged field is tagged with the side(s) it was seen on. For fields
//! present on both sides the source org's metadata wins; the target copy
//! only contributes its existence.

use crate::join;
use crate::schema::{DataSource, SFieldDescribe, SObjectDescribe};

/// Merge the source and target describes of one object.
///
/// Output field order is source order followed by target-only fields in
/// target order. Passing `None` for one side tags every field with the
/// other side; passing `None` for both yields an undescribed object.
pub fn combine_describes(
    source: Option<&SObjectDescribe>,
    target: Option<&SObjectDescribe>,
) -> SObjectDescribe {
    let mut combined = match (source, target) {
        (Some(describe), _) | (None, Some(describe)) => SObjectDescribe {
            name: describe.name.clone(),
            label: describe.label.clone(),
            updateable: describe.updateable,
            createable: describe.createable,
            custom: describe.custom,
            fields: Default::default(),
        },
        (None, None) => return SObjectDescribe::default(),
    };

    let empty: &[SFieldDescribe] = &[];
    let source_fields = source.map(|d| d.fields.as_slice()).unwrap_or(empty);
    let target_fields = target.map(|d| d.fields.as_slice()).unwrap_or(empty);

    let merged = join::full_join(
        source_fields,
        target_fields,
        |l, r| l.name == r.name,
        |l, r| match (l, r) {
            (Some(field), Some(_)) => tagged(field, DataSource::Both),
            (Some(field), None) => tagged(field, DataSource::Source),
            (None, Some(field)) => tagged(field, DataSource::Target),
            (None, None) => unreachable!("full join always yields at least one side"),
        },
    );

    let both = merged.iter().filter(|f| f.data_source == DataSource::Both).count();
    log::debug!(
        "combined describe for {}: {} fields ({} shared, {} source-only, {} target-only)",
        combined.name,
        merged.len(),
        both,
        source_fields.len() - both,
        target_fields.len() - both,
    );

    combined.fields = merged.into_iter().collect();
    combined
}

fn tagged(field: &SFieldDescribe, data_source: DataSource) -> SFieldDescribe {
    let mut field = field.clone();
    field.data_source = data_source;
    field
}
