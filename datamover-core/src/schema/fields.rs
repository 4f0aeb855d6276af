//! Ordered field collection with name lookup
//!
//! Describe payloads list fields in a meaningful order (the engine's
//! external-id fallback walks fields in declared order), so a plain map
//! would lose information. This keeps insertion order in a `Vec` and backs
//! it with a name index for O(1) lookup. Re-inserting a field replaces the
//! existing entry in place without moving it.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::schema::SFieldDescribe;

#[derive(Debug, Clone, Default)]
pub struct FieldCollection {
    entries: Vec<SFieldDescribe>,
    index: HashMap<String, usize>,
}

impl FieldCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any existing field of the same name in
    /// place. Order of the other entries is untouched.
    pub fn insert(&mut self, field: SFieldDescribe) {
        match self.index.get(&field.name) {
            Some(&position) => self.entries[position] = field,
            None => {
                self.index.insert(field.name.clone(), self.entries.len());
                self.entries.push(field);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&SFieldDescribe> {
        self.index.get(name).map(|&position| &self.entries[position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, SFieldDescribe> {
        self.entries.iter()
    }

    /// Field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|field| field.name.as_str())
    }

    pub fn as_slice(&self) -> &[SFieldDescribe] {
        &self.entries
    }
}

impl PartialEq for FieldCollection {
    fn eq(&self, other: &Self) -> bool {
        // The index is derived state; entry order and content decide equality.
        self.entries == other.entries
    }
}

impl FromIterator<SFieldDescribe> for FieldCollection {
    fn from_iter<I: IntoIterator<Item = SFieldDescribe>>(iter: I) -> Self {
        let mut collection = Self::new();
        for field in iter {
            collection.insert(field);
        }
        collection
    }
}

impl<'a> IntoIterator for &'a FieldCollection {
    type Item = &'a SFieldDescribe;
    type IntoIter = std::slice::Iter<'a, SFieldDescribe>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// On the wire a collection is just the ordered field list.
impl Serialize for FieldCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FieldCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<SFieldDescribe>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DataSource;

    fn make_field(name: &str) -> SFieldDescribe {
        SFieldDescribe::new(name, "string")
    }

    #[test]
    fn test_insert_keeps_declared_order() {
        let mut fields = FieldCollection::new();
        fields.insert(make_field("Id"));
        fields.insert(make_field("Name"));
        fields.insert(make_field("Email"));

        let names: Vec<&str> = fields.names().collect();
        assert_eq!(names, vec!["Id", "Name", "Email"]);
        assert!(fields.contains("Name"));
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn test_reinsert_replaces_in_place() {
        let mut fields = FieldCollection::new();
        fields.insert(make_field("Id"));
        fields.insert(make_field("Name"));
        fields.insert(make_field("Email"));

        let replacement = make_field("Name").with_data_source(DataSource::Both);
        fields.insert(replacement);

        let names: Vec<&str> = fields.names().collect();
        assert_eq!(names, vec!["Id", "Name", "Email"]);
        assert_eq!(fields.len(), 3);
        assert_eq!(
            fields.get("Name").map(|f| f.data_source),
            Some(DataSource::Both)
        );
    }

    #[test]
    fn test_serializes_as_ordered_sequence() {
        let mut fields = FieldCollection::new();
        fields.insert(make_field("B"));
        fields.insert(make_field("A"));

        let json = serde_json::to_value(&fields).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["name"], "B");
        assert_eq!(json[1]["name"], "A");

        let back: FieldCollection = serde_json::from_value(json).unwrap();
        assert_eq!(back, fields);
        assert!(back.contains("A"));
    }
}
