//! Field name table: `name` → `FieldId`.
//!
//! The [`FieldTable`] is the store's "phone book". Columns themselves live
//! in a `Vec` indexed by `FieldId`; this table resolves names to those
//! indices and rejects collisions. It uses `IndexMap` (not `HashMap`) so
//! iteration follows registration order.

use indexmap::IndexMap;
use inertia_core::{ConfigError, FieldId};

/// Maps field names to their registration-order IDs.
#[derive(Clone, Debug, Default)]
pub struct FieldTable {
    names: IndexMap<String, FieldId>,
}

impl FieldTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next `FieldId` to `name`.
    pub fn insert(&mut self, name: &str) -> Result<FieldId, ConfigError> {
        if self.names.contains_key(name) {
            return Err(ConfigError::DuplicateField {
                name: name.to_string(),
            });
        }
        let id = u32::try_from(self.names.len())
            .map(FieldId)
            .map_err(|_| ConfigError::InvalidCapacity {
                reason: "field count exceeds u32::MAX".to_string(),
            })?;
        self.names.insert(name.to_string(), id);
        Ok(id)
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<FieldId> {
        self.names.get(name).copied()
    }

    /// Iterate over `(name, id)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, FieldId)> {
        self.names.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Number of registered fields.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether there are no registered fields.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_registration_order() {
        let mut table = FieldTable::new();
        assert_eq!(table.insert("position").unwrap(), FieldId(0));
        assert_eq!(table.insert("velocity").unwrap(), FieldId(1));
        let names: Vec<_> = table.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["position", "velocity"]);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut table = FieldTable::new();
        table.insert("position").unwrap();
        assert_eq!(
            table.insert("position"),
            Err(ConfigError::DuplicateField {
                name: "position".into()
            })
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn unknown_name_returns_none() {
        let table = FieldTable::new();
        assert!(table.get("mass").is_none());
        assert!(table.is_empty());
    }
}
