//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a column within a columnar store.
///
/// Fields are registered in order and assigned sequential IDs.
/// `FieldId(n)` corresponds to the n-th registered field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub u32);

impl FieldId {
    /// The field's position in registration order.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for FieldId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies one row (slot) of a columnar store.
///
/// Row IDs are handed out monotonically by `take()` starting at 0. A row
/// is never moved to a different ID and never reused, so a `RowId` stays
/// meaningful for the lifetime of its store, including across growth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(pub u32);

impl RowId {
    /// The row's position as a slice index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for RowId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a force registered with a world.
///
/// Assigned monotonically on registration; removing a force does not
/// free its ID for reuse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ForceId(pub u64);

impl fmt::Display for ForceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ForceId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_their_value() {
        assert_eq!(FieldId(3).to_string(), "3");
        assert_eq!(RowId(17).to_string(), "17");
        assert_eq!(ForceId(42).to_string(), "42");
    }

    #[test]
    fn row_ids_order_by_allocation() {
        assert!(RowId(0) < RowId(1));
        assert_eq!(RowId::from(5).index(), 5);
    }
}
