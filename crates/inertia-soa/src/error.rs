//! Store access error types.

use std::error::Error;
use std::fmt;

use inertia_core::{ConfigError, FieldId, RowId, ScalarType};

/// Errors that can occur while accessing or growing a columnar store.
#[derive(Clone, Debug, PartialEq)]
pub enum StoreError {
    /// A `FieldId` that is not registered in the store.
    UnknownField {
        /// The unrecognised field.
        field: FieldId,
    },
    /// A field name that is not registered in the store.
    UnknownFieldName {
        /// The unrecognised name.
        name: String,
    },
    /// The field is accessed with an element type it does not store.
    TypeMismatch {
        /// The accessed field.
        field: FieldId,
        /// The field's stored scalar type.
        stored: ScalarType,
        /// The element type requested by the caller.
        requested: ScalarType,
    },
    /// A row that has not been taken yet.
    RowOutOfRange {
        /// The requested row.
        row: RowId,
        /// Number of rows in use.
        len: usize,
    },
    /// A component index past the field's per-row element count.
    ComponentOutOfRange {
        /// The accessed field.
        field: FieldId,
        /// The requested component.
        component: usize,
        /// Number of components per row.
        components: usize,
    },
    /// A row write supplied the wrong number of elements.
    LengthMismatch {
        /// The written field.
        field: FieldId,
        /// Number of components per row.
        expected: usize,
        /// Number of elements supplied.
        found: usize,
    },
    /// A bulk operation was given columns of incompatible shape or layout.
    ShapeMismatch {
        /// Description of the mismatch.
        reason: String,
    },
    /// Row allocation would exceed the configured row limit.
    CapacityExceeded {
        /// Rows that would be in use after the allocation.
        requested: usize,
        /// The configured maximum.
        max_rows: usize,
    },
    /// The store is already mutably borrowed through another handle.
    Busy,
    /// Field registration through a shared handle failed.
    Config(ConfigError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownField { field } => write!(f, "unknown field: {field}"),
            Self::UnknownFieldName { name } => write!(f, "unknown field name: '{name}'"),
            Self::TypeMismatch {
                field,
                stored,
                requested,
            } => write!(
                f,
                "field {field} stores {stored} elements, requested {requested}"
            ),
            Self::RowOutOfRange { row, len } => {
                write!(f, "row {row} out of range: {len} rows in use")
            }
            Self::ComponentOutOfRange {
                field,
                component,
                components,
            } => write!(
                f,
                "component {component} out of range for field {field} with {components} components"
            ),
            Self::LengthMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "field {field} expects {expected} elements per row, got {found}"
            ),
            Self::ShapeMismatch { reason } => write!(f, "shape mismatch: {reason}"),
            Self::CapacityExceeded {
                requested,
                max_rows,
            } => write!(
                f,
                "store capacity exceeded: {requested} rows requested, limit {max_rows}"
            ),
            Self::Busy => write!(f, "store is already mutably borrowed"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for StoreError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
