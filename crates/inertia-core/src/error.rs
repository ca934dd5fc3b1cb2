//! Setup-time error type.
//!
//! [`ConfigError`] covers every failure detected while registering fields,
//! configuring a store or building a world. These are never raised once
//! stepping has begun.

use std::error::Error;
use std::fmt;

use crate::field::ScalarType;

/// Errors detected while configuring fields, stores and worlds.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A field's element shape cannot be stored.
    UnsupportedShape {
        /// Name of the offending field (empty when classifying bare dims).
        field: String,
        /// The declared element dimensions.
        dims: Vec<u32>,
    },
    /// A field with this name is already registered.
    DuplicateField {
        /// The colliding name.
        name: String,
    },
    /// A field was defined with an empty name.
    EmptyFieldName,
    /// A field's fill value does not match its scalar type.
    FillTypeMismatch {
        /// Name of the offending field.
        field: String,
        /// The field's declared scalar type.
        expected: ScalarType,
        /// The type of the fill value.
        found: ScalarType,
    },
    /// Store capacity settings are inconsistent or overflow.
    InvalidCapacity {
        /// Description of the capacity problem.
        reason: String,
    },
    /// A column required by the rigid-body schema is not registered.
    MissingBodyField {
        /// Name of the missing column.
        name: String,
    },
    /// A rigid-body column is registered with the wrong type or shape.
    BodyFieldMismatch {
        /// Name of the mismatched column.
        name: String,
        /// Description of the mismatch.
        reason: String,
    },
    /// A configured timestep is NaN, infinite, zero or negative.
    InvalidTimestep {
        /// The invalid value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedShape { field, dims } => {
                write!(f, "unsupported element shape {dims:?}")?;
                if !field.is_empty() {
                    write!(f, " for field '{field}'")?;
                }
                Ok(())
            }
            Self::DuplicateField { name } => write!(f, "field '{name}' is already registered"),
            Self::EmptyFieldName => write!(f, "field name must not be empty"),
            Self::FillTypeMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "fill value for field '{field}' is {found}, expected {expected}"
            ),
            Self::InvalidCapacity { reason } => write!(f, "invalid capacity: {reason}"),
            Self::MissingBodyField { name } => {
                write!(f, "rigid-body column '{name}' is not registered")
            }
            Self::BodyFieldMismatch { name, reason } => {
                write!(f, "rigid-body column '{name}' mismatched: {reason}")
            }
            Self::InvalidTimestep { value } => {
                write!(f, "timestep must be finite and positive, got {value}")
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_shape_names_field() {
        let err = ConfigError::UnsupportedShape {
            field: "w".into(),
            dims: vec![3, 0],
        };
        let msg = err.to_string();
        assert!(msg.contains("[3, 0]"));
        assert!(msg.contains("'w'"));
    }

    #[test]
    fn fill_mismatch_names_both_types() {
        let err = ConfigError::FillTypeMismatch {
            field: "active".into(),
            expected: ScalarType::Bool,
            found: ScalarType::Float,
        };
        assert_eq!(
            err.to_string(),
            "fill value for field 'active' is float, expected bool"
        );
    }
}
