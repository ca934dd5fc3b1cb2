//! Core types for the Inertia rigid-body framework.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! vocabulary shared by the columnar store and the physics layer: row and
//! field identifiers, field descriptors with their element shapes, and the
//! setup-time error type.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod id;

pub use error::ConfigError;
pub use field::{FieldDef, FieldShape, Layout, Scalar, ScalarType, ShapeDims};
pub use id::{FieldId, ForceId, RowId};
