//! Reusable field definitions.
//!
//! - [`every_shape`] registers one field per shape class.
//! - [`kinematic_fields`] is a small float-only layout for bulk-op tests.

use inertia_core::{FieldDef, ScalarType};

/// One field of every supported shape and scalar type, in this order:
///
/// | name | dims | type |
/// |---|---|---|
/// | `scalar` | `[1]` | float, fill 1.0 |
/// | `array` | `[3]` | float |
/// | `row` | `[1, 3]` | float |
/// | `col` | `[3, 1]` | int |
/// | `matrix` | `[3, 3]` | float |
/// | `tensor` | `[2, 2, 2]` | float |
/// | `flag` | `[1]` | bool |
pub fn every_shape() -> Vec<FieldDef> {
    vec![
        FieldDef::scalar("scalar").with_fill(1.0),
        FieldDef::vector("array", 3),
        shaped("row", &[1, 3], ScalarType::Float),
        shaped("col", &[3, 1], ScalarType::Int),
        FieldDef::matrix("matrix", 3, 3),
        shaped("tensor", &[2, 2, 2], ScalarType::Float),
        FieldDef::flag("flag"),
    ]
}

/// Scalar `scale` (fill 1.0) plus 2-vectors `x`, `v` and `a`.
pub fn kinematic_fields() -> Vec<FieldDef> {
    vec![
        FieldDef::scalar("scale").with_fill(1.0),
        FieldDef::vector("x", 2),
        FieldDef::vector("v", 2),
        FieldDef::vector("a", 2),
    ]
}

fn shaped(name: &str, dims: &[u32], scalar: ScalarType) -> FieldDef {
    match FieldDef::new(name, dims, scalar) {
        Ok(def) => def,
        Err(e) => panic!("fixture field '{name}' is invalid: {e}"),
    }
}
