//! The body column schema.
//!
//! Bodies are rows of a [`ColumnStore`] that carries the ten columns
//! returned by [`body_fields()`]. [`BodySchema`] holds their resolved
//! [`FieldId`]s; it is built once when a world is created and every body
//! accessor goes through it, so no field is ever looked up by name on the
//! hot path.

use inertia_core::{ConfigError, FieldDef, FieldId, FieldShape, ScalarType};
use inertia_soa::ColumnStore;

/// Inverse mass; 0 marks an immovable body.
pub const INVERSE_MASS: &str = "inverse_mass";
/// Inverse moment of inertia; 0 marks a body that cannot spin.
pub const INVERSE_INERTIA: &str = "inverse_inertia";
/// World-frame position of the center of mass.
pub const POSITION: &str = "position";
/// Linear velocity.
pub const VELOCITY: &str = "velocity";
/// Linear acceleration, rebuilt every step.
pub const ACCELERATION: &str = "acceleration";
/// Heading in radians.
pub const ORIENTATION: &str = "orientation";
/// Angular velocity in radians per second.
pub const ANGULAR_VELOCITY: &str = "angular_velocity";
/// Angular acceleration, rebuilt every step.
pub const ANGULAR_ACCELERATION: &str = "angular_acceleration";
/// One-shot force accumulated by `Body::add_force`.
pub const LINEAR_FORCE_ACCUMULATOR: &str = "linear_force_accumulator";
/// One-shot torque accumulated by `Body::add_force`.
pub const TORQUE_ACCUMULATOR: &str = "torque_accumulator";

/// The body columns, in registration order.
///
/// Both inverse mass and inverse inertia are filled with 1.0 so a freshly
/// taken row is a unit body at rest at the origin.
pub fn body_fields() -> Vec<FieldDef> {
    vec![
        FieldDef::scalar(INVERSE_MASS).with_fill(1.0),
        FieldDef::scalar(INVERSE_INERTIA).with_fill(1.0),
        FieldDef::vector(POSITION, 2),
        FieldDef::vector(VELOCITY, 2),
        FieldDef::vector(ACCELERATION, 2),
        FieldDef::scalar(ORIENTATION),
        FieldDef::scalar(ANGULAR_VELOCITY),
        FieldDef::scalar(ANGULAR_ACCELERATION),
        FieldDef::vector(LINEAR_FORCE_ACCUMULATOR, 2),
        FieldDef::scalar(TORQUE_ACCUMULATOR),
    ]
}

/// Resolved field IDs of the body columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BodySchema {
    /// See [`INVERSE_MASS`].
    pub inverse_mass: FieldId,
    /// See [`INVERSE_INERTIA`].
    pub inverse_inertia: FieldId,
    /// See [`POSITION`].
    pub position: FieldId,
    /// See [`VELOCITY`].
    pub velocity: FieldId,
    /// See [`ACCELERATION`].
    pub acceleration: FieldId,
    /// See [`ORIENTATION`].
    pub orientation: FieldId,
    /// See [`ANGULAR_VELOCITY`].
    pub angular_velocity: FieldId,
    /// See [`ANGULAR_ACCELERATION`].
    pub angular_acceleration: FieldId,
    /// See [`LINEAR_FORCE_ACCUMULATOR`].
    pub linear_force_accumulator: FieldId,
    /// See [`TORQUE_ACCUMULATOR`].
    pub torque_accumulator: FieldId,
}

impl BodySchema {
    /// Register the body columns on `store` and resolve them.
    pub fn register(store: &mut ColumnStore) -> Result<Self, ConfigError> {
        for def in body_fields() {
            store.register(def)?;
        }
        Self::resolve(store)
    }

    /// Resolve the body columns of a store that already carries them.
    ///
    /// Fails with [`ConfigError::MissingBodyField`] if a column is absent
    /// and [`ConfigError::BodyFieldMismatch`] if one has the wrong shape
    /// or element type. Extra columns are allowed.
    pub fn resolve(store: &ColumnStore) -> Result<Self, ConfigError> {
        let lookup = |name: &str, components: u32| -> Result<FieldId, ConfigError> {
            let id = store
                .field_id(name)
                .ok_or_else(|| ConfigError::MissingBodyField {
                    name: name.to_string(),
                })?;
            let def = store
                .field(id)
                .ok_or_else(|| ConfigError::MissingBodyField {
                    name: name.to_string(),
                })?;
            let expected = if components == 1 {
                FieldShape::Scalar
            } else {
                FieldShape::Array { len: components }
            };
            if def.scalar != ScalarType::Float {
                return Err(ConfigError::BodyFieldMismatch {
                    name: name.to_string(),
                    reason: format!("stores {} elements, expected float", def.scalar),
                });
            }
            if def.shape != expected {
                return Err(ConfigError::BodyFieldMismatch {
                    name: name.to_string(),
                    reason: format!("shape {:?}, expected {expected:?}", def.shape),
                });
            }
            Ok(id)
        };
        Ok(Self {
            inverse_mass: lookup(INVERSE_MASS, 1)?,
            inverse_inertia: lookup(INVERSE_INERTIA, 1)?,
            position: lookup(POSITION, 2)?,
            velocity: lookup(VELOCITY, 2)?,
            acceleration: lookup(ACCELERATION, 2)?,
            orientation: lookup(ORIENTATION, 1)?,
            angular_velocity: lookup(ANGULAR_VELOCITY, 1)?,
            angular_acceleration: lookup(ANGULAR_ACCELERATION, 1)?,
            linear_force_accumulator: lookup(LINEAR_FORCE_ACCUMULATOR, 2)?,
            torque_accumulator: lookup(TORQUE_ACCUMULATOR, 1)?,
        })
    }

    /// The columns a [`Force`](crate::Force) may read, in the order
    /// [`Bodies::for_each_mut`](crate::Bodies::for_each_mut) borrows them.
    pub(crate) fn dynamics(&self) -> [FieldId; 8] {
        [
            self.inverse_mass,
            self.inverse_inertia,
            self.position,
            self.velocity,
            self.acceleration,
            self.orientation,
            self.angular_velocity,
            self.angular_acceleration,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inertia_soa::StoreConfig;

    #[test]
    fn registration_order_is_field_id_order() {
        let mut store = ColumnStore::new(StoreConfig::default()).unwrap();
        let schema = BodySchema::register(&mut store).unwrap();
        assert_eq!(schema.inverse_mass, FieldId(0));
        assert_eq!(schema.position, FieldId(2));
        assert_eq!(schema.torque_accumulator, FieldId(9));
        assert_eq!(store.field_count(), 10);
    }

    #[test]
    fn resolve_allows_extra_columns() {
        let mut store = ColumnStore::new(StoreConfig::default()).unwrap();
        store.register(FieldDef::flag("sleeping")).unwrap();
        let schema = BodySchema::register(&mut store).unwrap();
        assert_eq!(schema.inverse_mass, FieldId(1));
    }

    #[test]
    fn missing_column_is_reported() {
        let store = ColumnStore::with_fields(
            StoreConfig::default(),
            body_fields().into_iter().filter(|d| d.name != VELOCITY),
        )
        .unwrap();
        assert_eq!(
            BodySchema::resolve(&store),
            Err(ConfigError::MissingBodyField {
                name: VELOCITY.into()
            })
        );
    }

    #[test]
    fn wrong_shape_is_reported() {
        let fields = body_fields().into_iter().map(|d| {
            if d.name == POSITION {
                FieldDef::vector(POSITION, 3)
            } else {
                d
            }
        });
        let store = ColumnStore::with_fields(StoreConfig::default(), fields).unwrap();
        assert!(matches!(
            BodySchema::resolve(&store),
            Err(ConfigError::BodyFieldMismatch { .. })
        ));
    }
}
