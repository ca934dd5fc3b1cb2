//! Rigid bodies as live views over the body columns.

use inertia_core::{FieldId, RowId};
use inertia_pose::{compose, cross, transform_point, transform_vector, Pose, Vec2};
use inertia_soa::{StoreError, View};

use crate::schema::BodySchema;

/// Reference frame of a vector or point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Frame {
    /// World coordinates.
    #[default]
    World,
    /// Coordinates relative to the body pose.
    Body,
}

/// Frames of the force vector and its point of application for
/// [`Body::add_force`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Frames {
    /// Frame of the force vector.
    pub force: Frame,
    /// Frame of the application point.
    pub point: Frame,
}

impl Frames {
    /// Force and point both in world coordinates.
    pub const WORLD: Self = Self {
        force: Frame::World,
        point: Frame::World,
    };

    /// Force and point both relative to the body.
    pub const BODY: Self = Self {
        force: Frame::Body,
        point: Frame::Body,
    };

    /// Mix frames.
    pub fn new(force: Frame, point: Frame) -> Self {
        Self { force, point }
    }
}

/// `1 / x`, with 0 for a zero or infinite `x`.
pub(crate) fn inverse(x: f64) -> f64 {
    if x == 0.0 || x.is_infinite() {
        0.0
    } else {
        1.0 / x
    }
}

/// Initial state of a body created by `World::new_body`.
///
/// Defaults to a unit mass and inertia at rest at the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyDef {
    /// Inverse mass; 0 is immovable.
    pub inverse_mass: f64,
    /// Inverse moment of inertia.
    pub inverse_inertia: f64,
    /// Initial position.
    pub position: Vec2,
    /// Initial heading in radians.
    pub orientation: f64,
    /// Initial linear velocity.
    pub velocity: Vec2,
    /// Initial angular velocity.
    pub angular_velocity: f64,
}

impl Default for BodyDef {
    fn default() -> Self {
        Self {
            inverse_mass: 1.0,
            inverse_inertia: 1.0,
            position: Vec2::zeros(),
            orientation: 0.0,
            velocity: Vec2::zeros(),
            angular_velocity: 0.0,
        }
    }
}

impl BodyDef {
    /// A unit body at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// A body with infinite mass and inertia.
    pub fn immovable() -> Self {
        Self {
            inverse_mass: 0.0,
            inverse_inertia: 0.0,
            ..Self::default()
        }
    }

    /// Set the mass. Zero or infinite mass gives an immovable body.
    pub fn mass(mut self, mass: f64) -> Self {
        self.inverse_mass = inverse(mass);
        self
    }

    /// Set the inverse mass directly.
    pub fn inverse_mass(mut self, inverse_mass: f64) -> Self {
        self.inverse_mass = inverse_mass;
        self
    }

    /// Set the moment of inertia. Zero or infinite inertia cannot spin.
    pub fn inertia(mut self, inertia: f64) -> Self {
        self.inverse_inertia = inverse(inertia);
        self
    }

    /// Set the inverse moment of inertia directly.
    pub fn inverse_inertia(mut self, inverse_inertia: f64) -> Self {
        self.inverse_inertia = inverse_inertia;
        self
    }

    /// Set the position.
    pub fn position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Set the heading.
    pub fn orientation(mut self, orientation: f64) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the linear velocity.
    pub fn velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the angular velocity.
    pub fn angular_velocity(mut self, angular_velocity: f64) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }
}

/// A rigid body: one row of the world's store.
///
/// Holds no state of its own. Every accessor reads or writes the store,
/// so clones of a `Body` (and `Body` values for the same row obtained
/// later) always agree.
///
/// # Panics
///
/// The plain accessors panic if the store is already mutably borrowed,
/// which happens when a body is touched from inside
/// [`StoreHandle::with_mut`](inertia_soa::StoreHandle::with_mut) or
/// [`Bodies::for_each_mut`](crate::Bodies::for_each_mut). Code that may
/// run there, such as a [`Force`](crate::Force) reading another body,
/// uses the `try_*` accessors, which return [`StoreError::Busy`] instead.
#[derive(Clone, Debug)]
pub struct Body {
    view: View,
    schema: BodySchema,
}

fn expect_access<T>(result: Result<T, StoreError>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!(
            "body column access failed ({e}); body schema validated at world construction"
        ),
    }
}

impl Body {
    pub(crate) fn new(view: View, schema: BodySchema) -> Self {
        Self { view, schema }
    }

    /// The store row of this body.
    pub fn row(&self) -> RowId {
        self.view.row()
    }

    /// The underlying row view, for columns beyond the body schema.
    pub fn view(&self) -> &View {
        &self.view
    }

    fn scalar(&self, field: FieldId) -> f64 {
        expect_access(self.view.scalar(field))
    }

    fn try_vec2(&self, field: FieldId) -> Result<Vec2, StoreError> {
        let v = self.view.get::<f64>(field)?;
        Ok(Vec2::new(v[0], v[1]))
    }

    fn set_scalar(&self, field: FieldId, value: f64) {
        expect_access(self.view.set_scalar(field, value));
    }

    fn vec2(&self, field: FieldId) -> Vec2 {
        expect_access(self.try_vec2(field))
    }

    fn set_vec2(&self, field: FieldId, value: Vec2) {
        expect_access(self.view.set(field, &[value.x, value.y]));
    }

    /// Inverse mass.
    pub fn inverse_mass(&self) -> f64 {
        self.scalar(self.schema.inverse_mass)
    }

    /// Overwrite the inverse mass.
    pub fn set_inverse_mass(&self, value: f64) {
        self.set_scalar(self.schema.inverse_mass, value);
    }

    /// Inverse moment of inertia.
    pub fn inverse_inertia(&self) -> f64 {
        self.scalar(self.schema.inverse_inertia)
    }

    /// Overwrite the inverse moment of inertia.
    pub fn set_inverse_inertia(&self, value: f64) {
        self.set_scalar(self.schema.inverse_inertia, value);
    }

    /// Mass; `+∞` when the inverse mass is 0.
    pub fn mass(&self) -> f64 {
        expect_access(self.try_mass())
    }

    /// Set the mass. Zero or infinite mass makes the body immovable.
    pub fn set_mass(&self, mass: f64) {
        self.set_inverse_mass(inverse(mass));
    }

    /// Moment of inertia; `+∞` when the inverse inertia is 0.
    pub fn inertia(&self) -> f64 {
        let ii = self.inverse_inertia();
        if ii == 0.0 {
            f64::INFINITY
        } else {
            1.0 / ii
        }
    }

    /// Set the moment of inertia.
    pub fn set_inertia(&self, inertia: f64) {
        self.set_inverse_inertia(inverse(inertia));
    }

    /// Whether force-mode forces can move this body.
    ///
    /// Acceleration-mode forces ignore the inverse mass and move every
    /// body they select.
    pub fn is_movable(&self) -> bool {
        self.inverse_mass() != 0.0
    }

    /// Position of the center of mass.
    pub fn position(&self) -> Vec2 {
        self.vec2(self.schema.position)
    }

    /// Move the body.
    pub fn set_position(&self, value: Vec2) {
        self.set_vec2(self.schema.position, value);
    }

    /// Linear velocity.
    pub fn velocity(&self) -> Vec2 {
        self.vec2(self.schema.velocity)
    }

    /// Overwrite the linear velocity.
    pub fn set_velocity(&self, value: Vec2) {
        self.set_vec2(self.schema.velocity, value);
    }

    /// Linear acceleration from the last step.
    pub fn acceleration(&self) -> Vec2 {
        self.vec2(self.schema.acceleration)
    }

    /// Overwrite the linear acceleration. Cleared at the start of every
    /// step.
    pub fn set_acceleration(&self, value: Vec2) {
        self.set_vec2(self.schema.acceleration, value);
    }

    /// Heading in radians.
    pub fn orientation(&self) -> f64 {
        self.scalar(self.schema.orientation)
    }

    /// Overwrite the heading.
    pub fn set_orientation(&self, value: f64) {
        self.set_scalar(self.schema.orientation, value);
    }

    /// Angular velocity.
    pub fn angular_velocity(&self) -> f64 {
        self.scalar(self.schema.angular_velocity)
    }

    /// Overwrite the angular velocity.
    pub fn set_angular_velocity(&self, value: f64) {
        self.set_scalar(self.schema.angular_velocity, value);
    }

    /// Angular acceleration from the last step.
    pub fn angular_acceleration(&self) -> f64 {
        self.scalar(self.schema.angular_acceleration)
    }

    /// Overwrite the angular acceleration.
    pub fn set_angular_acceleration(&self, value: f64) {
        self.set_scalar(self.schema.angular_acceleration, value);
    }

    /// Force accumulated by [`add_force`](Self::add_force) since the last
    /// step.
    pub fn linear_force_accumulator(&self) -> Vec2 {
        self.vec2(self.schema.linear_force_accumulator)
    }

    /// Torque accumulated since the last step.
    pub fn torque_accumulator(&self) -> f64 {
        self.scalar(self.schema.torque_accumulator)
    }

    /// Body-to-world transform: `translate(position) · rotate(orientation)`.
    pub fn pose(&self) -> Pose {
        compose(self.position(), self.orientation())
    }

    /// Fallible [`inverse_mass`](Self::inverse_mass).
    pub fn try_inverse_mass(&self) -> Result<f64, StoreError> {
        self.view.scalar(self.schema.inverse_mass)
    }

    /// Fallible [`inverse_inertia`](Self::inverse_inertia).
    pub fn try_inverse_inertia(&self) -> Result<f64, StoreError> {
        self.view.scalar(self.schema.inverse_inertia)
    }

    /// Fallible [`mass`](Self::mass).
    pub fn try_mass(&self) -> Result<f64, StoreError> {
        let im = self.try_inverse_mass()?;
        Ok(if im == 0.0 { f64::INFINITY } else { 1.0 / im })
    }

    /// Fallible [`position`](Self::position).
    pub fn try_position(&self) -> Result<Vec2, StoreError> {
        self.try_vec2(self.schema.position)
    }

    /// Fallible [`velocity`](Self::velocity).
    pub fn try_velocity(&self) -> Result<Vec2, StoreError> {
        self.try_vec2(self.schema.velocity)
    }

    /// Fallible [`orientation`](Self::orientation).
    pub fn try_orientation(&self) -> Result<f64, StoreError> {
        self.view.scalar(self.schema.orientation)
    }

    /// Fallible [`angular_velocity`](Self::angular_velocity).
    pub fn try_angular_velocity(&self) -> Result<f64, StoreError> {
        self.view.scalar(self.schema.angular_velocity)
    }

    /// Fallible [`pose`](Self::pose).
    pub fn try_pose(&self) -> Result<Pose, StoreError> {
        Ok(compose(self.try_position()?, self.try_orientation()?))
    }

    /// Queue a force for the next step only.
    ///
    /// With a `point`, the torque `cross(point - position, force)` is
    /// queued too. Body-frame forces are rotated into the world by the
    /// body pose; body-frame points are mapped by the full pose.
    pub fn add_force(&self, force: Vec2, point: Option<Vec2>, frames: Frames) {
        let pose = self.pose();
        let force = match frames.force {
            Frame::World => force,
            Frame::Body => transform_vector(&pose, &force),
        };
        let acc = self.linear_force_accumulator();
        self.set_vec2(self.schema.linear_force_accumulator, acc + force);

        if let Some(point) = point {
            let point = match frames.point {
                Frame::World => point,
                Frame::Body => transform_point(&pose, &point),
            };
            let torque = cross(&(point - self.position()), &force);
            let acc = self.torque_accumulator();
            self.set_scalar(self.schema.torque_accumulator, acc + torque);
        }
    }

    /// Queue a torque for the next step only.
    pub fn add_torque(&self, torque: f64) {
        let acc = self.torque_accumulator();
        self.set_scalar(self.schema.torque_accumulator, acc + torque);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_maps_degenerate_to_zero() {
        assert_eq!(inverse(0.0), 0.0);
        assert_eq!(inverse(f64::INFINITY), 0.0);
        assert_eq!(inverse(f64::NEG_INFINITY), 0.0);
        assert_eq!(inverse(4.0), 0.25);
    }

    #[test]
    fn body_def_builders() {
        let def = BodyDef::new().mass(2.0).inertia(0.0).position(Vec2::new(1.0, 2.0));
        assert_eq!(def.inverse_mass, 0.5);
        assert_eq!(def.inverse_inertia, 0.0);
        assert_eq!(def.position, Vec2::new(1.0, 2.0));
        let fixed = BodyDef::immovable();
        assert_eq!(fixed.inverse_mass, 0.0);
        assert_eq!(fixed.inverse_inertia, 0.0);
        assert_eq!(BodyDef::new().inverse_mass(0.0).inverse_mass, 0.0);
    }

    #[test]
    fn frames_constants() {
        assert_eq!(Frames::default(), Frames::WORLD);
        assert_eq!(Frames::new(Frame::Body, Frame::Body), Frames::BODY);
    }
}
