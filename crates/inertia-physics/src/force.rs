//! The [`Force`] trait and the built-in constant forces.
//!
//! A force writes into the acceleration columns of the bodies its
//! [`Selection`] resolves to, once per step, while the world clock is
//! inside its [`TimeWindow`]. Forces are applied in the order they were
//! added to the world.
//!
//! # Construction
//!
//! ```
//! use inertia_physics::{ConstantForce, ForceMode, World};
//! use inertia_pose::Vec2;
//!
//! let mut world = World::new(4).unwrap();
//! let body = world.new_body(Default::default()).unwrap();
//! let gravity = ConstantForce::builder(Vec2::new(0.0, -9.81))
//!     .bodies(&body)
//!     .mode(ForceMode::Acceleration)
//!     .build(&world)
//!     .unwrap();
//! world.add_force(gravity);
//! ```

use std::error::Error;
use std::fmt;

use inertia_pose::{cross, Vec2};
use inertia_soa::StoreError;

use crate::selection::{Bodies, Selection};
use crate::world::World;

/// Errors from building a force.
#[derive(Clone, Debug, PartialEq)]
pub enum ForceError {
    /// The selection names rows that do not exist or an inverted range.
    InvalidSelection {
        /// What is wrong with the selection.
        reason: String,
    },
    /// The time window is inverted or not a number.
    InvalidWindow {
        /// Window start.
        begin: f64,
        /// Window end.
        end: f64,
    },
    /// A force parameter is NaN or infinite.
    NonFiniteParameter {
        /// The offending parameter.
        name: &'static str,
    },
}

impl fmt::Display for ForceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSelection { reason } => write!(f, "invalid selection: {reason}"),
            Self::InvalidWindow { begin, end } => {
                write!(f, "invalid time window [{begin}, {end})")
            }
            Self::NonFiniteParameter { name } => {
                write!(f, "force parameter '{name}' is not finite")
            }
        }
    }
}

impl Error for ForceError {}

/// How a force's magnitude relates to the resulting acceleration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ForceMode {
    /// Scaled by inverse mass (or inverse inertia for torque).
    #[default]
    Force,
    /// Applied as acceleration directly, regardless of mass.
    Acceleration,
}

impl ForceMode {
    /// Factor converting a magnitude into an acceleration for a body with
    /// the given inverse mass or inertia.
    #[inline]
    pub fn scale(self, inverse: f64) -> f64 {
        match self {
            Self::Force => inverse,
            Self::Acceleration => 1.0,
        }
    }
}

/// Half-open activity interval `[begin, end)` in world time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeWindow {
    /// First instant the force is active.
    pub begin: f64,
    /// First instant the force is inactive again.
    pub end: f64,
}

impl TimeWindow {
    /// Active for all time from 0.
    pub const ALWAYS: Self = Self {
        begin: 0.0,
        end: f64::INFINITY,
    };

    /// Validated window. `end` may be infinite; `begin <= end` is required.
    pub fn new(begin: f64, end: f64) -> Result<Self, ForceError> {
        if begin.is_nan() || end.is_nan() || begin > end || begin == f64::INFINITY {
            return Err(ForceError::InvalidWindow { begin, end });
        }
        Ok(Self { begin, end })
    }

    /// Whether `time` lies in the window.
    #[inline]
    pub fn contains(&self, time: f64) -> bool {
        self.begin <= time && time < self.end
    }

    /// Whether the window has closed at `time`.
    #[inline]
    pub fn has_expired(&self, time: f64) -> bool {
        time >= self.end
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::ALWAYS
    }
}

/// Step information passed to [`Force::apply`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceContext {
    /// World time at the start of the step.
    pub time: f64,
    /// Step length.
    pub dt: f64,
}

/// Something that contributes acceleration to bodies each step.
///
/// # Contract
///
/// - `apply()` adds to the acceleration columns of `bodies` only; the
///   world clears them at the start of every step.
/// - `selection()` and `window()` are read every step, before `apply()`.
///   `apply()` is not called when the window excludes the current time or
///   the selection resolves to no bodies.
pub trait Force: 'static {
    /// Human-readable name for logs and step metrics.
    fn name(&self) -> &str;

    /// The bodies this force acts on.
    fn selection(&self) -> &Selection;

    /// When this force is active. Default: always.
    fn window(&self) -> TimeWindow {
        TimeWindow::ALWAYS
    }

    /// Add this force's contribution for one step.
    fn apply(&self, bodies: &Bodies<'_>, ctx: &ForceContext) -> Result<(), StoreError>;
}

/// Whether `force` would be applied at `time` in a world of `body_count`
/// bodies.
pub fn is_active(force: &dyn Force, time: f64, body_count: usize) -> bool {
    force.window().contains(time) && !force.selection().resolve(body_count).is_empty()
}

/// Add a linear force to every body in `bodies`.
///
/// In [`ForceMode::Force`] the acceleration grows by
/// `inverse_mass * force`; in [`ForceMode::Acceleration`] by `force`.
/// With a world-frame `point`, the torque `cross(point - position, force)`
/// is applied as well.
pub fn apply_force(
    force: Vec2,
    bodies: &Bodies<'_>,
    point: Option<Vec2>,
    mode: ForceMode,
) -> Result<(), StoreError> {
    bodies.for_each_mut(|b| {
        b.acceleration += force * mode.scale(b.inverse_mass);
        if let Some(point) = point {
            let torque = cross(&(point - b.position), &force);
            b.angular_acceleration += torque * mode.scale(b.inverse_inertia);
        }
    })
}

/// Add a torque to every body in `bodies`.
pub fn apply_torque(torque: f64, bodies: &Bodies<'_>, mode: ForceMode) -> Result<(), StoreError> {
    bodies.for_each_mut(|b| {
        b.angular_acceleration += torque * mode.scale(b.inverse_inertia);
    })
}

fn check_finite(value: f64, name: &'static str) -> Result<(), ForceError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ForceError::NonFiniteParameter { name })
    }
}

/// A constant linear force, optionally applied at a world-frame point.
#[derive(Clone, Debug)]
pub struct ConstantForce {
    name: String,
    force: Vec2,
    point: Option<Vec2>,
    mode: ForceMode,
    selection: Selection,
    window: TimeWindow,
}

/// Builder for [`ConstantForce`].
///
/// Defaults: every body, [`ForceMode::Force`], no point, active forever.
#[derive(Clone, Debug)]
pub struct ConstantForceBuilder {
    name: String,
    force: Vec2,
    point: Option<Vec2>,
    mode: ForceMode,
    selection: Selection,
    begin: f64,
    end: f64,
}

impl ConstantForce {
    /// Start building a force of the given world-frame vector.
    pub fn builder(force: Vec2) -> ConstantForceBuilder {
        ConstantForceBuilder {
            name: "constant_force".to_string(),
            force,
            point: None,
            mode: ForceMode::Force,
            selection: Selection::All,
            begin: 0.0,
            end: f64::INFINITY,
        }
    }

    /// The force vector.
    pub fn force(&self) -> Vec2 {
        self.force
    }

    /// The application point, if any.
    pub fn point(&self) -> Option<Vec2> {
        self.point
    }

    /// The application mode.
    pub fn mode(&self) -> ForceMode {
        self.mode
    }
}

impl ConstantForceBuilder {
    /// Name for logs and metrics. Default: `"constant_force"`.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The bodies to act on. Default: [`Selection::All`].
    pub fn bodies(mut self, selection: impl Into<Selection>) -> Self {
        self.selection = selection.into();
        self
    }

    /// Application mode. Default: [`ForceMode::Force`].
    pub fn mode(mut self, mode: ForceMode) -> Self {
        self.mode = mode;
        self
    }

    /// Apply at a world-frame point, which also produces torque.
    pub fn at_point(mut self, point: Vec2) -> Self {
        self.point = Some(point);
        self
    }

    /// Active from `begin` (inclusive) to `end` (exclusive).
    pub fn window(mut self, begin: f64, end: f64) -> Self {
        self.begin = begin;
        self.end = end;
        self
    }

    /// Validate against `world` and build.
    ///
    /// # Errors
    ///
    /// - [`ForceError::NonFiniteParameter`] for a non-finite force or point.
    /// - [`ForceError::InvalidWindow`] for an inverted or NaN window.
    /// - [`ForceError::InvalidSelection`] for rows `world` does not have.
    pub fn build(self, world: &World) -> Result<ConstantForce, ForceError> {
        check_finite(self.force.x, "force.x")?;
        check_finite(self.force.y, "force.y")?;
        if let Some(p) = self.point {
            check_finite(p.x, "point.x")?;
            check_finite(p.y, "point.y")?;
        }
        let window = TimeWindow::new(self.begin, self.end)?;
        self.selection.validate(world.body_count())?;
        Ok(ConstantForce {
            name: self.name,
            force: self.force,
            point: self.point,
            mode: self.mode,
            selection: self.selection,
            window,
        })
    }
}

impl Force for ConstantForce {
    fn name(&self) -> &str {
        &self.name
    }

    fn selection(&self) -> &Selection {
        &self.selection
    }

    fn window(&self) -> TimeWindow {
        self.window
    }

    fn apply(&self, bodies: &Bodies<'_>, _ctx: &ForceContext) -> Result<(), StoreError> {
        apply_force(self.force, bodies, self.point, self.mode)
    }
}

/// A constant torque.
#[derive(Clone, Debug)]
pub struct ConstantTorque {
    name: String,
    torque: f64,
    mode: ForceMode,
    selection: Selection,
    window: TimeWindow,
}

/// Builder for [`ConstantTorque`].
///
/// Defaults: every body, [`ForceMode::Force`], active forever.
#[derive(Clone, Debug)]
pub struct ConstantTorqueBuilder {
    name: String,
    torque: f64,
    mode: ForceMode,
    selection: Selection,
    begin: f64,
    end: f64,
}

impl ConstantTorque {
    /// Start building a torque of the given magnitude (counter-clockwise
    /// positive).
    pub fn builder(torque: f64) -> ConstantTorqueBuilder {
        ConstantTorqueBuilder {
            name: "constant_torque".to_string(),
            torque,
            mode: ForceMode::Force,
            selection: Selection::All,
            begin: 0.0,
            end: f64::INFINITY,
        }
    }

    /// The torque magnitude.
    pub fn torque(&self) -> f64 {
        self.torque
    }
}

impl ConstantTorqueBuilder {
    /// Name for logs and metrics. Default: `"constant_torque"`.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The bodies to act on. Default: [`Selection::All`].
    pub fn bodies(mut self, selection: impl Into<Selection>) -> Self {
        self.selection = selection.into();
        self
    }

    /// Application mode. Default: [`ForceMode::Force`].
    pub fn mode(mut self, mode: ForceMode) -> Self {
        self.mode = mode;
        self
    }

    /// Active from `begin` (inclusive) to `end` (exclusive).
    pub fn window(mut self, begin: f64, end: f64) -> Self {
        self.begin = begin;
        self.end = end;
        self
    }

    /// Validate against `world` and build.
    pub fn build(self, world: &World) -> Result<ConstantTorque, ForceError> {
        check_finite(self.torque, "torque")?;
        let window = TimeWindow::new(self.begin, self.end)?;
        self.selection.validate(world.body_count())?;
        Ok(ConstantTorque {
            name: self.name,
            torque: self.torque,
            mode: self.mode,
            selection: self.selection,
            window,
        })
    }
}

impl Force for ConstantTorque {
    fn name(&self) -> &str {
        &self.name
    }

    fn selection(&self) -> &Selection {
        &self.selection
    }

    fn window(&self) -> TimeWindow {
        self.window
    }

    fn apply(&self, bodies: &Bodies<'_>, _ctx: &ForceContext) -> Result<(), StoreError> {
        apply_torque(self.torque, bodies, self.mode)
    }
}
