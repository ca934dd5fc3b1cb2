//! The simulation world and its integrator.
//!
//! [`World`] owns the body store, the ordered force collection and the
//! clock. Each [`update()`](World::update) runs one semi-implicit Euler
//! step:
//!
//! 1. clear `acceleration` and `angular_acceleration`,
//! 2. apply every active force in insertion order,
//! 3. fold the one-shot accumulators from `Body::add_force` into the
//!    accelerations,
//! 4. `v += a·dt`, `ω += α·dt`, then `x += v·dt`, `θ += ω·dt`,
//! 5. clear the accumulators and advance the clock.
//!
//! # Ownership model
//!
//! The store sits behind an `Rc<RefCell<_>>` shared with every [`Body`],
//! so `World` is neither `Send` nor `Sync`. Store borrows never outlive a
//! single call.

use std::error::Error;
use std::fmt;
use std::time::Instant;

use indexmap::IndexMap;
use inertia_core::{ConfigError, ForceId, RowId};
use inertia_soa::{ColumnStore, StoreError, StoreHandle};
use log::{debug, trace};

use crate::body::{Body, BodyDef};
use crate::config::WorldConfig;
use crate::force::{Force, ForceContext};
use crate::metrics::{RunSummary, StepMetrics};
use crate::schema::BodySchema;
use crate::selection::Bodies;

/// Errors from advancing the world.
#[derive(Clone, Debug, PartialEq)]
pub enum StepError {
    /// The step length is not finite and positive.
    InvalidTimestep {
        /// The rejected value.
        value: f64,
    },
    /// The run duration is not finite and non-negative.
    InvalidDuration {
        /// The rejected value.
        value: f64,
    },
    /// A force or the integrator failed to access the store.
    Store(StoreError),
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTimestep { value } => {
                write!(f, "timestep must be finite and positive, got {value}")
            }
            Self::InvalidDuration { value } => {
                write!(f, "duration must be finite and non-negative, got {value}")
            }
            Self::Store(e) => write!(f, "store access failed: {e}"),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for StepError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

fn check_timestep(dt: f64) -> Result<(), StepError> {
    if dt.is_finite() && dt > 0.0 {
        Ok(())
    } else {
        Err(StepError::InvalidTimestep { value: dt })
    }
}

/// A 2D rigid-body world.
pub struct World {
    store: StoreHandle,
    schema: BodySchema,
    config: WorldConfig,
    forces: IndexMap<ForceId, Box<dyn Force>>,
    next_force_id: u64,
    time: f64,
    step_count: u64,
    last_metrics: StepMetrics,
}

impl World {
    /// An empty world with room for `initial_capacity` bodies.
    pub fn new(initial_capacity: usize) -> Result<Self, ConfigError> {
        Self::with_config(WorldConfig::new(initial_capacity))
    }

    /// An empty world from a validated configuration.
    pub fn with_config(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut store = ColumnStore::new(config.store.clone())?;
        let schema = BodySchema::register(&mut store)?;
        Ok(Self::assemble(store, schema, config))
    }

    /// A world over a store that already carries the body columns, plus
    /// any extra per-body columns the caller registered.
    ///
    /// Rows already taken become bodies as they are.
    pub fn from_store(store: ColumnStore, default_timestep: f64) -> Result<Self, ConfigError> {
        let config = WorldConfig {
            store: store.config().clone(),
            default_timestep,
        };
        config.validate()?;
        let schema = BodySchema::resolve(&store)?;
        Ok(Self::assemble(store, schema, config))
    }

    fn assemble(store: ColumnStore, schema: BodySchema, config: WorldConfig) -> Self {
        debug!(
            "world created: {} body columns, capacity {}",
            store.field_count(),
            store.capacity()
        );
        Self {
            store: StoreHandle::new(store),
            schema,
            config,
            forces: IndexMap::new(),
            next_force_id: 0,
            time: 0.0,
            step_count: 0,
            last_metrics: StepMetrics::default(),
        }
    }

    /// Create a body.
    ///
    /// Takes a row (growing the store if needed), writes the definition's
    /// mass, inertia, pose and velocities, and zeroes accelerations and
    /// accumulators.
    pub fn new_body(&mut self, def: BodyDef) -> Result<Body, StoreError> {
        let row = self.store.take()?;
        let s = &self.schema;
        self.store.with_mut(|store| -> Result<(), StoreError> {
            store.set_element(s.inverse_mass, row, 0, def.inverse_mass)?;
            store.set_element(s.inverse_inertia, row, 0, def.inverse_inertia)?;
            store.write_row(s.position, row, &[def.position.x, def.position.y])?;
            store.write_row(s.velocity, row, &[def.velocity.x, def.velocity.y])?;
            store.write_row(s.acceleration, row, &[0.0, 0.0])?;
            store.set_element(s.orientation, row, 0, def.orientation)?;
            store.set_element(s.angular_velocity, row, 0, def.angular_velocity)?;
            store.set_element(s.angular_acceleration, row, 0, 0.0)?;
            store.write_row(s.linear_force_accumulator, row, &[0.0, 0.0])?;
            store.set_element(s.torque_accumulator, row, 0, 0.0)?;
            Ok(())
        })??;
        self.body(row)
    }

    /// The body at `row`.
    pub fn body(&self, row: RowId) -> Result<Body, StoreError> {
        let view = self.store.view(row)?;
        Ok(Body::new(view, self.schema))
    }

    /// Every body, in creation order.
    pub fn bodies(&self) -> impl Iterator<Item = Body> + '_ {
        (0..self.body_count() as u32).filter_map(move |r| self.body(RowId(r)).ok())
    }

    /// Number of bodies.
    pub fn body_count(&self) -> usize {
        self.store.len()
    }

    /// Bodies the store can hold before it next grows.
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Register a force. It is applied after every force added before it.
    pub fn add_force(&mut self, force: impl Force) -> ForceId {
        let id = ForceId(self.next_force_id);
        self.next_force_id += 1;
        debug!(
            "force '{}' added as {id} (window [{}, {}))",
            force.name(),
            force.window().begin,
            force.window().end
        );
        self.forces.insert(id, Box::new(force));
        id
    }

    /// Remove a force, keeping the order of the rest.
    pub fn remove_force(&mut self, id: ForceId) -> Option<Box<dyn Force>> {
        let removed = self.forces.shift_remove(&id);
        if let Some(force) = &removed {
            debug!("force '{}' ({id}) removed", force.name());
        }
        removed
    }

    /// Drop every force whose window has closed. Returns how many were
    /// dropped.
    pub fn prune_expired_forces(&mut self) -> usize {
        let time = self.time;
        let before = self.forces.len();
        self.forces.retain(|id, force| {
            let keep = !force.window().has_expired(time);
            if !keep {
                debug!("force '{}' ({id}) expired at t={time}", force.name());
            }
            keep
        });
        before - self.forces.len()
    }

    /// Registered forces, in application order.
    pub fn forces(&self) -> impl Iterator<Item = (ForceId, &dyn Force)> {
        self.forces.iter().map(|(id, f)| (*id, f.as_ref()))
    }

    /// Number of registered forces, active or not.
    pub fn force_count(&self) -> usize {
        self.forces.len()
    }

    /// Advance the world by `dt`.
    ///
    /// # Errors
    ///
    /// [`StepError::InvalidTimestep`] leaves the world untouched. A
    /// [`StepError::Store`] from a force aborts the step part-way: the
    /// accelerations hold whatever the forces wrote before the failure,
    /// the one-shot accumulators stay queued for the next step, and
    /// neither the clock nor the step count advances.
    pub fn update(&mut self, dt: f64) -> Result<&StepMetrics, StepError> {
        check_timestep(dt)?;
        let start = Instant::now();
        let s = self.schema;
        let all = self.store.occupied()?;
        let body_count = all.len();

        all.fill(s.acceleration, 0.0)?;
        all.fill(s.angular_acceleration, 0.0)?;

        let ctx = ForceContext {
            time: self.time,
            dt,
        };
        let mut force_us = Vec::new();
        let mut skipped = 0;
        for force in self.forces.values() {
            if !force.window().contains(self.time) {
                skipped += 1;
                continue;
            }
            let rows = force.selection().resolve(body_count);
            if rows.is_empty() {
                skipped += 1;
                continue;
            }
            let bodies = Bodies::new(&self.store, &self.schema, rows);
            let t0 = Instant::now();
            force.apply(&bodies, &ctx)?;
            force_us.push((force.name().to_string(), t0.elapsed().as_micros() as u64));
        }

        all.scale_add_rows(s.inverse_mass, s.linear_force_accumulator, s.acceleration)?;
        all.scale_add_rows(s.inverse_inertia, s.torque_accumulator, s.angular_acceleration)?;

        all.axpy(dt, s.acceleration, s.velocity)?;
        all.axpy(dt, s.angular_acceleration, s.angular_velocity)?;
        all.axpy(dt, s.velocity, s.position)?;
        all.axpy(dt, s.angular_velocity, s.orientation)?;

        all.fill(s.linear_force_accumulator, 0.0)?;
        all.fill(s.torque_accumulator, 0.0)?;

        self.time += dt;
        self.step_count += 1;

        let (capacity, memory_bytes) = self
            .store
            .with(|store| (store.capacity(), store.memory_bytes()))?;
        trace!(
            "step {}: t={} dt={dt} bodies={body_count} active_forces={} skipped={skipped}",
            self.step_count,
            self.time,
            force_us.len(),
        );
        self.last_metrics = StepMetrics {
            total_us: start.elapsed().as_micros() as u64,
            active_forces: force_us.len(),
            force_us,
            skipped_forces: skipped,
            body_count,
            capacity,
            memory_bytes,
            dt,
        };
        Ok(&self.last_metrics)
    }

    /// Advance by exactly `duration`: `floor(duration / timestep)` full
    /// steps, then one shorter step for the remainder if it is positive.
    ///
    /// A remainder within rounding error of zero (at most
    /// `duration * f64::EPSILON`) is dropped rather than stepped.
    pub fn run_for(&mut self, duration: f64, timestep: f64) -> Result<RunSummary, StepError> {
        check_timestep(timestep)?;
        if !duration.is_finite() || duration < 0.0 {
            return Err(StepError::InvalidDuration { value: duration });
        }
        let full_steps = (duration / timestep).floor() as u64;
        for _ in 0..full_steps {
            self.update(timestep)?;
        }
        let mut remainder = duration - full_steps as f64 * timestep;
        if remainder <= duration * f64::EPSILON {
            remainder = 0.0;
        }
        let remainder_applied = remainder > 0.0;
        if remainder_applied {
            self.update(remainder)?;
        }
        Ok(RunSummary {
            full_steps,
            remainder,
            remainder_applied,
        })
    }

    /// [`run_for`](Self::run_for) with the configured default timestep.
    pub fn run_for_default(&mut self, duration: f64) -> Result<RunSummary, StepError> {
        self.run_for(duration, self.config.default_timestep)
    }

    /// World time; 0 at creation, advanced by every step.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of completed steps.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Metrics of the most recent step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    /// The shared body store, for columns beyond the body schema.
    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// Resolved body column IDs.
    pub fn schema(&self) -> &BodySchema {
        &self.schema
    }

    /// The world's configuration.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("bodies", &self.body_count())
            .field("forces", &self.forces.len())
            .field("time", &self.time)
            .field("step_count", &self.step_count)
            .finish()
    }
}
