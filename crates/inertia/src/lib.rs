//! Inertia: minimal 2D rigid-body dynamics on a columnar entity store.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Inertia sub-crates. For most users, adding `inertia` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use inertia::prelude::*;
//!
//! // A spring pulling every body toward the origin.
//! struct Spring(Selection);
//! impl Force for Spring {
//!     fn name(&self) -> &str { "spring" }
//!     fn selection(&self) -> &Selection { &self.0 }
//!     fn apply(&self, bodies: &Bodies<'_>, _ctx: &ForceContext) -> Result<(), StoreError> {
//!         bodies.for_each_mut(|b| b.acceleration -= b.position * b.inverse_mass)
//!     }
//! }
//!
//! let mut world = World::new(4).unwrap();
//! let body = world
//!     .new_body(BodyDef::new().position(Vec2::new(1.0, 0.0)))
//!     .unwrap();
//! world.add_force(Spring(Selection::All));
//!
//! let summary = world.run_for(1.0, 0.01).unwrap();
//! assert_eq!(summary.steps(), 100);
//! assert!(body.position().x < 1.0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `inertia-core` | IDs, field definitions, configuration errors |
//! | [`soa`] | `inertia-soa` | Column store, row views, bulk slice operations |
//! | [`pose`] | `inertia-pose` | Planar homogeneous pose algebra |
//! | [`physics`] | `inertia-physics` | Bodies, forces and the world integrator |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and IDs (`inertia-core`).
///
/// Contains field definitions and shapes, row/field/force IDs, and
/// [`types::ConfigError`].
pub use inertia_core as types;

/// Columnar storage (`inertia-soa`).
///
/// [`soa::ColumnStore`] owns the columns; [`soa::StoreHandle`] shares it
/// and hands out [`soa::View`]s and [`soa::SliceView`]s.
pub use inertia_soa as soa;

/// Pose algebra (`inertia-pose`).
///
/// Compose, decompose and invert [`pose::Pose`] matrices; transform
/// points and vectors.
pub use inertia_pose as pose;

/// Rigid-body dynamics (`inertia-physics`).
///
/// The [`physics::World`] owns the bodies and forces and steps them with
/// semi-implicit Euler.
pub use inertia_physics as physics;

/// Common imports for typical Inertia usage.
///
/// ```rust
/// use inertia::prelude::*;
/// ```
///
/// This imports the most frequently used types: the world, body
/// definitions, the force trait and built-in forces, IDs and the 2D
/// vector type.
pub mod prelude {
    // Core types
    pub use inertia_core::{FieldDef, FieldId, ForceId, RowId};

    // Errors
    pub use inertia_core::ConfigError;
    pub use inertia_physics::{ForceError, StepError};
    pub use inertia_soa::StoreError;

    // Storage
    pub use inertia_soa::{StoreHandle, View};

    // Pose
    pub use inertia_pose::{Pose, Vec2};

    // Physics
    pub use inertia_physics::{
        Bodies, Body, BodyDef, ConstantForce, ConstantTorque, Force, ForceContext, ForceMode,
        Frame, Frames, RunSummary, Selection, StepMetrics, World, WorldConfig,
    };
}
