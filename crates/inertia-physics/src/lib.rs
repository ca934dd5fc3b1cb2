//! Rigid bodies, forces and the integrator for Inertia.
//!
//! Bodies are rows of a columnar store ([`inertia_soa`]); a [`Body`] is a
//! live view over one row through the column IDs of a [`BodySchema`].
//! Forces implement [`Force`] and are applied by the [`World`] each step,
//! in insertion order, before a semi-implicit Euler update.
//!
//! ```
//! use inertia_physics::{BodyDef, ConstantForce, World};
//! use inertia_pose::Vec2;
//!
//! let mut world = World::new(8).unwrap();
//! let body = world.new_body(BodyDef::new().mass(2.0)).unwrap();
//! let push = ConstantForce::builder(Vec2::new(4.0, 0.0))
//!     .bodies(&body)
//!     .window(0.0, 1.0)
//!     .build(&world)
//!     .unwrap();
//! world.add_force(push);
//! world.run_for(2.0, 0.01).unwrap();
//! assert!(body.velocity().x > 1.9);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod body;
pub mod config;
pub mod force;
pub mod metrics;
pub mod schema;
pub mod selection;
pub mod world;

pub use body::{Body, BodyDef, Frame, Frames};
pub use config::WorldConfig;
pub use force::{
    apply_force, apply_torque, is_active, ConstantForce, ConstantForceBuilder, ConstantTorque,
    ConstantTorqueBuilder, Force, ForceContext, ForceError, ForceMode, TimeWindow,
};
pub use metrics::{RunSummary, StepMetrics};
pub use schema::{body_fields, BodySchema};
pub use selection::{Bodies, BodyState, Selection};
pub use world::{StepError, World};
