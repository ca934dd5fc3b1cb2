//! Inertia Quickstart: a small scene from scratch.
//!
//! Demonstrates:
//!   1. Creating a world and spawning bodies with `BodyDef`
//!   2. Gravity as an acceleration-mode constant force on every body
//!   3. A windowed, off-centre push that also spins its target
//!   4. A user-defined force (a linear drag)
//!   5. Stepping with `run_for` and reading state back through `Body`
//!
//! Run with:
//!   cargo run -p inertia-physics --example quickstart

use inertia_physics::{
    Bodies, BodyDef, ConstantForce, Force, ForceContext, ForceMode, Selection, World,
};
use inertia_pose::{transform_point, Vec2};
use inertia_soa::StoreError;

// ─── Scene parameters ───────────────────────────────────────────

const GRAVITY: f64 = -9.81;
const DRAG: f64 = 0.4;
const TIMESTEP: f64 = 0.01;

// ─── Force: linear drag ─────────────────────────────────────────
//
// Opposes velocity in proportion to speed. Reads the body state the
// world hands it and only writes accelerations.

struct Drag {
    selection: Selection,
    coefficient: f64,
}

impl Force for Drag {
    fn name(&self) -> &str {
        "drag"
    }

    fn selection(&self) -> &Selection {
        &self.selection
    }

    fn apply(&self, bodies: &Bodies<'_>, _ctx: &ForceContext) -> Result<(), StoreError> {
        bodies.for_each_mut(|b| {
            b.acceleration -= b.velocity * (self.coefficient * b.inverse_mass);
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ─── World and bodies ───────────────────────────────────────
    let mut world = World::new(2)?;

    let ball = world.new_body(BodyDef::new().mass(1.0).position(Vec2::new(0.0, 10.0)))?;
    let crate_ = world.new_body(
        BodyDef::new()
            .mass(5.0)
            .inertia(2.0)
            .position(Vec2::new(4.0, 10.0)),
    )?;

    // ─── Forces ─────────────────────────────────────────────────
    let gravity = ConstantForce::builder(Vec2::new(0.0, GRAVITY))
        .name("gravity")
        .mode(ForceMode::Acceleration)
        .build(&world)?;
    world.add_force(gravity);

    // Half a second of sideways push applied one unit above the crate's
    // starting centre.
    let push = ConstantForce::builder(Vec2::new(20.0, 0.0))
        .name("push")
        .bodies(&crate_)
        .at_point(Vec2::new(4.0, 11.0))
        .window(0.0, 0.5)
        .build(&world)?;
    world.add_force(push);

    world.add_force(Drag {
        selection: Selection::All,
        coefficient: DRAG,
    });

    // ─── Run ────────────────────────────────────────────────────
    for second in 1..=3 {
        let summary = world.run_for(1.0, TIMESTEP)?;
        let metrics = world.last_metrics();
        println!(
            "t = {:.2}s ({} steps, {} forces active, last step {}us)",
            world.time(),
            summary.steps(),
            metrics.active_forces,
            metrics.total_us,
        );
        for (label, body) in [("ball", &ball), ("crate", &crate_)] {
            let p = body.position();
            let v = body.velocity();
            println!(
                "  [{second}] {label:<5} position ({:>7.3}, {:>7.3})  velocity ({:>7.3}, {:>7.3})  θ {:>6.3}",
                p.x,
                p.y,
                v.x,
                v.y,
                body.orientation(),
            );
        }
    }

    // The push window has closed; drop it from the world.
    let pruned = world.prune_expired_forces();
    println!("pruned {pruned} expired force(s), {} remain", world.force_count());

    // A corner of the crate in world coordinates.
    let corner = transform_point(&crate_.pose(), &Vec2::new(0.5, 0.5));
    println!("crate corner at ({:.3}, {:.3})", corner.x, corner.y);

    Ok(())
}
