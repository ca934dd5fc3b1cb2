//! Benchmark profiles and utilities for the Inertia rigid-body framework.
//!
//! Provides pre-built worlds for benchmarking and examples:
//!
//! - [`reference_scene`]: 1K bodies under gravity with a push and a spin
//! - [`stress_scene`]: 100K bodies, same forces
//! - [`grid_positions`]: deterministic body placement

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::error::Error;

use inertia_physics::{BodyDef, ConstantForce, ConstantTorque, ForceMode, World};
use inertia_pose::Vec2;

/// Reference step length for the profiles.
pub const REFERENCE_DT: f64 = 0.001;

/// Build a world of `bodies` bodies laid out on a grid, with three forces:
///
/// - gravity on every body (acceleration mode)
/// - a push on the first half, windowed to the first second
/// - a torque on every fourth body
pub fn scene(bodies: usize) -> Result<World, Box<dyn Error>> {
    let mut world = World::new(bodies)?;
    for (i, position) in grid_positions(bodies, 2.0).into_iter().enumerate() {
        let mass = 1.0 + (i % 7) as f64;
        world.new_body(
            BodyDef::new()
                .mass(mass)
                .inertia(mass * 0.5)
                .position(position),
        )?;
    }

    let gravity = ConstantForce::builder(Vec2::new(0.0, -9.81))
        .name("gravity")
        .mode(ForceMode::Acceleration)
        .build(&world)?;
    world.add_force(gravity);

    let half = u32::try_from(bodies / 2)?;
    let push = ConstantForce::builder(Vec2::new(5.0, 0.0))
        .name("push")
        .bodies(0..half)
        .window(0.0, 1.0)
        .build(&world)?;
    world.add_force(push);

    let every_fourth = world
        .bodies()
        .filter(|b| b.row().index() % 4 == 0)
        .map(|b| b.row())
        .collect::<Vec<_>>();
    let spin = ConstantTorque::builder(0.5)
        .name("spin")
        .bodies(every_fourth)
        .build(&world)?;
    world.add_force(spin);

    Ok(world)
}

/// Build the reference benchmark scene: 1K bodies.
pub fn reference_scene() -> Result<World, Box<dyn Error>> {
    scene(1_000)
}

/// Build the stress benchmark scene: 100K bodies.
///
/// Same forces as [`reference_scene`] at 100x the body count.
pub fn stress_scene() -> Result<World, Box<dyn Error>> {
    scene(100_000)
}

/// Lay out `n` points row by row on a square grid with the given spacing.
pub fn grid_positions(n: usize, spacing: f64) -> Vec<Vec2> {
    let side = (n as f64).sqrt().ceil().max(1.0) as usize;
    (0..n)
        .map(|i| Vec2::new((i % side) as f64 * spacing, (i / side) as f64 * spacing))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_has_requested_bodies_and_forces() {
        let world = scene(10).unwrap();
        assert_eq!(world.body_count(), 10);
        assert_eq!(world.force_count(), 3);
        let names: Vec<_> = world.forces().map(|(_, f)| f.name().to_string()).collect();
        assert_eq!(names, ["gravity", "push", "spin"]);
    }

    #[test]
    fn reference_scene_steps() {
        let mut world = reference_scene().unwrap();
        let metrics = world.update(REFERENCE_DT).unwrap();
        assert_eq!(metrics.body_count, 1_000);
        assert_eq!(metrics.active_forces, 3);
    }

    #[test]
    fn grid_positions_are_unique() {
        let positions = grid_positions(10, 1.0);
        assert_eq!(positions.len(), 10);
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(positions[5], Vec2::new(1.0, 1.0));
    }

    #[test]
    fn grid_positions_deterministic() {
        assert_eq!(grid_positions(50, 0.5), grid_positions(50, 0.5));
        assert!(grid_positions(0, 1.0).is_empty());
    }
}
