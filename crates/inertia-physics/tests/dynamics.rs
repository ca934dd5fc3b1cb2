//! Integration tests: integrator behaviour against closed-form motion.

use inertia_core::RowId;
use inertia_physics::{BodyDef, ConstantForce, ForceMode, Frames, World};
use inertia_pose::{compose, Vec2};
use inertia_test_utils::{assert_close, assert_pose_close, assert_vec2_close, kinematic_position};

#[test]
fn zero_net_force_keeps_velocity() {
    let mut world = World::new(2).unwrap();
    let resting = world.new_body(BodyDef::new()).unwrap();
    let moving = world
        .new_body(
            BodyDef::new()
                .velocity(Vec2::new(1.0, -2.0))
                .angular_velocity(0.5),
        )
        .unwrap();

    world.run_for(1.0, 0.01).unwrap();

    assert_eq!(resting.position(), Vec2::zeros());
    assert_eq!(resting.velocity(), Vec2::zeros());
    assert_eq!(resting.orientation(), 0.0);
    assert_eq!(moving.velocity(), Vec2::new(1.0, -2.0));
    assert_eq!(moving.angular_velocity(), 0.5);
    assert_vec2_close(&moving.position(), &Vec2::new(1.0, -2.0), 1e-9);
    assert_close(moving.orientation(), 0.5, 1e-9);
}

fn displacement_after(duration: f64, dt: f64) -> f64 {
    let mut world = World::new(1).unwrap();
    let body = world.new_body(BodyDef::new().mass(2.0)).unwrap();
    let push = ConstantForce::builder(Vec2::new(3.0, 0.0))
        .bodies(&body)
        .window(0.0, 10.0)
        .build(&world)
        .unwrap();
    world.add_force(push);
    world.run_for(duration, dt).unwrap();
    body.position().x
}

#[test]
fn constant_force_matches_kinematics() {
    let t = 0.5;
    let exact = kinematic_position(0.0, 0.0, 1.5, t);
    let fine = displacement_after(t, 0.001);
    let coarse = displacement_after(t, 0.1);
    assert_close(fine, exact, 1e-3);
    let fine_err = (fine - exact).abs();
    let coarse_err = (coarse - exact).abs();
    assert!(
        fine_err * 10.0 < coarse_err,
        "dt=0.001 error {fine_err} not much smaller than dt=0.1 error {coarse_err}"
    );
}

#[test]
fn run_for_covers_exact_duration() {
    let mut world = World::new(1).unwrap();
    world.new_body(BodyDef::new()).unwrap();
    let summary = world.run_for(1.0, 0.3).unwrap();
    assert_eq!(summary.full_steps, 3);
    assert!(summary.remainder_applied);
    assert_close(summary.remainder, 0.1, 1e-12);
    assert_close(world.time(), 1.0, 1e-12);
    assert_eq!(world.step_count(), 4);
    assert_close(world.last_metrics().dt, 0.1, 1e-12);
}

#[test]
fn exact_multiple_skips_remainder() {
    let mut world = World::new(1).unwrap();
    let summary = world.run_for(1.0, 0.25).unwrap();
    assert_eq!(summary.full_steps, 4);
    assert!(!summary.remainder_applied);
    assert_eq!(world.time(), 1.0);
}

#[test]
fn run_for_default_uses_configured_timestep() {
    let mut world = World::new(1).unwrap();
    let summary = world.run_for_default(0.01).unwrap();
    assert!(summary.steps() >= 10);
    assert_close(world.time(), 0.01, 1e-12);
}

#[test]
fn views_of_one_body_alias() {
    let mut world = World::new(1).unwrap();
    let a = world.new_body(BodyDef::new()).unwrap();
    let b = world.body(a.row()).unwrap();
    a.set_position(Vec2::new(3.0, 4.0));
    assert_eq!(b.position(), Vec2::new(3.0, 4.0));
    b.set_orientation(1.25);
    assert_eq!(a.orientation(), 1.25);
}

#[test]
fn bodies_survive_store_growth() {
    let mut world = World::new(0).unwrap();
    let first: Vec<_> = (0..3)
        .map(|i| {
            world
                .new_body(BodyDef::new().position(Vec2::new(i as f64, 7.0)).mass(3.0))
                .unwrap()
        })
        .collect();
    assert_eq!(world.capacity(), 6);
    for _ in 0..10 {
        world.new_body(BodyDef::new()).unwrap();
    }
    assert_eq!(world.capacity(), 14);
    for (i, body) in first.iter().enumerate() {
        assert_eq!(body.position(), Vec2::new(i as f64, 7.0));
        assert_close(body.mass(), 3.0, 1e-12);
    }

    // A raw row taken past the world API still gets the declared fill.
    let row = world.store().take().unwrap();
    let raw = world.body(row).unwrap();
    assert_eq!(raw.inverse_mass(), 1.0);
    assert_eq!(raw.inverse_inertia(), 1.0);
    assert_eq!(raw.position(), Vec2::zeros());
}

#[test]
fn one_shot_force_lasts_one_step() {
    let mut world = World::new(1).unwrap();
    let body = world.new_body(BodyDef::new().mass(2.0)).unwrap();
    body.add_force(Vec2::new(4.0, 0.0), None, Frames::WORLD);
    assert_eq!(body.linear_force_accumulator(), Vec2::new(4.0, 0.0));

    world.update(0.5).unwrap();
    assert_eq!(body.acceleration(), Vec2::new(2.0, 0.0));
    assert_eq!(body.velocity(), Vec2::new(1.0, 0.0));
    assert_eq!(body.linear_force_accumulator(), Vec2::zeros());

    world.update(0.5).unwrap();
    assert_eq!(body.acceleration(), Vec2::zeros());
    assert_eq!(body.velocity(), Vec2::new(1.0, 0.0));
}

#[test]
fn body_frame_force_is_rotated_by_pose() {
    let mut world = World::new(1).unwrap();
    let body = world
        .new_body(
            BodyDef::new()
                .position(Vec2::new(5.0, 5.0))
                .orientation(std::f64::consts::FRAC_PI_2),
        )
        .unwrap();
    // Body +y is world -x; body point (1, 0) is one unit above the center.
    body.add_force(Vec2::new(0.0, 1.0), Some(Vec2::new(1.0, 0.0)), Frames::BODY);
    assert_vec2_close(&body.linear_force_accumulator(), &Vec2::new(-1.0, 0.0), 1e-12);
    assert_close(body.torque_accumulator(), 1.0, 1e-12);

    world.update(1.0).unwrap();
    assert_close(body.angular_velocity(), 1.0, 1e-12);
    assert_eq!(body.torque_accumulator(), 0.0);
}

#[test]
fn pose_follows_position_and_orientation() {
    let mut world = World::new(1).unwrap();
    let body = world
        .new_body(BodyDef::new().position(Vec2::new(2.0, 0.0)).orientation(0.3))
        .unwrap();
    let pose = body.pose();
    assert_close(pose[(0, 2)], 2.0, 1e-12);
    assert_close(inertia_pose::orientation(&pose), 0.3, 1e-12);
    assert_pose_close(&pose, &compose(Vec2::new(2.0, 0.0), 0.3), 1e-12);

    body.set_angular_velocity(1.0);
    world.update(0.2).unwrap();
    assert_pose_close(&body.pose(), &compose(Vec2::new(2.0, 0.0), 0.5), 1e-12);
}

#[test]
fn immovable_body_ignores_forces() {
    let mut world = World::new(1).unwrap();
    let wall = world.new_body(BodyDef::immovable()).unwrap();
    assert!(!wall.is_movable());
    assert_eq!(wall.mass(), f64::INFINITY);
    assert_eq!(wall.inertia(), f64::INFINITY);
    let shove = ConstantForce::builder(Vec2::new(100.0, 0.0))
        .at_point(Vec2::new(0.0, 1.0))
        .build(&world)
        .unwrap();
    world.add_force(shove);
    wall.add_force(Vec2::new(5.0, 5.0), Some(Vec2::new(1.0, 0.0)), Frames::WORLD);
    world.run_for(1.0, 0.1).unwrap();
    assert_eq!(wall.position(), Vec2::zeros());
    assert_eq!(wall.orientation(), 0.0);
}

#[test]
fn acceleration_mode_moves_immovable_bodies() {
    let mut world = World::new(1).unwrap();
    let wall = world.new_body(BodyDef::immovable()).unwrap();
    let gravity = ConstantForce::builder(Vec2::new(0.0, -9.81))
        .mode(ForceMode::Acceleration)
        .build(&world)
        .unwrap();
    world.add_force(gravity);
    world.update(1.0).unwrap();
    assert!(!wall.is_movable());
    assert_eq!(wall.acceleration(), Vec2::new(0.0, -9.81));
    assert_eq!(wall.position(), Vec2::new(0.0, -9.81));
}

#[test]
fn zero_mass_maps_to_immovable() {
    let mut world = World::new(1).unwrap();
    let body = world.new_body(BodyDef::new().mass(0.0)).unwrap();
    assert_eq!(body.inverse_mass(), 0.0);
    body.set_mass(f64::INFINITY);
    assert_eq!(body.inverse_mass(), 0.0);
    body.set_mass(4.0);
    assert_eq!(body.inverse_mass(), 0.25);
    assert!(world.body(RowId(0)).unwrap().is_movable());
}
