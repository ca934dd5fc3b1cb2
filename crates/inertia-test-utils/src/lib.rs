//! Test utilities for Inertia development.
//!
//! Tolerance assertions for floats, vectors and poses, closed-form
//! kinematics to compare integrators against, and proptest strategies.
//! Field fixtures live in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use inertia_pose::{compose, Pose, Vec2};
use proptest::prelude::*;

/// Assert `|a - b| <= tol`, reporting both values on failure.
#[track_caller]
pub fn assert_close(a: f64, b: f64, tol: f64) {
    assert!(
        (a - b).abs() <= tol,
        "expected {a} ≈ {b} (tolerance {tol}, off by {})",
        (a - b).abs()
    );
}

/// Assert two vectors agree component-wise within `tol`.
#[track_caller]
pub fn assert_vec2_close(a: &Vec2, b: &Vec2, tol: f64) {
    assert!(
        (a - b).amax() <= tol,
        "expected {a:?} ≈ {b:?} (tolerance {tol})"
    );
}

/// Same as [`assert_vec2_close`] for slices, as read from a store row.
#[track_caller]
pub fn assert_slice_close(a: &[f64], b: &[f64], tol: f64) {
    assert_eq!(a.len(), b.len(), "length mismatch: {a:?} vs {b:?}");
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        assert!(
            (x - y).abs() <= tol,
            "element {i}: expected {x} ≈ {y} (tolerance {tol}) in {a:?} vs {b:?}"
        );
    }
}

/// Assert two poses agree element-wise within `tol`.
#[track_caller]
pub fn assert_pose_close(a: &Pose, b: &Pose, tol: f64) {
    assert!((a - b).amax() <= tol, "expected {a} ≈ {b} (tolerance {tol})");
}

/// Position under constant acceleration: `x0 + v0 t + a t² / 2`.
pub fn kinematic_position(x0: f64, v0: f64, accel: f64, t: f64) -> f64 {
    x0 + v0 * t + 0.5 * accel * t * t
}

/// [`kinematic_position`] per component.
pub fn kinematic_position2(x0: Vec2, v0: Vec2, accel: Vec2, t: f64) -> Vec2 {
    x0 + v0 * t + accel * (0.5 * t * t)
}

/// Finite planar vectors with components in `-bound..bound`.
pub fn arb_vec2(bound: f64) -> impl Strategy<Value = Vec2> {
    (-bound..bound, -bound..bound).prop_map(|(x, y)| Vec2::new(x, y))
}

/// Angles in `-2π..2π`.
pub fn arb_angle() -> impl Strategy<Value = f64> {
    -std::f64::consts::TAU..std::f64::consts::TAU
}

/// Rigid poses with bounded translation.
pub fn arb_rigid_pose() -> impl Strategy<Value = Pose> {
    (arb_vec2(1e3), arb_angle()).prop_map(|(t, theta)| compose(t, theta))
}
