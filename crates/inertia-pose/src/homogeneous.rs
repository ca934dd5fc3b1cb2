//! Homogeneous coordinates and point/vector transforms.
//!
//! Points carry a homogeneous coordinate of 1 and are affected by
//! translation; vectors carry 0 and are not. Results are mapped back to
//! the plane by dividing by the last coordinate, where an exactly-zero
//! denominator is treated as 1.

use crate::{Pose, Vec2, Vec3};

/// Lift `v` to homogeneous coordinates with last coordinate `w`.
#[inline]
pub fn homogeneous(v: &Vec2, w: f64) -> Vec3 {
    Vec3::new(v.x, v.y, w)
}

/// Project a homogeneous coordinate back to the plane.
#[inline]
pub fn dehomogenize(h: &Vec3) -> Vec2 {
    let s = if h.z != 0.0 { 1.0 / h.z } else { 1.0 };
    Vec2::new(h.x * s, h.y * s)
}

/// Map a point through `pose`.
#[inline]
pub fn transform_point(pose: &Pose, p: &Vec2) -> Vec2 {
    dehomogenize(&(pose * homogeneous(p, 1.0)))
}

/// Map a direction through `pose`, ignoring its translation.
#[inline]
pub fn transform_vector(pose: &Pose, v: &Vec2) -> Vec2 {
    dehomogenize(&(pose * homogeneous(v, 0.0)))
}

/// [`transform_point`] over a batch.
pub fn transform_points(pose: &Pose, points: &[Vec2]) -> Vec<Vec2> {
    points.iter().map(|p| transform_point(pose, p)).collect()
}

/// [`transform_vector`] over a batch.
pub fn transform_vectors(pose: &Pose, vectors: &[Vec2]) -> Vec<Vec2> {
    vectors.iter().map(|v| transform_vector(pose, v)).collect()
}
