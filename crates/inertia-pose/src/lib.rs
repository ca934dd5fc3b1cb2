//! Planar pose algebra on 3x3 homogeneous matrices.
//!
//! A [`Pose`] combines a rotation and a translation in the plane:
//!
//! ```text
//! | r00 r01 tx |
//! | r10 r11 ty |
//! |  0   0   1 |
//! ```
//!
//! Poses compose by matrix product, left to right: `chain(&[a, b])` maps a
//! point first through `b`, then through `a`. Everything here is a pure
//! function; poses are computed on demand and never stored.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod homogeneous;

pub use homogeneous::{
    dehomogenize, homogeneous, transform_point, transform_points, transform_vector,
    transform_vectors,
};

use nalgebra as na;

/// 3x3 homogeneous planar transform.
pub type Pose = na::Matrix3<f64>;
/// 2D vector alias.
pub type Vec2 = na::Vector2<f64>;
/// 2x2 rotation (or general linear) block of a pose.
pub type Mat2 = na::Matrix2<f64>;
/// Homogeneous 2D coordinate.
pub type Vec3 = na::Vector3<f64>;

/// The identity pose.
#[inline]
pub fn identity() -> Pose {
    Pose::identity()
}

/// Counter-clockwise rotation by `angle` radians about the origin.
#[inline]
pub fn rotate(angle: f64) -> Pose {
    let (s, c) = angle.sin_cos();
    Pose::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
}

/// Translation by `offset`.
#[inline]
pub fn translate(offset: Vec2) -> Pose {
    Pose::new(1.0, 0.0, offset.x, 0.0, 1.0, offset.y, 0.0, 0.0, 1.0)
}

/// Left-to-right product of `poses`. The empty chain is the identity.
pub fn chain<'a>(poses: impl IntoIterator<Item = &'a Pose>) -> Pose {
    poses.into_iter().fold(identity(), |acc, p| acc * p)
}

/// Split a pose into its linear block and translation.
#[inline]
pub fn decompose(pose: &Pose) -> (Mat2, Vec2) {
    let linear = pose.fixed_view::<2, 2>(0, 0).into_owned();
    let translation = pose.fixed_view::<2, 1>(0, 2).into_owned();
    (linear, translation)
}

/// Pose of a body at `position` with heading `orientation`:
/// `translate(position) · rotate(orientation)`.
#[inline]
pub fn compose(position: Vec2, orientation: f64) -> Pose {
    let (s, c) = orientation.sin_cos();
    Pose::new(c, -s, position.x, s, c, position.y, 0.0, 0.0, 1.0)
}

/// Heading of a pose's rotation block, in `(-π, π]`.
#[inline]
pub fn orientation(pose: &Pose) -> f64 {
    pose[(1, 0)].atan2(pose[(0, 0)])
}

/// Inverse of a rigid pose: `[Rᵀ | -Rᵀt]`.
///
/// Only valid when the linear block is a rotation. Use [`invert`] for
/// general affine poses.
pub fn invert_rigid(pose: &Pose) -> Pose {
    let (r, t) = decompose(pose);
    let rt = r.transpose();
    let it = -(rt * t);
    Pose::new(
        rt[(0, 0)],
        rt[(0, 1)],
        it.x,
        rt[(1, 0)],
        rt[(1, 1)],
        it.y,
        0.0,
        0.0,
        1.0,
    )
}

/// General matrix inverse, `None` when the pose is singular.
pub fn invert(pose: &Pose) -> Option<Pose> {
    pose.try_inverse()
}

/// 2D scalar cross product `a.x * b.y - a.y * b.x`.
#[inline]
pub fn cross(a: &Vec2, b: &Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}
