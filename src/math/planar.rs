//! Ground-plane (XZ) helpers
//!
//! The scene's ground is the XZ plane; Y is up. These helpers ignore Y.

use crate::core::types::{Vec2, Vec3};

/// Length of a vector projected onto the ground plane.
pub fn planar_length(v: Vec3) -> f32 {
    (v.x * v.x + v.z * v.z).sqrt()
}

/// Distance between two points projected onto the ground plane.
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    planar_length(a - b)
}

/// Point at `angle` radians on a circle of `radius` around the origin.
///
/// The returned `Vec2` holds `(x, z)`.
pub fn point_on_circle(angle: f32, radius: f32) -> Vec2 {
    Vec2::new(angle.cos() * radius, angle.sin() * radius)
}
