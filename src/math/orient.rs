//! Orientation helpers: yaw towards a point, look-at rotations

use crate::core::types::{Mat3, Quat, Vec3};

/// Yaw in degrees that turns an object at `from` towards `to`.
///
/// Computed from the normalized direction as `atan2(dir.x, dir.z)`, so a
/// target straight down +Z gives 0° and one down +X gives 90°. Returns 0
/// when the two points coincide.
pub fn yaw_towards(from: Vec3, to: Vec3) -> f32 {
    let dir = (to - from).normalize_or_zero();
    dir.x.atan2(dir.z).to_degrees()
}

/// World rotation whose local +Z axis points along `direction`, keeping
/// local +Y as close to `up` as possible.
///
/// Returns `None` when `direction` is zero or parallel to `up`.
pub fn facing_rotation(direction: Vec3, up: Vec3) -> Option<Quat> {
    let z = direction.try_normalize()?;
    let x = up.cross(z).try_normalize()?;
    let y = z.cross(x);
    Some(Quat::from_mat3(&Mat3::from_cols(x, y, z)))
}
