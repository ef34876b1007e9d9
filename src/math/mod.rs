//! Mathematical utilities for ground-plane placement and orientation

pub mod planar;
pub mod orient;

pub use planar::{planar_distance, planar_length, point_on_circle};
pub use orient::{facing_rotation, yaw_towards};
