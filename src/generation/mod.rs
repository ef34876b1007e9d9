//! Procedural scene population
//!
//! Everything here is rejection sampling on the ground plane:
//! - `scatter`: generic passes (annulus + target count + retry budget + exclusion zone)
//! - `tree`: stylised trees and the camp forest passes around the tent
//! - `mountain`: the closed wall ring and the irregular outer band

pub mod scatter;
pub mod tree;
pub mod mountain;

pub use scatter::{
    Annulus, ExclusionZone, PassReport, PlacementRequest, ScatterPass, TargetCount, RETRY_FACTOR,
};
pub use tree::{TreeScatterer, TreeShape, CAMP_TREE_PASSES, TENT_EXCLUSION};
pub use mountain::{wall_loop, MountainBoundary, WallSegment};
