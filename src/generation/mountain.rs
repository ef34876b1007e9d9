//! Mountain boundary: a closed ring of rock walls plus irregular outer slabs.

use std::any::Any;
use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::behavior::{Behavior, BehaviorContext};
use crate::math::point_on_circle;
use crate::scene::{
    LocalTransform, Material, Mesh, NodeContent, SceneGraph, SceneNodeId, ShadowFlags, Shape,
};

use super::scatter::{Annulus, PassReport, ScatterPass, TargetCount};

pub const MOUNTAIN_MATERIAL: Material = Material::new(0x4a4a4a, 0.95, 0.05);

/// Radius of the closed wall ring.
pub const RING_RADIUS: f32 = 28.0;
/// Number of straight segments in the ring.
pub const RING_WALLS: usize = 60;
const RING_THICKNESS: f32 = 1.5;

/// Short slabs scattered just inside the ring. No exclusion: the band is far
/// from anything placed by hand.
pub const OUTER_BAND: ScatterPass = ScatterPass {
    name: "outer band",
    count: TargetCount::exactly(20),
    annulus: Annulus::new(26.0, 28.0),
    exclusion: None,
};
const BAND_THICKNESS: f32 = 1.2;

/// A straight wall between two perimeter points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSegment {
    /// `(x, z)`
    pub start: Vec2,
    /// `(x, z)`
    pub end: Vec2,
}

impl WallSegment {
    pub fn center(&self) -> Vec2 {
        (self.start + self.end) * 0.5
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Yaw in degrees aligning the wall's width with the segment.
    pub fn yaw_degrees(&self) -> f32 {
        let d = self.end - self.start;
        d.y.atan2(d.x).to_degrees()
    }
}

/// `count` evenly spaced segments around a circle. Segment `i` ends where
/// segment `i + 1` starts and the last one closes back onto the first.
pub fn wall_loop(radius: f32, count: usize) -> Vec<WallSegment> {
    (0..count)
        .map(|i| {
            let a1 = i as f32 / count as f32 * TAU;
            let a2 = (i + 1) as f32 / count as f32 * TAU;
            WallSegment {
                start: point_on_circle(a1, radius),
                end: point_on_circle(a2, radius),
            }
        })
        .collect()
}

fn spawn_wall(
    scene: &mut SceneGraph,
    parent: SceneNodeId,
    center: Vec2,
    size: Vec3,
    yaw_degrees: f32,
) -> SceneNodeId {
    scene.spawn(
        parent,
        "wall",
        NodeContent::Mesh(Mesh {
            shape: Shape::Box {
                width: size.x,
                height: size.y,
                depth: size.z,
            },
            material: MOUNTAIN_MATERIAL,
            shadow: ShadowFlags::BOTH,
        }),
        LocalTransform::from_position(Vec3::new(center.x, size.y / 2.0, center.y))
            .with_yaw_degrees(yaw_degrees),
    )
}

/// Builds the mountain boundary under its entity on attach.
pub struct MountainBoundary {
    rng: StdRng,
    ring: Vec<SceneNodeId>,
    band: Vec<SceneNodeId>,
    band_report: Option<PassReport>,
}

impl MountainBoundary {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            ring: Vec::new(),
            band: Vec::new(),
            band_report: None,
        }
    }

    /// Spawn the ring and the outer band under `parent`.
    pub fn build(&mut self, scene: &mut SceneGraph, parent: SceneNodeId) {
        for segment in wall_loop(RING_RADIUS, RING_WALLS) {
            let height = self.rng.gen_range(15.0..20.0);
            let size = Vec3::new(segment.length(), height, RING_THICKNESS);
            self.ring
                .push(spawn_wall(scene, parent, segment.center(), size, segment.yaw_degrees()));
        }

        let band = &mut self.band;
        let report = OUTER_BAND.run(&mut self.rng, |rng, at| {
            let size = Vec3::new(
                rng.gen_range(2.0..4.0),
                rng.gen_range(12.0..16.0),
                BAND_THICKNESS,
            );
            let yaw = rng.gen_range(0.0..360.0);
            band.push(spawn_wall(scene, parent, at, size, yaw));
        });
        self.band_report = Some(report);

        log::info!(
            "Mountain boundary: {} ring walls, {} outer slabs",
            self.ring.len(),
            self.band.len()
        );
    }

    pub fn ring_walls(&self) -> &[SceneNodeId] {
        &self.ring
    }

    pub fn band_walls(&self) -> &[SceneNodeId] {
        &self.band
    }

    pub fn band_report(&self) -> Option<PassReport> {
        self.band_report
    }
}

impl Behavior for MountainBoundary {
    fn name(&self) -> &'static str {
        "mountain-boundary"
    }

    fn on_attach(&mut self, ctx: &mut BehaviorContext<'_>) {
        let entity = ctx.entity();
        self.build(ctx.scene_mut(), entity);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
