//! Procedural stylised trees: a cylinder trunk under stacked, tapering cones.

use std::any::Any;

use glam::{Vec2, Vec3};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::behavior::{Behavior, BehaviorContext};
use crate::scene::{
    LocalTransform, Material, Mesh, NodeContent, SceneGraph, SceneNodeId, ShadowFlags, Shape,
};

use super::scatter::{Annulus, ExclusionZone, PassReport, ScatterPass, TargetCount};

pub const TRUNK_MATERIAL: Material = Material::new(0x4b2e05, 0.8, 0.1);
pub const LEAVES_MATERIAL: Material = Material::new(0x0b3d02, 0.95, 0.0);

/// Radial segments of every leaf cone.
const LEAF_SEGMENTS: u32 = 8;
/// Size factor applied per leaf layer (layer i is scaled by `LAYER_SHRINK^i`).
const LAYER_SHRINK: f32 = 0.8;
/// Fraction of a layer's height the next layer is raised by.
const LAYER_STEP: f32 = 0.8;
/// Gap between the trunk top and the first layer's center.
const FIRST_LAYER_GAP: f32 = 0.3;

/// Keep-out area around the tent.
pub const TENT_EXCLUSION: ExclusionZone = ExclusionZone::new(Vec2::new(0.0, -6.0), 10.0);

/// The four density passes populating the camp surroundings.
pub const CAMP_TREE_PASSES: [ScatterPass; 4] = [
    ScatterPass {
        name: "near ring",
        count: TargetCount::between(30, 20),
        annulus: Annulus::new(5.5, 9.5),
        exclusion: Some(TENT_EXCLUSION),
    },
    ScatterPass {
        name: "mid scatter",
        count: TargetCount::between(15, 15),
        annulus: Annulus::new(6.0, 10.0),
        exclusion: Some(TENT_EXCLUSION),
    },
    ScatterPass {
        name: "outer ring",
        count: TargetCount::between(40, 20),
        annulus: Annulus::new(10.0, 22.0),
        exclusion: Some(TENT_EXCLUSION),
    },
    ScatterPass {
        name: "broad fill",
        count: TargetCount::exactly(200),
        annulus: Annulus::new(8.0, 26.0),
        exclusion: Some(TENT_EXCLUSION),
    },
];

/// One cone of foliage. `y` is the cone's center height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeafLayer {
    pub radius: f32,
    pub height: f32,
    pub y: f32,
}

/// Randomised tree dimensions, in the tree's local space before scaling.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeShape {
    pub trunk_height: f32,
    pub trunk_radius: f32,
    pub layers: Vec<LeafLayer>,
    pub yaw_degrees: f32,
    pub scale: f32,
}

impl TreeShape {
    /// Roll a new tree.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let trunk_height = rng.gen_range(0.8..1.4);
        let trunk_radius = rng.gen_range(0.12..0.2);
        let layer_count = rng.gen_range(2..=5);

        let mut layers = Vec::with_capacity(layer_count);
        let mut y = trunk_height + FIRST_LAYER_GAP;
        for i in 0..layer_count {
            let shrink = LAYER_SHRINK.powi(i as i32);
            let radius = rng.gen_range(0.6..1.0) * shrink;
            let height = rng.gen_range(1.0..1.5) * shrink;
            layers.push(LeafLayer { radius, height, y });
            y += height * LAYER_STEP;
        }

        Self {
            trunk_height,
            trunk_radius,
            layers,
            yaw_degrees: rng.gen_range(0.0..360.0),
            scale: rng.gen_range(0.8..1.2),
        }
    }

    /// Unscaled height of the tip of the top cone.
    pub fn top(&self) -> f32 {
        self.layers
            .last()
            .map(|l| l.y + l.height * 0.5)
            .unwrap_or(self.trunk_height)
    }

    /// Build the tree as a group under `parent`, standing at `(x, z)`.
    pub fn spawn(&self, scene: &mut SceneGraph, parent: SceneNodeId, at: Vec2) -> SceneNodeId {
        let group = scene.spawn(
            parent,
            "tree",
            NodeContent::Group,
            LocalTransform::from_position(Vec3::new(at.x, 0.0, at.y))
                .with_yaw_degrees(self.yaw_degrees)
                .with_scale(self.scale),
        );

        scene.spawn(
            group,
            "trunk",
            NodeContent::Mesh(Mesh {
                shape: Shape::Cylinder {
                    radius: self.trunk_radius,
                    height: self.trunk_height,
                },
                material: TRUNK_MATERIAL,
                shadow: ShadowFlags::BOTH,
            }),
            LocalTransform::from_position(Vec3::new(0.0, self.trunk_height / 2.0, 0.0)),
        );

        for layer in &self.layers {
            scene.spawn(
                group,
                "leaves",
                NodeContent::Mesh(Mesh {
                    shape: Shape::Cone {
                        radius_bottom: layer.radius,
                        height: layer.height,
                        segments_radial: LEAF_SEGMENTS,
                    },
                    material: LEAVES_MATERIAL,
                    shadow: ShadowFlags::BOTH,
                }),
                LocalTransform::from_position(Vec3::new(0.0, layer.y, 0.0)),
            );
        }

        group
    }
}

/// Populates its entity with trees on attach.
pub struct TreeScatterer {
    passes: Vec<ScatterPass>,
    rng: StdRng,
    reports: Vec<PassReport>,
    trees: Vec<SceneNodeId>,
}

impl TreeScatterer {
    /// Camp passes; `seed` makes the forest reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_passes(CAMP_TREE_PASSES.to_vec(), rng)
    }

    pub fn with_passes(passes: Vec<ScatterPass>, rng: StdRng) -> Self {
        Self {
            passes,
            rng,
            reports: Vec::new(),
            trees: Vec::new(),
        }
    }

    /// Run every pass, spawning trees under `parent`.
    pub fn populate(&mut self, scene: &mut SceneGraph, parent: SceneNodeId) -> &[PassReport] {
        for pass in &self.passes {
            let trees = &mut self.trees;
            let report = pass.run(&mut self.rng, |rng, at| {
                let shape = TreeShape::random(rng);
                trees.push(shape.spawn(scene, parent, at));
            });
            self.reports.push(report);
        }

        log::info!(
            "Scattered {} trees over {} passes",
            self.trees.len(),
            self.passes.len()
        );
        &self.reports
    }

    pub fn reports(&self) -> &[PassReport] {
        &self.reports
    }

    /// Tree group nodes, in placement order.
    pub fn trees(&self) -> &[SceneNodeId] {
        &self.trees
    }
}

impl Behavior for TreeScatterer {
    fn name(&self) -> &'static str {
        "tree-scatterer"
    }

    fn on_attach(&mut self, ctx: &mut BehaviorContext<'_>) {
        let entity = ctx.entity();
        self.populate(ctx.scene_mut(), entity);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
