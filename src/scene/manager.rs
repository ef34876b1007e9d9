//! Campsite assembly: builds the scene graph and wires every behavior to its
//! entity with explicit references.

use glam::{Quat, Vec3};

use crate::behavior::{BehaviorRuntime, SlotId};
use crate::core::input::InputState;
use crate::generation::{MountainBoundary, TreeScatterer};
use crate::interaction::{
    BillboardPopup, BoundaryClamp, ProximitySensor, SeatInteraction, SeatLinks, SeatOccupancy,
};
use crate::lighting::FlickerLight;

use super::config::SceneConfig;
use super::graph::SceneGraph;
use super::node::{
    LightParams, LocalTransform, Material, Mesh, MovementControls, NodeContent, SceneNodeId,
    ShadowFlags, Shape,
};

/// Rig start: on the far side of the fire from the tent, out of seat range.
pub const RIG_START: Vec3 = Vec3::new(0.0, 0.0, 8.0);
/// Camera height on the rig.
pub const EYE_HEIGHT: f32 = 1.6;
pub const TENT_POSITION: Vec3 = Vec3::new(0.0, 0.0, -6.0);

const LOG_MATERIAL: Material = Material::new(0x5a3a1a, 0.9, 0.0);
const TENT_MATERIAL: Material = Material::new(0x2f5d3a, 0.85, 0.0);

/// Log seats around the fire.
const SEAT_POSITIONS: [Vec3; 3] = [
    Vec3::new(0.0, 0.2, 3.0),
    Vec3::new(3.0, 0.2, 0.5),
    Vec3::new(-3.0, 0.2, 0.5),
];

struct FireLight {
    tag: &'static str,
    position: Vec3,
    intensity: f32,
    color: u32,
    distance: f32,
}

const FIRE_LIGHTS: [FireLight; 5] = [
    FireLight { tag: "fireLight1", position: Vec3::new(0.0, 0.5, 0.0), intensity: 2.0, color: 0xff6600, distance: 10.0 },
    FireLight { tag: "fireLight2", position: Vec3::new(0.3, 0.7, 0.2), intensity: 1.5, color: 0xff8800, distance: 8.0 },
    FireLight { tag: "fireLight3", position: Vec3::new(-0.2, 0.4, -0.3), intensity: 1.2, color: 0xffaa33, distance: 6.0 },
    FireLight { tag: "fireGlow", position: Vec3::new(0.0, 0.2, 0.0), intensity: 0.8, color: 0xff4400, distance: 4.0 },
    FireLight { tag: "groundReflection", position: Vec3::new(0.0, 0.05, 0.0), intensity: 0.6, color: 0xff5500, distance: 4.0 },
];

/// One log seat and the entities wired to it.
#[derive(Clone, Copy, Debug)]
pub struct CampSeat {
    pub entity: SceneNodeId,
    pub slot: SlotId,
    pub sit_prompt: SceneNodeId,
    pub stand_prompt: SceneNodeId,
}

/// The assembled campsite: scene, runtime and handles to the parts a host
/// drives directly.
pub struct CampScene {
    config: SceneConfig,
    scene: SceneGraph,
    runtime: BehaviorRuntime,
    rig: SceneNodeId,
    camera: SceneNodeId,
    lights: Vec<SceneNodeId>,
    forest: SceneNodeId,
    forest_slot: SlotId,
    mountains: SceneNodeId,
    mountain_slot: SlotId,
    boundary_slot: SlotId,
    seats: Vec<CampSeat>,
    occupancy: SeatOccupancy,
}

impl CampScene {
    /// Build the whole campsite. Trees and mountains are generated during
    /// this call.
    pub fn new(config: SceneConfig) -> Self {
        let mut scene = SceneGraph::new();
        let mut runtime = BehaviorRuntime::new();
        let root = scene.root();

        let ambient = scene.add_child(root, "ambient", NodeContent::Light(LightParams::ambient(0.15, 0x1a1a3a)));
        scene.set_tag(ambient, "ambientLight");

        let mut lights = Vec::with_capacity(FIRE_LIGHTS.len());
        for fire in &FIRE_LIGHTS {
            let light = scene.spawn(
                root,
                fire.tag,
                NodeContent::Light(LightParams::point(fire.intensity, fire.color, fire.distance)),
                LocalTransform::from_position(fire.position),
            );
            scene.set_tag(light, fire.tag);
            runtime.attach(&mut scene, light, Box::new(FlickerLight::new(config.flicker.clone())));
            lights.push(light);
        }

        let forest = scene.add_child(root, "forest", NodeContent::Group);
        let forest_slot = runtime.attach(&mut scene, forest, Box::new(TreeScatterer::new(config.seed)));

        let mountains = scene.add_child(root, "mountains", NodeContent::Group);
        let mountain_seed = config.seed.map(|s| s.wrapping_add(1));
        let mountain_slot = runtime.attach(&mut scene, mountains, Box::new(MountainBoundary::new(mountain_seed)));

        scene.spawn(
            root,
            "tent",
            NodeContent::Mesh(Mesh {
                shape: Shape::Cone {
                    radius_bottom: 1.8,
                    height: 2.2,
                    segments_radial: 4,
                },
                material: TENT_MATERIAL,
                shadow: ShadowFlags::BOTH,
            }),
            LocalTransform::from_position(TENT_POSITION + Vec3::Y * 1.1).with_yaw_degrees(45.0),
        );

        let rig = scene.spawn(root, "rig", NodeContent::Group, LocalTransform::from_position(RIG_START));
        scene.set_tag(rig, "rig");
        scene.set_controls(rig, Some(MovementControls::default()));
        let camera = scene.spawn(
            rig,
            "camera",
            NodeContent::Group,
            LocalTransform::from_position(Vec3::Y * EYE_HEIGHT),
        );
        scene.set_tag(camera, "camera");
        let boundary_slot = runtime.attach(&mut scene, rig, Box::new(BoundaryClamp::new(config.boundary.clone())));

        let occupancy = SeatOccupancy::new();
        let mut seats = Vec::with_capacity(SEAT_POSITIONS.len());
        for position in SEAT_POSITIONS {
            let seat = Self::spawn_seat(&mut scene, &mut runtime, &config, &occupancy, position, rig, camera);
            seats.push(seat);
        }

        log::info!(
            "Campsite assembled: {} nodes, {} behaviors, {} seats",
            scene.node_count(),
            runtime.behavior_count(),
            seats.len()
        );

        Self {
            config,
            scene,
            runtime,
            rig,
            camera,
            lights,
            forest,
            forest_slot,
            mountains,
            mountain_slot,
            boundary_slot,
            seats,
            occupancy,
        }
    }

    fn spawn_seat(
        scene: &mut SceneGraph,
        runtime: &mut BehaviorRuntime,
        config: &SceneConfig,
        occupancy: &SeatOccupancy,
        position: Vec3,
        rig: SceneNodeId,
        camera: SceneNodeId,
    ) -> CampSeat {
        let root = scene.root();
        // Lay the log on its side, long axis tangent to the fire circle
        let tangent_yaw = position.x.atan2(position.z) + std::f32::consts::FRAC_PI_2;
        let rotation = Quat::from_rotation_y(tangent_yaw) * Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let entity = scene.spawn(
            root,
            "log",
            NodeContent::Mesh(Mesh {
                shape: Shape::Cylinder { radius: 0.2, height: 1.6 },
                material: LOG_MATERIAL,
                shadow: ShadowFlags::BOTH,
            }),
            LocalTransform {
                position,
                rotation,
                scale: 1.0,
            },
        );

        let mut prompt = |name: &str, text: &str| {
            let id = scene.add_child(root, name, NodeContent::Popup { text: text.to_string() });
            scene.set_visible(id, false);
            runtime.attach(scene, id, Box::new(BillboardPopup::new(Some(camera))));
            id
        };
        let sit_prompt = prompt("sit prompt", "Press E to sit");
        let stand_prompt = prompt("stand prompt", "Press E to stand");

        runtime.attach(
            scene,
            entity,
            Box::new(ProximitySensor::new(config.proximity.clone(), Some(rig))),
        );
        let links = SeatLinks {
            rig: Some(rig),
            viewer: Some(camera),
            sit_prompt: Some(sit_prompt),
            stand_prompt: Some(stand_prompt),
        };
        let slot = runtime.attach(
            scene,
            entity,
            Box::new(SeatInteraction::new(links).with_occupancy(occupancy.clone())),
        );

        CampSeat {
            entity,
            slot,
            sit_prompt,
            stand_prompt,
        }
    }

    /// The host finished creating renderables: flag every light as loaded.
    pub fn finish_loading(&mut self) {
        for light in &self.lights {
            self.runtime.notify_loaded(&mut self.scene, *light);
        }
    }

    pub fn tick(&mut self, input: &InputState, dt: f32) {
        self.runtime.tick(&mut self.scene, input, dt);
    }

    /// Free-movement step for the rig. Ignored while movement is stripped.
    /// The boundary check runs on the next frame.
    pub fn walk(&mut self, delta: Vec3) -> bool {
        if self.scene.controls(self.rig).is_none() {
            return false;
        }
        let Some(position) = self.scene.position(self.rig) else {
            return false;
        };
        self.scene.set_position(self.rig, position + delta);
        true
    }

    /// Remove an entity with its subtree, detaching every behavior on it.
    pub fn remove_entity(&mut self, entity: SceneNodeId) {
        self.runtime.remove_entity(&mut self.scene, entity);
        self.seats.retain(|s| self.scene.contains(s.entity));
        self.lights.retain(|l| self.scene.contains(*l));
    }

    /// Try to sit on seat `index`.
    pub fn sit(&mut self, index: usize) -> bool {
        let Some(seat) = self.seats.get(index).copied() else {
            return false;
        };
        self.runtime
            .with_behavior::<SeatInteraction, _>(&mut self.scene, seat.slot, |s, ctx| s.sit(ctx))
            .unwrap_or(false)
    }

    /// Try to stand up from seat `index`.
    pub fn stand(&mut self, index: usize) -> bool {
        let Some(seat) = self.seats.get(index).copied() else {
            return false;
        };
        self.runtime
            .with_behavior::<SeatInteraction, _>(&mut self.scene, seat.slot, |s, ctx| s.stand(ctx))
            .unwrap_or(false)
    }

    /// Index of the seat currently holding the rig.
    pub fn seated_at(&self) -> Option<usize> {
        let occupant = self.occupancy.occupant()?;
        self.seats.iter().position(|s| s.entity == occupant)
    }

    pub fn seat(&self, index: usize) -> Option<&SeatInteraction> {
        let seat = self.seats.get(index)?;
        self.runtime.get::<SeatInteraction>(seat.slot)
    }

    pub fn tree_scatterer(&self) -> Option<&TreeScatterer> {
        self.runtime.get::<TreeScatterer>(self.forest_slot)
    }

    pub fn mountain_boundary(&self) -> Option<&MountainBoundary> {
        self.runtime.get::<MountainBoundary>(self.mountain_slot)
    }

    pub fn boundary(&self) -> Option<&BoundaryClamp> {
        self.runtime.get::<BoundaryClamp>(self.boundary_slot)
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    pub fn runtime(&self) -> &BehaviorRuntime {
        &self.runtime
    }

    pub fn rig(&self) -> SceneNodeId {
        self.rig
    }

    pub fn camera(&self) -> SceneNodeId {
        self.camera
    }

    pub fn lights(&self) -> &[SceneNodeId] {
        &self.lights
    }

    pub fn forest(&self) -> SceneNodeId {
        self.forest
    }

    pub fn mountains(&self) -> SceneNodeId {
        self.mountains
    }

    pub fn seats(&self) -> &[CampSeat] {
        &self.seats
    }
}
