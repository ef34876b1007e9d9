//! Scene graph node types
//!
//! Core types for the scene graph: node IDs, transforms, content variants, and nodes.
//! A node carries the attributes behaviors read and write: transform, visibility,
//! light parameters, movement controls and its identity tag.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Unique identifier for a scene graph node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SceneNodeId(pub u64);

/// Local transform relative to the parent node.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }
}

impl LocalTransform {
    /// Identity transform (no translation, rotation, or scaling).
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a translation-only transform.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder: rotate around +Y by `degrees`.
    pub fn with_yaw_degrees(mut self, degrees: f32) -> Self {
        self.rotation = Quat::from_rotation_y(degrees.to_radians());
        self
    }

    /// Builder: uniform scale.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Convert to a 4x4 matrix.
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.rotation,
            self.position,
        )
    }
}

/// Surface material for generated meshes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// sRGB color, 0xRRGGBB
    pub color: u32,
    pub roughness: f32,
    pub metalness: f32,
}

impl Material {
    pub const fn new(color: u32, roughness: f32, metalness: f32) -> Self {
        Self { color, roughness, metalness }
    }
}

/// Whether a mesh casts and/or receives shadows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShadowFlags {
    pub cast: bool,
    pub receive: bool,
}

impl ShadowFlags {
    pub const BOTH: Self = Self { cast: true, receive: true };
}

/// Primitive geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Cylinder { radius: f32, height: f32 },
    Cone { radius_bottom: f32, height: f32, segments_radial: u32 },
    Box { width: f32, height: f32, depth: f32 },
}

/// A renderable primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mesh {
    pub shape: Shape,
    pub material: Material,
    pub shadow: ShadowFlags,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightKind {
    Ambient,
    Directional,
    Point,
    Spot,
}

/// Shadow map parameters of a light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowSettings {
    /// Shadow map resolution (square)
    pub map_size: u32,
    /// Shadow camera near clip plane
    pub near: f32,
    /// Shadow camera far clip plane
    pub far: f32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            map_size: 512,
            near: 0.5,
            far: 500.0,
        }
    }
}

/// Light attribute of a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightParams {
    pub kind: LightKind,
    pub intensity: f32,
    /// sRGB color, 0xRRGGBB
    pub color: u32,
    /// Falloff distance (0 = infinite)
    pub distance: f32,
    pub cast_shadow: bool,
    pub shadow: ShadowSettings,
}

impl LightParams {
    /// Point light with default shadow settings and shadows off.
    pub fn point(intensity: f32, color: u32, distance: f32) -> Self {
        Self {
            kind: LightKind::Point,
            intensity,
            color,
            distance,
            cast_shadow: false,
            shadow: ShadowSettings::default(),
        }
    }

    pub fn ambient(intensity: f32, color: u32) -> Self {
        Self {
            kind: LightKind::Ambient,
            intensity,
            color,
            distance: 0.0,
            cast_shadow: false,
            shadow: ShadowSettings::default(),
        }
    }
}

/// Free-movement input attached to a node (keyboard walking).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementControls {
    pub acceleration: f32,
}

impl Default for MovementControls {
    fn default() -> Self {
        Self { acceleration: 65.0 }
    }
}

/// What a scene node contains.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeContent {
    /// A grouping node with no geometry of its own.
    Group,

    /// A light source.
    Light(LightParams),

    /// A primitive mesh (tree trunk, leaf layer, wall, log).
    Mesh(Mesh),

    /// A text prompt shown to the player.
    Popup { text: String },
}

/// A single node in the scene graph.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub id: SceneNodeId,
    pub name: String,
    /// Per-instance identity tag, used to pick tag-specific behavior.
    pub tag: Option<String>,
    pub parent: Option<SceneNodeId>,
    pub children: Vec<SceneNodeId>,
    pub local_transform: LocalTransform,
    pub visible: bool,
    /// Set by the host once the underlying renderable object exists.
    pub loaded: bool,
    pub controls: Option<MovementControls>,
    pub content: NodeContent,
}

impl SceneNode {
    /// Create a new scene node.
    pub fn new(id: SceneNodeId, name: impl Into<String>, content: NodeContent) -> Self {
        Self {
            id,
            name: name.into(),
            tag: None,
            parent: None,
            children: Vec::new(),
            local_transform: LocalTransform::identity(),
            visible: true,
            loaded: false,
            controls: None,
            content,
        }
    }

    pub fn light(&self) -> Option<&LightParams> {
        match &self.content {
            NodeContent::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn light_mut(&mut self) -> Option<&mut LightParams> {
        match &mut self.content {
            NodeContent::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        match &self.content {
            NodeContent::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }
}
