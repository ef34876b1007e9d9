//! Scene graph, campsite configuration and assembly

pub mod config;
pub mod graph;
pub mod manager;
pub mod node;

pub use config::SceneConfig;
pub use graph::SceneGraph;
pub use manager::{CampScene, CampSeat};
pub use node::{
    LightKind, LightParams, LocalTransform, Material, Mesh, MovementControls, NodeContent,
    SceneNode, SceneNodeId, ShadowFlags, ShadowSettings, Shape,
};
