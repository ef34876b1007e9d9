//! Scene graph: hierarchy of entities behaviors attach to.
//!
//! Nodes are addressed by `SceneNodeId`. Every attribute accessor tolerates a
//! missing node: reads return `None`/`false`, writes are ignored. World-space
//! queries walk the parent chain on demand.

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3};

use crate::math::facing_rotation;

use super::node::{LightParams, LocalTransform, MovementControls, NodeContent, SceneNode, SceneNodeId};

/// Scene graph that organizes entities into a hierarchy.
pub struct SceneGraph {
    nodes: HashMap<SceneNodeId, SceneNode>,
    root: SceneNodeId,
    next_id: u64,
}

impl SceneGraph {
    /// Create a new scene graph with a root Group node.
    pub fn new() -> Self {
        let root_id = SceneNodeId(0);
        let root_node = SceneNode::new(root_id, "scene", NodeContent::Group);

        let mut nodes = HashMap::new();
        nodes.insert(root_id, root_node);

        Self {
            nodes,
            root: root_id,
            next_id: 1,
        }
    }

    /// Get the root node ID.
    pub fn root(&self) -> SceneNodeId {
        self.root
    }

    /// Allocate a fresh node ID.
    fn alloc_id(&mut self) -> SceneNodeId {
        let id = SceneNodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a child node under `parent`. Returns the new node's ID.
    pub fn add_child(
        &mut self,
        parent: SceneNodeId,
        name: impl Into<String>,
        content: NodeContent,
    ) -> SceneNodeId {
        let id = self.alloc_id();
        let mut node = SceneNode::new(id, name, content);
        node.parent = Some(parent);

        self.nodes.insert(id, node);

        // Register as child of parent
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }

        id
    }

    /// Add a child node with an initial transform.
    pub fn spawn(
        &mut self,
        parent: SceneNodeId,
        name: impl Into<String>,
        content: NodeContent,
        transform: LocalTransform,
    ) -> SceneNodeId {
        let id = self.add_child(parent, name, content);
        self.set_transform(id, transform);
        id
    }

    /// Remove a node and its entire subtree. Cannot remove the root.
    ///
    /// Returns the removed IDs (the node first, then its descendants).
    pub fn remove(&mut self, id: SceneNodeId) -> Vec<SceneNodeId> {
        if id == self.root || !self.nodes.contains_key(&id) {
            return Vec::new();
        }

        // Collect subtree IDs (BFS)
        let mut to_remove = vec![id];
        let mut i = 0;
        while i < to_remove.len() {
            let current = to_remove[i];
            if let Some(node) = self.nodes.get(&current) {
                to_remove.extend_from_slice(&node.children);
            }
            i += 1;
        }

        // Detach from parent
        if let Some(parent_id) = self.nodes.get(&id).and_then(|n| n.parent) {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.children.retain(|c| *c != id);
            }
        }

        for nid in &to_remove {
            self.nodes.remove(nid);
        }

        to_remove
    }

    /// Whether the node exists.
    pub fn contains(&self, id: SceneNodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Get an immutable reference to a node.
    pub fn get(&self, id: SceneNodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Get a mutable reference to a node.
    pub fn get_mut(&mut self, id: SceneNodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    /// Iterate over the children of a node.
    pub fn children(&self, id: SceneNodeId) -> impl Iterator<Item = SceneNodeId> + '_ {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    /// Total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // --- identity tags ---

    pub fn set_tag(&mut self, id: SceneNodeId, tag: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.tag = Some(tag.into());
        }
    }

    pub fn tag(&self, id: SceneNodeId) -> Option<&str> {
        self.nodes.get(&id).and_then(|n| n.tag.as_deref())
    }

    /// Find a node by identity tag. Intended for one-time resolution at
    /// assembly; behaviors hold IDs, not tags.
    pub fn find_by_tag(&self, tag: &str) -> Option<SceneNodeId> {
        self.nodes
            .values()
            .find(|n| n.tag.as_deref() == Some(tag))
            .map(|n| n.id)
    }

    // --- transform ---

    /// Set the local transform of a node.
    pub fn set_transform(&mut self, id: SceneNodeId, transform: LocalTransform) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.local_transform = transform;
        }
    }

    pub fn transform(&self, id: SceneNodeId) -> Option<&LocalTransform> {
        self.nodes.get(&id).map(|n| &n.local_transform)
    }

    /// Local position of a node.
    pub fn position(&self, id: SceneNodeId) -> Option<Vec3> {
        self.nodes.get(&id).map(|n| n.local_transform.position)
    }

    pub fn set_position(&mut self, id: SceneNodeId, position: Vec3) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.local_transform.position = position;
        }
    }

    pub fn rotation(&self, id: SceneNodeId) -> Option<Quat> {
        self.nodes.get(&id).map(|n| n.local_transform.rotation)
    }

    pub fn set_rotation(&mut self, id: SceneNodeId, rotation: Quat) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.local_transform.rotation = rotation;
        }
    }

    /// World transform, composed from the root down.
    pub fn world_matrix(&self, id: SceneNodeId) -> Option<Mat4> {
        let mut node = self.nodes.get(&id)?;
        let mut world = node.local_transform.to_mat4();
        while let Some(parent_id) = node.parent {
            node = match self.nodes.get(&parent_id) {
                Some(n) => n,
                None => break,
            };
            world = node.local_transform.to_mat4() * world;
        }
        Some(world)
    }

    /// World-space position of a node.
    pub fn world_position(&self, id: SceneNodeId) -> Option<Vec3> {
        self.world_matrix(id).map(|m| m.w_axis.truncate())
    }

    /// Rotate a node so its local +Z axis points at `target` (world space),
    /// with world +Y as up.
    ///
    /// Returns false when the node is missing or the direction is degenerate;
    /// the rotation is left unchanged in that case.
    pub fn look_at(&mut self, id: SceneNodeId, target: Vec3) -> bool {
        let Some(position) = self.world_position(id) else {
            return false;
        };
        let Some(world_rotation) = facing_rotation(target - position, Vec3::Y) else {
            return false;
        };

        let parent_rotation = self
            .nodes
            .get(&id)
            .and_then(|n| n.parent)
            .and_then(|p| self.world_matrix(p))
            .map(|m| m.to_scale_rotation_translation().1)
            .unwrap_or(Quat::IDENTITY);

        self.set_rotation(id, parent_rotation.inverse() * world_rotation);
        true
    }

    // --- visibility ---

    /// Set the visibility of a node.
    pub fn set_visible(&mut self, id: SceneNodeId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.visible = visible;
        }
    }

    /// Visibility flag of a node (false if the node does not exist).
    pub fn is_visible(&self, id: SceneNodeId) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.visible)
    }

    // --- lifecycle ---

    /// Mark the node's renderable object as created by the host.
    pub fn mark_loaded(&mut self, id: SceneNodeId) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.loaded = true;
        }
    }

    pub fn is_loaded(&self, id: SceneNodeId) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.loaded)
    }

    // --- lights ---

    pub fn light(&self, id: SceneNodeId) -> Option<&LightParams> {
        self.nodes.get(&id).and_then(|n| n.light())
    }

    pub fn light_mut(&mut self, id: SceneNodeId) -> Option<&mut LightParams> {
        self.nodes.get_mut(&id).and_then(|n| n.light_mut())
    }

    // --- movement controls ---

    pub fn controls(&self, id: SceneNodeId) -> Option<MovementControls> {
        self.nodes.get(&id).and_then(|n| n.controls)
    }

    /// Install (`Some`) or strip (`None`) free-movement input on a node.
    pub fn set_controls(&mut self, id: SceneNodeId, controls: Option<MovementControls>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.controls = controls;
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::node::LightKind;

    #[test]
    fn test_new_graph_has_root() {
        let graph = SceneGraph::new();
        assert_eq!(graph.node_count(), 1);
        let root = graph.get(graph.root()).unwrap();
        assert_eq!(root.name, "scene");
        assert!(matches!(root.content, NodeContent::Group));
    }

    #[test]
    fn test_add_and_remove_subtree() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let a = graph.add_child(root, "a", NodeContent::Group);
        let b = graph.add_child(a, "b", NodeContent::Group);
        let c = graph.add_child(b, "c", NodeContent::Group);
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.children(root).collect::<Vec<_>>(), vec![a]);

        let removed = graph.remove(a);
        assert_eq!(removed, vec![a, b, c]);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.children(root).count(), 0);
    }

    #[test]
    fn test_cannot_remove_root() {
        let mut graph = SceneGraph::new();
        assert!(graph.remove(graph.root()).is_empty());
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_missing_node_accessors_are_silent() {
        let mut graph = SceneGraph::new();
        let ghost = SceneNodeId(999);
        graph.set_position(ghost, Vec3::ONE);
        graph.set_visible(ghost, true);
        graph.set_controls(ghost, Some(MovementControls::default()));
        assert!(graph.position(ghost).is_none());
        assert!(!graph.is_visible(ghost));
        assert!(!graph.is_loaded(ghost));
        assert!(graph.world_position(ghost).is_none());
        assert!(!graph.look_at(ghost, Vec3::ONE));
    }

    #[test]
    fn test_world_position_composes_parents() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let parent = graph.spawn(
            root,
            "parent",
            NodeContent::Group,
            LocalTransform::from_position(Vec3::new(10.0, 0.0, 0.0))
                .with_yaw_degrees(90.0)
                .with_scale(2.0),
        );
        let child = graph.spawn(
            parent,
            "child",
            NodeContent::Group,
            LocalTransform::from_position(Vec3::new(0.0, 1.0, 1.0)),
        );
        // Child offset (0,1,1) scaled x2, then yawed 90° (+Z -> +X), then moved.
        let world = graph.world_position(child).unwrap();
        assert!((world - Vec3::new(12.0, 2.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_look_at_faces_target() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let popup = graph.spawn(
            root,
            "popup",
            NodeContent::Popup { text: "hi".into() },
            LocalTransform::from_position(Vec3::new(0.0, 1.5, 0.0)),
        );
        let target = Vec3::new(3.0, 1.5, 4.0);
        assert!(graph.look_at(popup, target));
        let forward = graph.rotation(popup).unwrap() * Vec3::Z;
        assert!((forward - Vec3::new(0.6, 0.0, 0.8)).length() < 1e-5);
    }

    #[test]
    fn test_look_at_compensates_parent_rotation() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let parent = graph.spawn(
            root,
            "parent",
            NodeContent::Group,
            LocalTransform::identity().with_yaw_degrees(45.0),
        );
        let child = graph.add_child(parent, "child", NodeContent::Group);
        let target = Vec3::new(0.0, 0.0, -5.0);
        assert!(graph.look_at(child, target));

        let world_rotation = graph.world_matrix(child).unwrap().to_scale_rotation_translation().1;
        assert!((world_rotation * Vec3::Z - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_look_at_degenerate_keeps_rotation() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let node = graph.spawn(
            root,
            "n",
            NodeContent::Group,
            LocalTransform::identity().with_yaw_degrees(30.0),
        );
        let before = graph.rotation(node).unwrap();
        assert!(!graph.look_at(node, Vec3::ZERO));
        assert!(!graph.look_at(node, Vec3::new(0.0, 10.0, 0.0)));
        assert_eq!(graph.rotation(node).unwrap(), before);
    }

    #[test]
    fn test_find_by_tag() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let light = graph.add_child(
            root,
            "light",
            NodeContent::Light(LightParams::point(1.0, 0xFFAA33, 8.0)),
        );
        graph.set_tag(light, "fireLight1");
        assert_eq!(graph.find_by_tag("fireLight1"), Some(light));
        assert_eq!(graph.tag(light), Some("fireLight1"));
        assert!(graph.find_by_tag("nope").is_none());
        assert_eq!(graph.light(light).map(|l| l.kind), Some(LightKind::Point));
    }

    #[test]
    fn test_controls_and_loaded() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let rig = graph.add_child(root, "rig", NodeContent::Group);
        assert!(graph.controls(rig).is_none());
        graph.set_controls(rig, Some(MovementControls { acceleration: 15.0 }));
        assert_eq!(graph.controls(rig).map(|c| c.acceleration), Some(15.0));
        graph.set_controls(rig, None);
        assert!(graph.controls(rig).is_none());

        assert!(!graph.is_loaded(rig));
        graph.mark_loaded(rig);
        assert!(graph.is_loaded(rig));
    }
}
