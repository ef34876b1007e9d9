//! Floating popups that turn to face the camera.
//!
//! Hidden popups are left alone.

use std::any::Any;

use crate::behavior::{Behavior, BehaviorContext};
use crate::scene::SceneNodeId;

/// Keeps a visible popup turned towards the viewer.
pub struct BillboardPopup {
    viewer: Option<SceneNodeId>,
}

impl BillboardPopup {
    pub fn new(viewer: Option<SceneNodeId>) -> Self {
        Self { viewer }
    }
}

impl Behavior for BillboardPopup {
    fn name(&self) -> &'static str {
        "billboard-popup"
    }

    fn on_frame(&mut self, ctx: &mut BehaviorContext<'_>, _dt: f32) {
        let entity = ctx.entity();
        if !ctx.scene().is_visible(entity) {
            return;
        }
        if let Some(target) = self.viewer.and_then(|v| ctx.scene().world_position(v)) {
            ctx.scene_mut().look_at(entity, target);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
