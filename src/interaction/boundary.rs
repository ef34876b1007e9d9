//! Radial movement boundary: reverts any frame that ends outside the circle.

use std::any::Any;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::behavior::{Behavior, BehaviorContext};
use crate::math::planar_length;
use crate::scene::{SceneGraph, SceneNodeId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    /// Largest allowed ground-plane distance from the origin.
    pub max_radius: f32,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self { max_radius: 25.0 }
    }
}

/// Hard clamp on an entity's planar distance from the origin.
///
/// No push-back: a position past the limit is replaced by the last position
/// that was inside it.
pub struct BoundaryClamp {
    config: BoundaryConfig,
    last_valid: Option<Vec3>,
    reverts: u32,
}

impl BoundaryClamp {
    pub fn new(config: BoundaryConfig) -> Self {
        Self {
            config,
            last_valid: None,
            reverts: 0,
        }
    }

    pub fn last_valid(&self) -> Option<Vec3> {
        self.last_valid
    }

    /// Number of frames that were reverted.
    pub fn reverts(&self) -> u32 {
        self.reverts
    }

    /// Check the entity's current position. Returns true if it was reverted.
    pub fn enforce(&mut self, scene: &mut SceneGraph, entity: SceneNodeId) -> bool {
        let Some(position) = scene.position(entity) else {
            return false;
        };

        if planar_length(position) > self.config.max_radius {
            if let Some(last) = self.last_valid {
                scene.set_position(entity, last);
                self.reverts += 1;
                log::trace!("Boundary revert {:?} -> {:?}", position, last);
                return true;
            }
            false
        } else {
            self.last_valid = Some(position);
            false
        }
    }
}

impl Behavior for BoundaryClamp {
    fn name(&self) -> &'static str {
        "boundary-clamp"
    }

    fn on_attach(&mut self, ctx: &mut BehaviorContext<'_>) {
        self.last_valid = ctx.scene().position(ctx.entity());
    }

    fn on_frame(&mut self, ctx: &mut BehaviorContext<'_>, _dt: f32) {
        let entity = ctx.entity();
        self.enforce(ctx.scene_mut(), entity);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
