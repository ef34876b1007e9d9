//! Edge-triggered proximity detection between two entities

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::behavior::{Behavior, BehaviorContext, Signal};
use crate::scene::SceneNodeId;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    /// Threshold distance; at or below it the target counts as near.
    pub distance: f32,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self { distance: 2.0 }
    }
}

/// Emits `proximityenter` / `proximityleave` on its own entity when the
/// target crosses the threshold. Nothing is emitted while the classification
/// stays the same.
pub struct ProximitySensor {
    config: ProximityConfig,
    target: Option<SceneNodeId>,
    is_near: bool,
}

impl ProximitySensor {
    pub fn new(config: ProximityConfig, target: Option<SceneNodeId>) -> Self {
        Self {
            config,
            target,
            is_near: false,
        }
    }

    pub fn is_near(&self) -> bool {
        self.is_near
    }

    pub fn target(&self) -> Option<SceneNodeId> {
        self.target
    }
}

impl Behavior for ProximitySensor {
    fn name(&self) -> &'static str {
        "proximity-sensor"
    }

    fn on_frame(&mut self, ctx: &mut BehaviorContext<'_>, _dt: f32) {
        let Some(target) = self.target else {
            return;
        };
        let scene = ctx.scene();
        let (Some(here), Some(there)) = (scene.world_position(ctx.entity()), scene.world_position(target)) else {
            return;
        };

        let near = here.distance(there) <= self.config.distance;
        if near != self.is_near {
            self.is_near = near;
            let signal = if near { Signal::ProximityEnter } else { Signal::ProximityLeave };
            log::debug!("Entity {:?}: {}", ctx.entity(), signal);
            ctx.emit(signal);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{BehaviorRuntime, SignalRecorder};
    use crate::core::input::InputState;
    use crate::scene::{LocalTransform, NodeContent, SceneGraph};
    use glam::Vec3;

    struct Fixture {
        scene: SceneGraph,
        runtime: BehaviorRuntime,
        target: SceneNodeId,
        recorder: crate::behavior::SlotId,
    }

    impl Fixture {
        fn new(with_target: bool) -> Self {
            let mut scene = SceneGraph::new();
            let root = scene.root();
            let seat = scene.spawn(root, "seat", NodeContent::Group, LocalTransform::from_position(Vec3::new(0.0, 0.0, 3.0)));
            let target = scene.spawn(root, "rig", NodeContent::Group, LocalTransform::from_position(Vec3::new(0.0, 0.0, 10.0)));
            let mut runtime = BehaviorRuntime::new();
            let sensor_target = with_target.then_some(target);
            runtime.attach(&mut scene, seat, Box::new(ProximitySensor::new(ProximityConfig::default(), sensor_target)));
            let recorder = runtime.attach(&mut scene, seat, Box::new(SignalRecorder::new()));
            Self { scene, runtime, target, recorder }
        }

        fn step_to(&mut self, z: f32) {
            self.scene.set_position(self.target, Vec3::new(0.0, 0.0, z));
            self.runtime.tick(&mut self.scene, &InputState::new(), 0.016);
        }

        fn recorded(&self) -> &[Signal] {
            self.runtime.get::<SignalRecorder>(self.recorder).unwrap().signals()
        }
    }

    #[test]
    fn test_single_enter_and_leave() {
        let mut f = Fixture::new(true);
        f.step_to(10.0);
        f.step_to(6.0);
        assert!(f.recorded().is_empty());

        // Cross in and linger
        f.step_to(4.5);
        f.step_to(3.5);
        f.step_to(2.0);
        assert_eq!(f.recorded(), &[Signal::ProximityEnter]);

        // Cross out and linger
        f.step_to(6.0);
        f.step_to(9.0);
        assert_eq!(f.recorded(), &[Signal::ProximityEnter, Signal::ProximityLeave]);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut f = Fixture::new(true);
        f.step_to(5.0);
        assert_eq!(f.recorded(), &[Signal::ProximityEnter]);
    }

    #[test]
    fn test_uses_full_3d_distance() {
        let mut f = Fixture::new(true);
        f.scene.set_position(f.target, Vec3::new(0.0, 5.0, 3.0));
        f.runtime.tick(&mut f.scene, &InputState::new(), 0.016);
        assert!(f.recorded().is_empty());
    }

    #[test]
    fn test_no_target_skips_check() {
        let mut f = Fixture::new(false);
        f.step_to(3.0);
        f.step_to(20.0);
        assert!(f.recorded().is_empty());
    }

    #[test]
    fn test_removed_target_skips_check() {
        let mut f = Fixture::new(true);
        f.step_to(3.0);
        let target = f.target;
        f.scene.remove(target);
        f.runtime.tick(&mut f.scene, &InputState::new(), 0.016);
        assert_eq!(f.recorded(), &[Signal::ProximityEnter]);
    }
}
