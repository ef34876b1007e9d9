//! Sit/stand interaction for log seats around the fire.
//!
//! A seat is a two-state machine driven by the `E` key and by the proximity
//! signals of a [`ProximitySensor`](super::ProximitySensor) on the same
//! entity. Sitting takes free movement away from the player rig, parks it on
//! the log facing the fire and swaps the floating prompt. Standing hands
//! movement back and restores the rig's original height.

use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

use glam::{Quat, Vec3};
use winit::keyboard::KeyCode;

use crate::behavior::{Behavior, BehaviorContext, ListenerId, Signal};
use crate::math::{planar_distance, yaw_towards};
use crate::scene::{MovementControls, SceneGraph, SceneNodeId};

/// Planar distance within which the rig may sit.
pub const SIT_DISTANCE: f32 = 2.0;
/// Rig height while seated.
pub const SEATED_RIG_HEIGHT: f32 = 0.7;
/// Rig offset from the seat while seated.
pub const SEAT_OFFSET: Vec3 = Vec3::new(0.0, 0.0, 0.5);
/// Point a seated rig turns to face (the fire).
pub const FOCAL_POINT: Vec3 = Vec3::ZERO;
/// Prompt height above the seat.
pub const PROMPT_LIFT: f32 = 1.5;
/// Movement handed back on stand.
pub const STAND_CONTROLS: MovementControls = MovementControls { acceleration: 15.0 };
pub const TRIGGER_KEY: KeyCode = KeyCode::KeyE;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SeatState {
    #[default]
    Standing,
    Sitting,
}

/// Records which seat, if any, currently holds the rig.
///
/// Clones share the same record, so every seat handed a clone sees the
/// others' claims. The record also remembers the last key press that moved
/// the rig, so one press sits or stands at one seat only.
#[derive(Clone, Debug, Default)]
pub struct SeatOccupancy {
    holder: Rc<Cell<Option<SceneNodeId>>>,
    handled_press: Rc<Cell<Option<u64>>>,
}

impl SeatOccupancy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn occupant(&self) -> Option<SceneNodeId> {
        self.holder.get()
    }

    /// Whether another seat holds the rig.
    pub fn held_by_other(&self, seat: SceneNodeId) -> bool {
        self.holder.get().is_some_and(|holder| holder != seat)
    }

    /// Claim for `seat`. Succeeds when free or already held by `seat`.
    pub fn try_claim(&self, seat: SceneNodeId) -> bool {
        match self.holder.get() {
            None => {
                self.holder.set(Some(seat));
                true
            }
            Some(holder) => holder == seat,
        }
    }

    /// Release the claim if `seat` holds it.
    pub fn release(&self, seat: SceneNodeId) {
        if self.holder.get() == Some(seat) {
            self.holder.set(None);
        }
    }

    /// Whether some seat already acted on key press `press`.
    pub fn press_handled(&self, press: u64) -> bool {
        self.handled_press.get() == Some(press)
    }

    pub fn mark_press_handled(&self, press: u64) {
        self.handled_press.set(Some(press));
    }
}

/// Entities a seat works with. Any of them may be absent; the affected step
/// is skipped.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SeatLinks {
    /// Player rig that is moved onto the seat
    pub rig: Option<SceneNodeId>,
    /// Camera the prompts turn towards
    pub viewer: Option<SceneNodeId>,
    pub sit_prompt: Option<SceneNodeId>,
    pub stand_prompt: Option<SceneNodeId>,
}

pub struct SeatInteraction {
    links: SeatLinks,
    state: SeatState,
    original_rig_height: Option<f32>,
    listener: Option<ListenerId>,
    occupancy: Option<SeatOccupancy>,
}

impl SeatInteraction {
    pub fn new(links: SeatLinks) -> Self {
        Self {
            links,
            state: SeatState::Standing,
            original_rig_height: None,
            listener: None,
            occupancy: None,
        }
    }

    /// Share an occupancy record with other seats.
    pub fn with_occupancy(mut self, occupancy: SeatOccupancy) -> Self {
        self.occupancy = Some(occupancy);
        self
    }

    pub fn state(&self) -> SeatState {
        self.state
    }

    pub fn is_sitting(&self) -> bool {
        self.state == SeatState::Sitting
    }

    /// Rig height captured on the first successful sit.
    pub fn original_rig_height(&self) -> Option<f32> {
        self.original_rig_height
    }

    pub fn links(&self) -> &SeatLinks {
        &self.links
    }

    /// Whether the rig stands within [`SIT_DISTANCE`] of `seat`, ignoring height.
    pub fn is_near(&self, scene: &SceneGraph, seat: SceneNodeId) -> bool {
        let Some(rig) = self.links.rig else {
            return false;
        };
        match (scene.world_position(rig), scene.world_position(seat)) {
            (Some(r), Some(s)) => planar_distance(r, s) <= SIT_DISTANCE,
            _ => false,
        }
    }

    /// Seat the rig. Returns false (and changes nothing) when already
    /// sitting, too far away, or another seat holds the rig.
    pub fn sit(&mut self, ctx: &mut BehaviorContext<'_>) -> bool {
        let seat = ctx.entity();
        if self.is_sitting() || !self.is_near(ctx.scene(), seat) {
            return false;
        }
        let Some(rig) = self.links.rig else {
            return false;
        };
        let (Some(rig_position), Some(seat_position)) =
            (ctx.scene().position(rig), ctx.scene().world_position(seat))
        else {
            return false;
        };
        if let Some(occupancy) = &self.occupancy {
            if !occupancy.try_claim(seat) {
                log::debug!("Seat {:?} refused: rig is seated at {:?}", seat, occupancy.occupant());
                return false;
            }
        }

        if self.original_rig_height.is_none() {
            self.original_rig_height = Some(rig_position.y);
        }

        let scene = ctx.scene_mut();
        scene.set_controls(rig, None);

        let mut seated = seat_position + SEAT_OFFSET;
        seated.y = SEATED_RIG_HEIGHT;
        scene.set_position(rig, seated);

        let yaw = yaw_towards(seated, FOCAL_POINT);
        scene.set_rotation(rig, Quat::from_rotation_y(yaw.to_radians()));

        self.state = SeatState::Sitting;
        self.hide(scene, self.links.sit_prompt);
        self.show(scene, seat, self.links.stand_prompt);

        log::info!("Sat down at seat {:?}, facing {:.1}°", seat, yaw);
        true
    }

    /// Stand up. Returns false when not sitting.
    pub fn stand(&mut self, ctx: &mut BehaviorContext<'_>) -> bool {
        if !self.is_sitting() {
            return false;
        }
        let seat = ctx.entity();
        let near = self.is_near(ctx.scene(), seat);
        let scene = ctx.scene_mut();

        if let Some(rig) = self.links.rig {
            scene.set_controls(rig, Some(STAND_CONTROLS));
            if let (Some(mut position), Some(height)) = (scene.position(rig), self.original_rig_height) {
                position.y = height;
                scene.set_position(rig, position);
            }
        }
        if let Some(occupancy) = &self.occupancy {
            occupancy.release(seat);
        }

        self.state = SeatState::Standing;
        self.hide(scene, self.links.stand_prompt);
        if near {
            self.show(scene, seat, self.links.sit_prompt);
        }

        log::info!("Stood up from seat {:?}", seat);
        true
    }

    fn show(&self, scene: &mut SceneGraph, seat: SceneNodeId, prompt: Option<SceneNodeId>) {
        let Some(prompt) = prompt else {
            return;
        };
        if let Some(seat_position) = scene.world_position(seat) {
            scene.set_position(prompt, seat_position + Vec3::Y * PROMPT_LIFT);
        }
        scene.set_visible(prompt, true);
    }

    fn hide(&self, scene: &mut SceneGraph, prompt: Option<SceneNodeId>) {
        if let Some(prompt) = prompt {
            scene.set_visible(prompt, false);
        }
    }

    fn active_prompt(&self) -> Option<SceneNodeId> {
        match self.state {
            SeatState::Standing => self.links.sit_prompt,
            SeatState::Sitting => self.links.stand_prompt,
        }
    }
}

impl Behavior for SeatInteraction {
    fn name(&self) -> &'static str {
        "seat-interaction"
    }

    fn on_attach(&mut self, ctx: &mut BehaviorContext<'_>) {
        self.listener = Some(ctx.listen_keys());
    }

    fn on_detach(&mut self, ctx: &mut BehaviorContext<'_>) {
        if let Some(listener) = self.listener.take() {
            ctx.unlisten(listener);
        }
        // A seat going away while occupied hands the rig back first
        self.stand(ctx);
        self.hide(ctx.scene_mut(), self.links.sit_prompt);
        if let Some(occupancy) = &self.occupancy {
            occupancy.release(ctx.entity());
        }
    }

    fn on_key(&mut self, ctx: &mut BehaviorContext<'_>, key: KeyCode) {
        if key != TRIGGER_KEY {
            return;
        }
        let press = ctx.key_press();
        if self.occupancy.as_ref().is_some_and(|o| o.press_handled(press)) {
            return;
        }
        let moved = match self.state {
            SeatState::Sitting => self.stand(ctx),
            SeatState::Standing => self.is_near(ctx.scene(), ctx.entity()) && self.sit(ctx),
        };
        if moved {
            if let Some(occupancy) = &self.occupancy {
                occupancy.mark_press_handled(press);
            }
        }
    }

    fn on_signal(&mut self, ctx: &mut BehaviorContext<'_>, signal: &Signal) {
        if self.is_sitting() {
            return;
        }
        let seat = ctx.entity();
        let taken = self.occupancy.as_ref().is_some_and(|o| o.held_by_other(seat));
        match signal {
            Signal::ProximityEnter if taken => {}
            Signal::ProximityEnter => self.show(ctx.scene_mut(), seat, self.links.sit_prompt),
            Signal::ProximityLeave => self.hide(ctx.scene_mut(), self.links.sit_prompt),
            _ => {}
        }
    }

    fn on_frame(&mut self, ctx: &mut BehaviorContext<'_>, _dt: f32) {
        let Some(viewer) = self.links.viewer.and_then(|v| ctx.scene().world_position(v)) else {
            return;
        };
        if let Some(prompt) = self.active_prompt() {
            if ctx.scene().is_visible(prompt) {
                ctx.scene_mut().look_at(prompt, viewer);
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
