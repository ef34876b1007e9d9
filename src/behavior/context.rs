//! Per-call view of the runtime handed to behavior hooks

use std::time::Duration;

use crate::scene::{SceneGraph, SceneNodeId};

use super::listeners::{KeyListeners, ListenerId};
use super::signal::Signal;
use super::timer::{TimerId, TimerQueue};
use super::SlotId;

/// What a behavior can touch while one of its hooks runs: the scene, its own
/// entity, outgoing signals, timers and key listeners.
pub struct BehaviorContext<'a> {
    entity: SceneNodeId,
    slot: SlotId,
    scene: &'a mut SceneGraph,
    timers: &'a mut TimerQueue,
    listeners: &'a mut KeyListeners,
    outbox: &'a mut Vec<(SceneNodeId, Signal)>,
    key_press: u64,
}

impl<'a> BehaviorContext<'a> {
    pub(crate) fn new(
        entity: SceneNodeId,
        slot: SlotId,
        scene: &'a mut SceneGraph,
        timers: &'a mut TimerQueue,
        listeners: &'a mut KeyListeners,
        outbox: &'a mut Vec<(SceneNodeId, Signal)>,
    ) -> Self {
        Self {
            entity,
            slot,
            scene,
            timers,
            listeners,
            outbox,
            key_press: 0,
        }
    }

    pub(crate) fn with_key_press(mut self, key_press: u64) -> Self {
        self.key_press = key_press;
        self
    }

    /// The entity this behavior is attached to.
    pub fn entity(&self) -> SceneNodeId {
        self.entity
    }

    pub fn slot(&self) -> SlotId {
        self.slot
    }

    /// Running count of key-downs the runtime has delivered. Inside `on_key`
    /// every listener sees the same value for the same press.
    pub fn key_press(&self) -> u64 {
        self.key_press
    }

    pub fn scene(&self) -> &SceneGraph {
        &*self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut *self.scene
    }

    /// Emit a signal on the behavior's own entity.
    pub fn emit(&mut self, signal: Signal) {
        self.outbox.push((self.entity, signal));
    }

    /// Schedule `on_timer` for this behavior after `delay`.
    pub fn schedule(&mut self, delay: Duration) -> TimerId {
        self.timers.schedule(self.slot, delay)
    }

    /// Start receiving `on_key` for every key-down.
    pub fn listen_keys(&mut self) -> ListenerId {
        self.listeners.register(self.slot)
    }

    /// Stop a key listener previously returned by [`Self::listen_keys`].
    pub fn unlisten(&mut self, id: ListenerId) -> bool {
        self.listeners.unregister(id)
    }
}
