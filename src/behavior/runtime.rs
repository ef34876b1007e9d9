//! Behavior runtime: owns attached behaviors and drives them each frame.
//!
//! Frame order inside [`BehaviorRuntime::tick`]:
//! 1. advance timers and fire the due ones
//! 2. deliver each just-pressed key to registered listeners
//! 3. `on_frame` for every behavior, in attach order
//! 4. drain queued signals to the behaviors on each target entity

use std::time::Duration;

use crate::core::input::InputState;
use crate::scene::{SceneGraph, SceneNodeId};

use super::listeners::KeyListeners;
use super::signal::Signal;
use super::timer::TimerQueue;
use super::{Behavior, BehaviorContext, SlotId};

/// Signal rounds drained per dispatch before the remainder is dropped.
const MAX_SIGNAL_ROUNDS: usize = 8;

struct Slot {
    id: SlotId,
    entity: SceneNodeId,
    behavior: Box<dyn Behavior>,
}

/// Drives every attached behavior.
pub struct BehaviorRuntime {
    slots: Vec<Slot>,
    next_slot: u64,
    timers: TimerQueue,
    listeners: KeyListeners,
    outbox: Vec<(SceneNodeId, Signal)>,
    key_presses: u64,
}

impl BehaviorRuntime {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_slot: 0,
            timers: TimerQueue::new(),
            listeners: KeyListeners::new(),
            outbox: Vec::new(),
            key_presses: 0,
        }
    }

    /// Attach a behavior to `entity` and run its `on_attach` hook.
    pub fn attach(
        &mut self,
        scene: &mut SceneGraph,
        entity: SceneNodeId,
        behavior: Box<dyn Behavior>,
    ) -> SlotId {
        let id = SlotId(self.next_slot);
        self.next_slot += 1;

        log::debug!("Attaching {} to entity {:?} (slot {:?})", behavior.name(), entity, id);
        self.slots.push(Slot { id, entity, behavior });

        let index = self.slots.len() - 1;
        self.run_slot(index, scene, |behavior, ctx| behavior.on_attach(ctx));
        self.dispatch_signals(scene);
        id
    }

    /// Detach one behavior, running its `on_detach` hook first.
    ///
    /// Timers it scheduled are discarded. Key listeners it left registered
    /// are removed as well, with a warning.
    pub fn detach(&mut self, scene: &mut SceneGraph, slot: SlotId) -> bool {
        let Some(index) = self.index_of(slot) else {
            return false;
        };

        self.run_slot(index, scene, |behavior, ctx| behavior.on_detach(ctx));
        let removed = self.slots.remove(index);
        self.timers.cancel_slot(slot);

        let leaked = self.listeners.remove_slot(slot);
        if leaked > 0 {
            log::warn!(
                "{} on entity {:?} left {} key listener(s) registered after detach",
                removed.behavior.name(),
                removed.entity,
                leaked
            );
        }

        self.dispatch_signals(scene);
        true
    }

    /// Detach every behavior attached to `entity`, most recent first.
    pub fn detach_entity(&mut self, scene: &mut SceneGraph, entity: SceneNodeId) -> usize {
        let slots: Vec<SlotId> = self.slots_for(entity);
        for slot in slots.iter().rev() {
            self.detach(scene, *slot);
        }
        slots.len()
    }

    /// Remove an entity and its subtree from the scene, detaching every
    /// behavior attached anywhere in it.
    pub fn remove_entity(&mut self, scene: &mut SceneGraph, entity: SceneNodeId) {
        if !scene.contains(entity) || entity == scene.root() {
            return;
        }
        let mut subtree = vec![entity];
        let mut i = 0;
        while i < subtree.len() {
            let current = subtree[i];
            subtree.extend(scene.children(current));
            i += 1;
        }
        for node in subtree.iter().rev() {
            self.detach_entity(scene, *node);
        }
        scene.remove(entity);
    }

    /// Advance one frame.
    pub fn tick(&mut self, scene: &mut SceneGraph, input: &InputState, dt: f32) {
        let delta = Duration::try_from_secs_f32(dt).unwrap_or(Duration::ZERO);

        for (slot, timer) in self.timers.advance(delta) {
            if let Some(index) = self.index_of(slot) {
                self.run_slot(index, scene, |behavior, ctx| behavior.on_timer(ctx, timer));
            }
        }
        self.dispatch_signals(scene);

        for &key in input.just_pressed() {
            self.key_presses += 1;
            for slot in self.listeners.slots() {
                if let Some(index) = self.index_of(slot) {
                    self.run_slot(index, scene, |behavior, ctx| behavior.on_key(ctx, key));
                }
            }
            self.dispatch_signals(scene);
        }

        for index in 0..self.slots.len() {
            self.run_slot(index, scene, |behavior, ctx| behavior.on_frame(ctx, dt));
        }
        self.dispatch_signals(scene);
    }

    /// The host finished loading `entity`: flag it and emit `Signal::Loaded`.
    pub fn notify_loaded(&mut self, scene: &mut SceneGraph, entity: SceneNodeId) {
        scene.mark_loaded(entity);
        self.emit(scene, entity, Signal::Loaded);
    }

    /// Emit a signal on `entity` from outside any behavior.
    pub fn emit(&mut self, scene: &mut SceneGraph, entity: SceneNodeId, signal: Signal) {
        self.outbox.push((entity, signal));
        self.dispatch_signals(scene);
    }

    /// Run `f` against the concrete behavior in `slot`.
    ///
    /// Returns `None` if the slot is gone or holds a different type.
    pub fn with_behavior<T, R>(
        &mut self,
        scene: &mut SceneGraph,
        slot: SlotId,
        f: impl FnOnce(&mut T, &mut BehaviorContext<'_>) -> R,
    ) -> Option<R>
    where
        T: Behavior,
    {
        let index = self.index_of(slot)?;
        let result = self.run_slot(index, scene, |behavior, ctx| {
            behavior.as_any_mut().downcast_mut::<T>().map(|b| f(b, ctx))
        });
        self.dispatch_signals(scene);
        result
    }

    /// Read-only access to a concrete behavior.
    pub fn get<T: Behavior>(&self, slot: SlotId) -> Option<&T> {
        let index = self.index_of(slot)?;
        self.slots[index].behavior.as_any().downcast_ref::<T>()
    }

    /// Slots attached to `entity`, in attach order.
    pub fn slots_for(&self, entity: SceneNodeId) -> Vec<SlotId> {
        self.slots
            .iter()
            .filter(|s| s.entity == entity)
            .map(|s| s.id)
            .collect()
    }

    pub fn behavior_count(&self) -> usize {
        self.slots.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending_count()
    }

    fn index_of(&self, slot: SlotId) -> Option<usize> {
        self.slots.iter().position(|s| s.id == slot)
    }

    fn run_slot<R>(
        &mut self,
        index: usize,
        scene: &mut SceneGraph,
        f: impl FnOnce(&mut dyn Behavior, &mut BehaviorContext<'_>) -> R,
    ) -> R {
        let Self {
            slots,
            timers,
            listeners,
            outbox,
            key_presses,
            ..
        } = self;
        let slot = &mut slots[index];
        let mut ctx = BehaviorContext::new(slot.entity, slot.id, scene, timers, listeners, outbox)
            .with_key_press(*key_presses);
        f(slot.behavior.as_mut(), &mut ctx)
    }

    fn dispatch_signals(&mut self, scene: &mut SceneGraph) {
        for _ in 0..MAX_SIGNAL_ROUNDS {
            if self.outbox.is_empty() {
                return;
            }
            let batch = std::mem::take(&mut self.outbox);
            for (entity, signal) in batch {
                log::trace!("Signal {} on entity {:?}", signal, entity);
                let targets: Vec<usize> = self
                    .slots
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.entity == entity)
                    .map(|(i, _)| i)
                    .collect();
                for index in targets {
                    self.run_slot(index, scene, |behavior, ctx| behavior.on_signal(ctx, &signal));
                }
            }
        }

        if !self.outbox.is_empty() {
            log::warn!(
                "Signal cascade exceeded {} rounds; dropping {} pending signal(s)",
                MAX_SIGNAL_ROUNDS,
                self.outbox.len()
            );
            self.outbox.clear();
        }
    }
}

impl Default for BehaviorRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{ListenerId, SignalRecorder, TimerId};
    use crate::scene::NodeContent;
    use std::any::Any;
    use winit::keyboard::KeyCode;

    /// Counts every hook invocation.
    #[derive(Default)]
    struct Probe {
        attached: u32,
        frames: u32,
        detached: u32,
        keys: Vec<KeyCode>,
        presses: Vec<u64>,
        timers: Vec<TimerId>,
        listener: Option<ListenerId>,
        unlisten_on_detach: bool,
    }

    impl Behavior for Probe {
        fn name(&self) -> &'static str {
            "probe"
        }

        fn on_attach(&mut self, ctx: &mut BehaviorContext<'_>) {
            self.attached += 1;
            self.listener = Some(ctx.listen_keys());
            ctx.schedule(Duration::from_millis(100));
        }

        fn on_frame(&mut self, _ctx: &mut BehaviorContext<'_>, _dt: f32) {
            self.frames += 1;
        }

        fn on_detach(&mut self, ctx: &mut BehaviorContext<'_>) {
            self.detached += 1;
            if self.unlisten_on_detach {
                if let Some(id) = self.listener.take() {
                    ctx.unlisten(id);
                }
            }
        }

        fn on_key(&mut self, ctx: &mut BehaviorContext<'_>, key: KeyCode) {
            self.keys.push(key);
            self.presses.push(ctx.key_press());
        }

        fn on_timer(&mut self, _ctx: &mut BehaviorContext<'_>, timer: TimerId) {
            self.timers.push(timer);
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    /// Re-emits every signal it sees, forever.
    struct Echo;

    impl Behavior for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn on_signal(&mut self, ctx: &mut BehaviorContext<'_>, signal: &Signal) {
            ctx.emit(signal.clone());
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn setup() -> (SceneGraph, BehaviorRuntime, SceneNodeId) {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let entity = scene.add_child(root, "thing", NodeContent::Group);
        (scene, BehaviorRuntime::new(), entity)
    }

    #[test]
    fn test_lifecycle_hooks() {
        let (mut scene, mut runtime, entity) = setup();
        let slot = runtime.attach(&mut scene, entity, Box::new(Probe::default()));
        let input = InputState::new();

        runtime.tick(&mut scene, &input, 0.016);
        runtime.tick(&mut scene, &input, 0.016);

        let probe = runtime.get::<Probe>(slot).unwrap();
        assert_eq!(probe.attached, 1);
        assert_eq!(probe.frames, 2);
        assert_eq!(runtime.behavior_count(), 1);

        assert!(runtime.detach(&mut scene, slot));
        assert!(!runtime.detach(&mut scene, slot));
        assert_eq!(runtime.behavior_count(), 0);
    }

    #[test]
    fn test_keys_reach_listeners() {
        let (mut scene, mut runtime, entity) = setup();
        let slot = runtime.attach(&mut scene, entity, Box::new(Probe::default()));
        let mut input = InputState::new();
        input.press(KeyCode::KeyE);

        runtime.tick(&mut scene, &input, 0.016);
        input.end_frame();
        runtime.tick(&mut scene, &input, 0.016);

        assert_eq!(runtime.get::<Probe>(slot).unwrap().keys, vec![KeyCode::KeyE]);
    }

    #[test]
    fn test_listeners_share_press_number() {
        let (mut scene, mut runtime, entity) = setup();
        let first = runtime.attach(&mut scene, entity, Box::new(Probe::default()));
        let second = runtime.attach(&mut scene, entity, Box::new(Probe::default()));
        let mut input = InputState::new();
        input.press(KeyCode::KeyE);
        input.press(KeyCode::KeyQ);
        runtime.tick(&mut scene, &input, 0.016);

        input.end_frame();
        input.release(KeyCode::KeyE);
        input.end_frame();
        input.press(KeyCode::KeyE);
        runtime.tick(&mut scene, &input, 0.016);

        for slot in [first, second] {
            assert_eq!(runtime.get::<Probe>(slot).unwrap().presses, vec![1, 2, 3]);
        }
    }

    #[test]
    fn test_timer_fires_after_delay() {
        let (mut scene, mut runtime, entity) = setup();
        let slot = runtime.attach(&mut scene, entity, Box::new(Probe::default()));
        let input = InputState::new();

        runtime.tick(&mut scene, &input, 0.05);
        assert!(runtime.get::<Probe>(slot).unwrap().timers.is_empty());
        runtime.tick(&mut scene, &input, 0.06);
        assert_eq!(runtime.get::<Probe>(slot).unwrap().timers.len(), 1);
        assert_eq!(runtime.pending_timers(), 0);
    }

    #[test]
    fn test_detach_discards_timers() {
        let (mut scene, mut runtime, entity) = setup();
        let slot = runtime.attach(&mut scene, entity, Box::new(Probe::default()));
        assert_eq!(runtime.pending_timers(), 1);
        runtime.detach(&mut scene, slot);
        assert_eq!(runtime.pending_timers(), 0);
        runtime.tick(&mut scene, &InputState::new(), 1.0);
    }

    #[test]
    fn test_detach_cleans_listeners() {
        let (mut scene, mut runtime, entity) = setup();
        let tidy = runtime.attach(
            &mut scene,
            entity,
            Box::new(Probe { unlisten_on_detach: true, ..Default::default() }),
        );
        let leaky = runtime.attach(&mut scene, entity, Box::new(Probe::default()));
        assert_eq!(runtime.listener_count(), 2);

        runtime.detach(&mut scene, tidy);
        assert_eq!(runtime.listener_count(), 1);
        runtime.detach(&mut scene, leaky);
        assert_eq!(runtime.listener_count(), 0);
    }

    #[test]
    fn test_signals_reach_only_target_entity() {
        let (mut scene, mut runtime, entity) = setup();
        let root = scene.root();
        let other = scene.add_child(root, "other", NodeContent::Group);
        let here = runtime.attach(&mut scene, entity, Box::new(SignalRecorder::new()));
        let there = runtime.attach(&mut scene, other, Box::new(SignalRecorder::new()));

        runtime.emit(&mut scene, entity, Signal::ProximityEnter);

        assert_eq!(runtime.get::<SignalRecorder>(here).unwrap().signals(), &[Signal::ProximityEnter]);
        assert!(runtime.get::<SignalRecorder>(there).unwrap().signals().is_empty());
    }

    #[test]
    fn test_notify_loaded_marks_and_signals() {
        let (mut scene, mut runtime, entity) = setup();
        let slot = runtime.attach(&mut scene, entity, Box::new(SignalRecorder::new()));
        runtime.notify_loaded(&mut scene, entity);
        assert!(scene.is_loaded(entity));
        assert_eq!(runtime.get::<SignalRecorder>(slot).unwrap().count(&Signal::Loaded), 1);
    }

    #[test]
    fn test_signal_cascade_is_capped() {
        let (mut scene, mut runtime, entity) = setup();
        runtime.attach(&mut scene, entity, Box::new(Echo));
        let recorder = runtime.attach(&mut scene, entity, Box::new(SignalRecorder::new()));

        runtime.emit(&mut scene, entity, Signal::Custom("ping".into()));

        let seen = runtime.get::<SignalRecorder>(recorder).unwrap().signals().len();
        assert_eq!(seen, MAX_SIGNAL_ROUNDS);
    }

    #[test]
    fn test_with_behavior_downcasts() {
        let (mut scene, mut runtime, entity) = setup();
        let slot = runtime.attach(&mut scene, entity, Box::new(Probe::default()));

        let frames = runtime.with_behavior(&mut scene, slot, |probe: &mut Probe, _ctx| {
            probe.frames += 10;
            probe.frames
        });
        assert_eq!(frames, Some(10));

        let wrong = runtime.with_behavior(&mut scene, slot, |_: &mut SignalRecorder, _ctx| ());
        assert!(wrong.is_none());
    }

    #[test]
    fn test_remove_entity_detaches_subtree() {
        let (mut scene, mut runtime, entity) = setup();
        let child = scene.add_child(entity, "child", NodeContent::Group);
        runtime.attach(&mut scene, entity, Box::new(Probe { unlisten_on_detach: true, ..Default::default() }));
        runtime.attach(&mut scene, child, Box::new(Probe { unlisten_on_detach: true, ..Default::default() }));

        runtime.remove_entity(&mut scene, entity);

        assert_eq!(runtime.behavior_count(), 0);
        assert_eq!(runtime.listener_count(), 0);
        assert!(!scene.contains(entity));
        assert!(!scene.contains(child));
    }
}
