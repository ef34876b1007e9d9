//! Behavior framework: per-entity components driven by the frame loop
//!
//! A [`Behavior`] is attached to exactly one scene entity and receives
//! lifecycle hooks from the [`BehaviorRuntime`]: attach once, a frame hook
//! every tick, and detach when removed. Behaviors never hold references to
//! each other; they coordinate through [`Signal`]s on entities.

pub mod context;
pub mod listeners;
pub mod recorder;
pub mod runtime;
pub mod signal;
pub mod timer;

use std::any::Any;

use winit::keyboard::KeyCode;

pub use context::BehaviorContext;
pub use listeners::{KeyListeners, ListenerId};
pub use recorder::SignalRecorder;
pub use runtime::BehaviorRuntime;
pub use signal::Signal;
pub use timer::{TimerId, TimerQueue};

/// Identifies one attached behavior instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub u64);

/// A component that can be ticked by the frame loop.
///
/// Every hook has a no-op default except [`Behavior::name`] and the `Any`
/// accessors used to reach a concrete behavior through the runtime.
pub trait Behavior: Any {
    /// Human-readable name for logging
    fn name(&self) -> &'static str;

    /// Called once, right after the behavior is attached to its entity
    fn on_attach(&mut self, _ctx: &mut BehaviorContext<'_>) {}

    /// Called every frame with the frame delta in seconds
    fn on_frame(&mut self, _ctx: &mut BehaviorContext<'_>, _dt: f32) {}

    /// Called once when the behavior is detached or its entity removed
    fn on_detach(&mut self, _ctx: &mut BehaviorContext<'_>) {}

    /// Called for every signal emitted on the behavior's entity
    fn on_signal(&mut self, _ctx: &mut BehaviorContext<'_>, _signal: &Signal) {}

    /// Called for every key-down while a key listener is registered
    fn on_key(&mut self, _ctx: &mut BehaviorContext<'_>, _key: KeyCode) {}

    /// Called when a timer scheduled through the context fires
    fn on_timer(&mut self, _ctx: &mut BehaviorContext<'_>, _timer: TimerId) {}

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
