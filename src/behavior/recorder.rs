//! Behavior that records the signals seen on its entity

use std::any::Any;

use super::{Behavior, BehaviorContext, Signal};

/// Keeps every signal delivered to its entity, in order.
#[derive(Debug, Default)]
pub struct SignalRecorder {
    seen: Vec<Signal>,
}

impl SignalRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signals(&self) -> &[Signal] {
        &self.seen
    }

    /// How many times `signal` was seen.
    pub fn count(&self, signal: &Signal) -> usize {
        self.seen.iter().filter(|s| *s == signal).count()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }
}

impl Behavior for SignalRecorder {
    fn name(&self) -> &'static str {
        "signal-recorder"
    }

    fn on_signal(&mut self, _ctx: &mut BehaviorContext<'_>, signal: &Signal) {
        self.seen.push(signal.clone());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
