//! Fire-and-forget delayed callbacks

use std::time::Duration;

use super::SlotId;

/// Handle returned when scheduling a timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

#[derive(Clone, Copy, Debug)]
struct PendingTimer {
    id: TimerId,
    slot: SlotId,
    due: Duration,
}

/// Timers keyed to the behavior slot that scheduled them.
///
/// Time only moves when the runtime advances it with the frame delta.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    pending: Vec<PendingTimer>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a timer for `slot` that fires `delay` from now.
    pub fn schedule(&mut self, slot: SlotId, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(PendingTimer {
            id,
            slot,
            due: self.now + delay,
        });
        id
    }

    /// Advance the clock and pop every timer now due, earliest first.
    pub fn advance(&mut self, dt: Duration) -> Vec<(SlotId, TimerId)> {
        self.now += dt;
        let now = self.now;

        let mut due: Vec<PendingTimer> = Vec::new();
        self.pending.retain(|t| {
            if t.due <= now {
                due.push(*t);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|t| (t.due, t.id.0));
        due.into_iter().map(|t| (t.slot, t.id)).collect()
    }

    /// Drop all timers owned by `slot`.
    pub fn cancel_slot(&mut self, slot: SlotId) {
        self.pending.retain(|t| t.slot != slot);
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_fires_once_when_due() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule(SlotId(1), Duration::from_millis(100));

        assert!(timers.advance(Duration::from_millis(60)).is_empty());
        assert_eq!(timers.advance(Duration::from_millis(60)), vec![(SlotId(1), id)]);
        assert!(timers.advance(Duration::from_millis(500)).is_empty());
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn test_timers_fire_in_due_order() {
        let mut timers = TimerQueue::new();
        let late = timers.schedule(SlotId(1), Duration::from_millis(300));
        let early = timers.schedule(SlotId(2), Duration::from_millis(100));
        let fired = timers.advance(Duration::from_secs(1));
        assert_eq!(fired, vec![(SlotId(2), early), (SlotId(1), late)]);
    }

    #[test]
    fn test_cancel_slot() {
        let mut timers = TimerQueue::new();
        timers.schedule(SlotId(1), Duration::from_millis(10));
        timers.schedule(SlotId(2), Duration::from_millis(10));
        timers.cancel_slot(SlotId(1));
        let fired = timers.advance(Duration::from_millis(20));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].0, SlotId(2));
    }
}
