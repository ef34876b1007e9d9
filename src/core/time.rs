//! Frame timing for the behavior loop

use std::time::{Duration, Instant};

/// How a [`FrameClock`] produces its per-frame delta
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockMode {
    /// Measure wall-clock time between ticks
    Realtime,
    /// Advance by a constant step every tick (headless runs, tests)
    Fixed(Duration),
}

/// Tracks frame deltas and total elapsed time
pub struct FrameClock {
    mode: ClockMode,
    last_frame: Instant,
    delta: Duration,
    elapsed: Duration,
    frame_count: u64,
}

impl FrameClock {
    /// Create a wall-clock driven timer
    pub fn realtime() -> Self {
        Self::with_mode(ClockMode::Realtime)
    }

    /// Create a timer that advances by `step` on every tick
    pub fn fixed(step: Duration) -> Self {
        Self::with_mode(ClockMode::Fixed(step))
    }

    fn with_mode(mode: ClockMode) -> Self {
        Self {
            mode,
            last_frame: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Call once per frame. Returns the delta in seconds.
    pub fn tick(&mut self) -> f32 {
        self.delta = match self.mode {
            ClockMode::Realtime => {
                let now = Instant::now();
                let delta = now - self.last_frame;
                self.last_frame = now;
                delta
            }
            ClockMode::Fixed(step) => step,
        };
        self.elapsed += self.delta;
        self.frame_count += 1;
        self.delta.as_secs_f32()
    }

    /// Total time accumulated over all ticks
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Get total frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn mode(&self) -> ClockMode {
        self.mode
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::realtime()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_advances_by_step() {
        let mut clock = FrameClock::fixed(Duration::from_millis(20));
        let dt = clock.tick();
        assert!((dt - 0.02).abs() < 1e-6);
        clock.tick();
        clock.tick();
        assert_eq!(clock.frame_count(), 3);
        assert_eq!(clock.elapsed(), Duration::from_millis(60));
    }

    #[test]
    fn test_realtime_clock_counts_frames() {
        let mut clock = FrameClock::realtime();
        assert_eq!(clock.frame_count(), 0);
        let dt = clock.tick();
        assert!(dt >= 0.0);
        assert_eq!(clock.frame_count(), 1);
        assert_eq!(clock.mode(), ClockMode::Realtime);
    }
}
