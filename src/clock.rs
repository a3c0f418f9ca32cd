//! Frame clock driving the render loop.

use std::time::Instant;

/// Produces per-tick deltas from a monotonic clock
#[derive(Debug)]
pub struct FrameClock {
    last_tick: Instant,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_tick: now,
            frame_count: 0,
        }
    }

    /// Seconds since the previous tick (never negative)
    pub fn tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> f64 {
        // saturating: an `Instant` earlier than the last tick yields zero
        let delta = now.saturating_duration_since(self.last_tick);
        self.last_tick = now.max(self.last_tick);
        self.frame_count += 1;
        delta.as_secs_f64()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_tick_deltas() {
        let mut clock = FrameClock::new();
        let start = clock.last_tick;

        let d1 = clock.tick_at(start + Duration::from_millis(16));
        let d2 = clock.tick_at(start + Duration::from_millis(50));

        assert!((d1 - 0.016).abs() < 1e-9);
        assert!((d2 - 0.034).abs() < 1e-9);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_tick_never_negative() {
        let mut clock = FrameClock::new();
        let start = clock.last_tick;
        clock.tick_at(start + Duration::from_millis(100));

        // Stale timestamp
        let delta = clock.tick_at(start);
        assert_eq!(delta, 0.0);
        assert_eq!(clock.last_tick, start + Duration::from_millis(100));
    }
}
