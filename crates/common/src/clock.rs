//! Frame clock and rate-limiting utilities.
//!
//! All motion state is advanced from a single per-frame callback driven by
//! a monotonic clock. This module provides:
//! - Frame delta computation with clamping for stalled frames
//! - A leading-edge throttle for high-frequency input handlers

use std::time::Instant;

/// Longest frame delta handed to the engine. Anything longer (a background
/// tab, a debugger pause) is treated as a single 100 ms frame.
pub const MAX_FRAME_DELTA_MS: f64 = 100.0;

/// Converts monotonic timestamps into per-frame deltas.
#[derive(Debug, Clone)]
pub struct FrameClock {
    epoch: Instant,
    last_ms: Option<f64>,
    max_delta_ms: f64,
    frames: u64,
}

impl FrameClock {
    /// Create a frame clock anchored to now.
    pub fn start() -> Self {
        Self::with_max_delta(MAX_FRAME_DELTA_MS)
    }

    /// Create a frame clock with a custom delta ceiling.
    pub fn with_max_delta(max_delta_ms: f64) -> Self {
        Self {
            epoch: Instant::now(),
            last_ms: None,
            max_delta_ms: max_delta_ms.max(0.0),
            frames: 0,
        }
    }

    /// Milliseconds elapsed since the clock started.
    pub fn elapsed_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    /// Advance using the wall clock.
    pub fn tick_now(&mut self) -> f64 {
        let now = self.elapsed_ms();
        self.tick(now)
    }

    /// Advance to `now_ms` and return the clamped delta since the previous
    /// tick. The first tick returns 0. Timestamps that go backwards yield 0
    /// and do not move the clock.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        self.frames += 1;
        let delta = match self.last_ms {
            None => 0.0,
            Some(last) if now_ms < last || !now_ms.is_finite() => return 0.0,
            Some(last) => (now_ms - last).min(self.max_delta_ms),
        };
        self.last_ms = Some(now_ms);
        delta
    }

    /// Number of ticks taken so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Leading-edge throttle: the first call fires, then calls are dropped
/// until `interval_ms` has passed since the last fired call.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval_ms: f64,
    last_fire_ms: Option<f64>,
}

impl Throttle {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms as f64,
            last_fire_ms: None,
        }
    }

    /// Check if a call at `now_ms` may run. Returns true and records the
    /// time if so.
    pub fn should_fire(&mut self, now_ms: f64) -> bool {
        match self.last_fire_ms {
            Some(last) if now_ms < last + self.interval_ms => false,
            _ => {
                self.last_fire_ms = Some(now_ms);
                true
            }
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Forget the last fire time so the next call runs.
    pub fn reset(&mut self) {
        self.last_fire_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_clock_first_tick_is_zero() {
        let mut clock = FrameClock::start();
        assert_eq!(clock.tick(1000.0), 0.0);
        assert_eq!(clock.tick(1016.0), 16.0);
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn test_frame_clock_clamps_stalls() {
        let mut clock = FrameClock::start();
        clock.tick(0.0);
        assert_eq!(clock.tick(5_000.0), MAX_FRAME_DELTA_MS);
    }

    #[test]
    fn test_frame_clock_ignores_backwards_time() {
        let mut clock = FrameClock::start();
        clock.tick(100.0);
        assert_eq!(clock.tick(50.0), 0.0);
        assert_eq!(clock.tick(116.0), 16.0);
    }

    #[test]
    fn test_throttle() {
        let mut throttle = Throttle::new(16);
        assert!(throttle.should_fire(0.0));
        assert!(!throttle.should_fire(1.0));
        assert!(!throttle.should_fire(15.9));
        assert!(throttle.should_fire(16.0));
        throttle.reset();
        assert!(throttle.should_fire(17.0));
    }
}
