//! Timed tweens and keyframe tracks.
//!
//! Both are sampled by elapsed time rather than ticked, so a caller can
//! hold one clock and read any number of tracks from it.

use serde::{Deserialize, Serialize};

use crate::easing::{lerp, Easing};

/// A single value moving from `from` to `to` over `duration_ms`, after
/// `delay_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub duration_ms: f64,
    #[serde(default)]
    pub delay_ms: f64,
    #[serde(default)]
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f64, to: f64, duration_ms: f64, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration_ms,
            delay_ms: 0.0,
            easing,
        }
    }

    pub fn delayed(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Linear progress in `[0, 1]` at `elapsed_ms` since the tween was
    /// scheduled. A zero duration jumps straight to 1 once the delay passes.
    pub fn progress_at(&self, elapsed_ms: f64) -> f64 {
        let local = elapsed_ms - self.delay_ms;
        if local < 0.0 || local.is_nan() {
            return 0.0;
        }
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (local / self.duration_ms).min(1.0)
    }

    pub fn value_at(&self, elapsed_ms: f64) -> f64 {
        lerp(self.from, self.to, self.easing.apply(self.progress_at(elapsed_ms)))
    }

    pub fn end_ms(&self) -> f64 {
        self.delay_ms + self.duration_ms.max(0.0)
    }

    pub fn is_finished_at(&self, elapsed_ms: f64) -> bool {
        elapsed_ms >= self.end_ms()
    }
}

/// Evenly spaced keyframe values with one easing per segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframes {
    values: Vec<f64>,
    easing: Easing,
}

impl Keyframes {
    pub fn new(values: Vec<f64>, easing: Easing) -> Self {
        Self { values, easing }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value at `progress` in `[0, 1]` across the whole track.
    pub fn value_at(&self, progress: f64) -> f64 {
        match self.values.as_slice() {
            [] => 0.0,
            [only] => *only,
            values => {
                let progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
                let segments = (values.len() - 1) as f64;
                let scaled = progress * segments;
                let index = (scaled.floor() as usize).min(values.len() - 2);
                let local = scaled - index as f64;
                lerp(values[index], values[index + 1], self.easing.apply(local))
            }
        }
    }
}
