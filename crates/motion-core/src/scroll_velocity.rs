//! Smoothed scroll velocity.
//!
//! Scroll handlers only record the latest position. The frame tick derives
//! a raw velocity from the last two positions, runs it through a spring,
//! and maps the result to the marquee's velocity factor.

use folio_common::config::{MarqueeDefaults, SpringParams};

use crate::spring::Spring;

/// A raw velocity older than this is considered stale and reads as zero.
pub const VELOCITY_SAMPLE_WINDOW_MS: f64 = 30.0;

/// Linear map from smoothed scroll velocity (px/s) to a velocity factor.
/// Not clamped: faster scrolling keeps growing the factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityMapping {
    pub input_range: f64,
    pub output_max: f64,
}

impl VelocityMapping {
    pub fn factor(&self, velocity: f64) -> f64 {
        if self.input_range <= 0.0 {
            return 0.0;
        }
        velocity / self.input_range * self.output_max
    }
}

impl Default for VelocityMapping {
    fn default() -> Self {
        Self::from(&MarqueeDefaults::default())
    }
}

impl From<&MarqueeDefaults> for VelocityMapping {
    fn from(defaults: &MarqueeDefaults) -> Self {
        Self {
            input_range: defaults.velocity_input_range,
            output_max: defaults.velocity_factor_max,
        }
    }
}

/// Velocity factor for a smoothed scroll velocity with the default mapping
/// (`[0, 1000] px/s -> [0, 5]`).
pub fn velocity_factor(smoothed_velocity: f64) -> f64 {
    VelocityMapping::default().factor(smoothed_velocity)
}

#[derive(Debug, Clone, Copy)]
struct ScrollSample {
    y: f64,
    timestamp_ms: f64,
}

/// Scroll position tracker producing a smoothed velocity.
#[derive(Debug, Clone)]
pub struct ScrollVelocity {
    last: Option<ScrollSample>,
    raw_velocity: f64,
    since_sample_ms: f64,
    spring: Spring,
    mapping: VelocityMapping,
}

impl ScrollVelocity {
    pub fn new(params: SpringParams, mapping: VelocityMapping) -> Self {
        Self {
            last: None,
            raw_velocity: 0.0,
            since_sample_ms: f64::INFINITY,
            spring: Spring::new(params),
            mapping,
        }
    }

    /// Record a scroll position. Samples that do not move forward in time
    /// only update the position.
    pub fn on_scroll(&mut self, y: f64, timestamp_ms: f64) {
        if !y.is_finite() || !timestamp_ms.is_finite() {
            tracing::warn!(y, timestamp_ms, "Dropping non-finite scroll sample");
            return;
        }
        if let Some(prev) = self.last {
            let dt = timestamp_ms - prev.timestamp_ms;
            if dt > 0.0 {
                self.raw_velocity = (y - prev.y) / dt * 1000.0;
                self.since_sample_ms = 0.0;
            }
        }
        self.last = Some(ScrollSample { y, timestamp_ms });
    }

    /// Raw velocity as seen by the next frame.
    pub fn raw_velocity(&self) -> f64 {
        if self.since_sample_ms > VELOCITY_SAMPLE_WINDOW_MS {
            0.0
        } else {
            self.raw_velocity
        }
    }

    /// Advance the smoothing spring and return the smoothed velocity.
    pub fn advance(&mut self, dt_ms: f64) -> f64 {
        self.spring.set_target(self.raw_velocity());
        self.since_sample_ms += dt_ms.max(0.0);
        self.spring.advance(dt_ms)
    }

    pub fn smoothed_velocity(&self) -> f64 {
        self.spring.position()
    }

    pub fn velocity_factor(&self) -> f64 {
        self.mapping.factor(self.smoothed_velocity())
    }
}

impl Default for ScrollVelocity {
    fn default() -> Self {
        Self::new(SpringParams::new(400.0, 50.0), VelocityMapping::default())
    }
}
