//! Scroll-reactive marquee drift.
//!
//! [`advance_marquee`] is the pure per-frame rule. [`Marquee`] owns one
//! strip: its state, track length, scroll-velocity smoothing and the
//! animation preference gate.

use serde::{Deserialize, Serialize};

use folio_common::config::{MarqueeDefaults, SpringParams};
use folio_preferences::AnimationPreference;

use crate::scroll_velocity::{ScrollVelocity, VelocityMapping};
use crate::transform::Transform;

/// Drift direction of a marquee strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        }
    }

    /// Direction implied by a velocity factor. Exactly zero keeps `self`.
    pub fn follow(self, velocity_factor: f64) -> Direction {
        if velocity_factor < 0.0 {
            Direction::Reverse
        } else if velocity_factor > 0.0 {
            Direction::Forward
        } else {
            self
        }
    }
}

/// Cyclic position of a marquee strip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarqueeState {
    pub offset: f64,
    pub direction: Direction,
    /// Drift speed in offset units per second before direction is applied.
    pub base_velocity: f64,
}

impl MarqueeState {
    pub fn new(base_velocity: f64) -> Self {
        Self {
            offset: 0.0,
            direction: Direction::Forward,
            base_velocity,
        }
    }
}

impl Default for MarqueeState {
    fn default() -> Self {
        Self::new(MarqueeDefaults::default().base_velocity)
    }
}

/// Geometry and speed limits of a marquee track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarqueeTrack {
    /// Rendered width of one unrepeated content pass.
    pub length: f64,
    pub min_multiplier: f64,
    pub max_multiplier: f64,
}

impl MarqueeTrack {
    pub fn new(length: f64) -> Self {
        let defaults = MarqueeDefaults::default();
        Self {
            length,
            min_multiplier: defaults.min_multiplier,
            max_multiplier: defaults.max_multiplier,
        }
    }

    pub fn from_defaults(length: f64, defaults: &MarqueeDefaults) -> Self {
        Self {
            length,
            min_multiplier: defaults.min_multiplier,
            max_multiplier: defaults.max_multiplier,
        }
    }

    fn clamp_multiplier(&self, multiplier: f64) -> f64 {
        let (lo, hi) = if self.min_multiplier <= self.max_multiplier {
            (self.min_multiplier, self.max_multiplier)
        } else {
            (self.max_multiplier, self.min_multiplier)
        };
        multiplier.clamp(lo, hi)
    }
}

/// Wrap `value` into `[-length, 0)`. Non-positive or non-finite lengths
/// have no cycle; the offset sits at 0.
pub fn wrap_offset(value: f64, length: f64) -> f64 {
    if !(length > 0.0) || !length.is_finite() || !value.is_finite() {
        return 0.0;
    }
    ((value + length) % length + length) % length - length
}

/// Advance a marquee by one frame.
///
/// The direction follows the sign of `velocity_factor`. Scroll speed
/// scales the base drift by `1 + direction * velocity_factor`, clamped to
/// the track's multiplier range so direction flips cannot run away.
pub fn advance_marquee(
    state: MarqueeState,
    track: &MarqueeTrack,
    dt_ms: f64,
    velocity_factor: f64,
) -> MarqueeState {
    if !dt_ms.is_finite() || dt_ms <= 0.0 {
        return state;
    }
    let velocity_factor = if velocity_factor.is_finite() {
        velocity_factor
    } else {
        0.0
    };

    let direction = state.direction.follow(velocity_factor);
    let sign = direction.sign();
    let multiplier = track.clamp_multiplier(1.0 + sign * velocity_factor);
    let move_by = sign * state.base_velocity * (dt_ms / 1000.0) * multiplier;

    MarqueeState {
        offset: wrap_offset(state.offset + move_by, track.length),
        direction,
        base_velocity: state.base_velocity,
    }
}

/// One marquee strip driven by page scroll.
#[derive(Debug, Clone)]
pub struct Marquee {
    state: MarqueeState,
    track: MarqueeTrack,
    scroll: ScrollVelocity,
    copies: u32,
    preference: AnimationPreference,
}

impl Marquee {
    pub fn new(
        defaults: &MarqueeDefaults,
        smoothing: SpringParams,
        track_length: f64,
        preference: AnimationPreference,
    ) -> Self {
        Self {
            state: MarqueeState::new(defaults.base_velocity),
            track: MarqueeTrack::from_defaults(track_length, defaults),
            scroll: ScrollVelocity::new(smoothing, VelocityMapping::from(defaults)),
            copies: defaults.copies,
            preference,
        }
    }

    /// Override the base drift, e.g. a second strip running the other way.
    pub fn with_base_velocity(mut self, base_velocity: f64) -> Self {
        self.state.base_velocity = base_velocity;
        self
    }

    /// Number of content copies the renderer should lay out.
    pub fn copies(&self) -> u32 {
        self.copies
    }

    pub fn on_scroll(&mut self, y: f64, timestamp_ms: f64) {
        self.scroll.on_scroll(y, timestamp_ms);
    }

    /// Content was re-measured (resize, font load).
    pub fn set_track_length(&mut self, length: f64) {
        self.track.length = length;
        self.state.offset = wrap_offset(self.state.offset, length);
    }

    pub fn set_preference(&mut self, preference: AnimationPreference) {
        self.preference = preference;
    }

    /// Advance one frame and return the new offset. A static preference
    /// freezes the strip where it is.
    pub fn advance(&mut self, dt_ms: f64) -> f64 {
        if !self.preference.should_animate() {
            return self.state.offset;
        }
        self.scroll.advance(dt_ms);
        self.state = advance_marquee(self.state, &self.track, dt_ms, self.scroll.velocity_factor());
        self.state.offset
    }

    pub fn state(&self) -> MarqueeState {
        self.state
    }

    pub fn offset(&self) -> f64 {
        self.state.offset
    }

    pub fn velocity_factor(&self) -> f64 {
        self.scroll.velocity_factor()
    }

    pub fn transform(&self) -> Transform {
        Transform {
            translate_x: self.state.offset,
            ..Transform::IDENTITY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reverse_drift_one_second() {
        let state = MarqueeState {
            offset: 0.0,
            direction: Direction::Reverse,
            base_velocity: 6.0,
        };
        let next = advance_marquee(state, &MarqueeTrack::new(1000.0), 1000.0, 0.0);
        assert!((next.offset + 6.0).abs() < 1e-9);
        assert_eq!(next.direction, Direction::Reverse);
    }

    #[test]
    fn test_zero_factor_moves_by_base_velocity() {
        let track = MarqueeTrack::new(100.0);
        let mut state = MarqueeState::new(-6.0);
        state.offset = -10.0;
        let mut prev = state.offset;
        for _ in 0..10 {
            state = advance_marquee(state, &track, 500.0, 0.0);
            assert!((prev - state.offset - 3.0).abs() < 1e-9);
            prev = state.offset;
        }
    }

    #[test]
    fn test_wraps_past_track_start() {
        let track = MarqueeTrack::new(100.0);
        let state = MarqueeState {
            offset: -98.0,
            direction: Direction::Forward,
            base_velocity: -6.0,
        };
        let next = advance_marquee(state, &track, 1000.0, 0.0);
        assert!((next.offset + 4.0).abs() < 1e-9, "offset {}", next.offset);
    }

    #[test]
    fn test_wrap_offset_range() {
        assert!((wrap_offset(-6.0, 100.0) + 6.0).abs() < 1e-12);
        assert!((wrap_offset(-101.0, 100.0) + 1.0).abs() < 1e-12);
        assert!((wrap_offset(6.0, 100.0) + 94.0).abs() < 1e-12);
        assert_eq!(wrap_offset(0.0, 100.0), -100.0);
        assert_eq!(wrap_offset(-50.0, 0.0), 0.0);
        assert_eq!(wrap_offset(-50.0, -10.0), 0.0);
    }

    #[test]
    fn test_direction_follows_factor_sign() {
        let track = MarqueeTrack::new(1000.0);
        let state = MarqueeState {
            offset: -500.0,
            direction: Direction::Forward,
            base_velocity: -6.0,
        };
        let reversed = advance_marquee(state, &track, 16.0, -0.5);
        assert_eq!(reversed.direction, Direction::Reverse);
        let kept = advance_marquee(reversed, &track, 16.0, 0.0);
        assert_eq!(kept.direction, Direction::Reverse);
        let forward = advance_marquee(kept, &track, 16.0, 0.2);
        assert_eq!(forward.direction, Direction::Forward);
    }

    #[test]
    fn test_scroll_amplifies_drift() {
        let track = MarqueeTrack::new(10_000.0);
        let state = MarqueeState {
            offset: -5000.0,
            direction: Direction::Forward,
            base_velocity: -6.0,
        };
        let idle = advance_marquee(state, &track, 1000.0, 0.0);
        let fast = advance_marquee(state, &track, 1000.0, 2.0);
        assert!((state.offset - idle.offset - 6.0).abs() < 1e-9);
        assert!((state.offset - fast.offset - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_multiplier_is_clamped() {
        let track = MarqueeTrack::new(100_000.0);
        let state = MarqueeState {
            offset: -50_000.0,
            direction: Direction::Forward,
            base_velocity: -6.0,
        };
        let next = advance_marquee(state, &track, 1000.0, 1e6);
        assert!((state.offset - next.offset - 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_dt_is_noop() {
        let state = MarqueeState::default();
        let track = MarqueeTrack::new(100.0);
        assert_eq!(advance_marquee(state, &track, 0.0, 1.0), state);
        assert_eq!(advance_marquee(state, &track, f64::NAN, 1.0), state);
    }

    #[test]
    fn test_static_marquee_does_not_move() {
        let mut marquee = Marquee::new(
            &MarqueeDefaults::default(),
            SpringParams::new(400.0, 50.0),
            500.0,
            AnimationPreference::STATIC,
        );
        for _ in 0..100 {
            assert_eq!(marquee.advance(16.0), 0.0);
        }
    }

    #[test]
    fn test_marquee_drifts_and_reacts_to_scroll() {
        let mut marquee = Marquee::new(
            &MarqueeDefaults::default(),
            SpringParams::new(400.0, 50.0),
            2000.0,
            AnimationPreference::ANIMATED,
        );
        assert_eq!(marquee.copies(), 6);
        marquee.advance(1000.0 / 60.0);
        let drift = marquee.offset();
        assert!(drift < 0.0);

        let mut t = 0.0;
        let mut y = 0.0;
        for _ in 0..20 {
            t += 16.0;
            y += 20.0;
            marquee.on_scroll(y, t);
            marquee.advance(16.0);
        }
        assert!(marquee.velocity_factor() > 1.0);
        assert_eq!(marquee.transform().translate_x, marquee.offset());
    }

    proptest! {
        #[test]
        fn prop_offset_stays_in_track(
            offset in -500.0f64..0.0,
            factor in -20.0f64..20.0,
            dt in 1.0f64..200.0,
            length in 1.0f64..500.0,
        ) {
            let state = MarqueeState { offset, direction: Direction::Forward, base_velocity: -6.0 };
            let next = advance_marquee(state, &MarqueeTrack::new(length), dt, factor);
            prop_assert!(next.offset >= -length && next.offset < 0.0,
                "offset {} length {}", next.offset, length);
        }
    }
}
