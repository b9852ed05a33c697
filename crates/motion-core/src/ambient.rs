//! Repeat-forever decorative loops.
//!
//! Each loop is a set of keyframe tracks played over `duration_ms` and
//! repeated, starting after `delay_ms`. A static preference pins the loop
//! to its rest pose, so it never changes state.

use serde::{Deserialize, Serialize};

use folio_preferences::AnimationPreference;

use crate::easing::Easing;
use crate::transform::Transform;
use crate::tween::Keyframes;

const FLOAT_ROTATE_DEG: f64 = 5.0;

/// Shape of an ambient loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoopKind {
    /// Bob out to `(x, y)` and back with a slight tilt.
    Floating { x: f64, y: f64 },
    /// Trace a diamond of `radius` while spinning once.
    Orbiting { radius: f64 },
    /// Grow to `scale` and back.
    Pulsing { scale: f64 },
}

#[derive(Debug, Clone, PartialEq)]
struct Tracks {
    x: Keyframes,
    y: Keyframes,
    rotate: Keyframes,
    scale: Keyframes,
}

impl Tracks {
    fn for_kind(kind: LoopKind) -> Self {
        let flat = |v: f64| Keyframes::new(vec![v], Easing::Linear);
        match kind {
            LoopKind::Floating { x, y } => Self {
                x: Keyframes::new(vec![0.0, x, 0.0], Easing::EaseInOut),
                y: Keyframes::new(vec![0.0, y, 0.0], Easing::EaseInOut),
                rotate: Keyframes::new(vec![0.0, FLOAT_ROTATE_DEG, 0.0], Easing::EaseInOut),
                scale: flat(1.0),
            },
            LoopKind::Orbiting { radius } => Self {
                x: Keyframes::new(vec![0.0, radius, 0.0, -radius, 0.0], Easing::Linear),
                y: Keyframes::new(vec![0.0, -radius, 0.0, radius, 0.0], Easing::Linear),
                rotate: Keyframes::new(vec![0.0, 90.0, 180.0, 270.0, 360.0], Easing::Linear),
                scale: flat(1.0),
            },
            LoopKind::Pulsing { scale } => Self {
                x: flat(0.0),
                y: flat(0.0),
                rotate: flat(0.0),
                scale: Keyframes::new(vec![1.0, scale, 1.0], Easing::EaseInOut),
            },
        }
    }

    fn sample(&self, progress: f64) -> Transform {
        Transform {
            translate_x: self.x.value_at(progress),
            translate_y: self.y.value_at(progress),
            scale: self.scale.value_at(progress),
            rotation_deg: self.rotate.value_at(progress),
            opacity: 1.0,
        }
    }
}

/// A decorative element looping forever.
#[derive(Debug, Clone)]
pub struct AmbientLoop {
    kind: LoopKind,
    duration_ms: f64,
    delay_ms: f64,
    tracks: Tracks,
    preference: AnimationPreference,
    elapsed_ms: f64,
}

impl AmbientLoop {
    pub fn new(kind: LoopKind, duration_ms: f64, preference: AnimationPreference) -> Self {
        Self {
            kind,
            duration_ms,
            delay_ms: 0.0,
            tracks: Tracks::for_kind(kind),
            preference,
            elapsed_ms: 0.0,
        }
    }

    /// Floating loop with the usual 3 s period and 20 px bob.
    pub fn floating(preference: AnimationPreference) -> Self {
        Self::new(LoopKind::Floating { x: 0.0, y: 20.0 }, 3000.0, preference)
    }

    pub fn orbiting(radius: f64, preference: AnimationPreference) -> Self {
        Self::new(LoopKind::Orbiting { radius }, 10_000.0, preference)
    }

    pub fn pulsing(scale: f64, preference: AnimationPreference) -> Self {
        Self::new(LoopKind::Pulsing { scale }, 2000.0, preference)
    }

    pub fn with_delay_ms(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms.max(0.0);
        self
    }

    pub fn kind(&self) -> LoopKind {
        self.kind
    }

    pub fn set_preference(&mut self, preference: AnimationPreference) {
        self.preference = preference;
    }

    /// Pose the loop rests in when not animating.
    pub fn rest(&self) -> Transform {
        self.tracks.sample(0.0)
    }

    /// Pose at `elapsed_ms` since the loop was mounted.
    pub fn sample(&self, elapsed_ms: f64) -> Transform {
        if !self.preference.should_animate() || !(self.duration_ms > 0.0) {
            return self.rest();
        }
        let local = elapsed_ms - self.delay_ms;
        if !(local > 0.0) {
            return self.rest();
        }
        self.tracks.sample(local % self.duration_ms / self.duration_ms)
    }

    pub fn advance(&mut self, dt_ms: f64) -> Transform {
        if self.preference.should_animate() {
            self.elapsed_ms += dt_ms.max(0.0);
        }
        self.sample(self.elapsed_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_floating_peaks_mid_cycle() {
        let float = AmbientLoop::new(
            LoopKind::Floating { x: 10.0, y: 20.0 },
            3000.0,
            AnimationPreference::ANIMATED,
        );
        let peak = float.sample(1500.0);
        assert!(approx(peak.translate_y, 20.0));
        assert!(approx(peak.translate_x, 10.0));
        assert!(approx(peak.rotation_deg, FLOAT_ROTATE_DEG));
        assert!(approx(float.sample(3000.0).translate_y, 0.0));
        // Repeats.
        assert!(approx(float.sample(4500.0).translate_y, 20.0));
    }

    #[test]
    fn test_orbit_quarter_points() {
        let orbit = AmbientLoop::orbiting(50.0, AnimationPreference::ANIMATED);
        let quarter = orbit.sample(2500.0);
        assert!(approx(quarter.translate_x, 50.0));
        assert!(approx(quarter.translate_y, -50.0));
        assert!(approx(quarter.rotation_deg, 90.0));
        let three_quarters = orbit.sample(7500.0);
        assert!(approx(three_quarters.translate_x, -50.0));
        assert!(approx(three_quarters.rotation_deg, 270.0));
    }

    #[test]
    fn test_pulse_scale() {
        let pulse = AmbientLoop::pulsing(1.1, AnimationPreference::ANIMATED);
        assert!(approx(pulse.sample(1000.0).scale, 1.1));
        assert!(approx(pulse.sample(0.0).scale, 1.0));
    }

    #[test]
    fn test_delay_holds_rest_pose() {
        let float = AmbientLoop::floating(AnimationPreference::ANIMATED).with_delay_ms(500.0);
        assert_eq!(float.sample(400.0), float.rest());
        assert_ne!(float.sample(1000.0), float.rest());
    }

    #[test]
    fn test_static_loop_never_changes() {
        let reduced = AnimationPreference {
            enabled: true,
            reduced_motion_requested: true,
        };
        for mut ambient in [
            AmbientLoop::floating(AnimationPreference::STATIC),
            AmbientLoop::orbiting(40.0, AnimationPreference::STATIC),
            AmbientLoop::pulsing(1.2, reduced),
            AmbientLoop::floating(reduced),
        ] {
            let first = ambient.advance(16.0);
            for _ in 0..500 {
                assert_eq!(ambient.advance(16.0), first);
            }
            assert_eq!(first, ambient.rest());
        }
    }
}
