//! Magnetic and parallax pointer tracking.
//!
//! A magnetic element is pulled toward the pointer relative to its own
//! centre. A parallax element shifts against the whole viewport. Both feed
//! a raw target into a [`Spring2D`] and read the sprung offset back every
//! frame.

use folio_common::config::SpringParams;
use folio_input_model::event::PointerSample;
use folio_input_model::geometry::{Point2D, Rect, ViewportSize};
use folio_preferences::AnimationPreference;

use crate::spring::Spring2D;

/// Maximum parallax travel (px) at `strength = 1` with the pointer at a
/// viewport edge.
pub const PARALLAX_RANGE: f64 = 50.0;

/// Horizontal travel of the hero headline (percent of its width) between
/// the viewport's left and right edges, before `HERO_SHIFT_FACTOR`.
const HERO_SHIFT_RANGE: f64 = 40.0;
const HERO_SHIFT_FACTOR: f64 = 0.4;

/// Clamp a sensitivity into `(0, 1]`. Anything outside that cannot be
/// salvaged (zero, negative, NaN) makes the element inert.
pub fn normalize_strength(strength: f64) -> Option<f64> {
    if strength.is_finite() && strength > 0.0 {
        Some(strength.min(1.0))
    } else {
        None
    }
}

/// Compute the raw displacement target for a pointer sample.
///
/// With `reference_rect`, the target is `(pointer - centre) * strength`.
/// Without one, it is the viewport-normalised pointer offset scaled by
/// `strength * PARALLAX_RANGE`. Returns `None` when the viewport is
/// degenerate or the inputs are not finite, in which case the caller keeps
/// its previous target.
pub fn track_pointer(
    sample: &PointerSample,
    reference_rect: Option<&Rect>,
    viewport: ViewportSize,
    strength: f64,
) -> Option<Point2D> {
    let strength = normalize_strength(strength)?;
    let pointer = sample.point();
    if !pointer.is_finite() {
        return None;
    }
    match reference_rect {
        Some(rect) => {
            let centre = rect.center();
            Some(Point2D::new(
                (pointer.x - centre.x) * strength,
                (pointer.y - centre.y) * strength,
            ))
        }
        None => {
            let normalized = viewport.normalize(pointer)?;
            Some(Point2D::new(
                normalized.x * strength * PARALLAX_RANGE,
                normalized.y * strength * PARALLAX_RANGE,
            ))
        }
    }
}

/// Horizontal hero-headline shift in percent for a pointer sample.
pub fn hero_shift_percent(sample: &PointerSample, viewport: ViewportSize) -> Option<f64> {
    if !viewport.is_usable() || !sample.x.is_finite() {
        return None;
    }
    Some((sample.x / viewport.width - 0.5) * HERO_SHIFT_RANGE * HERO_SHIFT_FACTOR)
}

/// How a tracker relates the pointer to its element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackingMode {
    /// Pulled toward the pointer relative to the element's rectangle.
    Magnetic,
    /// Shifted against the whole viewport.
    Parallax,
}

/// Sprung pointer follower owned by a single element.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    mode: TrackingMode,
    spring: Spring2D,
    strength: f64,
    preference: AnimationPreference,
}

impl PointerTracker {
    pub fn magnetic(params: SpringParams, strength: f64, preference: AnimationPreference) -> Self {
        Self::new(TrackingMode::Magnetic, params, strength, preference)
    }

    pub fn parallax(params: SpringParams, strength: f64, preference: AnimationPreference) -> Self {
        Self::new(TrackingMode::Parallax, params, strength, preference)
    }

    fn new(
        mode: TrackingMode,
        params: SpringParams,
        strength: f64,
        preference: AnimationPreference,
    ) -> Self {
        if normalize_strength(strength).is_none() {
            tracing::warn!(strength, "Pointer tracker strength outside (0, 1]; element is inert");
        }
        Self {
            mode,
            spring: Spring2D::new(params),
            strength,
            preference,
        }
    }

    pub fn mode(&self) -> TrackingMode {
        self.mode
    }

    /// Feed a pointer sample. Magnetic trackers need `element_rect`;
    /// parallax trackers ignore it and use `viewport`.
    pub fn track(&mut self, sample: &PointerSample, element_rect: Option<&Rect>, viewport: ViewportSize) {
        if !self.preference.should_animate() {
            return;
        }
        let reference = match self.mode {
            TrackingMode::Magnetic => match element_rect {
                Some(rect) => Some(rect),
                None => {
                    tracing::debug!("Magnetic tracker sample without element rect");
                    return;
                }
            },
            TrackingMode::Parallax => None,
        };
        if let Some(target) = track_pointer(sample, reference, viewport, self.strength) {
            self.spring.set_target(target);
        }
    }

    /// Pointer left the element (or the element is being torn down): relax
    /// back to the origin with the same spring.
    pub fn release(&mut self) {
        self.spring.set_target(Point2D::ZERO);
    }

    /// Swap in a new preference snapshot. Turning animation off snaps the
    /// element home.
    pub fn set_preference(&mut self, preference: AnimationPreference) {
        self.preference = preference;
        if !preference.should_animate() {
            self.spring.jump_to(Point2D::ZERO);
        }
    }

    /// Advance one frame and return the current offset.
    pub fn advance(&mut self, dt_ms: f64) -> Point2D {
        if !self.preference.should_animate() {
            return Point2D::ZERO;
        }
        self.spring.advance(dt_ms)
    }

    pub fn offset(&self) -> Point2D {
        self.spring.position()
    }

    pub fn target(&self) -> Point2D {
        self.spring.target()
    }

    /// No motion left to compute; frame callbacks may stop.
    pub fn is_idle(&self) -> bool {
        self.spring.is_at_rest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f64, y: f64) -> PointerSample {
        PointerSample::new(x, y, 0.0)
    }

    fn magnetic_params() -> SpringParams {
        SpringParams::new(150.0, 15.0)
    }

    #[test]
    fn test_magnetic_target_is_scaled_offset_from_centre() {
        let rect = Rect::new(100.0, 100.0, 100.0, 50.0);
        let target = track_pointer(&sample(200.0, 125.0), Some(&rect), ViewportSize::default(), 0.3)
            .unwrap();
        assert!((target.x - 15.0).abs() < 1e-9);
        assert!(target.y.abs() < 1e-9);
    }

    #[test]
    fn test_parallax_target_uses_normalized_viewport() {
        let vp = ViewportSize::new(1000.0, 500.0);
        let target = track_pointer(&sample(1000.0, 0.0), None, vp, 0.1).unwrap();
        assert!((target.x - 5.0).abs() < 1e-9);
        assert!((target.y + 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_viewport_is_rejected() {
        let vp = ViewportSize::new(0.0, 0.0);
        assert!(track_pointer(&sample(10.0, 10.0), None, vp, 0.5).is_none());
    }

    #[test]
    fn test_strength_is_clamped() {
        assert_eq!(normalize_strength(3.0), Some(1.0));
        assert_eq!(normalize_strength(0.25), Some(0.25));
        assert_eq!(normalize_strength(0.0), None);
        assert_eq!(normalize_strength(-1.0), None);
        assert_eq!(normalize_strength(f64::NAN), None);
    }

    #[test]
    fn test_hero_shift() {
        let vp = ViewportSize::new(1000.0, 800.0);
        assert!((hero_shift_percent(&sample(1000.0, 0.0), vp).unwrap() - 8.0).abs() < 1e-9);
        assert!(hero_shift_percent(&sample(500.0, 0.0), vp).unwrap().abs() < 1e-9);
        assert!(hero_shift_percent(&sample(1.0, 0.0), ViewportSize::new(0.0, 1.0)).is_none());
    }

    #[test]
    fn test_magnetic_follows_then_relaxes_on_release() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut tracker = PointerTracker::magnetic(magnetic_params(), 0.3, AnimationPreference::ANIMATED);

        tracker.track(&sample(100.0, 50.0), Some(&rect), ViewportSize::default());
        assert!((tracker.target().x - 15.0).abs() < 1e-9);
        assert_eq!(tracker.target().y, 0.0);
        let first = tracker.advance(16.0);
        assert!(first.x > 0.0 && first.x < 15.0);

        for _ in 0..120 {
            tracker.advance(16.0);
        }
        assert!((tracker.offset().x - 15.0).abs() < 0.5);

        tracker.release();
        let mut frames = 0;
        while !tracker.is_idle() {
            tracker.advance(16.0);
            frames += 1;
            assert!(frames < 2000, "tracker never came to rest");
        }
        assert!(frames > 1, "release must relax, not snap");
        assert_eq!(tracker.offset(), Point2D::ZERO);
    }

    #[test]
    fn test_no_input_stays_at_rest() {
        let mut tracker = PointerTracker::parallax(magnetic_params(), 0.1, AnimationPreference::ANIMATED);
        for _ in 0..10 {
            assert_eq!(tracker.advance(16.0), Point2D::ZERO);
        }
        assert!(tracker.is_idle());
    }

    #[test]
    fn test_static_preference_never_moves() {
        let mut tracker = PointerTracker::parallax(magnetic_params(), 1.0, AnimationPreference::STATIC);
        tracker.track(&sample(0.0, 0.0), None, ViewportSize::default());
        for _ in 0..10 {
            assert_eq!(tracker.advance(16.0), Point2D::ZERO);
        }
    }

    #[test]
    fn test_disabling_mid_motion_snaps_home() {
        let mut tracker = PointerTracker::parallax(magnetic_params(), 1.0, AnimationPreference::ANIMATED);
        tracker.track(&sample(0.0, 0.0), None, ViewportSize::default());
        tracker.advance(16.0);
        assert_ne!(tracker.offset(), Point2D::ZERO);

        tracker.set_preference(AnimationPreference::STATIC);
        assert_eq!(tracker.offset(), Point2D::ZERO);
        assert!(tracker.is_idle());
    }

    #[test]
    fn test_magnetic_without_rect_is_ignored() {
        let mut tracker = PointerTracker::magnetic(magnetic_params(), 0.5, AnimationPreference::ANIMATED);
        tracker.track(&sample(10.0, 10.0), None, ViewportSize::default());
        assert_eq!(tracker.target(), Point2D::ZERO);
    }
}
