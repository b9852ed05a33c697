//! Intro mask reveal and hero entrance.
//!
//! The page opens behind a black mask. The mask group rotates, then grows
//! and fades; once the growth is 90% done the mask is removed and the hero
//! headline settles from its tilted, enlarged pose.
//!
//! Timeline (ms):
//!
//! ```text
//! mask rotate   0 -> 10 deg   [   0, 2000]  power4 in-out
//! mask scale    1 -> 10       [ 200, 2200]  expo in-out
//! mask opacity  1 -> 0        [ 200, 2200]  expo in-out
//! reveal        scale tween progress >= 0.9 (t = 2000)
//! hero scale    1.4 -> 1      [reveal + 200, reveal + 2200]  expo in-out
//! hero rotate   -10 -> 0 deg  [reveal + 200, reveal + 2200]  expo in-out
//! ```

use serde::{Deserialize, Serialize};

use folio_preferences::AnimationPreference;

use crate::easing::Easing;
use crate::transform::Transform;
use crate::tween::Tween;

const MASK_ROTATE_DEG: f64 = 10.0;
const MASK_SCALE: f64 = 10.0;
const MASK_DURATION_MS: f64 = 2000.0;
const MASK_GROW_DELAY_MS: f64 = 200.0;

/// Progress of the grow tween at which the mask is removed.
pub const REVEAL_PROGRESS: f64 = 0.9;

const HERO_START_SCALE: f64 = 1.4;
const HERO_START_ROTATE_DEG: f64 = -10.0;
const HERO_DURATION_MS: f64 = 2000.0;
const HERO_DELAY_MS: f64 = 200.0;

/// Where the intro is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntroPhase {
    /// Mask is on screen, content hidden.
    Masked,
    /// Mask removed, hero still settling.
    Revealing,
    /// Nothing left to animate.
    Complete,
}

/// One frame of the intro.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntroFrame {
    pub phase: IntroPhase,
    /// Mask group transform, `None` once the mask is gone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<Transform>,
    pub content_visible: bool,
    pub hero: Transform,
}

/// Intro timeline sampled from a single elapsed clock.
#[derive(Debug, Clone)]
pub struct IntroTimeline {
    elapsed_ms: f64,
    revealed_at_ms: Option<f64>,
    animate: bool,
    rotate: Tween,
    grow: Tween,
    fade: Tween,
    hero_scale: Tween,
    hero_rotate: Tween,
}

impl IntroTimeline {
    pub fn new(preference: AnimationPreference) -> Self {
        let animate = preference.should_animate();
        if !animate {
            tracing::debug!("Intro skipped; rendering final state");
        }
        Self {
            elapsed_ms: 0.0,
            revealed_at_ms: if animate { None } else { Some(0.0) },
            animate,
            rotate: Tween::new(0.0, MASK_ROTATE_DEG, MASK_DURATION_MS, Easing::Power4InOut),
            grow: Tween::new(1.0, MASK_SCALE, MASK_DURATION_MS, Easing::ExpoInOut)
                .delayed(MASK_GROW_DELAY_MS),
            fade: Tween::new(1.0, 0.0, MASK_DURATION_MS, Easing::ExpoInOut).delayed(MASK_GROW_DELAY_MS),
            hero_scale: Tween::new(HERO_START_SCALE, 1.0, HERO_DURATION_MS, Easing::ExpoInOut)
                .delayed(HERO_DELAY_MS),
            hero_rotate: Tween::new(HERO_START_ROTATE_DEG, 0.0, HERO_DURATION_MS, Easing::ExpoInOut)
                .delayed(HERO_DELAY_MS),
        }
    }

    /// Advance the clock and sample the frame.
    pub fn advance(&mut self, dt_ms: f64) -> IntroFrame {
        if self.animate && self.phase() != IntroPhase::Complete {
            self.elapsed_ms += dt_ms.max(0.0);
            if self.revealed_at_ms.is_none()
                && self.grow.progress_at(self.elapsed_ms) >= REVEAL_PROGRESS
            {
                tracing::debug!(elapsed_ms = self.elapsed_ms, "Intro mask removed");
                self.revealed_at_ms = Some(self.elapsed_ms);
            }
        }
        self.frame()
    }

    /// Jump to the end, e.g. when animation is switched off mid-intro.
    pub fn finish(&mut self) {
        self.animate = false;
        self.revealed_at_ms.get_or_insert(self.elapsed_ms);
    }

    pub fn phase(&self) -> IntroPhase {
        match self.revealed_at_ms {
            None => IntroPhase::Masked,
            Some(_) if !self.animate => IntroPhase::Complete,
            Some(at) if self.hero_scale.is_finished_at(self.elapsed_ms - at) => IntroPhase::Complete,
            Some(_) => IntroPhase::Revealing,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase() == IntroPhase::Complete
    }

    pub fn frame(&self) -> IntroFrame {
        let phase = self.phase();
        match (phase, self.revealed_at_ms) {
            (IntroPhase::Masked, _) | (_, None) => IntroFrame {
                phase,
                mask: Some(Transform {
                    scale: self.grow.value_at(self.elapsed_ms),
                    rotation_deg: self.rotate.value_at(self.elapsed_ms),
                    opacity: self.fade.value_at(self.elapsed_ms),
                    ..Transform::IDENTITY
                }),
                content_visible: false,
                hero: self.hero_at(0.0),
            },
            (IntroPhase::Complete, _) => IntroFrame {
                phase,
                mask: None,
                content_visible: true,
                hero: Transform::IDENTITY,
            },
            (IntroPhase::Revealing, Some(at)) => IntroFrame {
                phase,
                mask: None,
                content_visible: true,
                hero: self.hero_at(self.elapsed_ms - at),
            },
        }
    }

    fn hero_at(&self, since_reveal_ms: f64) -> Transform {
        Transform {
            scale: self.hero_scale.value_at(since_reveal_ms),
            rotation_deg: self.hero_rotate.value_at(since_reveal_ms),
            ..Transform::IDENTITY
        }
    }
}
