//! Scroll-triggered reveals.
//!
//! An element fades and slides into place once enough of it intersects the
//! viewport (shrunk vertically by a margin). Groups stagger their children;
//! text reveals flip each character up from -90 degrees.

use serde::{Deserialize, Serialize};

use folio_common::config::RevealDefaults;
use folio_input_model::geometry::Rect;
use folio_preferences::AnimationPreference;

use crate::easing::{lerp, Easing};
use crate::transform::Transform;

const TEXT_ROTATE_X_DEG: f64 = -90.0;
const SCALE_ON_SCROLL_FROM: f64 = 0.8;
const SCALE_ON_SCROLL_DURATION_SECS: f64 = 0.8;
const NON_BREAKING_SPACE: char = '\u{a0}';

/// Fraction of `element` inside `viewport` after insetting the viewport by
/// `margin` px at the top and bottom. Zero-area elements are never
/// intersecting.
pub fn intersection_ratio(element: &Rect, viewport: &Rect, margin: f64) -> f64 {
    let area = element.area();
    if !(area > 0.0) {
        return 0.0;
    }
    viewport
        .inset_vertical(margin)
        .intersection(element)
        .map_or(0.0, |overlap| (overlap.area() / area).clamp(0.0, 1.0))
}

/// How a reveal starts and ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevealConfig {
    pub delay_ms: f64,
    pub duration_ms: f64,
    /// Starting downward offset in px.
    pub offset_y: f64,
    pub start_scale: f64,
    pub start_rotate_x_deg: f64,
    /// Intersection ratio needed to count as visible.
    pub threshold: f64,
    pub margin_px: f64,
    /// Stay revealed once shown.
    pub once: bool,
    pub easing: Easing,
}

impl RevealConfig {
    /// Fade and slide up.
    pub fn slide(defaults: &RevealDefaults) -> Self {
        Self {
            delay_ms: 0.0,
            duration_ms: defaults.duration_secs * 1000.0,
            offset_y: defaults.offset_y,
            start_scale: 1.0,
            start_rotate_x_deg: 0.0,
            threshold: defaults.threshold,
            margin_px: defaults.margin_px,
            once: true,
            easing: Easing::REVEAL,
        }
    }

    /// Fade while growing from 0.8.
    pub fn scale_in(defaults: &RevealDefaults) -> Self {
        Self {
            duration_ms: SCALE_ON_SCROLL_DURATION_SECS * 1000.0,
            offset_y: 0.0,
            start_scale: SCALE_ON_SCROLL_FROM,
            margin_px: defaults.margin_px / 2.0,
            ..Self::slide(defaults)
        }
    }

    /// Per-character flip used by text reveals.
    pub fn character(defaults: &RevealDefaults) -> Self {
        Self {
            start_rotate_x_deg: TEXT_ROTATE_X_DEG,
            margin_px: defaults.margin_px / 2.0,
            ..Self::slide(defaults)
        }
    }

    pub fn with_delay_ms(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms.max(0.0);
        self
    }

    pub fn with_offset_y(mut self, offset_y: f64) -> Self {
        self.offset_y = offset_y;
        self
    }

    /// Hide again when scrolled out.
    pub fn repeating(mut self) -> Self {
        self.once = false;
        self
    }

    fn frame_at(&self, eased: f64) -> RevealFrame {
        RevealFrame {
            opacity: eased,
            translate_y: lerp(self.offset_y, 0.0, eased),
            rotate_x_deg: lerp(self.start_rotate_x_deg, 0.0, eased),
            scale: lerp(self.start_scale, 1.0, eased),
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self::slide(&RevealDefaults::default())
    }
}

/// Reveal output for one element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevealFrame {
    pub opacity: f64,
    pub translate_y: f64,
    pub rotate_x_deg: f64,
    pub scale: f64,
}

impl RevealFrame {
    pub const FINAL: RevealFrame = RevealFrame {
        opacity: 1.0,
        translate_y: 0.0,
        rotate_x_deg: 0.0,
        scale: 1.0,
    };

    pub fn transform(&self) -> Transform {
        Transform {
            translate_y: self.translate_y,
            scale: self.scale,
            opacity: self.opacity,
            ..Transform::IDENTITY
        }
    }
}

/// One element revealed on scroll.
#[derive(Debug, Clone)]
pub struct ScrollReveal {
    config: RevealConfig,
    preference: AnimationPreference,
    visible: bool,
    /// Linear progress in `[0, 1]`.
    phase: f64,
    delay_left_ms: f64,
}

impl ScrollReveal {
    pub fn new(config: RevealConfig, preference: AnimationPreference) -> Self {
        Self {
            config,
            preference,
            visible: false,
            phase: 0.0,
            delay_left_ms: 0.0,
        }
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Re-check visibility against the viewport. Returns true when the
    /// visibility changed.
    pub fn observe(&mut self, element: &Rect, viewport: &Rect) -> bool {
        let in_view = intersection_ratio(element, viewport, self.config.margin_px) >= self.config.threshold;
        self.set_in_view(in_view)
    }

    /// Apply an externally computed visibility.
    pub fn set_in_view(&mut self, in_view: bool) -> bool {
        if in_view == self.visible || (self.visible && self.config.once) {
            return false;
        }
        self.visible = in_view;
        if in_view {
            self.delay_left_ms = self.config.delay_ms;
        }
        true
    }

    pub fn set_preference(&mut self, preference: AnimationPreference) {
        self.preference = preference;
    }

    pub fn advance(&mut self, dt_ms: f64) -> RevealFrame {
        if !self.preference.should_animate() {
            return RevealFrame::FINAL;
        }
        let mut dt = dt_ms.max(0.0);
        if self.visible {
            let waited = dt.min(self.delay_left_ms);
            self.delay_left_ms -= waited;
            dt -= waited;
        }
        let step = if self.config.duration_ms > 0.0 {
            dt / self.config.duration_ms
        } else {
            1.0
        };
        self.phase = if self.visible {
            (self.phase + step).min(1.0)
        } else {
            (self.phase - step).max(0.0)
        };
        self.frame()
    }

    pub fn frame(&self) -> RevealFrame {
        if !self.preference.should_animate() {
            return RevealFrame::FINAL;
        }
        if self.phase >= 1.0 {
            return RevealFrame::FINAL;
        }
        self.config.frame_at(self.config.easing.apply(self.phase))
    }

    /// Fully revealed (or fully hidden) with nothing left to animate.
    pub fn is_settled(&self) -> bool {
        (self.visible && self.phase >= 1.0) || (!self.visible && self.phase <= 0.0)
    }
}

/// Children sharing one trigger, each starting `stagger_ms` after the
/// previous.
#[derive(Debug, Clone)]
pub struct StaggerGroup {
    items: Vec<ScrollReveal>,
    threshold: f64,
    margin_px: f64,
}

impl StaggerGroup {
    pub fn new(
        count: usize,
        item: RevealConfig,
        delay_children_ms: f64,
        stagger_ms: f64,
        preference: AnimationPreference,
    ) -> Self {
        let items = (0..count)
            .map(|i| {
                let config = item.with_delay_ms(delay_children_ms + i as f64 * stagger_ms);
                ScrollReveal::new(config, preference)
            })
            .collect();
        Self {
            items,
            threshold: item.threshold,
            margin_px: item.margin_px,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Delay before item `index` starts, if it exists.
    pub fn delay_of(&self, index: usize) -> Option<f64> {
        self.items.get(index).map(|item| item.config().delay_ms)
    }

    /// Visibility of the whole group against the viewport.
    pub fn observe(&mut self, group: &Rect, viewport: &Rect) -> bool {
        let in_view = intersection_ratio(group, viewport, self.margin_px) >= self.threshold;
        self.items
            .iter_mut()
            .fold(false, |changed, item| item.set_in_view(in_view) || changed)
    }

    pub fn set_preference(&mut self, preference: AnimationPreference) {
        for item in &mut self.items {
            item.set_preference(preference);
        }
    }

    pub fn advance(&mut self, dt_ms: f64) -> Vec<RevealFrame> {
        self.items.iter_mut().map(|item| item.advance(dt_ms)).collect()
    }

    pub fn is_settled(&self) -> bool {
        self.items.iter().all(ScrollReveal::is_settled)
    }
}

/// Character-by-character text reveal.
#[derive(Debug, Clone)]
pub struct TextReveal {
    glyphs: Vec<char>,
    group: StaggerGroup,
}

impl TextReveal {
    /// Default per-character stagger.
    pub const STAGGER_MS: f64 = 30.0;

    pub fn new(
        text: &str,
        defaults: &RevealDefaults,
        delay_ms: f64,
        stagger_ms: f64,
        preference: AnimationPreference,
    ) -> Self {
        // Spaces would collapse inside inline blocks.
        let glyphs: Vec<char> = text
            .chars()
            .map(|c| if c == ' ' { NON_BREAKING_SPACE } else { c })
            .collect();
        let group = StaggerGroup::new(
            glyphs.len(),
            RevealConfig::character(defaults),
            delay_ms,
            stagger_ms,
            preference,
        );
        Self { glyphs, group }
    }

    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    pub fn observe(&mut self, element: &Rect, viewport: &Rect) -> bool {
        self.group.observe(element, viewport)
    }

    pub fn advance(&mut self, dt_ms: f64) -> Vec<(char, RevealFrame)> {
        self.glyphs
            .iter()
            .copied()
            .zip(self.group.advance(dt_ms))
            .collect()
    }

    pub fn is_settled(&self) -> bool {
        self.group.is_settled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_MS: f64 = 16.0;

    fn viewport() -> Rect {
        Rect::new(0.0, 0.0, 1280.0, 800.0)
    }

    #[test]
    fn test_intersection_ratio_respects_margin() {
        let vp = viewport();
        let inside = Rect::new(0.0, 200.0, 100.0, 100.0);
        assert_eq!(intersection_ratio(&inside, &vp, 100.0), 1.0);

        // Bottom 100 px of the viewport is excluded by the margin.
        let low = Rect::new(0.0, 650.0, 100.0, 100.0);
        assert!((intersection_ratio(&low, &vp, 100.0) - 0.5).abs() < 1e-9);

        let below = Rect::new(0.0, 900.0, 100.0, 100.0);
        assert_eq!(intersection_ratio(&below, &vp, 0.0), 0.0);
        assert_eq!(intersection_ratio(&Rect::new(0.0, 0.0, 0.0, 10.0), &vp, 0.0), 0.0);
    }

    #[test]
    fn test_hidden_until_observed() {
        let mut reveal = ScrollReveal::new(RevealConfig::default(), AnimationPreference::ANIMATED);
        let frame = reveal.advance(FRAME_MS);
        assert_eq!(frame.opacity, 0.0);
        assert_eq!(frame.translate_y, 50.0);
    }

    #[test]
    fn test_reveal_runs_after_delay() {
        let config = RevealConfig::default().with_delay_ms(200.0);
        let mut reveal = ScrollReveal::new(config, AnimationPreference::ANIMATED);
        assert!(reveal.observe(&Rect::new(0.0, 300.0, 200.0, 200.0), &viewport()));

        for _ in 0..12 {
            assert_eq!(reveal.advance(FRAME_MS).opacity, 0.0);
        }
        let mid = reveal.advance(FRAME_MS * 20.0);
        assert!(mid.opacity > 0.0 && mid.opacity < 1.0);
        assert!(mid.translate_y > 0.0 && mid.translate_y < 50.0);

        for _ in 0..60 {
            reveal.advance(FRAME_MS);
        }
        assert_eq!(reveal.frame(), RevealFrame::FINAL);
        assert!(reveal.is_settled());
    }

    #[test]
    fn test_once_latches_visibility() {
        let mut reveal = ScrollReveal::new(RevealConfig::default(), AnimationPreference::ANIMATED);
        reveal.set_in_view(true);
        assert!(!reveal.set_in_view(false));
        assert!(reveal.is_visible());
    }

    #[test]
    fn test_repeating_reveal_reverses() {
        let mut reveal =
            ScrollReveal::new(RevealConfig::default().repeating(), AnimationPreference::ANIMATED);
        reveal.set_in_view(true);
        for _ in 0..60 {
            reveal.advance(FRAME_MS);
        }
        assert!(reveal.set_in_view(false));
        let frame = reveal.advance(FRAME_MS);
        assert!(frame.opacity < 1.0);
        for _ in 0..60 {
            reveal.advance(FRAME_MS);
        }
        assert_eq!(reveal.frame().opacity, 0.0);
        assert!(reveal.is_settled());
    }

    #[test]
    fn test_scale_in_starts_small() {
        let mut reveal = ScrollReveal::new(
            RevealConfig::scale_in(&RevealDefaults::default()),
            AnimationPreference::ANIMATED,
        );
        let frame = reveal.advance(FRAME_MS);
        assert_eq!(frame.scale, SCALE_ON_SCROLL_FROM);
        assert_eq!(frame.translate_y, 0.0);
    }

    #[test]
    fn test_static_reveal_is_final_immediately() {
        let mut reveal = ScrollReveal::new(RevealConfig::default(), AnimationPreference::STATIC);
        let first = reveal.advance(FRAME_MS);
        assert_eq!(first, RevealFrame::FINAL);
        reveal.set_in_view(true);
        for _ in 0..50 {
            assert_eq!(reveal.advance(FRAME_MS), first);
        }
    }

    #[test]
    fn test_stagger_delays() {
        let group = StaggerGroup::new(
            4,
            RevealConfig::default(),
            100.0,
            100.0,
            AnimationPreference::ANIMATED,
        );
        assert_eq!(group.len(), 4);
        assert_eq!(group.delay_of(0), Some(100.0));
        assert_eq!(group.delay_of(3), Some(400.0));
        assert_eq!(group.delay_of(4), None);
    }

    #[test]
    fn test_stagger_reveals_in_order() {
        let mut group = StaggerGroup::new(
            3,
            RevealConfig::default(),
            0.0,
            100.0,
            AnimationPreference::ANIMATED,
        );
        assert!(group.observe(&Rect::new(0.0, 200.0, 300.0, 300.0), &viewport()));
        let frames = group.advance(150.0);
        assert!(frames[0].opacity > frames[1].opacity);
        assert_eq!(frames[2].opacity, 0.0);

        for _ in 0..100 {
            group.advance(FRAME_MS);
        }
        assert!(group.is_settled());
    }

    #[test]
    fn test_text_reveal_splits_characters() {
        let mut text = TextReveal::new(
            "Hi there",
            &RevealDefaults::default(),
            0.0,
            TextReveal::STAGGER_MS,
            AnimationPreference::ANIMATED,
        );
        assert_eq!(text.glyphs().len(), 8);
        assert_eq!(text.glyphs()[2], '\u{a0}');

        let frames = text.advance(FRAME_MS);
        assert_eq!(frames[0].1.rotate_x_deg, -90.0);

        text.observe(&Rect::new(0.0, 300.0, 400.0, 60.0), &viewport());
        for _ in 0..100 {
            text.advance(FRAME_MS);
        }
        assert!(text.is_settled());
        assert!(text.advance(FRAME_MS).iter().all(|(_, f)| *f == RevealFrame::FINAL));
    }
}
