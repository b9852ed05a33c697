//! Custom cursor replacement.
//!
//! Two sprung followers stand in for the platform pointer: a large ring on
//! a softer spring and a small dot on a stiffer one. Their appearance
//! follows a variant driven by the hover probe and the mouse button, and a
//! ripple expands from every click.
//!
//! Touch-primary and small-viewport devices never get the replacement. A
//! disabled cursor swallows input and yields no frames.

use std::fmt;

use serde::{Deserialize, Serialize};

use folio_common::clock::Throttle;
use folio_common::config::{CursorDefaults, MotionConfig, SpringParams, SpringPresets};
use folio_input_model::element::{ElementTree, NodeId};
use folio_input_model::event::{EventKind, InputEvent, PointerSample};
use folio_input_model::geometry::Point2D;
use folio_preferences::{AnimationPreference, DeviceProfile};

use crate::easing::{lerp, Easing};
use crate::hover;
use crate::spring::Spring2D;
use crate::tween::Tween;

/// Colour with 8-bit channels and a fractional alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn lerp(&self, other: &Rgba, t: f64) -> Rgba {
        let channel = |from: u8, to: u8| lerp(from as f64, to as f64, t).round().clamp(0.0, 255.0) as u8;
        Rgba {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
            a: lerp(self.a, other.a, t),
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

const WHITE_FAINT: Rgba = Rgba::new(255, 255, 255, 0.1);
const WHITE_BORDER: Rgba = Rgba::new(255, 255, 255, 0.3);
const WHITE_DOT: Rgba = Rgba::new(255, 255, 255, 0.8);
const PINK_FILL: Rgba = Rgba::new(236, 110, 173, 0.2);
const PINK_BORDER: Rgba = Rgba::new(236, 110, 173, 0.5);
const PINK_PRESSED: Rgba = Rgba::new(236, 110, 173, 0.4);
const PINK_DOT: Rgba = Rgba::new(236, 110, 173, 1.0);

const CLICK_SCALE: f64 = 0.8;

/// Ring and dot variant transition lengths (ms), normal and reduced.
const RING_TRANSITION_MS: f64 = 200.0;
const RING_TRANSITION_REDUCED_MS: f64 = 100.0;
const DOT_TRANSITION_MS: f64 = 100.0;
const DOT_TRANSITION_REDUCED_MS: f64 = 50.0;

const RIPPLE_START_OPACITY: f64 = 0.6;

/// Visual state of one follower.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    /// Diameter in px.
    pub size: f64,
    pub scale: f64,
    pub fill: Rgba,
    pub border: Option<Rgba>,
}

impl Appearance {
    pub fn lerp(&self, other: &Appearance, t: f64) -> Appearance {
        let border = match (self.border, other.border) {
            (Some(a), Some(b)) => Some(a.lerp(&b, t)),
            (_, b) => b,
        };
        Appearance {
            size: lerp(self.size, other.size, t),
            scale: lerp(self.scale, other.scale, t),
            fill: self.fill.lerp(&other.fill, t),
            border,
        }
    }
}

/// Which look the cursor is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorVariant {
    #[default]
    Default,
    Hover,
    Clicking,
}

impl CursorVariant {
    /// Ring look. `Clicking` keeps the size of whatever the pointer is over.
    pub fn ring_appearance(self, hovering: bool) -> Appearance {
        match self {
            CursorVariant::Default => Appearance {
                size: 20.0,
                scale: 1.0,
                fill: WHITE_FAINT,
                border: Some(WHITE_BORDER),
            },
            CursorVariant::Hover => Appearance {
                size: 60.0,
                scale: 1.2,
                fill: PINK_FILL,
                border: Some(PINK_BORDER),
            },
            CursorVariant::Clicking => {
                let base = if hovering {
                    CursorVariant::Hover
                } else {
                    CursorVariant::Default
                };
                Appearance {
                    scale: CLICK_SCALE,
                    fill: PINK_PRESSED,
                    ..base.ring_appearance(hovering)
                }
            }
        }
    }

    /// Dot look. The dot has no pressed state.
    pub fn dot_appearance(self) -> Appearance {
        match self {
            CursorVariant::Hover => Appearance {
                size: 8.0,
                scale: 1.0,
                fill: PINK_DOT,
                border: None,
            },
            CursorVariant::Default | CursorVariant::Clicking => Appearance {
                size: 4.0,
                scale: 1.0,
                fill: WHITE_DOT,
                border: None,
            },
        }
    }
}

/// Eased transition between two appearances.
#[derive(Debug, Clone)]
struct AppearanceTransition {
    from: Appearance,
    to: Appearance,
    progress: Tween,
    elapsed_ms: f64,
}

impl AppearanceTransition {
    fn settled(appearance: Appearance) -> Self {
        Self {
            from: appearance,
            to: appearance,
            progress: Tween::new(0.0, 1.0, 0.0, Easing::EaseOut),
            elapsed_ms: 0.0,
        }
    }

    fn retarget(&mut self, to: Appearance, duration_ms: f64) {
        if to == self.to {
            return;
        }
        self.from = self.current();
        self.to = to;
        self.progress = Tween::new(0.0, 1.0, duration_ms, Easing::EaseOut);
        self.elapsed_ms = 0.0;
    }

    fn advance(&mut self, dt_ms: f64) {
        self.elapsed_ms += dt_ms.max(0.0);
    }

    fn current(&self) -> Appearance {
        let t = self.progress.value_at(self.elapsed_ms);
        if t >= 1.0 {
            return self.to;
        }
        self.from.lerp(&self.to, t)
    }
}

/// Ripple state at one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RippleFrame {
    pub center: Point2D,
    pub size: f64,
    pub opacity: f64,
}

/// Expanding, fading ring at the click position.
#[derive(Debug, Clone)]
struct Ripple {
    center: Point2D,
    size: Tween,
    opacity: Tween,
    elapsed_ms: f64,
}

impl Ripple {
    fn new(center: Point2D, defaults: &CursorDefaults) -> Self {
        let duration = defaults.ripple_duration_ms;
        Self {
            center,
            size: Tween::new(0.0, defaults.ripple_size, duration, Easing::EaseOut),
            opacity: Tween::new(RIPPLE_START_OPACITY, 0.0, duration, Easing::EaseOut),
            elapsed_ms: 0.0,
        }
    }

    fn frame(&self) -> RippleFrame {
        RippleFrame {
            center: self.center,
            size: self.size.value_at(self.elapsed_ms),
            opacity: self.opacity.value_at(self.elapsed_ms),
        }
    }

    fn is_finished(&self) -> bool {
        self.size.is_finished_at(self.elapsed_ms)
    }
}

/// One follower at one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FollowerFrame {
    pub position: Point2D,
    pub appearance: Appearance,
}

/// Everything the renderer needs to draw the cursor for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorFrame {
    pub variant: CursorVariant,
    pub ring: FollowerFrame,
    pub dot: FollowerFrame,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ripple: Option<RippleFrame>,
}

#[derive(Debug, Clone, Copy)]
struct CursorTuning {
    ring: SpringParams,
    dot: SpringParams,
    throttle_ms: u64,
    ring_transition_ms: f64,
    dot_transition_ms: f64,
    ripples: bool,
}

impl CursorTuning {
    fn for_device(reduced: bool, springs: &SpringPresets, defaults: &CursorDefaults) -> Self {
        if reduced {
            Self {
                ring: springs.cursor_ring_reduced,
                dot: springs.cursor_dot_reduced,
                throttle_ms: defaults.reduced_throttle_ms,
                ring_transition_ms: RING_TRANSITION_REDUCED_MS,
                dot_transition_ms: DOT_TRANSITION_REDUCED_MS,
                ripples: false,
            }
        } else {
            Self {
                ring: springs.cursor_ring,
                dot: springs.cursor_dot,
                throttle_ms: defaults.throttle_ms,
                ring_transition_ms: RING_TRANSITION_MS,
                dot_transition_ms: DOT_TRANSITION_MS,
                ripples: true,
            }
        }
    }
}

/// Sprung ring-and-dot cursor.
#[derive(Debug, Clone)]
pub struct CustomCursor {
    enabled: bool,
    profile: DeviceProfile,
    springs: SpringPresets,
    defaults: CursorDefaults,
    tuning: CursorTuning,
    preference: AnimationPreference,
    throttle: Throttle,

    pointer: Option<PointerSample>,
    ring: Spring2D,
    dot: Spring2D,

    hovering: bool,
    pressed: bool,
    ring_look: AppearanceTransition,
    dot_look: AppearanceTransition,
    ripple: Option<Ripple>,
}

impl CustomCursor {
    pub fn new(profile: &DeviceProfile, preference: AnimationPreference, config: &MotionConfig) -> Self {
        let mut profile = profile.clone();
        profile.mobile_max_width = config.cursor.mobile_max_width;
        let enabled = profile.supports_custom_cursor();
        let tuning =
            CursorTuning::for_device(profile.should_reduce_animations(), &config.springs, &config.cursor);
        if enabled {
            tracing::debug!(
                throttle_ms = tuning.throttle_ms,
                reduced = profile.should_reduce_animations(),
                "Custom cursor enabled"
            );
        } else {
            tracing::info!(
                viewport_width = profile.viewport_width,
                touch_primary = profile.touch_primary,
                "Custom cursor disabled for this device"
            );
        }

        Self {
            enabled,
            springs: config.springs,
            defaults: config.cursor,
            tuning,
            preference,
            throttle: Throttle::new(tuning.throttle_ms),
            pointer: None,
            ring: Spring2D::new(tuning.ring),
            dot: Spring2D::new(tuning.dot),
            hovering: false,
            pressed: false,
            ring_look: AppearanceTransition::settled(CursorVariant::Default.ring_appearance(false)),
            dot_look: AppearanceTransition::settled(CursorVariant::Default.dot_appearance()),
            ripple: None,
            profile,
        }
    }

    /// Whether the platform pointer is hidden and replaced.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn variant(&self) -> CursorVariant {
        if self.pressed {
            CursorVariant::Clicking
        } else {
            self.hover_variant()
        }
    }

    fn hover_variant(&self) -> CursorVariant {
        if self.hovering {
            CursorVariant::Hover
        } else {
            CursorVariant::Default
        }
    }

    /// Route a raw input event. Enter/leave targets are resolved in `tree`.
    pub fn handle_event(&mut self, event: &InputEvent, tree: &ElementTree) {
        match &event.kind {
            EventKind::PointerMove { x, y } => {
                self.on_pointer_move(PointerSample::new(*x, *y, event.timestamp_ms))
            }
            EventKind::PointerDown { .. } => self.on_pointer_down(),
            EventKind::PointerUp { .. } => self.on_pointer_up(),
            EventKind::PointerEnter { target } => self.on_pointer_enter(tree, *target),
            EventKind::PointerLeave { target } => self.on_pointer_leave(tree, *target),
            EventKind::Resize { width, .. } => self.resize(*width),
            EventKind::Scroll { .. } => {}
        }
    }

    /// Record the latest pointer position, subject to the move throttle.
    pub fn on_pointer_move(&mut self, sample: PointerSample) {
        if !self.enabled || !sample.point().is_finite() {
            return;
        }
        if !self.throttle.should_fire(sample.timestamp_ms) {
            return;
        }
        let first = self.pointer.is_none();
        self.pointer = Some(sample);
        if first || !self.preference.should_animate() {
            // Nothing to trail from yet, or trailing is off.
            self.ring.jump_to(sample.point());
            self.dot.jump_to(sample.point());
        } else {
            self.ring.set_target(sample.point());
            self.dot.set_target(sample.point());
        }
    }

    pub fn on_pointer_down(&mut self) {
        if !self.enabled {
            return;
        }
        self.pressed = true;
        self.retarget_looks();
        if self.tuning.ripples && self.preference.should_animate() {
            if let Some(pointer) = self.pointer {
                self.ripple = Some(Ripple::new(pointer.point(), &self.defaults));
            }
        }
    }

    pub fn on_pointer_up(&mut self) {
        if !self.enabled {
            return;
        }
        self.pressed = false;
        self.retarget_looks();
    }

    /// Hover probe for the element the pointer just entered.
    pub fn on_pointer_enter(&mut self, tree: &ElementTree, target: Option<NodeId>) {
        if !self.enabled {
            return;
        }
        let Some(target) = target else {
            tracing::warn!("Pointer enter without a target; keeping cursor variant");
            return;
        };
        match hover::is_interactive(tree, target) {
            Ok(interactive) => self.set_hovering(interactive),
            Err(e) => {
                tracing::warn!(error = %e, "Hover probe failed on enter; keeping cursor variant")
            }
        }
    }

    /// The pointer left `target` and is back over its parent.
    pub fn on_pointer_leave(&mut self, tree: &ElementTree, target: Option<NodeId>) {
        if !self.enabled {
            return;
        }
        let Some(target) = target else {
            tracing::warn!("Pointer leave without a target; keeping cursor variant");
            return;
        };
        match hover::is_interactive_after_leave(tree, target) {
            Ok(interactive) => self.set_hovering(interactive),
            Err(e) => {
                tracing::warn!(error = %e, "Hover probe failed on leave; keeping cursor variant")
            }
        }
    }

    fn set_hovering(&mut self, hovering: bool) {
        if self.hovering != hovering {
            tracing::trace!(hovering, "Cursor hover changed");
            self.hovering = hovering;
            self.retarget_looks();
        }
    }

    fn retarget_looks(&mut self) {
        let (ring_ms, dot_ms) = if self.preference.should_animate() {
            (self.tuning.ring_transition_ms, self.tuning.dot_transition_ms)
        } else {
            (0.0, 0.0)
        };
        self.ring_look
            .retarget(self.variant().ring_appearance(self.hovering), ring_ms);
        self.dot_look.retarget(self.hover_variant().dot_appearance(), dot_ms);
    }

    /// Viewport width changed; the device may have crossed the mobile
    /// breakpoint.
    pub fn resize(&mut self, viewport_width: f64) {
        self.profile.resize(viewport_width);
        let enabled = self.profile.supports_custom_cursor();
        if enabled != self.enabled {
            tracing::info!(viewport_width, enabled, "Custom cursor availability changed");
            self.enabled = enabled;
        }
        let tuning = CursorTuning::for_device(
            self.profile.should_reduce_animations(),
            &self.springs,
            &self.defaults,
        );
        self.ring.set_params(tuning.ring);
        self.dot.set_params(tuning.dot);
        self.throttle = Throttle::new(tuning.throttle_ms);
        self.tuning = tuning;
        if !enabled {
            self.pointer = None;
            self.ripple = None;
            self.pressed = false;
        }
    }

    pub fn set_preference(&mut self, preference: AnimationPreference) {
        self.preference = preference;
        if !preference.should_animate() {
            self.ripple = None;
            if let Some(pointer) = self.pointer {
                self.ring.jump_to(pointer.point());
                self.dot.jump_to(pointer.point());
            }
        }
    }

    /// Advance one frame. `None` while disabled or before the first pointer
    /// sample, in which case nothing should be drawn.
    pub fn advance(&mut self, dt_ms: f64) -> Option<CursorFrame> {
        if !self.enabled {
            return None;
        }
        if self.pointer.is_none() {
            return None;
        }

        let ring = self.ring.advance(dt_ms);
        let dot = self.dot.advance(dt_ms);
        self.ring_look.advance(dt_ms);
        self.dot_look.advance(dt_ms);

        let mut ripple_done = false;
        if let Some(ripple) = self.ripple.as_mut() {
            ripple.elapsed_ms += dt_ms.max(0.0);
            ripple_done = ripple.is_finished();
        }
        let ripple = self.ripple.as_ref().map(Ripple::frame);
        if ripple_done {
            // The pressed look ends with its ripple.
            self.ripple = None;
            if self.pressed {
                self.pressed = false;
                self.retarget_looks();
            }
        }

        Some(CursorFrame {
            variant: self.variant(),
            ring: FollowerFrame {
                position: ring,
                appearance: self.ring_look.current(),
            },
            dot: FollowerFrame {
                position: dot,
                appearance: self.dot_look.current(),
            },
            ripple,
        })
    }

    /// Both followers are on the pointer and no ripple is playing.
    pub fn is_idle(&self) -> bool {
        self.ring.is_at_rest() && self.dot.is_at_rest() && self.ripple.is_none()
    }
}
