//! Elements mounted on an [`InputBus`].
//!
//! Mounting subscribes; dropping unsubscribes. Listeners only drop raw
//! samples into the element's mailbox, and `frame` does the work once per
//! rendered frame. If input arrives faster than frames, the newest sample
//! before each frame is the one used.

use folio_common::config::SpringParams;
use folio_input_model::element::ElementTree;
use folio_input_model::event::{EventKind, InputEvent, PointerSample};
use folio_input_model::geometry::{Rect, ViewportSize};
use folio_preferences::{poll_change, AnimationPreference, PreferenceReceiver};

use crate::cursor::{CursorFrame, CustomCursor};
use crate::marquee::Marquee;
use crate::pointer::PointerTracker;
use crate::subscription::{InputBus, Mailbox, Subscription};
use crate::transform::Transform;

#[derive(Debug, Default)]
struct PointerInbox {
    latest: Option<PointerSample>,
    viewport: Option<ViewportSize>,
}

/// A magnetic or parallax element listening to the bus.
#[derive(Debug)]
pub struct MountedTracker {
    tracker: PointerTracker,
    element_rect: Option<Rect>,
    viewport: ViewportSize,
    pointer_inside: bool,
    inbox: Mailbox<PointerInbox>,
    preference_rx: Option<PreferenceReceiver>,
    _subscription: Subscription,
}

impl MountedTracker {
    /// Mount a magnetic element occupying `element_rect`.
    pub fn magnetic(
        bus: &InputBus,
        element_rect: Rect,
        params: SpringParams,
        strength: f64,
        preference: AnimationPreference,
        viewport: ViewportSize,
    ) -> Self {
        let tracker = PointerTracker::magnetic(params, strength, preference);
        Self::mount(bus, tracker, Some(element_rect), viewport)
    }

    /// Mount an element that parallaxes against the whole viewport.
    pub fn parallax(
        bus: &InputBus,
        params: SpringParams,
        strength: f64,
        preference: AnimationPreference,
        viewport: ViewportSize,
    ) -> Self {
        let tracker = PointerTracker::parallax(params, strength, preference);
        Self::mount(bus, tracker, None, viewport)
    }

    fn mount(
        bus: &InputBus,
        tracker: PointerTracker,
        element_rect: Option<Rect>,
        viewport: ViewportSize,
    ) -> Self {
        let inbox: Mailbox<PointerInbox> = Mailbox::new();
        let writer = inbox.clone();
        let subscription = bus.subscribe(move |event| match event.kind {
            EventKind::PointerMove { x, y } => {
                writer.update(|inbox| inbox.latest = Some(PointerSample::new(x, y, event.timestamp_ms)))
            }
            EventKind::Resize { width, height } => {
                writer.update(|inbox| inbox.viewport = Some(ViewportSize::new(width, height)))
            }
            _ => {}
        });
        Self {
            tracker,
            element_rect,
            viewport,
            pointer_inside: false,
            inbox,
            preference_rx: None,
            _subscription: subscription,
        }
    }

    /// Follow preference changes published on `receiver`.
    pub fn with_preference_updates(mut self, receiver: PreferenceReceiver) -> Self {
        self.preference_rx = Some(receiver);
        self
    }

    /// Layout moved the element.
    pub fn set_element_rect(&mut self, rect: Rect) {
        if self.element_rect.is_some() {
            self.element_rect = Some(rect);
        }
    }

    pub fn tracker(&self) -> &PointerTracker {
        &self.tracker
    }

    pub fn is_idle(&self) -> bool {
        self.tracker.is_idle() && !self.inbox.has_mail()
    }

    /// Consume pending input and advance one frame.
    pub fn frame(&mut self, dt_ms: f64) -> Transform {
        if let Some(preference) = self.preference_rx.as_mut().and_then(poll_change) {
            self.tracker.set_preference(preference);
        }

        if let Some(inbox) = self.inbox.take() {
            if let Some(viewport) = inbox.viewport {
                self.viewport = viewport;
            }
            if let Some(sample) = inbox.latest {
                self.apply(&sample);
            }
        }
        Transform::translate(self.tracker.advance(dt_ms))
    }

    fn apply(&mut self, sample: &PointerSample) {
        match self.element_rect {
            Some(rect) => {
                if rect.contains(sample.point()) {
                    self.pointer_inside = true;
                    self.tracker.track(sample, Some(&rect), self.viewport);
                } else if self.pointer_inside {
                    self.pointer_inside = false;
                    self.tracker.release();
                }
            }
            None => self.tracker.track(sample, None, self.viewport),
        }
    }
}

#[derive(Debug, Default)]
struct CursorInbox {
    pointer: Option<PointerSample>,
    discrete: Vec<InputEvent>,
}

/// The custom cursor listening to the bus.
///
/// Pointer moves coalesce to the latest sample. Enter, leave, button and
/// resize events are kept in order until the next frame so no hover change
/// or click is lost.
///
/// The cursor listens even while disabled: a resize past the mobile
/// breakpoint turns it back on.
#[derive(Debug)]
pub struct MountedCursor {
    cursor: CustomCursor,
    inbox: Mailbox<CursorInbox>,
    preference_rx: Option<PreferenceReceiver>,
    _subscription: Subscription,
}

impl MountedCursor {
    pub fn mount(bus: &InputBus, cursor: CustomCursor) -> Self {
        let inbox: Mailbox<CursorInbox> = Mailbox::new();
        let writer = inbox.clone();
        let subscription = bus.subscribe(move |event| match event.kind {
            EventKind::PointerMove { x, y } => {
                writer.update(|inbox| inbox.pointer = Some(PointerSample::new(x, y, event.timestamp_ms)))
            }
            EventKind::Scroll { .. } => {}
            _ => writer.update(|inbox| inbox.discrete.push(event.clone())),
        });
        Self {
            cursor,
            inbox,
            preference_rx: None,
            _subscription: subscription,
        }
    }

    pub fn with_preference_updates(mut self, receiver: PreferenceReceiver) -> Self {
        self.preference_rx = Some(receiver);
        self
    }

    pub fn cursor(&self) -> &CustomCursor {
        &self.cursor
    }

    /// Consume pending input, run hover probes against `tree`, and advance.
    pub fn frame(&mut self, dt_ms: f64, tree: &ElementTree) -> Option<CursorFrame> {
        if let Some(preference) = self.preference_rx.as_mut().and_then(poll_change) {
            self.cursor.set_preference(preference);
        }
        if let Some(inbox) = self.inbox.take() {
            // Resizes first so the sample sees the cursor's current availability.
            let (resizes, others): (Vec<_>, Vec<_>) = inbox
                .discrete
                .iter()
                .partition(|event| matches!(event.kind, EventKind::Resize { .. }));
            for event in resizes {
                self.cursor.handle_event(event, tree);
            }
            if let Some(sample) = inbox.pointer {
                self.cursor.on_pointer_move(sample);
            }
            for event in others {
                self.cursor.handle_event(event, tree);
            }
        }
        self.cursor.advance(dt_ms)
    }
}

/// A marquee strip listening for scroll events.
#[derive(Debug)]
pub struct MountedMarquee {
    marquee: Marquee,
    inbox: Mailbox<(f64, f64)>,
    preference_rx: Option<PreferenceReceiver>,
    _subscription: Subscription,
}

impl MountedMarquee {
    pub fn mount(bus: &InputBus, marquee: Marquee) -> Self {
        let inbox: Mailbox<(f64, f64)> = Mailbox::new();
        let writer = inbox.clone();
        let subscription = bus.subscribe(move |event| {
            if let EventKind::Scroll { y } = event.kind {
                writer.post((y, event.timestamp_ms));
            }
        });
        Self {
            marquee,
            inbox,
            preference_rx: None,
            _subscription: subscription,
        }
    }

    pub fn with_preference_updates(mut self, receiver: PreferenceReceiver) -> Self {
        self.preference_rx = Some(receiver);
        self
    }

    pub fn marquee(&self) -> &Marquee {
        &self.marquee
    }

    pub fn frame(&mut self, dt_ms: f64) -> Transform {
        if let Some(preference) = self.preference_rx.as_mut().and_then(poll_change) {
            self.marquee.set_preference(preference);
        }
        if let Some((y, timestamp_ms)) = self.inbox.take() {
            self.marquee.on_scroll(y, timestamp_ms);
        }
        self.marquee.advance(dt_ms);
        self.marquee.transform()
    }
}
