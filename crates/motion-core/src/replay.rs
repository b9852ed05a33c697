//! Offline replay of a recorded session through the whole engine.
//!
//! A replay mounts the same elements a page would (cursor, two marquee
//! strips running opposite ways, a parallax layer and the intro) on one
//! [`InputBus`], then steps a fixed-rate frame clock over the recording.
//! Events stamped at or before a frame's time are dispatched before that
//! frame runs.

use std::path::PathBuf;

use folio_common::clock::FrameClock;
use folio_common::config::MotionConfig;
use folio_common::error::{FolioError, FolioResult};
use folio_input_model::element::ElementTree;
use folio_input_model::event::{InputEvent, Session};
use folio_input_model::geometry::ViewportSize;
use folio_preferences::{AnimationPreference, DeviceProfile};

use crate::cursor::CustomCursor;
use crate::intro::IntroTimeline;
use crate::marquee::Marquee;
use crate::mounted::{MountedCursor, MountedMarquee, MountedTracker};
use crate::subscription::InputBus;
use crate::trace::{FrameTrace, TraceHeader, TraceWriter, TRACE_SCHEMA_VERSION};

/// Knobs of a replay run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayOptions {
    /// Time between rendered frames.
    pub frame_interval_ms: f64,
    /// Keep rendering this long after the last event so springs can settle.
    pub tail_ms: f64,
    /// Marquee track length. Offsets wrap into `[-length, 0)`.
    pub track_length: f64,
    pub parallax_strength: f64,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            frame_interval_ms: 1000.0 / 60.0,
            tail_ms: 500.0,
            track_length: 100.0,
            parallax_strength: 0.1,
        }
    }
}

/// Device profile implied by a session header.
pub fn device_from_session(session: &Session, preference: AnimationPreference) -> DeviceProfile {
    DeviceProfile {
        user_agent: session.header.user_agent.clone().unwrap_or_default(),
        viewport_width: session.header.viewport.width,
        touch_primary: session.header.touch_primary,
        prefers_reduced_motion: preference.reduced_motion_requested,
        ..DeviceProfile::default()
    }
}

/// A session mounted and ready to play.
pub struct SessionReplay {
    bus: InputBus,
    tree: ElementTree,
    events: Vec<InputEvent>,
    next_event: usize,
    clock: FrameClock,
    options: ReplayOptions,
    viewport: ViewportSize,
    preference: AnimationPreference,
    cursor: MountedCursor,
    marquees: Vec<MountedMarquee>,
    parallax: MountedTracker,
    intro: IntroTimeline,
}

impl SessionReplay {
    pub fn new(
        session: &Session,
        config: &MotionConfig,
        preference: AnimationPreference,
        options: ReplayOptions,
    ) -> FolioResult<Self> {
        if !(options.frame_interval_ms > 0.0) || !options.frame_interval_ms.is_finite() {
            return Err(FolioError::motion(format!(
                "frame interval must be positive, got {}",
                options.frame_interval_ms
            )));
        }
        session
            .header
            .elements
            .validate()
            .map_err(|e| FolioError::input(format!("Invalid element tree: {e}")))?;

        let mut events = session.events.clone();
        events.sort_by(|a, b| a.timestamp_ms.total_cmp(&b.timestamp_ms));

        let viewport = session.header.viewport;
        let device = device_from_session(session, preference);
        let bus = InputBus::new();

        let cursor = MountedCursor::mount(&bus, CustomCursor::new(&device, preference, config));
        let strip = |base_velocity: f64| {
            let marquee = Marquee::new(
                &config.marquee,
                config.springs.scroll_velocity,
                options.track_length,
                preference,
            )
            .with_base_velocity(base_velocity);
            MountedMarquee::mount(&bus, marquee)
        };
        let base = config.marquee.base_velocity;
        let marquees = vec![strip(base), strip(-base)];
        let parallax = MountedTracker::parallax(
            &bus,
            config.springs.parallax,
            options.parallax_strength,
            preference,
            viewport,
        );

        tracing::info!(
            events = events.len(),
            elements = session.header.elements.len(),
            cursor_enabled = cursor.cursor().is_enabled(),
            should_animate = preference.should_animate(),
            "Session mounted for replay"
        );

        Ok(Self {
            bus,
            tree: session.header.elements.clone(),
            events,
            next_event: 0,
            clock: FrameClock::start(),
            options,
            viewport,
            preference,
            cursor,
            marquees,
            parallax,
            intro: IntroTimeline::new(preference),
        })
    }

    /// The bus every mounted element listens on.
    pub fn bus(&self) -> &InputBus {
        &self.bus
    }

    pub fn header(&self) -> TraceHeader {
        TraceHeader {
            schema_version: TRACE_SCHEMA_VERSION.to_string(),
            frame_interval_ms: self.options.frame_interval_ms,
            viewport: self.viewport,
            should_animate: self.preference.should_animate(),
            cursor_enabled: self.cursor.cursor().is_enabled(),
        }
    }

    /// Number of frames a full run renders.
    pub fn frame_count(&self) -> u64 {
        let last = self.events.last().map_or(0.0, |e| e.timestamp_ms.max(0.0));
        ((last + self.options.tail_ms.max(0.0)) / self.options.frame_interval_ms).ceil() as u64 + 1
    }

    /// Dispatch due events and render frame `index`. Frames are expected in
    /// order; the first one has a zero delta.
    pub fn step(&mut self, index: u64) -> FrameTrace {
        let t = index as f64 * self.options.frame_interval_ms;
        let dt = self.clock.tick(t);

        while let Some(event) = self.events.get(self.next_event) {
            if event.timestamp_ms > t {
                break;
            }
            self.bus.dispatch(event);
            self.next_event += 1;
        }

        let cursor = self.cursor.frame(dt, &self.tree);
        let parallax = self.parallax.frame(dt);
        let marquees: Vec<_> = self.marquees.iter_mut().map(|m| m.frame(dt)).collect();
        let scroll_velocity_factor = self
            .marquees
            .first()
            .map_or(0.0, |m| m.marquee().velocity_factor());
        let intro = self.intro.advance(dt);

        FrameTrace {
            frame: index,
            timestamp_ms: t,
            cursor,
            parallax,
            marquees,
            scroll_velocity_factor,
            intro,
        }
    }

    /// Render every frame of the session.
    pub fn run(mut self) -> Vec<FrameTrace> {
        let frames = self.frame_count();
        let traces: Vec<_> = (0..frames).map(|i| self.step(i)).collect();
        tracing::debug!(frames, dispatched = self.bus.dispatched(), "Replay finished");
        traces
    }

    /// Render every frame straight into a trace file.
    pub fn run_to_file(mut self, path: PathBuf) -> FolioResult<u64> {
        let mut writer = TraceWriter::new(path, &self.header())?;
        for i in 0..self.frame_count() {
            let frame = self.step(i);
            writer.write_frame(&frame)?;
        }
        writer.flush()?;
        tracing::info!(
            frames = writer.frames_written(),
            path = %writer.path().display(),
            "Trace written"
        );
        Ok(writer.frames_written())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_input_model::element::Element;
    use folio_input_model::event::SessionHeader;

    fn session(events: Vec<InputEvent>) -> Session {
        let mut elements = ElementTree::new();
        let link = elements.insert_root(Element::new("a"));
        elements.insert_child(link, Element::new("span")).unwrap();
        Session {
            header: SessionHeader {
                viewport: ViewportSize::new(1440.0, 900.0),
                elements,
                ..SessionHeader::default()
            },
            events,
        }
    }

    #[test]
    fn test_frame_count_covers_tail() {
        let replay = SessionReplay::new(
            &session(vec![InputEvent::pointer_move(100.0, 1.0, 1.0)]),
            &MotionConfig::default(),
            AnimationPreference::ANIMATED,
            ReplayOptions {
                frame_interval_ms: 10.0,
                tail_ms: 50.0,
                ..ReplayOptions::default()
            },
        )
        .unwrap();
        assert_eq!(replay.frame_count(), 16);
    }

    #[test]
    fn test_rejects_zero_interval() {
        let result = SessionReplay::new(
            &session(Vec::new()),
            &MotionConfig::default(),
            AnimationPreference::ANIMATED,
            ReplayOptions {
                frame_interval_ms: 0.0,
                ..ReplayOptions::default()
            },
        );
        assert!(matches!(result, Err(FolioError::Motion { .. })));
    }

    #[test]
    fn test_events_dispatch_in_time_order() {
        let mut replay = SessionReplay::new(
            &session(vec![
                InputEvent::pointer_move(40.0, 5.0, 5.0),
                InputEvent::pointer_move(10.0, 1.0, 1.0),
            ]),
            &MotionConfig::default(),
            AnimationPreference::ANIMATED,
            ReplayOptions {
                frame_interval_ms: 20.0,
                ..ReplayOptions::default()
            },
        )
        .unwrap();

        replay.step(0);
        assert_eq!(replay.bus().dispatched(), 0);
        replay.step(1);
        assert_eq!(replay.bus().dispatched(), 1);
        replay.step(2);
        assert_eq!(replay.bus().dispatched(), 2);
    }

    #[test]
    fn test_marquees_run_opposite_ways() {
        let replay = SessionReplay::new(
            &session(vec![InputEvent::pointer_move(1000.0, 1.0, 1.0)]),
            &MotionConfig::default(),
            AnimationPreference::ANIMATED,
            ReplayOptions::default(),
        )
        .unwrap();
        let frames = replay.run();
        let frame = &frames[10];
        assert!(frame.marquees[0].translate_x < 0.0);
        assert!(frame.marquees[1].translate_x < 0.0);
        assert_ne!(frame.marquees[0], frame.marquees[1]);
    }
}
