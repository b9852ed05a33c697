//! Raw input event types.
//!
//! Recorded sessions are stored as JSONL: an optional `# {header}` comment
//! line followed by one event object per line. Pointer coordinates are CSS
//! pixels relative to the viewport.

use serde::{Deserialize, Serialize};

use crate::element::{ElementTree, NodeId};
use crate::geometry::{Point2D, ViewportSize};

/// Milliseconds on the monotonic animation clock.
pub type TimestampMs = f64;

/// Latest raw pointer or touch coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    pub timestamp_ms: TimestampMs,
}

impl PointerSample {
    pub fn new(x: f64, y: f64, timestamp_ms: TimestampMs) -> Self {
        Self { x, y, timestamp_ms }
    }

    pub fn point(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// Velocity in px/s from `previous` to `self`, or `None` when the
    /// samples are not strictly ordered in time.
    pub fn velocity_since(&self, previous: &PointerSample) -> Option<Point2D> {
        let dt = (self.timestamp_ms - previous.timestamp_ms) / 1000.0;
        if dt <= 0.0 || !dt.is_finite() {
            return None;
        }
        Some(Point2D::new(
            (self.x - previous.x) / dt,
            (self.y - previous.y) / dt,
        ))
    }
}

/// A single input event with timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    #[serde(rename = "t")]
    pub timestamp_ms: TimestampMs,

    #[serde(flatten)]
    pub kind: EventKind,
}

/// Discriminated union of event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// Pointer moved.
    PointerMove { x: f64, y: f64 },

    /// Primary button pressed.
    PointerDown { x: f64, y: f64 },

    /// Primary button released.
    PointerUp { x: f64, y: f64 },

    /// Pointer entered an element. `target` is absent when the platform
    /// could not resolve one.
    PointerEnter {
        #[serde(default)]
        target: Option<NodeId>,
    },

    /// Pointer left an element.
    PointerLeave {
        #[serde(default)]
        target: Option<NodeId>,
    },

    /// Document scrolled to vertical position `y` (px).
    Scroll { y: f64 },

    /// Viewport resized.
    Resize { width: f64, height: f64 },
}

impl InputEvent {
    pub fn pointer_move(timestamp_ms: TimestampMs, x: f64, y: f64) -> Self {
        Self {
            timestamp_ms,
            kind: EventKind::PointerMove { x, y },
        }
    }

    pub fn pointer_down(timestamp_ms: TimestampMs, x: f64, y: f64) -> Self {
        Self {
            timestamp_ms,
            kind: EventKind::PointerDown { x, y },
        }
    }

    pub fn pointer_up(timestamp_ms: TimestampMs, x: f64, y: f64) -> Self {
        Self {
            timestamp_ms,
            kind: EventKind::PointerUp { x, y },
        }
    }

    pub fn pointer_enter(timestamp_ms: TimestampMs, target: Option<NodeId>) -> Self {
        Self {
            timestamp_ms,
            kind: EventKind::PointerEnter { target },
        }
    }

    pub fn pointer_leave(timestamp_ms: TimestampMs, target: Option<NodeId>) -> Self {
        Self {
            timestamp_ms,
            kind: EventKind::PointerLeave { target },
        }
    }

    pub fn scroll(timestamp_ms: TimestampMs, y: f64) -> Self {
        Self {
            timestamp_ms,
            kind: EventKind::Scroll { y },
        }
    }

    pub fn resize(timestamp_ms: TimestampMs, width: f64, height: f64) -> Self {
        Self {
            timestamp_ms,
            kind: EventKind::Resize { width, height },
        }
    }

    /// Extract a pointer sample if this event carries a position.
    pub fn pointer_sample(&self) -> Option<PointerSample> {
        match self.kind {
            EventKind::PointerMove { x, y }
            | EventKind::PointerDown { x, y }
            | EventKind::PointerUp { x, y } => Some(PointerSample::new(x, y, self.timestamp_ms)),
            _ => None,
        }
    }
}

/// Metadata written as the `# {...}` first line of a session file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Viewport at session start.
    pub viewport: ViewportSize,

    /// Reported user agent, used for device classification.
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Whether the primary pointer is a touch screen.
    #[serde(default)]
    pub touch_primary: bool,

    /// Elements that `pointer_enter`/`pointer_leave` targets refer to.
    #[serde(default)]
    pub elements: ElementTree,
}

impl Default for SessionHeader {
    fn default() -> Self {
        Self {
            schema_version: "1.0".to_string(),
            viewport: ViewportSize::default(),
            user_agent: None,
            touch_primary: false,
            elements: ElementTree::new(),
        }
    }
}

/// A recorded session: header plus ordered events.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub header: SessionHeader,
    pub events: Vec<InputEvent>,
}

/// Parse events from JSONL content (one JSON object per line).
pub fn parse_events(jsonl: &str) -> Result<Vec<InputEvent>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Parse a whole session. The header comes from the first `# {...}` line;
/// without one the default header is used.
pub fn parse_session(jsonl: &str) -> Result<Session, serde_json::Error> {
    let header = jsonl
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| line.strip_prefix('#'))
        .map(|json| serde_json::from_str::<SessionHeader>(json.trim()))
        .transpose()?
        .unwrap_or_default();

    Ok(Session {
        header,
        events: parse_events(jsonl)?,
    })
}

/// Serialize events to JSONL format.
pub fn serialize_events(events: &[InputEvent]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for event in events {
        output.push_str(&serde_json::to_string(event)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_format() {
        let event = InputEvent::pointer_move(16.5, 120.0, 80.0);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"t\":16.5"));
        assert!(json.contains("\"type\":\"pointer_move\""));
        assert!(json.contains("\"x\":120.0"));
    }

    #[test]
    fn test_enter_without_target_parses() {
        let parsed: InputEvent =
            serde_json::from_str(r#"{"t":5,"type":"pointer_enter"}"#).unwrap();
        assert_eq!(parsed, InputEvent::pointer_enter(5.0, None));
    }

    #[test]
    fn test_jsonl_roundtrip_with_comments() {
        let events = vec![
            InputEvent::pointer_move(0.0, 10.0, 10.0),
            InputEvent::pointer_enter(4.0, Some(NodeId(2))),
            InputEvent::scroll(8.0, 300.0),
        ];
        let jsonl = format!("# comment\n\n{}", serialize_events(&events).unwrap());
        assert_eq!(parse_events(&jsonl).unwrap(), events);
    }

    #[test]
    fn test_pointer_sample_extraction() {
        let down = InputEvent::pointer_down(10.0, 1.0, 2.0);
        assert_eq!(down.pointer_sample(), Some(PointerSample::new(1.0, 2.0, 10.0)));
        assert_eq!(InputEvent::scroll(0.0, 5.0).pointer_sample(), None);
    }

    #[test]
    fn test_velocity_since() {
        let a = PointerSample::new(0.0, 0.0, 0.0);
        let b = PointerSample::new(10.0, -5.0, 100.0);
        assert_eq!(b.velocity_since(&a), Some(Point2D::new(100.0, -50.0)));
        assert_eq!(a.velocity_since(&b), None);
        assert_eq!(a.velocity_since(&a), None);
    }

    #[test]
    fn test_parse_session_header() {
        let jsonl = concat!(
            "# {\"schema_version\":\"1.0\",\"viewport\":{\"width\":1280.0,\"height\":720.0},",
            "\"elements\":[{\"tag\":\"a\"},{\"tag\":\"span\",\"parent\":0}]}\n",
            "{\"t\":0,\"type\":\"pointer_move\",\"x\":1.0,\"y\":2.0}\n",
        );
        let session = parse_session(jsonl).unwrap();
        assert_eq!(session.header.viewport, ViewportSize::new(1280.0, 720.0));
        assert_eq!(session.header.elements.len(), 2);
        assert_eq!(session.events.len(), 1);
    }

    #[test]
    fn test_parse_session_without_header() {
        let session = parse_session("{\"t\":0,\"type\":\"scroll\",\"y\":1.0}\n").unwrap();
        assert_eq!(session.header, SessionHeader::default());
        assert_eq!(session.events.len(), 1);
    }
}
