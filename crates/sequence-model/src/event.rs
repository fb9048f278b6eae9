//! Input event types for the Turntable event stream.
//!
//! Events are exchanged as JSONL, one object per line. Lines starting with
//! `#` carry a header and are skipped by the parser.

use serde::{Deserialize, Serialize};
use turntable_common::clock::TimestampMs;

/// Tracking stage reported by the face detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetectionStage {
    /// Initial Viola-Jones detection; positions are not yet stable.
    #[serde(rename = "VJ")]
    ViolaJones,
    /// CamShift tracking of an already detected face.
    #[serde(rename = "CS")]
    CamShift,
}

impl DetectionStage {
    /// Whether positions in this stage are stable enough to drive rotation.
    pub fn is_stable(self) -> bool {
        matches!(self, Self::CamShift)
    }
}

/// A single input event with timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    /// Milliseconds since session start.
    #[serde(rename = "t")]
    pub timestamp_ms: TimestampMs,

    /// The event payload.
    #[serde(flatten)]
    pub kind: EventKind,
}

/// Discriminated union of event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// Pointer pressed (mouse down or touch start) on the viewer surface.
    DragStart { x: f64 },

    /// Pointer moved. Only meaningful while a drag is active.
    DragMove { x: f64 },

    /// Pointer released anywhere.
    DragEnd,

    /// Tracked face position from an external detector.
    Detection {
        /// Horizontal centre of the face in detector pixels.
        x: f64,
        /// Width of the detected face in detector pixels.
        #[serde(default)]
        width: f64,
        /// Tracking stage.
        detection: DetectionStage,
    },

    /// The interactive surface changed width.
    Resize { width: f64 },
}

/// Metadata written as the first line of a recorded event stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventStreamHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Wall-clock time at session start (RFC 3339).
    pub epoch_wall: String,

    /// Width of the drag surface when recording started.
    pub track_width: f64,

    /// Number of frames in the viewed sequence.
    pub total_frames: usize,
}

impl InputEvent {
    pub fn drag_start(timestamp_ms: TimestampMs, x: f64) -> Self {
        Self {
            timestamp_ms,
            kind: EventKind::DragStart { x },
        }
    }

    pub fn drag_move(timestamp_ms: TimestampMs, x: f64) -> Self {
        Self {
            timestamp_ms,
            kind: EventKind::DragMove { x },
        }
    }

    pub fn drag_end(timestamp_ms: TimestampMs) -> Self {
        Self {
            timestamp_ms,
            kind: EventKind::DragEnd,
        }
    }

    pub fn detection(timestamp_ms: TimestampMs, x: f64, detection: DetectionStage) -> Self {
        Self {
            timestamp_ms,
            kind: EventKind::Detection {
                x,
                width: 0.0,
                detection,
            },
        }
    }

    pub fn resize(timestamp_ms: TimestampMs, width: f64) -> Self {
        Self {
            timestamp_ms,
            kind: EventKind::Resize { width },
        }
    }

    /// Horizontal position carried by the event, if any.
    pub fn position_x(&self) -> Option<f64> {
        match &self.kind {
            EventKind::DragStart { x } | EventKind::DragMove { x } => Some(*x),
            EventKind::Detection { x, .. } => Some(*x),
            EventKind::DragEnd | EventKind::Resize { .. } => None,
        }
    }
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
    fn test_drag_move_wire_format() {
        let event = InputEvent::drag_move(1234, 42.5);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"t\":1234"));
        assert!(json.contains("\"type\":\"drag_move\""));
        assert!(json.contains("\"x\":42.5"));
    }

    #[test]
    fn test_drag_end_has_no_payload() {
        let parsed: InputEvent = serde_json::from_str(r#"{"t":5,"type":"drag_end"}"#).unwrap();
        assert_eq!(parsed, InputEvent::drag_end(5));
        assert_eq!(parsed.position_x(), None);
    }

    #[test]
    fn test_detection_stage_uses_detector_codes() {
        let parsed: InputEvent = serde_json::from_str(
            r#"{"t":40,"type":"detection","x":160.0,"width":80.0,"detection":"CS"}"#,
        )
        .unwrap();
        match parsed.kind {
            EventKind::Detection {
                x,
                width,
                detection,
            } => {
                assert_eq!(x, 160.0);
                assert_eq!(width, 80.0);
                assert_eq!(detection, DetectionStage::CamShift);
                assert!(detection.is_stable());
            }
            other => panic!("unexpected kind: {other:?}"),
        }

        let vj: DetectionStage = serde_json::from_str("\"VJ\"").unwrap();
        assert!(!vj.is_stable());
    }

    #[test]
    fn test_parse_events_skips_header_comment() {
        let jsonl = "# {\"schema_version\":\"1.0\"}\n\n{\"t\":0,\"type\":\"drag_start\",\"x\":10.0}\n";
        let parsed = parse_events(jsonl).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].position_x(), Some(10.0));
    }

    #[test]
    fn test_parse_events_reports_bad_line() {
        assert!(parse_events("{\"t\":0,\"type\":\"teleport\"}").is_err());
    }

    #[test]
    fn test_jsonl_roundtrip() {
        let events = vec![
            InputEvent::drag_start(0, 100.0),
            InputEvent::drag_move(20, 136.0),
            InputEvent::detection(30, 150.0, DetectionStage::ViolaJones),
            InputEvent::resize(35, 720.0),
            InputEvent::drag_end(40),
        ];
        let jsonl = serialize_events(&events).unwrap();
        assert_eq!(jsonl.lines().count(), 5);
        assert_eq!(parse_events(&jsonl).unwrap(), events);
    }
}
