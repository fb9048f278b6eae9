//! Input sources.
//!
//! Every producer of horizontal positions (mouse and touch drags, a face
//! detector, anything else) is adapted to one [`PointerInput`] vocabulary so
//! the tracker holds the only copy of the target-frame math.

use turntable_model::event::{EventKind, InputEvent};

use crate::tracker::PositionSample;

/// Source-agnostic pointer input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    /// A drag begins at this position.
    Start(f64),
    /// The dragged pointer moved.
    Move(PositionSample),
    /// The drag ended.
    End,
    /// A free-standing position that drives rotation without a drag.
    Position(PositionSample),
}

/// Adapts raw events from one producer into [`PointerInput`].
pub trait PositionSource {
    /// Source name for logging.
    fn name(&self) -> &str;

    /// Translate an event, or `None` if it does not belong to this source.
    fn translate(&self, event: &InputEvent) -> Option<PointerInput>;
}

/// Mouse and touch drags on the viewer surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragSource;

impl PositionSource for DragSource {
    fn name(&self) -> &str {
        "drag"
    }

    fn translate(&self, event: &InputEvent) -> Option<PointerInput> {
        match event.kind {
            EventKind::DragStart { x } => Some(PointerInput::Start(x)),
            EventKind::DragMove { x } => Some(PointerInput::Move(PositionSample::new(
                x,
                event.timestamp_ms,
            ))),
            EventKind::DragEnd => Some(PointerInput::End),
            _ => None,
        }
    }
}

/// Face positions from an external detector.
///
/// Only stable (CamShift) readings are forwarded, and x is scaled from the
/// detector's frame into the drag surface's space.
#[derive(Debug, Clone, Copy)]
pub struct DetectorSource {
    scale: f64,
}

impl DetectorSource {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl PositionSource for DetectorSource {
    fn name(&self) -> &str {
        "detector"
    }

    fn translate(&self, event: &InputEvent) -> Option<PointerInput> {
        match event.kind {
            EventKind::Detection { x, detection, .. } if detection.is_stable() => Some(
                PointerInput::Position(PositionSample::new(x * self.scale, event.timestamp_ms)),
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turntable_model::event::DetectionStage;

    #[test]
    fn test_drag_source_maps_lifecycle() {
        let source = DragSource;
        assert_eq!(
            source.translate(&InputEvent::drag_start(0, 12.0)),
            Some(PointerInput::Start(12.0))
        );
        assert_eq!(
            source.translate(&InputEvent::drag_move(16, 20.0)),
            Some(PointerInput::Move(PositionSample::new(20.0, 16)))
        );
        assert_eq!(
            source.translate(&InputEvent::drag_end(30)),
            Some(PointerInput::End)
        );
        assert_eq!(
            source.translate(&InputEvent::detection(0, 1.0, DetectionStage::CamShift)),
            None
        );
    }

    #[test]
    fn test_detector_scales_stable_readings() {
        let source = DetectorSource::new(2.0);
        assert_eq!(
            source.translate(&InputEvent::detection(40, 160.0, DetectionStage::CamShift)),
            Some(PointerInput::Position(PositionSample::new(320.0, 40)))
        );
    }

    #[test]
    fn test_detector_ignores_unstable_readings() {
        let source = DetectorSource::new(2.0);
        assert_eq!(
            source.translate(&InputEvent::detection(40, 160.0, DetectionStage::ViolaJones)),
            None
        );
        assert_eq!(source.translate(&InputEvent::drag_move(40, 160.0)), None);
    }
}
