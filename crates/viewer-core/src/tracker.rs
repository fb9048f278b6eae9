//! Pointer tracking: turns horizontal movement into a target frame.
//!
//! Movement is measured per sampling window, not from the drag origin. Each
//! admitted sample moves the target by the distance covered since the
//! previous admitted sample, scaled so that a drag across `1 / speed` of the
//! surface covers one full turn.

use serde::{Deserialize, Serialize};
use turntable_common::clock::{SampleGate, TimestampMs};
use turntable_common::config::ViewerConfig;
use turntable_common::error::{TurntableError, TurntableResult};

use crate::state::AnimationState;

/// One horizontal position reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub position: f64,
    pub timestamp_ms: TimestampMs,
}

impl PositionSample {
    pub fn new(position: f64, timestamp_ms: TimestampMs) -> Self {
        Self {
            position,
            timestamp_ms,
        }
    }
}

/// An in-progress drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Where the pointer went down.
    pub origin: f64,
}

/// Frames to move for `delta` pixels of travel on a `track_width` surface.
/// Saturates at the `i64` range for extreme travel.
pub fn frame_offset(total_frames: usize, speed_multiplier: f64, delta: f64, track_width: f64) -> i64 {
    let span = total_frames.saturating_sub(1) as f64;
    (span * speed_multiplier * (delta / track_width)).ceil() as i64
}

/// Converts position samples into target frames.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    gate: SampleGate,
    drag: Option<DragSession>,
    /// Position at the start of the current sampling window.
    window_start: f64,
    total_frames: usize,
    speed_multiplier: f64,
    track_width: f64,
    samples_admitted: u64,
}

impl PointerTracker {
    pub fn new(config: &ViewerConfig, track_width: f64) -> TurntableResult<Self> {
        validate_track_width(track_width)?;
        Ok(Self {
            gate: SampleGate::new(config.sampling_interval_ms),
            drag: None,
            window_start: 0.0,
            total_frames: config.total_frames,
            speed_multiplier: config.speed_multiplier,
            track_width,
            samples_admitted: 0,
        })
    }

    pub fn track_width(&self) -> f64 {
        self.track_width
    }

    pub fn set_track_width(&mut self, track_width: f64) -> TurntableResult<()> {
        validate_track_width(track_width)?;
        self.track_width = track_width;
        Ok(())
    }

    /// Open a drag session. A second press while dragging restarts it.
    pub fn drag_start(&mut self, position: f64) {
        self.drag = Some(DragSession { origin: position });
        self.window_start = position;
    }

    /// Close the drag session. Returns whether one was open.
    pub fn drag_end(&mut self) -> bool {
        self.drag.take().is_some()
    }

    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Feed a pointer move. Ignored unless a drag is open.
    pub fn drag_move(&mut self, state: &mut AnimationState, sample: PositionSample) -> Option<i64> {
        if self.drag.is_none() {
            return None;
        }
        self.track(state, sample)
    }

    /// Feed a position from a source that has no press/release notion.
    pub fn position_update(
        &mut self,
        state: &mut AnimationState,
        sample: PositionSample,
    ) -> Option<i64> {
        self.track(state, sample)
    }

    /// Number of samples that passed the rate limit.
    pub fn samples_admitted(&self) -> u64 {
        self.samples_admitted
    }

    fn track(&mut self, state: &mut AnimationState, sample: PositionSample) -> Option<i64> {
        if !sample.position.is_finite() {
            tracing::warn!(position = sample.position, "Dropping non-finite position sample");
            return None;
        }
        if !self.gate.admit(sample.timestamp_ms) {
            tracing::trace!(t = sample.timestamp_ms, "Sample inside sampling window");
            return None;
        }

        let delta = sample.position - self.window_start;
        let offset = frame_offset(
            self.total_frames,
            self.speed_multiplier,
            delta,
            self.track_width,
        );
        state.target_frame = state.current_frame.saturating_add(offset);
        self.window_start = sample.position;
        self.samples_admitted += 1;

        tracing::trace!(
            t = sample.timestamp_ms,
            delta,
            offset,
            target = state.target_frame,
            "Target frame updated"
        );
        Some(state.target_frame)
    }
}

fn validate_track_width(track_width: f64) -> TurntableResult<()> {
    if track_width.is_finite() && track_width > 0.0 {
        Ok(())
    } else {
        Err(TurntableError::config(format!(
            "track width must be a positive number, got {track_width}"
        )))
    }
}
