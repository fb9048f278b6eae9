//! Deterministic playback of an event stream in virtual time.
//!
//! Ticks fire every tick interval while the scheduler is running, counted
//! from the moment it started. An event stamped at or before a pending tick
//! is applied first. After the last event, ticks continue until the
//! animation settles.

use serde::{Deserialize, Serialize};
use turntable_common::clock::TimestampMs;
use turntable_common::error::TurntableResult;
use turntable_model::event::InputEvent;

use crate::scheduler::TickOutcome;
use crate::state::AnimationState;
use crate::viewer::Viewer;

/// One visible frame change produced during playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameChange {
    /// Virtual time of the tick.
    pub time_ms: TimestampMs,
    /// Unbounded frame counter after the tick.
    pub current_frame: i64,
    /// Target at the time of the tick.
    pub target_frame: i64,
    /// Slot on screen after the tick.
    pub normalized: usize,
}

/// Summary of a playback run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplayReport {
    /// Ticks that advanced the frame.
    pub ticks: u64,
    /// Events the viewer acted on.
    pub events_applied: usize,
    /// Events dropped (not ready, outside the sampling window, unclaimed).
    pub events_ignored: usize,
    /// Per-tick trace.
    pub changes: Vec<FrameChange>,
    /// Virtual time when playback finished.
    pub ended_at_ms: TimestampMs,
    /// State at the end of playback.
    pub final_state: AnimationState,
}

/// Play `events` through `viewer` without sleeping.
pub fn replay<A>(viewer: &mut Viewer<A>, events: &[InputEvent]) -> TurntableResult<ReplayReport> {
    let interval = (viewer.scheduler().tick_interval().as_millis() as TimestampMs).max(1);

    let mut ordered: Vec<&InputEvent> = events.iter().collect();
    ordered.sort_by_key(|e| e.timestamp_ms);
    let mut pending = ordered.into_iter().peekable();

    let mut report = ReplayReport::default();
    let mut now: TimestampMs = 0;
    let mut next_tick: TimestampMs = interval;

    loop {
        let next_event = pending.peek().map(|e| e.timestamp_ms);

        if viewer.is_running() {
            if let Some(t) = next_event.filter(|t| *t <= next_tick) {
                now = now.max(t);
                if let Some(event) = pending.next() {
                    apply(viewer, event, &mut report)?;
                }
                continue;
            }

            now = next_tick;
            next_tick += interval;
            if let TickOutcome::Advanced { current_frame, .. } = viewer.tick() {
                report.ticks += 1;
                report.changes.push(FrameChange {
                    time_ms: now,
                    current_frame,
                    target_frame: viewer.target_frame(),
                    normalized: viewer.normalized_frame(),
                });
            }
        } else {
            let Some(event) = pending.next() else { break };
            now = now.max(event.timestamp_ms);
            apply(viewer, event, &mut report)?;
            if viewer.is_running() {
                next_tick = now + interval;
            }
        }
    }

    report.ended_at_ms = now;
    report.final_state = *viewer.state();
    tracing::debug!(
        ticks = report.ticks,
        applied = report.events_applied,
        ignored = report.events_ignored,
        final_frame = report.final_state.current_frame,
        "Replay finished"
    );
    Ok(report)
}

fn apply<A>(
    viewer: &mut Viewer<A>,
    event: &InputEvent,
    report: &mut ReplayReport,
) -> TurntableResult<()> {
    if viewer.handle_event(event)? {
        report.events_applied += 1;
    } else {
        report.events_ignored += 1;
    }
    Ok(())
}
