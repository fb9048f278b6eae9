//! Live session loop.
//!
//! Ticks and input share one task: a `select!` over the tick interval and
//! the input channel. The tick branch is only armed while the scheduler is
//! running, so an idle viewer costs nothing but the channel wait.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use turntable_model::event::InputEvent;

use crate::scheduler::TickOutcome;
use crate::viewer::Viewer;

/// Counters for a finished session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Ticks that advanced the frame.
    pub ticks: u64,
    /// Events received from the channel.
    pub events: u64,
    /// Events the viewer acted on.
    pub handled: u64,
    /// Events rejected with an error.
    pub rejected: u64,
    /// Frame counter when the session ended.
    pub final_frame: i64,
}

/// Run `viewer` until `input` is closed and the animation has settled.
pub async fn drive<A>(viewer: &mut Viewer<A>, mut input: mpsc::Receiver<InputEvent>) -> SessionStats {
    let mut ticker = interval(viewer.scheduler().tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.reset();

    let mut stats = SessionStats::default();
    let mut input_open = true;

    loop {
        let running = viewer.is_running();
        if !input_open && !running {
            break;
        }

        tokio::select! {
            _ = ticker.tick(), if running => {
                if let TickOutcome::Advanced { .. } = viewer.tick() {
                    stats.ticks += 1;
                }
            }
            event = input.recv(), if input_open => match event {
                Some(event) => {
                    stats.events += 1;
                    match viewer.handle_event(&event) {
                        Ok(true) => stats.handled += 1,
                        Ok(false) => {}
                        Err(e) => {
                            stats.rejected += 1;
                            tracing::warn!(error = %e, t = event.timestamp_ms, "Rejected input event");
                        }
                    }
                    if !running && viewer.is_running() {
                        ticker.reset();
                    }
                }
                None => {
                    tracing::debug!("Input closed, waiting for animation to settle");
                    input_open = false;
                }
            }
        }
    }

    stats.final_frame = viewer.current_frame();
    tracing::info!(
        ticks = stats.ticks,
        events = stats.events,
        handled = stats.handled,
        final_frame = stats.final_frame,
        "Session ended"
    );
    stats
}
