//! Input backend implementations.

use std::collections::VecDeque;
use std::path::Path;

use turntable_common::clock::SessionClock;
use turntable_common::error::{TurntableError, TurntableResult};
use turntable_model::event::{parse_events, InputEvent};

use crate::InputBackend;

/// Releases a prerecorded event stream in real time.
///
/// An event stamped `t` becomes available once `t / rate` milliseconds have
/// passed on the session clock. Events are re-stamped with the release time
/// so the viewer's sampling window sees the pacing it would have seen live.
pub struct ScriptedBackend {
    pending: VecDeque<InputEvent>,
    clock: SessionClock,
    rate: f64,
}

impl ScriptedBackend {
    pub fn new(mut events: Vec<InputEvent>, clock: SessionClock, rate: f64) -> TurntableResult<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(TurntableError::config(format!(
                "playback rate must be positive, got {rate}"
            )));
        }
        events.sort_by_key(|e| e.timestamp_ms);
        Ok(Self {
            pending: events.into(),
            clock,
            rate,
        })
    }

    /// Load a JSONL script from disk.
    pub fn from_file(path: &Path, clock: SessionClock, rate: f64) -> TurntableResult<Self> {
        if !path.is_file() {
            return Err(TurntableError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let events = parse_events(&content)?;
        tracing::debug!(path = %path.display(), events = events.len(), "Loaded input script");
        Self::new(events, clock, rate)
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    fn due_at_ms(&self, event: &InputEvent) -> u64 {
        (event.timestamp_ms as f64 / self.rate).round() as u64
    }
}

impl InputBackend for ScriptedBackend {
    fn poll(&mut self) -> TurntableResult<Option<InputEvent>> {
        let now = self.clock.elapsed_ms();
        match self.pending.front() {
            Some(next) if self.due_at_ms(next) <= now => {
                let mut event = self.pending.pop_front().ok_or_else(|| {
                    TurntableError::input("script queue emptied while polling")
                })?;
                event.timestamp_ms = now;
                Ok(Some(event))
            }
            _ => Ok(None),
        }
    }

    fn name(&self) -> &str {
        "script"
    }

    fn is_exhausted(&self) -> bool {
        self.pending.is_empty()
    }
}
