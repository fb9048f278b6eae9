//! Clock and sampling utilities.
//!
//! Input timestamps are milliseconds relative to a session epoch. This
//! module provides:
//! - The session clock that stamps live input
//! - The sampling gate that rate-limits pointer processing

use std::time::Instant;

/// Milliseconds since the session epoch.
pub type TimestampMs = u64;

/// A session clock that provides monotonic timestamps relative to a fixed
/// epoch (the moment the viewer session started).
#[derive(Debug, Clone)]
pub struct SessionClock {
    /// The instant the session started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new session clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create a clock from a known epoch.
    pub fn from_epoch(epoch: Instant, wall: String) -> Self {
        Self {
            epoch,
            epoch_wall: wall,
        }
    }

    /// Milliseconds elapsed since the session started.
    pub fn elapsed_ms(&self) -> TimestampMs {
        self.epoch.elapsed().as_millis() as TimestampMs
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }
}

/// Rate limiter for pointer samples.
///
/// A sample passes only when strictly more than `interval_ms` has elapsed
/// since the last sample that passed. Rejected samples leave the gate
/// untouched, so the window is always measured from the last accepted one.
#[derive(Debug, Clone)]
pub struct SampleGate {
    interval_ms: u64,
    last_accepted_ms: Option<TimestampMs>,
}

impl SampleGate {
    /// Create a gate with the given minimum spacing.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_accepted_ms: None,
        }
    }

    /// Returns true and records `now_ms` if the sample may be processed.
    /// The first sample always passes.
    pub fn admit(&mut self, now_ms: TimestampMs) -> bool {
        match self.last_accepted_ms {
            Some(last) if now_ms.saturating_sub(last) <= self.interval_ms => false,
            _ => {
                self.last_accepted_ms = Some(now_ms);
                true
            }
        }
    }

    /// Timestamp of the last admitted sample.
    pub fn last_accepted_ms(&self) -> Option<TimestampMs> {
        self.last_accepted_ms
    }

    /// Minimum spacing in milliseconds.
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_elapsed() {
        let clock = SessionClock::start();
        assert!(clock.elapsed_ms() < 1_000);
        assert!(!clock.epoch_wall().is_empty());
    }

    #[test]
    fn test_sample_gate() {
        let mut gate = SampleGate::new(10);
        assert!(gate.admit(0)); // first sample always passes
        assert!(!gate.admit(5)); // too soon
        assert!(!gate.admit(10)); // exactly one interval is still too soon
        assert!(gate.admit(11));
        assert_eq!(gate.last_accepted_ms(), Some(11));
    }

    #[test]
    fn test_rejected_samples_do_not_move_window() {
        let mut gate = SampleGate::new(10);
        assert!(gate.admit(100));
        for t in 101..=110 {
            assert!(!gate.admit(t));
        }
        assert!(gate.admit(111));
    }

    #[test]
    fn test_out_of_order_sample_is_rejected() {
        let mut gate = SampleGate::new(10);
        assert!(gate.admit(50));
        assert!(!gate.admit(20));
        assert_eq!(gate.last_accepted_ms(), Some(50));
    }
}
