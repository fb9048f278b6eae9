//! The single mutable animation state shared by tracker, scheduler and
//! compositor.

use serde::{Deserialize, Serialize};

/// Whether the tick loop is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerPhase {
    #[default]
    Idle,
    Running,
}

/// Rotation progress. Frames are unbounded counters; several full turns in
/// either direction accumulate instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnimationState {
    pub current_frame: i64,
    pub target_frame: i64,
    pub phase: SchedulerPhase,
}

impl AnimationState {
    pub fn is_running(&self) -> bool {
        self.phase == SchedulerPhase::Running
    }

    pub fn is_converged(&self) -> bool {
        self.current_frame == self.target_frame
    }

    /// Signed frames left to travel.
    pub fn remaining(&self) -> i64 {
        self.target_frame.saturating_sub(self.current_frame)
    }
}
