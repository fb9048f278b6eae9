//! Eased tick loop.
//!
//! Each tick moves the current frame 10% of the remaining distance toward
//! the target, rounded away from zero so the gap always shrinks by at least
//! one frame. The loop goes idle on the first tick that finds the target
//! reached.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use turntable_common::config::ViewerConfig;

use crate::compositor::Compositor;
use crate::frame_store::normalize_frame;
use crate::state::{AnimationState, SchedulerPhase};

/// Fraction of the remaining distance covered per tick.
pub const EASING_FACTOR: f64 = 0.1;

/// Frames to advance on one tick.
pub fn easing_step(current: i64, target: i64) -> i64 {
    // The gap between two i64 frames can exceed i64.
    let eased = (i128::from(target) - i128::from(current)) as f64 * EASING_FACTOR;
    if target < current {
        eased.floor() as i64
    } else {
        eased.ceil() as i64
    }
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TickOutcome {
    /// The loop was not running.
    Idle,
    /// The current frame moved by `step`.
    Advanced { step: i64, current_frame: i64 },
    /// The target was already reached; the loop stopped.
    Halted,
}

/// Fixed-rate scheduler driving [`AnimationState`] toward its target.
#[derive(Debug, Clone)]
pub struct AnimationScheduler {
    total_frames: usize,
    tick_interval: Duration,
}

impl AnimationScheduler {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            total_frames: config.total_frames,
            tick_interval: Duration::from_millis(config.tick_interval_ms().max(1)),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Start ticking if there is somewhere to go. Returns whether the loop
    /// was started by this call; calling while running does nothing.
    pub fn request_start(&self, state: &mut AnimationState) -> bool {
        if state.is_running() || state.is_converged() {
            return false;
        }
        state.phase = SchedulerPhase::Running;
        tracing::debug!(
            current = state.current_frame,
            target = state.target_frame,
            "Animation started"
        );
        true
    }

    /// Run one tick.
    pub fn tick(&self, state: &mut AnimationState, compositor: &mut Compositor) -> TickOutcome {
        if !state.is_running() {
            return TickOutcome::Idle;
        }
        if state.is_converged() {
            state.phase = SchedulerPhase::Idle;
            tracing::debug!(frame = state.current_frame, "Animation settled");
            return TickOutcome::Halted;
        }

        let step = easing_step(state.current_frame, state.target_frame);
        let shown = normalize_frame(state.current_frame, self.total_frames);
        state.current_frame = state.current_frame.saturating_add(step);
        let next = normalize_frame(state.current_frame, self.total_frames);
        compositor.transition(shown, next);

        tracing::trace!(
            current = state.current_frame,
            target = state.target_frame,
            step,
            "Tick"
        );
        TickOutcome::Advanced {
            step,
            current_frame: state.current_frame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn running(current: i64, target: i64) -> AnimationState {
        AnimationState {
            current_frame: current,
            target_frame: target,
            phase: SchedulerPhase::Running,
        }
    }

    fn scheduler() -> AnimationScheduler {
        AnimationScheduler::new(&ViewerConfig::default())
    }

    #[test]
    fn test_step_rounds_toward_target() {
        assert_eq!(easing_step(0, 100), 10);
        assert_eq!(easing_step(0, 5), 1);
        assert_eq!(easing_step(0, 1), 1);
        assert_eq!(easing_step(0, -5), -1);
        assert_eq!(easing_step(0, -100), -10);
        assert_eq!(easing_step(7, 7), 0);
    }

    #[test]
    fn test_step_across_full_range() {
        let up = easing_step(i64::MIN, i64::MAX);
        assert!(up > 0 && up < i64::MAX);
        let down = easing_step(i64::MAX, i64::MIN);
        assert!(down < 0 && down > i64::MIN);
    }

    #[test]
    fn test_extreme_target_ticks_without_overflow() {
        let s = scheduler();
        let mut compositor = Compositor::new(180);
        compositor.reveal();
        let mut state = running(i64::MIN + 3, i64::MAX);

        for _ in 0..10 {
            s.tick(&mut state, &mut compositor);
        }
        assert!(state.current_frame > 0);
        assert!(state.current_frame < state.target_frame);

        state.target_frame = i64::MIN;
        s.tick(&mut state, &mut compositor);
        assert!(state.current_frame > state.target_frame);
    }

    #[test]
    fn test_start_is_idempotent() {
        let s = scheduler();
        let mut state = AnimationState {
            target_frame: 10,
            ..Default::default()
        };
        assert!(s.request_start(&mut state));
        assert!(!s.request_start(&mut state));
        assert!(state.is_running());
    }

    #[test]
    fn test_start_without_distance_stays_idle() {
        let s = scheduler();
        let mut state = AnimationState::default();
        assert!(!s.request_start(&mut state));
        assert!(!state.is_running());
    }

    #[test]
    fn test_idle_tick_does_nothing() {
        let s = scheduler();
        let mut compositor = Compositor::new(180);
        let mut state = AnimationState {
            target_frame: 50,
            ..Default::default()
        };
        assert_eq!(s.tick(&mut state, &mut compositor), TickOutcome::Idle);
        assert_eq!(state.current_frame, 0);
    }

    #[test]
    fn test_halts_on_tick_after_reaching_target() {
        let s = scheduler();
        let mut compositor = Compositor::new(180);
        compositor.reveal();
        let mut state = running(0, 1);

        assert_eq!(
            s.tick(&mut state, &mut compositor),
            TickOutcome::Advanced {
                step: 1,
                current_frame: 1
            }
        );
        assert!(state.is_running());
        assert_eq!(s.tick(&mut state, &mut compositor), TickOutcome::Halted);
        assert!(!state.is_running());
    }

    #[test]
    fn test_retarget_mid_flight() {
        let s = scheduler();
        let mut compositor = Compositor::new(180);
        compositor.reveal();
        let mut state = running(0, 100);

        s.tick(&mut state, &mut compositor);
        assert_eq!(state.current_frame, 10);

        state.target_frame = -10;
        assert!(!s.request_start(&mut state));
        s.tick(&mut state, &mut compositor);
        assert_eq!(state.current_frame, 8);
    }

    #[test]
    fn test_tick_drives_compositor() {
        let s = scheduler();
        let mut compositor = Compositor::new(180);
        compositor.reveal();
        let mut state = running(0, -20);

        s.tick(&mut state, &mut compositor);
        assert_eq!(state.current_frame, -2);
        assert_eq!(compositor.visible(), vec![normalize_frame(-2, 180)]);
    }

    #[test]
    fn test_sixty_hz_tick_interval() {
        assert_eq!(scheduler().tick_interval(), Duration::from_millis(17));
    }

    proptest! {
        #[test]
        fn converges_without_overshoot(current in -100_000i64..100_000, target in -100_000i64..100_000) {
            let s = scheduler();
            let mut compositor = Compositor::new(180);
            compositor.reveal();
            let mut state = AnimationState { current_frame: current, target_frame: target, ..Default::default() };
            s.request_start(&mut state);

            let distance = (target - current).unsigned_abs();
            // 10% easing plus the one-frame floor near the end.
            let bound = 2 + distance.min(10) + ((distance.max(1) as f64).ln() / (1.0f64 / 0.9).ln()).ceil() as u64;
            let mut ticks = 0u64;
            while state.is_running() {
                let before = (state.target_frame - state.current_frame).signum();
                s.tick(&mut state, &mut compositor);
                let after = (state.target_frame - state.current_frame).signum();
                prop_assert!(after == 0 || after == before, "overshot target");
                ticks += 1;
                prop_assert!(ticks <= bound, "took {} ticks for distance {}", ticks, distance);
            }
            prop_assert_eq!(state.current_frame, target);
        }
    }
}
