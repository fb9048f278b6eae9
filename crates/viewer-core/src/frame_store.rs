//! Loaded frame assets and frame-index normalization.

use serde::{Deserialize, Serialize};
use turntable_common::error::{TurntableError, TurntableResult};

/// Map an unbounded frame counter onto a displayable slot.
///
/// `raw = -(current mod n)`, shifted by `n - 1` when negative. The result
/// lies in `[0, n - 1)`: both `0` and `n - 1` land on slot 0, so the last
/// slot is never shown. Forward drags decrease the slot, reverse drags
/// increase it.
pub fn normalize_frame(current: i64, total_frames: usize) -> usize {
    let n = total_frames.max(1) as i64;
    let raw = -current.rem_euclid(n);
    if raw < 0 {
        (raw + n - 1) as usize
    } else {
        raw as usize
    }
}

/// Loading progress for a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadProgress {
    pub loaded: usize,
    pub total: usize,
}

impl LoadProgress {
    /// Whole percent loaded, rounded down.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.loaded as f64 / self.total as f64) * 100.0).floor() as u8
    }

    pub fn is_complete(&self) -> bool {
        self.loaded == self.total
    }
}

/// Fixed-size store of frame assets, filled slot by slot.
#[derive(Debug, Clone)]
pub struct FrameStore<A> {
    slots: Vec<Option<A>>,
    loaded: usize,
}

impl<A> FrameStore<A> {
    /// Create an empty store for `total_frames` slots.
    pub fn new(total_frames: usize) -> Self {
        let mut slots = Vec::with_capacity(total_frames);
        slots.resize_with(total_frames, || None);
        Self { slots, loaded: 0 }
    }

    /// Populate slot `index`. Each slot can be filled once.
    pub fn load(&mut self, index: usize, asset: A) -> TurntableResult<LoadProgress> {
        let total = self.slots.len();
        let slot = self.slots.get_mut(index).ok_or_else(|| {
            TurntableError::frame_store(format!("slot {index} out of range for {total} frames"))
        })?;
        if slot.is_some() {
            return Err(TurntableError::frame_store(format!(
                "slot {index} is already loaded"
            )));
        }
        *slot = Some(asset);
        self.loaded += 1;
        Ok(self.progress())
    }

    /// Asset in a normalized slot, if loaded.
    pub fn get(&self, normalized_index: usize) -> Option<&A> {
        self.slots.get(normalized_index).and_then(Option::as_ref)
    }

    /// Asset displayed for an unbounded frame counter.
    pub fn frame(&self, current_frame: i64) -> Option<&A> {
        self.get(normalize_frame(current_frame, self.slots.len()))
    }

    pub fn progress(&self) -> LoadProgress {
        LoadProgress {
            loaded: self.loaded,
            total: self.slots.len(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress().is_complete()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
