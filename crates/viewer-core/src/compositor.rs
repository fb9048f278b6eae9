//! Frame compositor: tracks which frame is shown and tells the render layer.

use serde::{Deserialize, Serialize};

/// Display state of one frame slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Hidden,
    Visible,
}

/// Receives the normalized index of each newly visible frame.
pub trait FrameObserver {
    fn on_frame_changed(&mut self, normalized_index: usize);
}

impl<F: FnMut(usize)> FrameObserver for F {
    fn on_frame_changed(&mut self, normalized_index: usize) {
        self(normalized_index)
    }
}

/// Visibility bookkeeping for a frame sequence.
pub struct Compositor {
    slots: Vec<Visibility>,
    observers: Vec<Box<dyn FrameObserver>>,
    transitions: u64,
}

impl Compositor {
    /// All slots start hidden until [`Compositor::reveal`].
    pub fn new(total_frames: usize) -> Self {
        Self {
            slots: vec![Visibility::Hidden; total_frames],
            observers: Vec::new(),
            transitions: 0,
        }
    }

    pub fn subscribe(&mut self, observer: impl FrameObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Show slot 0 and hide everything else.
    pub fn reveal(&mut self) {
        self.slots.fill(Visibility::Hidden);
        if let Some(first) = self.slots.first_mut() {
            *first = Visibility::Visible;
            self.notify(0);
        }
    }

    /// Hide `old` and show `new`. Returns whether anything changed.
    pub fn transition(&mut self, old: usize, new: usize) -> bool {
        if old == new || new >= self.slots.len() {
            return false;
        }
        if let Some(slot) = self.slots.get_mut(old) {
            *slot = Visibility::Hidden;
        }
        self.slots[new] = Visibility::Visible;
        self.transitions += 1;
        self.notify(new);
        true
    }

    pub fn visibility(&self, index: usize) -> Option<Visibility> {
        self.slots.get(index).copied()
    }

    /// Indices of all visible slots, ascending.
    pub fn visible(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == Visibility::Visible)
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of transitions that changed the visible frame.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    fn notify(&mut self, index: usize) {
        for observer in &mut self.observers {
            observer.on_frame_changed(index);
        }
    }
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("visible", &self.visible())
            .field("observers", &self.observers.len())
            .field("transitions", &self.transitions)
            .finish()
    }
}
