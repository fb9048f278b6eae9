//! Turntable Core: the frame-animation engine of a 360° viewer
//!
//! Maps horizontal drags onto a wrapping sequence of stills:
//! - **Frame store:** Loaded assets and frame-index normalization
//! - **Pointer tracking:** Rate-limited samples turned into target frames
//! - **Scheduler:** Eased fixed-rate ticks toward the target
//! - **Compositor:** Visible-frame bookkeeping and change notification
//!
//! [`Viewer`] owns the single [`AnimationState`] and wires these together.
//! [`replay`](replay::replay) runs an event stream in virtual time and
//! [`drive`](driver::drive) runs a live session on one task.

pub mod compositor;
pub mod driver;
pub mod frame_store;
pub mod replay;
pub mod scheduler;
pub mod source;
pub mod state;
pub mod tracker;
pub mod viewer;

pub use compositor::{Compositor, FrameObserver};
pub use frame_store::{normalize_frame, FrameStore, LoadProgress};
pub use scheduler::{AnimationScheduler, TickOutcome};
pub use state::{AnimationState, SchedulerPhase};
pub use tracker::{PointerTracker, PositionSample};
pub use viewer::Viewer;
