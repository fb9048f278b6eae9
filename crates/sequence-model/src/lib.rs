//! Turntable Sequence Model
//!
//! Defines the data contracts shared by the viewer and its collaborators:
//! - **Events:** Timestamped input events (drag, detector position, resize)
//! - **Sequence:** The ordered list of frame assets for one object
//!
//! Pointer coordinates are in the drag surface's pixel space; detector
//! coordinates arrive in the detector's own space and are scaled later.

pub mod event;
pub mod sequence;

pub use event::*;
pub use sequence::*;
