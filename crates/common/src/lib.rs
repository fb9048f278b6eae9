//! Turntable Common Utilities
//!
//! Shared infrastructure for all Turntable crates:
//! - Error types and result aliases
//! - Session clock and input sampling gate
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
