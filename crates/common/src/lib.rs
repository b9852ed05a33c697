//! Folio Common Utilities
//!
//! Shared infrastructure for all Folio crates:
//! - Error types and result aliases
//! - Frame clock and throttle helpers for the animation loop
//! - Tracing/logging initialization
//! - Motion configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
