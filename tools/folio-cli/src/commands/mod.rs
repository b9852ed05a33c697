//! CLI command implementations.

pub mod marquee;
pub mod prefs;
pub mod probe;
pub mod replay;
pub mod spring;
