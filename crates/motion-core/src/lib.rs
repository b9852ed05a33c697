//! Folio Motion Core
//!
//! Turns raw pointer and scroll samples into smoothed, bounded visual
//! offsets:
//! - **Springs:** damped spring smoothing, the primitive behind everything
//! - **Pointer tracking:** magnetic and parallax elements
//! - **Marquee:** seamlessly wrapping strips driven by scroll velocity
//! - **Cursor:** a sprung ring and dot replacing the platform pointer
//! - **Reveals and loops:** intro mask, scroll reveals, ambient motion
//! - **Replay:** recorded sessions stepped through a fixed frame clock
//!
//! This crate is pure computation driven by an external frame clock. Every
//! animated element takes an `AnimationPreference` snapshot and renders its
//! final state immediately when animation is off.

pub mod ambient;
pub mod cursor;
pub mod easing;
pub mod hover;
pub mod intro;
pub mod marquee;
pub mod mounted;
pub mod pointer;
pub mod replay;
pub mod reveal;
pub mod scroll_velocity;
pub mod spring;
pub mod subscription;
pub mod trace;
pub mod transform;
pub mod tween;

pub use cursor::CustomCursor;
pub use easing::Easing;
pub use marquee::{advance_marquee, Marquee, MarqueeState};
pub use pointer::{track_pointer, PointerTracker};
pub use replay::{ReplayOptions, SessionReplay};
pub use spring::{Spring, Spring2D, SpringState};
pub use subscription::{InputBus, Subscription};
pub use trace::{FrameTrace, TraceHeader, TraceWriter};
pub use transform::Transform;
