//! Folio Input Model
//!
//! Defines the data the motion engine consumes:
//! - **Events:** Timestamped raw input (pointer, enter/leave, scroll, resize)
//! - **Geometry:** Points, rectangles and viewport sizes in CSS pixels
//! - **Elements:** A DOM-like tree used to classify hover targets
//!
//! Everything here is plain data; no behaviour depends on a live display.

pub mod element;
pub mod event;
pub mod geometry;

pub use element::*;
pub use event::*;
pub use geometry::*;
