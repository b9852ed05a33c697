//! Per-frame output handed to the renderer.

use serde::{Deserialize, Serialize};

use folio_input_model::geometry::Point2D;

/// Visual transform of one element for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    pub rotation_deg: f64,
    pub opacity: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
        rotation_deg: 0.0,
        opacity: 1.0,
    };

    pub fn translate(offset: Point2D) -> Self {
        Self {
            translate_x: offset.x,
            translate_y: offset.y,
            ..Self::IDENTITY
        }
    }

    pub fn translation(&self) -> Point2D {
        Point2D::new(self.translate_x, self.translate_y)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
