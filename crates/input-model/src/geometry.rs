//! Points, rectangles and viewport sizes.
//!
//! Coordinates are CSS pixels with the origin at the top-left of the
//! viewport, matching what pointer events report.

use serde::{Deserialize, Serialize};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const ZERO: Point2D = Point2D { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Linear interpolation between two points.
    pub fn lerp(a: &Point2D, b: &Point2D, t: f64) -> Point2D {
        let t = t.clamp(0.0, 1.0);
        Point2D {
            x: a.x + (b.x - a.x) * t,
            y: a.y + (b.y - a.y) * t,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An axis-aligned bounding rectangle, as returned by layout.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn contains(&self, p: Point2D) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    /// Shrink the rectangle vertically by `margin` on both the top and the
    /// bottom edge. A negative margin grows it.
    pub fn inset_vertical(&self, margin: f64) -> Rect {
        let height = (self.height - 2.0 * margin).max(0.0);
        Rect {
            left: self.left,
            top: self.top + margin,
            width: self.width,
            height,
        }
    }

    /// Overlapping region of two rectangles, if any.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

/// Size of the visible viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are positive and finite. Normalising against
    /// a degenerate viewport would divide by zero.
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Map a point to `[-1, 1]` on both axes, centre at the origin.
    /// Returns `None` for a degenerate viewport.
    pub fn normalize(&self, p: Point2D) -> Option<Point2D> {
        if !self.is_usable() {
            return None;
        }
        Some(Point2D::new(
            (p.x / self.width) * 2.0 - 1.0,
            (p.y / self.height) * 2.0 - 1.0,
        ))
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self::new(1920.0, 1080.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rect_center() {
        let rect = Rect::new(100.0, 50.0, 200.0, 100.0);
        assert_eq!(rect.center(), Point2D::new(200.0, 100.0));
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 80.0, 100.0, 100.0);
        let overlap = a.intersection(&b).unwrap();
        assert_eq!(overlap, Rect::new(50.0, 80.0, 50.0, 20.0));

        let far = Rect::new(500.0, 500.0, 10.0, 10.0);
        assert!(a.intersection(&far).is_none());
    }

    #[test]
    fn test_inset_vertical() {
        let vp = ViewportSize::new(1280.0, 800.0).as_rect();
        let inset = vp.inset_vertical(100.0);
        assert_eq!(inset.top, 100.0);
        assert_eq!(inset.height, 600.0);
        assert_eq!(inset.width, 1280.0);
    }

    #[test]
    fn test_normalize_corners() {
        let vp = ViewportSize::new(800.0, 600.0);
        assert_eq!(
            vp.normalize(Point2D::new(0.0, 0.0)),
            Some(Point2D::new(-1.0, -1.0))
        );
        assert_eq!(
            vp.normalize(Point2D::new(400.0, 300.0)),
            Some(Point2D::new(0.0, 0.0))
        );
        assert_eq!(
            vp.normalize(Point2D::new(800.0, 600.0)),
            Some(Point2D::new(1.0, 1.0))
        );
    }

    #[test]
    fn test_normalize_rejects_degenerate_viewport() {
        assert!(ViewportSize::new(0.0, 600.0)
            .normalize(Point2D::new(1.0, 1.0))
            .is_none());
        assert!(ViewportSize::new(800.0, f64::NAN)
            .normalize(Point2D::new(1.0, 1.0))
            .is_none());
    }

    #[test]
    fn test_point2d_distance() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_points_inside_viewport_normalize_into_unit_square(
            width in 1.0f64..4000.0,
            height in 1.0f64..4000.0,
            fx in 0.0f64..=1.0,
            fy in 0.0f64..=1.0,
        ) {
            let vp = ViewportSize::new(width, height);
            let n = vp.normalize(Point2D::new(fx * width, fy * height)).unwrap();
            prop_assert!(n.x >= -1.0 - 1e-9 && n.x <= 1.0 + 1e-9);
            prop_assert!(n.y >= -1.0 - 1e-9 && n.y <= 1.0 + 1e-9);
        }

        #[test]
        fn prop_intersection_is_inside_both(
            ax in -500.0f64..500.0, ay in -500.0f64..500.0,
            aw in 1.0f64..500.0, ah in 1.0f64..500.0,
            bx in -500.0f64..500.0, by in -500.0f64..500.0,
            bw in 1.0f64..500.0, bh in 1.0f64..500.0,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            if let Some(overlap) = a.intersection(&b) {
                prop_assert!(overlap.area() <= a.area() + 1e-6);
                prop_assert!(overlap.area() <= b.area() + 1e-6);
                prop_assert!(a.contains(overlap.center()) && b.contains(overlap.center()));
            }
        }
    }
}
