//! Pure geometry: points, rectangles, and rotation-aware delta projection.
//!
//! Everything here is stateless math shared by the transform controller, the
//! guide engine, and the rasterizer. Coordinates are in template pixels with
//! a top-left origin; rotation is in degrees, clockwise positive.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

/// A point in screen or template space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise scale, used for screen↔template conversion.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

/// An axis-aligned rectangle: top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Whether `other` lies entirely inside `self`.
    #[must_use]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x && other.y >= self.y && other.right() <= self.right() && other.bottom() <= self.bottom()
    }

    /// Grown outward by `amount` on every side.
    #[must_use]
    pub fn inflated(&self, amount: f64) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }

    /// Smallest rectangle covering two points (used for line bounding boxes).
    #[must_use]
    pub fn from_points(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self::new(x, y, (a.x - b.x).abs(), (a.y - b.y).abs())
    }
}

/// Project a raw pointer delta observed in canvas space into the local
/// (unrotated) axes of an element rotated by `rotation_deg`.
///
/// Resize handles are defined in pre-rotation element space, so a pointer
/// moving "right" on screen must resolve to "along the element's own x axis".
#[must_use]
pub fn rotate_delta(rotation_deg: f64, dx: f64, dy: f64) -> (f64, f64) {
    let theta = rotation_deg.to_radians();
    let (sin, cos) = theta.sin_cos();
    (dx * cos + dy * sin, -dx * sin + dy * cos)
}

/// Rotate `p` around `center` by `rotation_deg`.
#[must_use]
pub fn rotate_point(p: Point, center: Point, rotation_deg: f64) -> Point {
    let theta = rotation_deg.to_radians();
    let (sin, cos) = theta.sin_cos();
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    Point::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
}

/// The four corners of `rect` rotated about its center, in NW/NE/SE/SW order.
#[must_use]
pub fn rotated_corners(rect: &Rect, rotation_deg: f64) -> [Point; 4] {
    let c = rect.center();
    [
        rotate_point(Point::new(rect.x, rect.y), c, rotation_deg),
        rotate_point(Point::new(rect.right(), rect.y), c, rotation_deg),
        rotate_point(Point::new(rect.right(), rect.bottom()), c, rotation_deg),
        rotate_point(Point::new(rect.x, rect.bottom()), c, rotation_deg),
    ]
}

/// Axis-aligned bounding box of a rectangle after rotation about its center.
#[must_use]
pub fn rotated_bounds(rect: &Rect, rotation_deg: f64) -> Rect {
    let corners = rotated_corners(rect, rotation_deg);
    let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
}
