//! Geometric primitives for workflow graph layout.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in layout space
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! Stategraph uses a coordinate system consistent with SVG and most screen
//! coordinate systems:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! The entry marker of every layout sits at the origin and the flow grows
//! downward. Coordinates are abstract layout units; renderers scale them.

use serde::Serialize;

/// A 2D point representing a position in layout space.
///
/// # Examples
///
/// ```
/// # use stategraph_core::geometry::Point;
/// let anchor = Point::new(0.0, 100.0);
/// let below = anchor.add_y(100.0);
/// assert_eq!(below.x(), 0.0);
/// assert_eq!(below.y(), 200.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn x(self) -> f32 {
        self.x
    }

    pub fn y(self) -> f32 {
        self.y
    }

    /// The same point moved horizontally by `dx`.
    pub fn add_x(self, dx: f32) -> Self {
        Self::new(self.x + dx, self.y)
    }

    /// The same point moved down by `dy`.
    pub fn add_y(self, dy: f32) -> Self {
        Self::new(self.x, self.y + dy)
    }
}

/// An axis-aligned rectangle spanning a set of points.
///
/// # Examples
///
/// ```
/// # use stategraph_core::geometry::{Bounds, Point};
/// let bounds = Bounds::from_point(Point::new(0.0, 0.0))
///     .include(Point::new(-110.0, 200.0))
///     .include(Point::new(110.0, 100.0));
///
/// assert_eq!(bounds.width(), 220.0);
/// assert_eq!(bounds.height(), 200.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates degenerate bounds containing a single point
    pub fn from_point(point: Point) -> Self {
        Self {
            min_x: point.x(),
            min_y: point.y(),
            max_x: point.x(),
            max_y: point.y(),
        }
    }

    /// Returns new bounds grown to contain `point`
    pub fn include(self, point: Point) -> Self {
        Self {
            min_x: self.min_x.min(point.x()),
            min_y: self.min_y.min(point.y()),
            max_x: self.max_x.max(point.x()),
            max_y: self.max_y.max(point.y()),
        }
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_offsets() {
        let point = Point::new(10.0, 20.0).add_x(-5.0).add_y(100.0);
        assert_approx_eq!(f32, point.x(), 5.0);
        assert_approx_eq!(f32, point.y(), 120.0);
        assert_eq!(Point::default(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_bounds_grow_to_include_points() {
        let bounds = Bounds::from_point(Point::new(0.0, 0.0))
            .include(Point::new(-110.0, 200.0))
            .include(Point::new(220.0, 100.0));

        assert_approx_eq!(f32, bounds.min_x(), -110.0);
        assert_approx_eq!(f32, bounds.max_x(), 220.0);
        assert_approx_eq!(f32, bounds.min_y(), 0.0);
        assert_approx_eq!(f32, bounds.max_y(), 200.0);
        assert_approx_eq!(f32, bounds.width(), 330.0);
    }

    #[test]
    fn test_bounds_single_point_is_empty_area() {
        let bounds = Bounds::from_point(Point::new(7.0, 7.0));
        assert_eq!(bounds.width(), 0.0);
        assert_eq!(bounds.height(), 0.0);
    }
}
