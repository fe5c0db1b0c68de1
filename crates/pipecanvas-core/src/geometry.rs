//! Geometric primitives for canvas placement and layout.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in canvas (world) space
//! - [`Size`] - Width and height of a rendered node
//! - [`Bounds`] - An axis-aligned box defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! Canvas coordinates follow the screen convention:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Canvas space is distinct from the client (viewport pixel) space that
//! pointer events report; see the `Viewport` collaborator in the
//! `pipecanvas` crate for the mapping between the two.

use serde::{Deserialize, Serialize};

/// A 2D point in canvas coordinate space.
///
/// # Examples
///
/// ```
/// # use pipecanvas_core::geometry::Point;
/// let drop = Point::new(100.0, 100.0);
/// let half = Point::new(40.0, 20.0);
///
/// let top_left = drop.sub_point(half);
/// assert_eq!(top_left, Point::new(60.0, 80.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Creates a new point with the specified y-coordinate
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Multiplies both coordinates by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Exchanges the two coordinates.
    ///
    /// Horizontal layouts are solved in a transposed frame and swapped back.
    pub fn swap(self) -> Self {
        Self {
            x: self.y,
            y: self.x,
        }
    }

    /// Returns true if neither coordinate is NaN or infinite
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Width and height of an element, in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns half the width and half the height as an offset
    pub fn half(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Exchanges width and height
    pub fn swap(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Returns true if both dimensions are finite and not negative
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

/// Axis-aligned rectangle stored as minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates new bounds from a center point and a size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
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

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the top-left corner
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// Midpoint of the left side
    pub fn left_center(self) -> Point {
        Point::new(self.min_x, self.center().y)
    }

    /// Midpoint of the right side
    pub fn right_center(self) -> Point {
        Point::new(self.max_x, self.center().y)
    }

    /// Midpoint of the top side
    pub fn top_center(self) -> Point {
        Point::new(self.center().x, self.min_y)
    }

    /// Midpoint of the bottom side
    pub fn bottom_center(self) -> Point {
        Point::new(self.center().x, self.max_y)
    }

    /// Smallest bounds containing both `self` and `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pipecanvas_core::geometry::{Bounds, Point, Size};
    /// let a = Bounds::new_from_center(Point::new(50.0, 15.0), Size::new(100.0, 30.0));
    /// let b = Bounds::new_from_center(Point::new(70.0, 80.0), Size::new(120.0, 80.0));
    ///
    /// let combined = a.merge(&b);
    /// assert_eq!(combined.width(), 130.0);
    /// assert_eq!(combined.height(), 120.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Returns true if the interiors of the two boxes overlap.
    ///
    /// Boxes that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_new() {
        let point = Point::new(3.5, 4.2);
        assert_eq!(point.x(), 3.5);
        assert_eq!(point.y(), 4.2);
    }

    #[test]
    fn test_point_sub() {
        let result = Point::new(100.0, 100.0).sub_point(Point::new(40.0, 20.0));
        assert_eq!(result, Point::new(60.0, 80.0));
    }

    #[test]
    fn test_point_swap() {
        assert_eq!(Point::new(1.0, 2.0).swap(), Point::new(2.0, 1.0));
    }

    #[test]
    fn test_point_is_finite() {
        assert!(Point::new(0.0, -5.0).is_finite());
        assert!(!Point::new(f32::NAN, 0.0).is_finite());
        assert!(!Point::new(0.0, f32::INFINITY).is_finite());
    }

    #[test]
    fn test_size_half() {
        let half = Size::new(80.0, 40.0).half();
        assert_eq!(half, Point::new(40.0, 20.0));
    }

    #[test]
    fn test_size_is_valid() {
        assert!(Size::new(200.0, 50.0).is_valid());
        assert!(Size::new(0.0, 0.0).is_valid());
        assert!(!Size::new(-1.0, 50.0).is_valid());
        assert!(!Size::new(f32::NAN, 50.0).is_valid());
    }

    #[test]
    fn test_bounds_new_from_center() {
        let bounds = Bounds::new_from_center(Point::new(50.0, 60.0), Size::new(20.0, 30.0));

        assert_eq!(bounds.min_x(), 40.0);
        assert_eq!(bounds.min_y(), 45.0);
        assert_eq!(bounds.max_x(), 60.0);
        assert_eq!(bounds.max_y(), 75.0);
        assert_eq!(bounds.center(), Point::new(50.0, 60.0));
    }

    #[test]
    fn test_bounds_side_centers() {
        let bounds = Bounds::new_from_center(Point::new(100.0, 25.0), Size::new(200.0, 50.0));

        assert_eq!(bounds.left_center(), Point::new(0.0, 25.0));
        assert_eq!(bounds.right_center(), Point::new(200.0, 25.0));
        assert_eq!(bounds.top_center(), Point::new(100.0, 0.0));
        assert_eq!(bounds.bottom_center(), Point::new(100.0, 50.0));
    }

    #[test]
    fn test_bounds_intersects() {
        let a = Bounds::new_from_center(Point::new(5.0, 5.0), Size::new(10.0, 10.0));
        let b = Bounds::new_from_center(Point::new(10.0, 10.0), Size::new(10.0, 10.0));
        let touching = Bounds::new_from_center(Point::new(15.0, 5.0), Size::new(10.0, 10.0));
        let far = Bounds::new_from_center(Point::new(50.0, 50.0), Size::new(1.0, 1.0));

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&touching));
        assert!(!a.intersects(&far));
    }

    #[test]
    fn test_point_serde_shape() {
        let json = serde_json::to_string(&Point::new(1.5, 2.0)).unwrap();
        assert_eq!(json, r#"{"x":1.5,"y":2.0}"#);

        let size: Size = serde_json::from_str(r#"{"width":80,"height":40}"#).unwrap();
        assert_eq!(size, Size::new(80.0, 40.0));
    }
}

#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn size_strategy() -> impl Strategy<Value = Size> {
        (0.0f32..1000.0, 0.0f32..1000.0).prop_map(|(w, h)| Size::new(w, h))
    }

    /// Centering on a point and reading the center back returns the point.
    fn check_center_roundtrip(center: Point, size: Size) -> Result<(), TestCaseError> {
        let back = Bounds::new_from_center(center, size).center();

        prop_assert!(approx_eq!(f32, back.x(), center.x(), epsilon = 0.001));
        prop_assert!(approx_eq!(f32, back.y(), center.y(), epsilon = 0.001));
        Ok(())
    }

    /// Subtracting half a size from a center yields the top-left corner of its box.
    fn check_half_size_is_top_left(center: Point, size: Size) -> Result<(), TestCaseError> {
        let top_left = center.sub_point(size.half());
        let bounds = Bounds::new_from_center(center, size);

        prop_assert!(approx_eq!(f32, top_left.x(), bounds.min_x(), epsilon = 0.001));
        prop_assert!(approx_eq!(f32, top_left.y(), bounds.min_y(), epsilon = 0.001));
        Ok(())
    }

    proptest! {
        #[test]
        fn center_roundtrip(center in point_strategy(), size in size_strategy()) {
            check_center_roundtrip(center, size)?;
        }

        #[test]
        fn half_size_is_top_left(center in point_strategy(), size in size_strategy()) {
            check_half_size_is_top_left(center, size)?;
        }
    }
}
