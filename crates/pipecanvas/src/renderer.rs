//! Interfaces consumed from the renderer that draws the canvas.
//!
//! The editor never talks to a drawing surface directly. It maps pointer
//! coordinates through a [`Viewport`] and reads or moves live nodes through
//! [`LiveNodes`].

use pipecanvas_core::{geometry::Point, identifier::Id, model::Node};

use crate::error::CanvasError;

/// Maps pointer client coordinates to canvas coordinates.
pub trait Viewport {
    fn screen_to_canvas(&self, point: Point) -> Point;
}

impl<F> Viewport for F
where
    F: Fn(Point) -> Point,
{
    fn screen_to_canvas(&self, point: Point) -> Point {
        self(point)
    }
}

/// Live node state kept by the renderer.
pub trait LiveNodes {
    /// Looks up the current state of a node, including its measured dimensions.
    fn find_node(&self, id: &Id) -> Option<&Node>;

    /// Replaces the position of node `id` with the value `update` computes
    /// from its current record. Returns false if the node does not exist.
    fn update_node_position(&mut self, id: &Id, update: &mut dyn FnMut(&Node) -> Point) -> bool;
}

/// Pan and zoom of a canvas mounted at `origin` in client space.
///
/// # Examples
///
/// ```
/// use pipecanvas::renderer::{Transform, Viewport};
/// use pipecanvas_core::geometry::Point;
///
/// let transform = Transform::new(Point::new(10.0, 20.0), Point::new(30.0, 0.0), 2.0).unwrap();
/// assert_eq!(transform.screen_to_canvas(Point::new(140.0, 120.0)), Point::new(50.0, 50.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    origin: Point,
    pan: Point,
    zoom: f32,
}

impl Transform {
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidInput`] if `zoom` is not a positive finite number.
    pub fn new(origin: Point, pan: Point, zoom: f32) -> Result<Self, CanvasError> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(CanvasError::InvalidInput(format!(
                "zoom must be a positive number, got {zoom}"
            )));
        }
        Ok(Self { origin, pan, zoom })
    }

    /// Client coordinates are canvas coordinates.
    pub fn identity() -> Self {
        Self {
            origin: Point::default(),
            pan: Point::default(),
            zoom: 1.0,
        }
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Viewport for Transform {
    fn screen_to_canvas(&self, point: Point) -> Point {
        point
            .sub_point(self.origin)
            .sub_point(self.pan)
            .scale(1.0 / self.zoom)
    }
}
