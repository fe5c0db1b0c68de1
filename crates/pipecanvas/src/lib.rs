//! Pipecanvas - drag-and-drop insertion and layered auto-layout for
//! pipeline graph editors.
//!
//! The crate holds the editing logic of a canvas where users assemble a
//! pipeline of services by dragging palette entries onto it. Rendering is
//! left to the host: it reports pointer events and node measurements, and
//! reads the node records this crate produces.
//!
//! - [`session::DragSession`] tracks the drag gesture in flight.
//! - [`insertion::InsertionController`] turns a drop into a node in the
//!   [`store::GraphStore`] and recenters it once the renderer measured it.
//! - [`layout::Engine`] arranges the graph in ranks along a [`Direction`].
//! - [`Editor`] wires all of the above together for a single canvas.

pub mod config;
pub mod feedback;
pub mod input;
pub mod insertion;
pub mod layout;
pub mod renderer;
pub mod session;
pub mod store;
pub mod subscription;

mod editor;
mod error;

pub use pipecanvas_core::{color, geometry, identifier, model};

pub use editor::Editor;
pub use error::CanvasError;

use log::{debug, warn};
use serde_json::Value;

use pipecanvas_core::model::{Direction, Edge, Node};

use layout::Engine;

/// Lays out `nodes` with the default engine configuration.
///
/// Returns one record per input node, in input order, with the computed
/// position and the anchor sides of `direction`. If the layout cannot be
/// computed the input is returned unchanged.
///
/// # Examples
///
/// ```
/// use pipecanvas::{compute_layout, model::{AnchorSide, Direction, Edge, Node}};
///
/// let nodes = vec![Node::new("fetch", "task"), Node::new("store", "task")];
/// let edges = vec![Edge::new("fetch", "store")];
///
/// let laid_out = compute_layout(&nodes, &edges, Direction::LR);
/// assert_eq!(laid_out.len(), 2);
/// assert!(laid_out[0].position().x() < laid_out[1].position().x());
/// assert_eq!(laid_out[0].anchors().source(), AnchorSide::Right);
/// ```
pub fn compute_layout(nodes: &[Node], edges: &[Edge], direction: Direction) -> Vec<Node> {
    Engine::default().calculate(nodes, edges, direction).into_nodes()
}

/// Lays out loosely typed renderer data.
///
/// Returns a copy of every node object, in input order, with `position`,
/// `sourcePosition` and `targetPosition` set from the layout. All other keys
/// are returned as given. If the layout cannot be computed the node objects
/// are returned unchanged.
///
/// `edges` that are not an array, and edge entries without string `source`
/// and `target` fields, are ignored.
///
/// # Errors
///
/// Returns [`CanvasError::InvalidInput`] if `nodes` is not an array of
/// objects with a string `id`. Callers should treat the result as empty and
/// not render.
///
/// # Examples
///
/// ```
/// use pipecanvas::{compute_layout_value, model::Direction};
/// use serde_json::json;
///
/// let nodes = json!([{"id": "a", "selected": true}, {"id": "b"}]);
/// let edges = json!([{"source": "a", "target": "b"}]);
///
/// let laid_out = compute_layout_value(&nodes, &edges, Direction::TB).unwrap();
/// assert_eq!(laid_out[0]["selected"], true);
/// assert_eq!(laid_out[0]["sourcePosition"], "bottom");
/// ```
pub fn compute_layout_value(
    nodes: &Value,
    edges: &Value,
    direction: Direction,
) -> Result<Vec<Value>, CanvasError> {
    let decoded = input::decode_nodes(nodes)?;
    let edges = input::decode_edges(edges);
    debug!(nodes = decoded.len(), edges = edges.len(); "Decoded layout input");

    let layout = Engine::default().calculate(&decoded, &edges, direction);
    if let Some(err) = layout.failure() {
        warn!(err:% = err; "Layout failed, returning nodes unchanged");
        return Ok(nodes.as_array().cloned().unwrap_or_default());
    }
    input::write_back(nodes, layout.nodes())
}
