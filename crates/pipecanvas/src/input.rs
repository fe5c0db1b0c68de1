//! Decoding of untyped graph data handed over by renderers.
//!
//! Renderers pass their node and edge lists as loosely typed JSON. The node
//! list must be an array; edge data is best effort, so entries that do not
//! name both endpoints are skipped instead of failing the whole call.
//!
//! Layout only reads the fields it needs from each node object. The result
//! is written back onto a copy of the caller's object, so keys the core
//! does not model (selection flags, custom style, extra data) pass through.

use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};

use pipecanvas_core::{
    geometry::{Point, Size},
    model::{Edge, Node},
};

use crate::error::CanvasError;

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn node_items(value: &Value) -> Result<&[Value], CanvasError> {
    match value {
        Value::Array(items) => Ok(items.as_slice()),
        _ => Err(CanvasError::InvalidInput(format!(
            "nodes must be an array, got {}",
            kind_of(value)
        ))),
    }
}

fn decode_node(item: &Value) -> Result<Node, String> {
    let Value::Object(fields) = item else {
        return Err(format!("expected an object, got {}", kind_of(item)));
    };
    let id = fields
        .get("id")
        .and_then(Value::as_str)
        .ok_or("missing string `id`")?;
    let kind = fields.get("type").and_then(Value::as_str).unwrap_or("default");

    let mut node = Node::new(id, kind);
    if let Some(position) = fields.get("position").and_then(|v| Point::deserialize(v).ok()) {
        node = node.with_position(position);
    }
    if let Some(size) = fields.get("dimensions").and_then(|v| Size::deserialize(v).ok()) {
        node = node.with_dimensions(size);
    }
    Ok(node)
}

/// Decodes the layout view of a node list: id, type, position and measured
/// dimensions. Every other key is left to [`write_back`].
///
/// A `position` or `dimensions` value of the wrong shape is treated as absent.
///
/// # Errors
///
/// Returns [`CanvasError::InvalidInput`] if `value` is not an array, or one
/// of its elements is not an object with a string `id`.
pub fn decode_nodes(value: &Value) -> Result<Vec<Node>, CanvasError> {
    node_items(value)?
        .iter()
        .enumerate()
        .map(|(index, item)| {
            decode_node(item)
                .map_err(|err| CanvasError::InvalidInput(format!("node at index {index}: {err}")))
        })
        .collect()
}

/// Copies each original node object and overwrites `position`,
/// `sourcePosition` and `targetPosition` from the matching laid out record.
///
/// `laid_out` must be in the order of `value`, as produced by the engine.
///
/// # Errors
///
/// Returns [`CanvasError::InvalidInput`] if `value` is not an array.
pub fn write_back(value: &Value, laid_out: &[Node]) -> Result<Vec<Value>, CanvasError> {
    node_items(value)?
        .iter()
        .zip(laid_out)
        .map(|(item, node)| -> Result<Value, CanvasError> {
            let mut record = item.clone();
            if let Value::Object(fields) = &mut record {
                patch_layout_fields(fields, node)?;
            }
            Ok(record)
        })
        .collect()
}

fn patch_layout_fields(fields: &mut Map<String, Value>, node: &Node) -> Result<(), CanvasError> {
    let anchors = node.anchors();
    fields.insert("position".to_string(), serde_json::to_value(node.position())?);
    fields.insert("sourcePosition".to_string(), serde_json::to_value(anchors.source())?);
    fields.insert("targetPosition".to_string(), serde_json::to_value(anchors.target())?);
    Ok(())
}

/// Decodes an edge list, skipping anything that is not an edge.
///
/// A value that is not an array counts as no edges.
pub fn decode_edges(value: &Value) -> Vec<Edge> {
    let Value::Array(items) = value else {
        if !value.is_null() {
            debug!(found = kind_of(value); "Edge data is not an array, ignoring it");
        }
        return Vec::new();
    };

    let edges: Vec<Edge> = items
        .iter()
        .filter_map(|item| {
            let source = item.get("source")?.as_str()?;
            let target = item.get("target")?.as_str()?;
            Some(Edge::new(source, target))
        })
        .collect();

    if edges.len() < items.len() {
        debug!(skipped = items.len() - edges.len(); "Skipped malformed edges");
    }
    edges
}
