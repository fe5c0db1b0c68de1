//! CLI logic for the pipecanvas auto-arrange tool.
//!
//! Reads a pipeline document, lays it out with the layered engine, and
//! writes the positioned nodes, the input edges, and the edge routes.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{info, warn};
use serde::Serialize;
use serde_json::Value;

use pipecanvas::{
    CanvasError, input,
    layout::{Engine, RoutedEdge},
    model::Direction,
};

/// Document written by [`run`].
///
/// `nodes` are the input node objects with layout fields patched in and
/// `edges` is the input edge list as given, so the output can be fed back in.
#[derive(Debug, Serialize)]
struct ArrangedDocument<'a> {
    nodes: &'a [Value],
    #[serde(skip_serializing_if = "Option::is_none")]
    edges: Option<&'a Value>,
    routes: &'a [RoutedEdge],
}

/// Run the pipecanvas CLI application
///
/// Reads the `{ "nodes": [...], "edges": [...] }` document at `args.input`,
/// lays it out, and writes the result to `args.output`.
///
/// # Errors
///
/// Returns `CanvasError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed JSON, a missing or non-array `nodes` field, or an unknown direction
///
/// A failed layout is not an error: the nodes are written back unchanged.
/// Node keys other than `position`, `sourcePosition` and `targetPosition`
/// are copied through as read.
pub fn run(args: &Args) -> Result<(), CanvasError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Arranging pipeline"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let direction = match &args.direction {
        Some(direction) => direction.parse::<Direction>()?,
        None => app_config.layout().direction(),
    };

    let source = fs::read_to_string(&args.input)?;
    let document: Value = serde_json::from_str(&source)?;

    let node_value = document.get("nodes").unwrap_or(&Value::Null);
    let edge_value = document.get("edges");
    let nodes = input::decode_nodes(node_value)?;
    let edges = input::decode_edges(edge_value.unwrap_or(&Value::Null));

    let engine = Engine::new(app_config.layout().clone());
    let layout = engine.calculate(&nodes, &edges, direction);
    let records = match layout.failure() {
        Some(err) => {
            warn!(err:% = err; "Writing nodes with their input positions");
            node_value.as_array().cloned().unwrap_or_default()
        }
        None => input::write_back(node_value, layout.nodes())?,
    };

    let output = serde_json::to_string_pretty(&ArrangedDocument {
        nodes: &records,
        edges: edge_value,
        routes: layout.routes(),
    })?;
    fs::write(&args.output, output)?;

    info!(output_file = args.output, nodes = records.len(); "Pipeline arranged");

    Ok(())
}
