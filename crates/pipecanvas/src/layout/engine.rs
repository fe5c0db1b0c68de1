//! The layered layout engine.

use std::{
    collections::HashMap,
    panic::{self, AssertUnwindSafe},
};

use log::{debug, error, info, warn};

use pipecanvas_core::{
    geometry::{Point, Size},
    identifier::Id,
    model::{Direction, Edge, Node},
};

use crate::{
    config::{LayoutConfig, PositionOrigin},
    error::CanvasError,
};

use super::{
    graph::{LayoutGraph, Link},
    order,
    position::{self, Spacing},
    rank::{self, Layering},
    route::{self, RoutedEdge},
};

/// Result of a layout run.
///
/// When the computation failed, `nodes` holds the input unchanged and
/// [`Layout::failure`] reports why.
#[derive(Debug)]
pub struct Layout {
    nodes: Vec<Node>,
    routes: Vec<RoutedEdge>,
    failure: Option<CanvasError>,
}

impl Layout {
    /// Laid out nodes, one per input node, in input order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    pub fn routes(&self) -> &[RoutedEdge] {
        &self.routes
    }

    /// The error that made the engine fall back to the input positions.
    pub fn failure(&self) -> Option<&CanvasError> {
        self.failure.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Vertex centres and sizes keyed by node id, plus edge routes.
#[derive(Debug, Default)]
struct Solution {
    placements: HashMap<Id, (Point, Size)>,
    routes: Vec<RoutedEdge>,
}

/// Layered (Sugiyama style) layout engine.
///
/// The engine is deterministic: the same nodes, edges and direction always
/// produce the same positions.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: LayoutConfig,
}

impl Engine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lays out `nodes` connected by `edges` so edges flow in `direction`.
    ///
    /// Never fails. If the computation fails or panics the error is logged
    /// and the input nodes are returned unchanged, with the error available
    /// through [`Layout::failure`].
    pub fn calculate(&self, nodes: &[Node], edges: &[Edge], direction: Direction) -> Layout {
        info!(nodes = nodes.len(), edges = edges.len(), direction:% = direction; "Computing layout");

        let solved = panic::catch_unwind(AssertUnwindSafe(|| self.solve(nodes, edges, direction)))
            .unwrap_or_else(|payload| {
                let reason = payload
                    .downcast_ref::<String>()
                    .map(String::as_str)
                    .or_else(|| payload.downcast_ref::<&str>().copied())
                    .unwrap_or("unknown panic");
                Err(CanvasError::LayoutComputationFailed(format!(
                    "layout solver panicked: {reason}"
                )))
            });

        match solved {
            Ok(solution) => {
                let nodes = self.extract(nodes, &solution.placements, direction);
                info!(nodes = nodes.len(), routes = solution.routes.len(); "Layout finished");
                Layout {
                    nodes,
                    routes: solution.routes,
                    failure: None,
                }
            }
            Err(err) => {
                error!(err:% = err; "Layout failed, keeping previous positions");
                Layout {
                    nodes: nodes.to_vec(),
                    routes: Vec::new(),
                    failure: Some(err),
                }
            }
        }
    }

    fn solve(&self, nodes: &[Node], edges: &[Edge], direction: Direction) -> Result<Solution, CanvasError> {
        if nodes.is_empty() {
            return Ok(Solution::default());
        }

        let mut graph = LayoutGraph::build(nodes, edges, self.config.placeholder())?;
        graph.break_cycles();

        let ranks = rank::longest_path(&graph.graph)?;
        let mut layering = Layering::normalize(&graph.graph, &ranks);
        order::minimise_crossings(&mut layering, self.config.ordering_passes());

        let spacing = Spacing {
            node: self.config.node_spacing(),
            edge: self.config.edge_spacing(),
            rank: self.config.rank_spacing(),
        };
        let centers = position::assign(&layering, direction, spacing);
        debug!(vertices = centers.len(); "Assigned coordinates");

        let is_reversed = |link: &Link| graph.reversed.contains(&(link.source, link.target));
        let routes = route::route_edges(&graph.links, &layering, &centers, direction, &is_reversed);

        let placements = graph
            .vertices
            .iter()
            .map(|(id, vertex)| {
                let index = vertex.index();
                (*id, (centers[index], layering.vertices[index].size))
            })
            .collect();

        Ok(Solution { placements, routes })
    }

    /// Maps every input node to a record with its solved position and the
    /// anchor sides of `direction`. A node without a placement keeps its
    /// previous position.
    fn extract(
        &self,
        nodes: &[Node],
        placements: &HashMap<Id, (Point, Size)>,
        direction: Direction,
    ) -> Vec<Node> {
        let anchors = direction.anchor_sides();

        nodes
            .iter()
            .map(|node| {
                let Some(&(center, size)) = placements.get(&node.id()) else {
                    warn!(node = node.id().to_string(); "Node missing from layout solution, keeping its position");
                    return node.clone().with_anchors(anchors);
                };
                let position = match self.config.position_origin() {
                    PositionOrigin::Center => center,
                    PositionOrigin::TopLeft => center.sub_point(size.half()),
                };
                node.clone().with_position(position).with_anchors(anchors)
            })
            .collect()
    }
}
