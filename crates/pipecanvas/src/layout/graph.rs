//! Ephemeral layout graph built from node and edge snapshots.

use std::collections::{HashMap, HashSet};

use log::{debug, trace, warn};
use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use pipecanvas_core::{
    geometry::Size,
    identifier::Id,
    model::{Edge, Node},
};

use crate::error::CanvasError;

/// An input edge that takes part in the layout.
#[derive(Debug, Clone, Copy)]
pub(super) struct Link {
    pub edge: Edge,
    pub source: NodeIndex,
    pub target: NodeIndex,
}

/// Sized vertices for every distinct node id, with merged arcs between them.
///
/// Arc weights count how many input edges connect the same ordered pair.
#[derive(Debug)]
pub(super) struct LayoutGraph {
    pub graph: DiGraph<Size, u32>,
    pub vertices: HashMap<Id, NodeIndex>,
    pub links: Vec<Link>,
    /// Original `(source, target)` pairs whose arc was reversed to break a cycle.
    pub reversed: HashSet<(NodeIndex, NodeIndex)>,
}

impl LayoutGraph {
    /// Builds the graph. Vertices are added in input order; a repeated id
    /// reuses the vertex of its first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::LayoutComputationFailed`] if a node size is
    /// negative or not finite.
    pub fn build(nodes: &[Node], edges: &[Edge], placeholder: Size) -> Result<Self, CanvasError> {
        let mut graph = DiGraph::with_capacity(nodes.len(), edges.len());
        let mut vertices = HashMap::with_capacity(nodes.len());

        for node in nodes {
            if vertices.contains_key(&node.id()) {
                warn!(node = node.id().to_string(); "Duplicate node id in layout input, reusing first vertex");
                continue;
            }
            let size = node.dimensions().unwrap_or(placeholder);
            if !size.is_valid() {
                return Err(CanvasError::LayoutComputationFailed(format!(
                    "node `{}` has an unusable size {}x{}",
                    node.id(),
                    size.width(),
                    size.height()
                )));
            }
            trace!(node = node.id().to_string(), width = size.width(), height = size.height(); "Added vertex");
            vertices.insert(node.id(), graph.add_node(size));
        }

        let mut links = Vec::with_capacity(edges.len());
        let mut dangling = 0usize;
        let mut self_loops = 0usize;
        for edge in edges {
            let (Some(&source), Some(&target)) =
                (vertices.get(&edge.source()), vertices.get(&edge.target()))
            else {
                dangling += 1;
                continue;
            };
            if source == target {
                self_loops += 1;
                continue;
            }
            match graph.find_edge(source, target) {
                Some(arc) => graph[arc] += 1,
                None => {
                    graph.add_edge(source, target, 1);
                }
            }
            links.push(Link {
                edge: *edge,
                source,
                target,
            });
        }

        if dangling > 0 {
            warn!(dangling; "Dropped edges referencing unknown nodes");
        }
        debug!(
            vertices = graph.node_count(),
            arcs = graph.edge_count(),
            self_loops;
            "Built layout graph"
        );

        Ok(Self {
            graph,
            vertices,
            links,
            reversed: HashSet::new(),
        })
    }

    /// Reverses the back edges found by a depth-first search that visits
    /// vertices and their successors in index order, leaving a DAG.
    pub fn break_cycles(&mut self) {
        let back_edges = self.back_edges();

        for &(source, target) in &back_edges {
            let Some(arc) = self.graph.find_edge(source, target) else {
                continue;
            };
            let weight = self.graph[arc];
            self.graph.remove_edge(arc);
            match self.graph.find_edge(target, source) {
                Some(opposite) => self.graph[opposite] += weight,
                None => {
                    self.graph.add_edge(target, source, weight);
                }
            }
            self.reversed.insert((source, target));
        }

        if !back_edges.is_empty() {
            debug!(reversed = back_edges.len(); "Reversed arcs to break cycles");
        }
    }

    fn back_edges(&self) -> Vec<(NodeIndex, NodeIndex)> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            New,
            Open,
            Closed,
        }

        let mut marks = vec![Mark::New; self.graph.node_count()];
        let mut back_edges = Vec::new();

        for root in self.graph.node_indices() {
            if marks[root.index()] != Mark::New {
                continue;
            }
            marks[root.index()] = Mark::Open;
            let mut stack = vec![(root, self.sorted_successors(root), 0usize)];

            while let Some((vertex, successors, next)) = stack.last_mut() {
                let Some(&successor) = successors.get(*next) else {
                    marks[vertex.index()] = Mark::Closed;
                    stack.pop();
                    continue;
                };
                *next += 1;
                let vertex = *vertex;

                match marks[successor.index()] {
                    Mark::New => {
                        marks[successor.index()] = Mark::Open;
                        stack.push((successor, self.sorted_successors(successor), 0));
                    }
                    Mark::Open => back_edges.push((vertex, successor)),
                    Mark::Closed => {}
                }
            }
        }

        back_edges
    }

    fn sorted_successors(&self, vertex: NodeIndex) -> Vec<NodeIndex> {
        let mut successors: Vec<_> = self.graph.edges(vertex).map(|arc| arc.target()).collect();
        successors.sort();
        successors
    }
}
