//! Rank assignment and normalization into a proper layering.

use std::collections::HashMap;

use log::debug;
use petgraph::{
    Direction::Incoming,
    algo::toposort,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use pipecanvas_core::geometry::Size;

use crate::error::CanvasError;

/// A vertex of the layering: a real node or a dummy on a long arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct LayerVertex {
    pub size: Size,
    pub rank: usize,
    pub dummy: bool,
}

/// Vertices split into ranks where every arc joins adjacent ranks.
///
/// Indices below the real vertex count are the graph's node indices; dummy
/// vertices follow.
#[derive(Debug, Clone)]
pub(super) struct Layering {
    pub vertices: Vec<LayerVertex>,
    pub ranks: Vec<Vec<usize>>,
    /// Neighbours in the previous rank, with arc weights.
    pub up: Vec<Vec<(usize, u32)>>,
    /// Neighbours in the next rank, with arc weights.
    pub down: Vec<Vec<(usize, u32)>>,
    /// Dummy vertices of each long arc, from source to target.
    pub chains: HashMap<(NodeIndex, NodeIndex), Vec<usize>>,
}

/// Longest path ranking: sources get rank 0, every other vertex one more
/// than its highest ranked predecessor.
///
/// # Errors
///
/// Returns [`CanvasError::LayoutComputationFailed`] if the graph still has a cycle.
pub(super) fn longest_path(graph: &DiGraph<Size, u32>) -> Result<Vec<usize>, CanvasError> {
    let order = toposort(graph, None).map_err(|cycle| {
        CanvasError::LayoutComputationFailed(format!(
            "graph has a cycle through vertex {}",
            cycle.node_id().index()
        ))
    })?;

    let mut ranks = vec![0usize; graph.node_count()];
    for vertex in order {
        let rank = graph
            .edges_directed(vertex, Incoming)
            .map(|arc| ranks[arc.source().index()] + 1)
            .max()
            .unwrap_or(0);
        ranks[vertex.index()] = rank;
    }
    Ok(ranks)
}

impl Layering {
    /// Places vertices in their ranks in index order and splits every arc
    /// that spans more than one rank with zero-size dummies.
    pub fn normalize(graph: &DiGraph<Size, u32>, ranks: &[usize]) -> Self {
        let rank_count = ranks.iter().max().map_or(0, |max| max + 1);
        let mut layering = Self {
            vertices: Vec::with_capacity(graph.node_count()),
            ranks: vec![Vec::new(); rank_count],
            up: Vec::new(),
            down: Vec::new(),
            chains: HashMap::new(),
        };

        for vertex in graph.node_indices() {
            let rank = ranks[vertex.index()];
            layering.push_vertex(LayerVertex {
                size: graph[vertex],
                rank,
                dummy: false,
            });
        }

        for arc in graph.edge_references() {
            let (source, target, weight) = (arc.source(), arc.target(), *arc.weight());
            let (from, to) = (ranks[source.index()], ranks[target.index()]);

            let mut previous = source.index();
            let mut chain = Vec::new();
            for rank in from + 1..to {
                let dummy = layering.push_vertex(LayerVertex {
                    size: Size::default(),
                    rank,
                    dummy: true,
                });
                layering.link(previous, dummy, weight);
                chain.push(dummy);
                previous = dummy;
            }
            layering.link(previous, target.index(), weight);

            if !chain.is_empty() {
                layering.chains.insert((source, target), chain);
            }
        }

        debug!(
            ranks = layering.ranks.len(),
            dummies = layering.vertices.len() - graph.node_count();
            "Normalized layering"
        );
        layering
    }

    fn push_vertex(&mut self, vertex: LayerVertex) -> usize {
        let index = self.vertices.len();
        self.ranks[vertex.rank].push(index);
        self.vertices.push(vertex);
        self.up.push(Vec::new());
        self.down.push(Vec::new());
        index
    }

    fn link(&mut self, upper: usize, lower: usize, weight: u32) {
        self.down[upper].push((lower, weight));
        self.up[lower].push((upper, weight));
    }
}
