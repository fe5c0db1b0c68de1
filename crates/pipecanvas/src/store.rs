//! Canonical node and edge state of a pipeline.
//!
//! Nodes live in an insertion-ordered map keyed by id, so the ordered node
//! list handed to renderers and the id lookup used by handlers are a single
//! structure. Neighbour lists in each node's [`NodeData`] mirror the edge
//! list and are updated by [`GraphStore::connect`], [`GraphStore::disconnect`]
//! and [`GraphStore::remove`].

use indexmap::IndexMap;
use log::{debug, warn};
use petgraph::{algo::tarjan_scc, graph::DiGraph};

use pipecanvas_core::{
    geometry::{Point, Size},
    identifier::Id,
    model::{Edge, Node, NodeData},
};

use crate::{error::CanvasError, renderer::LiveNodes};

/// Nodes and edges of the pipeline being edited.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: IndexMap<Id, Node>,
    edges: Vec<Edge>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `node`, or replaces the node with the same id in its current slot.
    ///
    /// The stored neighbour lists are rebuilt from the edge list, so edges
    /// connected to a replaced node stay mirrored in its data.
    ///
    /// Returns the replaced record, if any.
    pub fn insert(&mut self, node: Node) -> Option<Node> {
        let id = node.id();
        let predecessors = self
            .edges
            .iter()
            .filter(|edge| edge.target() == id)
            .map(Edge::source)
            .collect();
        let successors = self
            .edges
            .iter()
            .filter(|edge| edge.source() == id)
            .map(Edge::target)
            .collect();
        let data = node.data().clone().with_neighbours(predecessors, successors);
        let replaced = self.nodes.insert(id, node.with_data(data));
        if replaced.is_some() {
            warn!(node = id.to_string(); "Node id already present, replacing existing node");
        }
        replaced
    }

    pub fn get(&self, id: &Id) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Clones the nodes, in insertion order.
    pub fn to_vec(&self) -> Vec<Node> {
        self.nodes.values().cloned().collect()
    }

    /// Removes a node together with its incident edges and every reference
    /// to it in neighbour lists.
    pub fn remove(&mut self, id: &Id) -> Option<Node> {
        let removed = self.nodes.shift_remove(id)?;

        let before = self.edges.len();
        self.edges.retain(|edge| !edge.touches(*id));

        for node in self.nodes.values_mut() {
            let data = node.data();
            if data.predecessors().contains(id) || data.successors().contains(id) {
                let data = data.clone().without_neighbour(*id);
                *node = node.clone().with_data(data);
            }
        }

        debug!(
            node = id.to_string(),
            edges_removed = before - self.edges.len();
            "Removed node"
        );
        Some(removed)
    }

    /// Records the renderer's measurement of a node. Returns false for unknown ids.
    pub fn set_dimensions(&mut self, id: &Id, size: Size) -> bool {
        self.modify(id, |node| node.with_dimensions(size))
    }

    /// Adds the edge `source -> target` and updates both neighbour lists.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Graph`] if either node is unknown, the edge is
    /// a self loop, or the edge already exists.
    pub fn connect(&mut self, source: Id, target: Id) -> Result<(), CanvasError> {
        for id in [source, target] {
            if !self.contains(&id) {
                return Err(CanvasError::Graph(format!("unknown node `{id}`")));
            }
        }
        let edge = Edge::new(source, target);
        if edge.is_self_loop() {
            return Err(CanvasError::Graph(format!(
                "node `{source}` cannot be connected to itself"
            )));
        }
        if self.edges.contains(&edge) {
            return Err(CanvasError::Graph(format!(
                "edge `{source}` -> `{target}` already exists"
            )));
        }

        self.edges.push(edge);
        self.update_data(&source, |data| data.with_successor(target));
        self.update_data(&target, |data| data.with_predecessor(source));
        debug!(source = source.to_string(), target = target.to_string(); "Connected nodes");
        Ok(())
    }

    /// Removes the edge `source -> target`. Returns false if it did not exist.
    pub fn disconnect(&mut self, source: Id, target: Id) -> bool {
        let edge = Edge::new(source, target);
        let Some(index) = self.edges.iter().position(|e| *e == edge) else {
            return false;
        };
        self.edges.remove(index);
        self.update_data(&source, |data| data.without_successor(target));
        self.update_data(&target, |data| data.without_predecessor(source));
        true
    }

    /// Copies position and anchor sides from laid out records onto stored
    /// nodes with the same id. Returns how many nodes were updated.
    pub fn apply_layout(&mut self, laid_out: &[Node]) -> usize {
        let mut applied = 0;
        for node in laid_out {
            let updated = self.modify(&node.id(), |stored| {
                stored
                    .with_position(node.position())
                    .with_anchors(node.anchors())
            });
            if updated {
                applied += 1;
            }
        }
        applied
    }

    /// Checks that the pipeline can be submitted: the edges must not form a cycle.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Graph`] naming the nodes of one cycle.
    pub fn validate(&self) -> Result<(), CanvasError> {
        let mut graph = DiGraph::<Id, ()>::with_capacity(self.nodes.len(), self.edges.len());
        let indices: IndexMap<Id, _> = self
            .nodes
            .keys()
            .map(|id| (*id, graph.add_node(*id)))
            .collect();

        for edge in &self.edges {
            if let (Some(&source), Some(&target)) =
                (indices.get(&edge.source()), indices.get(&edge.target()))
            {
                graph.add_edge(source, target, ());
            }
        }

        let cycle = tarjan_scc(&graph)
            .into_iter()
            .find(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&n| graph.contains_edge(n, n))
            });

        match cycle {
            None => Ok(()),
            Some(mut component) => {
                component.sort();
                let ids = component
                    .iter()
                    .map(|&n| graph[n].to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(CanvasError::Graph(format!("pipeline contains a cycle through: {ids}")))
            }
        }
    }

    fn modify(&mut self, id: &Id, change: impl FnOnce(Node) -> Node) -> bool {
        match self.nodes.get_mut(id) {
            Some(slot) => {
                *slot = change(slot.clone());
                true
            }
            None => false,
        }
    }

    fn update_data(&mut self, id: &Id, change: impl FnOnce(NodeData) -> NodeData) {
        self.modify(id, |node| {
            let data = change(node.data().clone());
            node.with_data(data)
        });
    }
}

impl LiveNodes for GraphStore {
    fn find_node(&self, id: &Id) -> Option<&Node> {
        self.get(id)
    }

    fn update_node_position(&mut self, id: &Id, update: &mut dyn FnMut(&Node) -> Point) -> bool {
        self.modify(id, |node| {
            let position = update(&node);
            node.with_position(position)
        })
    }
}
