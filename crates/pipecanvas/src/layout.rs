//! Layered layout of pipeline graphs.
//!
//! The engine runs a Sugiyama style pipeline over an ephemeral graph rebuilt
//! on every call:
//!
//! 1. build sized vertices and merged arcs
//! 2. reverse depth-first back edges so the graph is acyclic
//! 3. rank by longest path from the sources and split long arcs
//! 4. reduce crossings with barycenter sweeps
//! 5. assign size aware coordinates
//! 6. route edges through their dummy vertices

mod engine;
mod graph;
mod order;
mod position;
mod rank;
mod route;

pub use engine::{Engine, Layout};
pub use route::RoutedEdge;
