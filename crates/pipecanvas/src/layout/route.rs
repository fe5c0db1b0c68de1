//! Polyline routes for laid out edges.

use serde::Serialize;

use pipecanvas_core::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
    model::{AnchorSide, Direction},
};

use super::{graph::Link, rank::Layering};

/// Route of one edge, from the source's outgoing side to the target's incoming side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutedEdge {
    source: Id,
    target: Id,
    points: Vec<Point>,
}

impl RoutedEdge {
    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    /// Bend points, first and last on the node boundaries.
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

fn side_midpoint(center: Point, size: Size, side: AnchorSide) -> Point {
    let bounds = Bounds::new_from_center(center, size);
    match side {
        AnchorSide::Left => bounds.left_center(),
        AnchorSide::Right => bounds.right_center(),
        AnchorSide::Top => bounds.top_center(),
        AnchorSide::Bottom => bounds.bottom_center(),
    }
}

/// Routes every kept input edge through the dummies of its arc. Edges whose
/// arc was reversed to break a cycle are routed in their original direction.
pub(super) fn route_edges(
    links: &[Link],
    layering: &Layering,
    centers: &[Point],
    direction: Direction,
    reversed: &impl Fn(&Link) -> bool,
) -> Vec<RoutedEdge> {
    let sides = direction.anchor_sides();

    links
        .iter()
        .map(|link| {
            let (source, target) = (link.source.index(), link.target.index());
            let flipped = reversed(link);

            let bends: Vec<usize> = if flipped {
                let mut chain = layering
                    .chains
                    .get(&(link.target, link.source))
                    .cloned()
                    .unwrap_or_default();
                chain.reverse();
                chain
            } else {
                layering
                    .chains
                    .get(&(link.source, link.target))
                    .cloned()
                    .unwrap_or_default()
            };

            // A flipped edge leaves its source against the flow.
            let (source_side, target_side) = if flipped {
                (sides.target(), sides.source())
            } else {
                (sides.source(), sides.target())
            };

            let mut points = Vec::with_capacity(bends.len() + 2);
            points.push(side_midpoint(
                centers[source],
                layering.vertices[source].size,
                source_side,
            ));
            points.extend(bends.iter().map(|&dummy| centers[dummy]));
            points.push(side_midpoint(
                centers[target],
                layering.vertices[target].size,
                target_side,
            ));

            RoutedEdge {
                source: link.edge.source(),
                target: link.edge.target(),
                points,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use petgraph::graph::NodeIndex;

    use super::*;
    use crate::layout::rank::LayerVertex;
    use pipecanvas_core::model::Edge;

    fn layering() -> Layering {
        let real = |rank| LayerVertex {
            size: Size::new(20.0, 10.0),
            rank,
            dummy: false,
        };
        let mut chains = HashMap::new();
        chains.insert((NodeIndex::new(0), NodeIndex::new(1)), vec![2]);
        Layering {
            vertices: vec![
                real(0),
                real(2),
                LayerVertex {
                    size: Size::default(),
                    rank: 1,
                    dummy: true,
                },
            ],
            ranks: vec![vec![0], vec![2], vec![1]],
            up: vec![vec![], vec![(2, 1)], vec![(0, 1)]],
            down: vec![vec![(2, 1)], vec![], vec![(1, 1)]],
            chains,
        }
    }

    fn link(source: &str, target: &str, from: usize, to: usize) -> Link {
        Link {
            edge: Edge::new(source, target),
            source: NodeIndex::new(from),
            target: NodeIndex::new(to),
        }
    }

    #[test]
    fn test_route_through_dummy() {
        let centers = [Point::new(10.0, 5.0), Point::new(110.0, 5.0), Point::new(60.0, 5.0)];
        let routes = route_edges(&[link("a", "b", 0, 1)], &layering(), &centers, Direction::LR, &|_| false);

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].source(), "a");
        assert_eq!(
            routes[0].points(),
            &[Point::new(20.0, 5.0), Point::new(60.0, 5.0), Point::new(100.0, 5.0)]
        );
    }

    #[test]
    fn test_reversed_edge_keeps_original_direction() {
        let centers = [Point::new(10.0, 5.0), Point::new(110.0, 5.0), Point::new(60.0, 5.0)];
        let routes = route_edges(&[link("b", "a", 1, 0)], &layering(), &centers, Direction::LR, &|_| true);

        assert_eq!(routes[0].source(), "b");
        assert_eq!(routes[0].target(), "a");
        assert_eq!(
            routes[0].points(),
            &[Point::new(100.0, 5.0), Point::new(60.0, 5.0), Point::new(20.0, 5.0)]
        );
    }
}
