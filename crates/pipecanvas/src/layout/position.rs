//! Coordinate assignment for an ordered layering.
//!
//! Coordinates are solved in a frame where ranks advance along `y` and the
//! vertices of a rank are spread along `x`. Horizontal directions use the
//! transposed sizes in that frame and swap the axes back at the end.

use log::trace;

use pipecanvas_core::{
    geometry::{Bounds, Point, Size},
    model::Direction,
};

use super::rank::Layering;

/// Alternating rounds that pull vertices toward their neighbours.
const REFINEMENT_ROUNDS: usize = 8;

/// Spacing used when placing vertices.
#[derive(Debug, Clone, Copy)]
pub(super) struct Spacing {
    pub node: f32,
    pub edge: f32,
    pub rank: f32,
}

/// Returns the centre of every vertex of `layering` in canvas coordinates,
/// translated so the drawing's top-left corner is at the origin.
pub(super) fn assign(layering: &Layering, direction: Direction, spacing: Spacing) -> Vec<Point> {
    let frame_sizes: Vec<Size> = layering
        .vertices
        .iter()
        .map(|vertex| {
            if direction.is_horizontal() {
                vertex.size.swap()
            } else {
                vertex.size
            }
        })
        .collect();

    let depths = rank_depths(layering, &frame_sizes, spacing.rank);
    let breadths = spread_within_ranks(layering, &frame_sizes, spacing);

    let centers: Vec<Point> = layering
        .vertices
        .iter()
        .enumerate()
        .map(|(index, vertex)| {
            let frame = Point::new(breadths[index], depths[vertex.rank]);
            to_canvas(frame, direction)
        })
        .collect();

    translate_to_origin(centers, &layering.vertices.iter().map(|v| v.size).collect::<Vec<_>>())
}

/// Centre line of each rank along the rank axis.
fn rank_depths(layering: &Layering, frame_sizes: &[Size], rank_spacing: f32) -> Vec<f32> {
    let mut depths = Vec::with_capacity(layering.ranks.len());
    let mut top = 0.0;
    for rank in &layering.ranks {
        let thickness = rank
            .iter()
            .map(|&vertex| frame_sizes[vertex].height())
            .fold(0.0f32, f32::max);
        depths.push(top + thickness / 2.0);
        top += thickness + rank_spacing;
    }
    depths
}

fn spread_within_ranks(layering: &Layering, frame_sizes: &[Size], spacing: Spacing) -> Vec<f32> {
    let gap = |vertex: usize| {
        if layering.vertices[vertex].dummy {
            spacing.edge
        } else {
            spacing.node
        }
    };
    let separation = |left: usize, right: usize| {
        frame_sizes[left].width() / 2.0
            + frame_sizes[right].width() / 2.0
            + gap(left) / 2.0
            + gap(right) / 2.0
    };

    let mut x = vec![0.0f32; layering.vertices.len()];
    for rank in &layering.ranks {
        let mut cursor = 0.0;
        for (slot, &vertex) in rank.iter().enumerate() {
            if slot > 0 {
                cursor += separation(rank[slot - 1], vertex);
            }
            x[vertex] = cursor;
        }
    }

    for round in 0..REFINEMENT_ROUNDS {
        let downward = round % 2 == 0;
        let order: Vec<usize> = if downward {
            (1..layering.ranks.len()).collect()
        } else {
            (0..layering.ranks.len().saturating_sub(1)).rev().collect()
        };
        let neighbours = if downward { &layering.up } else { &layering.down };

        for rank_index in order {
            let rank = &layering.ranks[rank_index];
            let desired: Vec<f32> = rank
                .iter()
                .map(|&vertex| weighted_mean(&neighbours[vertex], &x).unwrap_or(x[vertex]))
                .collect();
            let placed = place_rank(rank, &desired, &separation);
            for (&vertex, position) in rank.iter().zip(placed) {
                x[vertex] = position;
            }
        }
        trace!(round; "Refined in-rank coordinates");
    }

    x
}

fn weighted_mean(neighbours: &[(usize, u32)], x: &[f32]) -> Option<f32> {
    let total: u32 = neighbours.iter().map(|&(_, weight)| weight).sum();
    if total == 0 {
        return None;
    }
    let sum: f32 = neighbours
        .iter()
        .map(|&(vertex, weight)| x[vertex] * weight as f32)
        .sum();
    Some(sum / total as f32)
}

/// Places the vertices of one rank as close as possible to `desired` while
/// keeping the minimum separation, by averaging a left-to-right and a
/// right-to-left constrained placement.
fn place_rank(rank: &[usize], desired: &[f32], separation: &impl Fn(usize, usize) -> f32) -> Vec<f32> {
    let count = rank.len();
    if count == 0 {
        return Vec::new();
    }

    let mut forward = desired.to_vec();
    for i in 1..count {
        forward[i] = forward[i].max(forward[i - 1] + separation(rank[i - 1], rank[i]));
    }

    let mut backward = desired.to_vec();
    for i in (0..count - 1).rev() {
        backward[i] = backward[i].min(backward[i + 1] - separation(rank[i], rank[i + 1]));
    }

    forward
        .iter()
        .zip(&backward)
        .map(|(f, b)| (f + b) / 2.0)
        .collect()
}

fn to_canvas(frame: Point, direction: Direction) -> Point {
    match direction {
        Direction::TB => frame,
        Direction::BT => frame.with_y(-frame.y()),
        Direction::LR => frame.swap(),
        Direction::RL => Point::new(-frame.y(), frame.x()),
    }
}

fn translate_to_origin(centers: Vec<Point>, sizes: &[Size]) -> Vec<Point> {
    let Some(bounds) = centers
        .iter()
        .zip(sizes)
        .map(|(center, size)| Bounds::new_from_center(*center, *size))
        .reduce(|acc, bounds| acc.merge(&bounds))
    else {
        return centers;
    };

    let offset = bounds.min_point();
    centers
        .into_iter()
        .map(|center| center.sub_point(offset))
        .collect()
}
