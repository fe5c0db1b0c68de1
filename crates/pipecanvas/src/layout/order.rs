//! Crossing reduction with the barycenter heuristic.

use log::debug;

use super::rank::Layering;

/// Sweeps without improvement after which ordering stops early.
const PATIENCE: usize = 4;

/// Reorders every rank of `layering` to reduce edge crossings.
///
/// Sweeps alternate downward (ordering by predecessors) and upward (ordering
/// by successors). The ordering with the fewest crossings seen is kept.
pub(super) fn minimise_crossings(layering: &mut Layering, max_passes: usize) {
    let mut best = layering.ranks.clone();
    let mut best_crossings = count_crossings(layering);
    let initial_crossings = best_crossings;
    let mut stale = 0;

    for pass in 0..max_passes {
        if best_crossings == 0 {
            break;
        }

        if pass % 2 == 0 {
            sweep_down(layering);
        } else {
            sweep_up(layering);
        }

        let crossings = count_crossings(layering);
        if crossings < best_crossings {
            best = layering.ranks.clone();
            best_crossings = crossings;
            stale = 0;
        } else {
            stale += 1;
            if stale >= PATIENCE {
                break;
            }
        }
    }

    layering.ranks = best;
    debug!(before = initial_crossings, after = best_crossings; "Reduced edge crossings");
}

fn sweep_down(layering: &mut Layering) {
    for rank in 1..layering.ranks.len() {
        let positions = positions_of(layering, rank - 1);
        reorder(&mut layering.ranks[rank], &layering.up, &positions);
    }
}

fn sweep_up(layering: &mut Layering) {
    for rank in (0..layering.ranks.len().saturating_sub(1)).rev() {
        let positions = positions_of(layering, rank + 1);
        reorder(&mut layering.ranks[rank], &layering.down, &positions);
    }
}

/// Slot of every vertex of `rank`, indexed by vertex.
fn positions_of(layering: &Layering, rank: usize) -> Vec<Option<usize>> {
    let mut positions = vec![None; layering.vertices.len()];
    for (slot, &vertex) in layering.ranks[rank].iter().enumerate() {
        positions[vertex] = Some(slot);
    }
    positions
}

/// Sorts the vertices that have neighbours by barycenter, stably, and puts
/// them back into the slots they occupied. Vertices without neighbours keep
/// their slot.
fn reorder(rank: &mut [usize], neighbours: &[Vec<(usize, u32)>], positions: &[Option<usize>]) {
    let mut slots = Vec::new();
    let mut movable = Vec::new();

    for (slot, &vertex) in rank.iter().enumerate() {
        if let Some(center) = barycenter(&neighbours[vertex], positions) {
            slots.push(slot);
            movable.push((vertex, center));
        }
    }

    movable.sort_by(|a, b| a.1.total_cmp(&b.1));
    for (slot, (vertex, _)) in slots.into_iter().zip(movable) {
        rank[slot] = vertex;
    }
}

fn barycenter(neighbours: &[(usize, u32)], positions: &[Option<usize>]) -> Option<f32> {
    let (sum, total) = neighbours
        .iter()
        .filter_map(|&(vertex, weight)| positions[vertex].map(|slot| (slot, weight)))
        .fold((0.0f32, 0u32), |(sum, total), (slot, weight)| {
            (sum + slot as f32 * weight as f32, total + weight)
        });
    (total > 0).then(|| sum / total as f32)
}

/// Weighted number of crossings between all pairs of adjacent ranks.
pub(super) fn count_crossings(layering: &Layering) -> u64 {
    let mut crossings = 0;
    for rank in 1..layering.ranks.len() {
        let upper = positions_of(layering, rank - 1);
        let lower = positions_of(layering, rank);

        let mut segments = Vec::new();
        for &vertex in &layering.ranks[rank - 1] {
            for &(target, weight) in &layering.down[vertex] {
                if let (Some(top), Some(bottom)) = (upper[vertex], lower[target]) {
                    segments.push((top, bottom, u64::from(weight)));
                }
            }
        }

        for (i, &(top_a, bottom_a, weight_a)) in segments.iter().enumerate() {
            for &(top_b, bottom_b, weight_b) in &segments[i + 1..] {
                let crossed = (top_a < top_b && bottom_a > bottom_b)
                    || (top_a > top_b && bottom_a < bottom_b);
                if crossed {
                    crossings += weight_a * weight_b;
                }
            }
        }
    }
    crossings
}
