//! Deterministic movement: nearest reachable in-range cell, then the first step toward it.
//! Everything here reads the grid immutably, so a unit's own move cannot feed back
//! into the decision that produced it.
//!
//! Two separate reading-order tie-breaks apply: among equally near destination
//! cells, and among equally good first steps toward the chosen destination.

use std::collections::{BTreeSet, VecDeque};

use crate::state::Grid;
use crate::types::Pos;

/// Breadth-first step counts from one source over free cells.
pub struct DistanceField {
    width: usize,
    height: usize,
    steps: Vec<Option<u32>>,
}

impl DistanceField {
    pub fn get(&self, pos: Pos) -> Option<u32> {
        if pos.x < 0 || pos.y < 0 || pos.x as usize >= self.width || pos.y as usize >= self.height {
            return None;
        }
        self.steps[(pos.y as usize) * self.width + (pos.x as usize)]
    }
}

/// Distances from `source` to every cell reachable through free cells.
///
/// The source itself counts as passable even when a unit stands on it.
pub fn distance_field(grid: &Grid, source: Pos) -> DistanceField {
    let mut steps = vec![None; grid.width() * grid.height()];
    let mut queue = VecDeque::new();
    steps[grid.index(source)] = Some(0);
    queue.push_back((source, 0));

    while let Some((current, distance)) = queue.pop_front() {
        for next in grid.neighbors(current) {
            let idx = grid.index(next);
            if steps[idx].is_none() && grid.is_free(next) {
                steps[idx] = Some(distance + 1);
                queue.push_back((next, distance + 1));
            }
        }
    }

    DistanceField { width: grid.width(), height: grid.height(), steps }
}

/// Closest reachable candidate and its distance; ties go to reading order.
pub fn nearest_reachable(
    grid: &Grid,
    origin: Pos,
    candidates: &BTreeSet<Pos>,
) -> Option<(Pos, u32)> {
    let field = distance_field(grid, origin);
    candidates
        .iter()
        .filter_map(|&cell| field.get(cell).map(|distance| (distance, cell)))
        .min()
        .map(|(distance, cell)| (cell, distance))
}

/// Neighbour of `origin` that starts a shortest path to `target`.
pub fn first_step(grid: &Grid, origin: Pos, target: Pos) -> Option<Pos> {
    if origin == target {
        return None;
    }
    let field = distance_field(grid, target);
    grid.neighbors(origin)
        .filter(|next| grid.is_free(*next))
        .filter_map(|next| field.get(next).map(|distance| (distance, next)))
        .min()
        .map(|(_, next)| next)
}

pub fn choose_step(grid: &Grid, origin: Pos, candidates: &BTreeSet<Pos>) -> Option<Pos> {
    let (target, _) = nearest_reachable(grid, origin, candidates)?;
    first_step(grid, origin, target)
}

pub fn shortest_distance(grid: &Grid, from: Pos, to: Pos) -> Option<u32> {
    distance_field(grid, from).get(to)
}
