//! A* pathfinding over a walkability snapshot
//!
//! Movement is 4-directional with unit step cost, so the Manhattan distance is an
//! exact heuristic on open ground.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::grid::{CellCoord, WalkabilityMask};

/// Node in the A* open set
#[derive(Debug, Clone)]
struct PathNode {
    coord: CellCoord,
    f_cost: u32, // g_cost + heuristic
    g_cost: u32,
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; prefer deeper nodes on ties
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| self.g_cost.cmp(&other.g_cost))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find the shortest 4-directional path from `start` to `goal`
///
/// The returned cells include both `start` and `goal`. The start cell is never
/// checked for walkability (the mover is standing on it). Returns None if the
/// goal is blocked, out of bounds or unreachable.
pub fn find_path(
    mask: &WalkabilityMask,
    start: CellCoord,
    goal: CellCoord,
) -> Option<Vec<CellCoord>> {
    if !mask.contains(start) || !mask.contains(goal) {
        return None;
    }

    if start == goal {
        return Some(vec![start]);
    }

    if mask.is_blocked(goal) {
        return None;
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: HashMap<CellCoord, CellCoord> = HashMap::new();
    let mut g_scores: HashMap<CellCoord, u32> = HashMap::new();

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        coord: start,
        f_cost: start.manhattan_distance(goal),
        g_cost: 0,
    });

    while let Some(current) = open_set.pop() {
        if current.coord == goal {
            return Some(reconstruct_path(&came_from, current.coord));
        }

        let current_g = *g_scores.get(&current.coord).unwrap_or(&u32::MAX);
        if current.g_cost > current_g {
            // Stale heap entry
            continue;
        }

        for neighbor in mask.neighbors(current.coord) {
            if mask.is_blocked(neighbor) {
                continue;
            }

            let tentative_g = current_g + 1;
            let neighbor_g = *g_scores.get(&neighbor).unwrap_or(&u32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative_g);

                open_set.push(PathNode {
                    coord: neighbor,
                    f_cost: tentative_g + neighbor.manhattan_distance(goal),
                    g_cost: tentative_g,
                });
            }
        }
    }

    None // No path found
}

/// Reconstruct path from came_from map
fn reconstruct_path(
    came_from: &HashMap<CellCoord, CellCoord>,
    mut current: CellCoord,
) -> Vec<CellCoord> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
