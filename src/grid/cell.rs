//! Grid coordinates

use serde::{Deserialize, Serialize};

/// One grid coordinate
///
/// Cells carry no occupancy; who stands on a cell is derived from the live beings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: u32,
    pub y: u32,
}

impl CellCoord {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance
    pub fn distance_to(&self, other: CellCoord) -> f32 {
        let dx = other.x as f32 - self.x as f32;
        let dy = other.y as f32 - self.y as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Number of 4-directional steps between two cells on an open grid
    pub fn manhattan_distance(&self, other: CellCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Shares an edge with `other`
    pub fn is_adjacent(&self, other: CellCoord) -> bool {
        self.manhattan_distance(other) == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_metrics() {
        let a = CellCoord::new(1, 1);
        let b = CellCoord::new(4, 5);
        assert_eq!(a.manhattan_distance(b), 7);
        assert!((a.distance_to(b) - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_adjacency_excludes_diagonals() {
        let origin = CellCoord::new(2, 2);
        assert!(origin.is_adjacent(CellCoord::new(2, 1)));
        assert!(origin.is_adjacent(CellCoord::new(3, 2)));
        assert!(!origin.is_adjacent(CellCoord::new(3, 3)));
        assert!(!origin.is_adjacent(origin));
    }
}
