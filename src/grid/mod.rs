//! Rectangular tile grid: lookup, adjacency, walkability and pathfinding
//!
//! The grid only knows geometry. Anything that blocks movement is passed in as a
//! set of blocked cells, taken fresh from the live beings on every query.

pub mod cell;
pub mod path;
pub mod pathfinding;

pub use cell::CellCoord;
pub use path::{Cluster, Path, StepDriver};
pub use pathfinding::find_path;

/// The full level grid, created once per loaded level
#[derive(Debug, Clone)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<CellCoord>,
}

impl Grid {
    /// Create a grid with every cell of a `width` x `height` rectangle
    pub fn new(width: u32, height: u32) -> Self {
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(CellCoord::new(x, y));
            }
        }

        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells.iter().copied()
    }

    pub fn is_within(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }

    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// Look up a cell, returning None outside the grid
    pub fn cell_at(&self, x: i64, y: i64) -> Option<CellCoord> {
        if !self.is_within(x, y) {
            tracing::warn!("Trying to get an out of bounds cell ({}, {})", x, y);
            return None;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.cells.get(index).copied()
    }

    fn offset(&self, cell: CellCoord, dx: i64, dy: i64) -> Option<CellCoord> {
        let x = i64::from(cell.x) + dx;
        let y = i64::from(cell.y) + dy;
        if self.is_within(x, y) {
            Some(CellCoord::new(x as u32, y as u32))
        } else {
            None
        }
    }

    pub fn north(&self, cell: CellCoord) -> Option<CellCoord> {
        self.offset(cell, 0, -1)
    }

    pub fn south(&self, cell: CellCoord) -> Option<CellCoord> {
        self.offset(cell, 0, 1)
    }

    pub fn east(&self, cell: CellCoord) -> Option<CellCoord> {
        self.offset(cell, 1, 0)
    }

    pub fn west(&self, cell: CellCoord) -> Option<CellCoord> {
        self.offset(cell, -1, 0)
    }

    /// In-bounds neighbours in north, east, south, west order
    pub fn adjacent(&self, cell: CellCoord) -> Vec<CellCoord> {
        [
            self.north(cell),
            self.east(cell),
            self.south(cell),
            self.west(cell),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Snapshot of walkability with the given cells blocked
    pub fn walkability<I>(&self, blocked: I) -> WalkabilityMask
    where
        I: IntoIterator<Item = CellCoord>,
    {
        let mut mask = WalkabilityMask::open(self.width, self.height);
        for cell in blocked {
            mask.block(cell);
        }
        mask
    }

    /// Shortest walkable path from `start` to `end`, both included
    ///
    /// The walkability snapshot is built from `blocked` on every call. An
    /// unreachable destination yields an empty path.
    pub fn path<I>(&self, blocked: I, start: CellCoord, end: CellCoord) -> Path
    where
        I: IntoIterator<Item = CellCoord>,
    {
        let mask = self.walkability(blocked);
        match find_path(&mask, start, end) {
            Some(cells) => Path::new(cells),
            None => {
                tracing::debug!("No path from {:?} to {:?}", start, end);
                Path::empty()
            }
        }
    }

    /// Every cell whose Euclidean distance to `origin` is strictly below `radius`
    pub fn cluster(&self, origin: CellCoord, radius: f32) -> Cluster {
        Cluster::new(
            self.cells()
                .filter(|cell| cell.distance_to(origin) < radius)
                .collect(),
        )
    }
}

/// Dense blocked/open flags for every cell of a grid
#[derive(Debug, Clone)]
pub struct WalkabilityMask {
    width: u32,
    height: u32,
    blocked: Vec<bool>,
}

impl WalkabilityMask {
    /// A mask with every cell walkable
    pub fn open(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            blocked: vec![false; width as usize * height as usize],
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            Some(cell.y as usize * self.width as usize + cell.x as usize)
        } else {
            None
        }
    }

    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// Mark a cell as not walkable; out-of-bounds cells are ignored
    pub fn block(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            self.blocked[index] = true;
        }
    }

    /// Out-of-bounds cells count as blocked
    pub fn is_blocked(&self, cell: CellCoord) -> bool {
        self.index(cell).map_or(true, |index| self.blocked[index])
    }

    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        !self.is_blocked(cell)
    }

    pub(crate) fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        let (x, y) = (i64::from(cell.x), i64::from(cell.y));
        [(0, -1), (1, 0), (0, 1), (-1, 0)]
            .into_iter()
            .filter_map(move |(dx, dy)| {
                let nx = x + dx;
                let ny = y + dy;
                if nx < 0 || ny < 0 {
                    return None;
                }
                let candidate = CellCoord::new(nx as u32, ny as u32);
                self.contains(candidate).then_some(candidate)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_lookup_fails_softly() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.cell_at(3, 2), Some(CellCoord::new(3, 2)));
        assert_eq!(grid.cell_at(4, 0), None);
        assert_eq!(grid.cell_at(-1, 0), None);
        assert_eq!(grid.cell_at(0, 3), None);
    }

    #[test]
    fn test_adjacent_cells_at_corner() {
        let grid = Grid::new(3, 3);
        let corner = CellCoord::new(0, 0);
        assert_eq!(grid.north(corner), None);
        assert_eq!(grid.west(corner), None);
        assert_eq!(
            grid.adjacent(corner),
            vec![CellCoord::new(1, 0), CellCoord::new(0, 1)]
        );
        assert_eq!(grid.adjacent(CellCoord::new(1, 1)).len(), 4);
    }

    #[test]
    fn test_five_by_five_diagonal_path() {
        let grid = Grid::new(5, 5);
        let path = grid.path(
            std::iter::empty(),
            CellCoord::new(0, 0),
            CellCoord::new(4, 4),
        );

        assert_eq!(path.step_count(), 8);
        assert_eq!(path.first(), Some(CellCoord::new(0, 0)));
        assert_eq!(path.last(), Some(CellCoord::new(4, 4)));

        let walked = path.shift(1);
        assert_eq!(walked.len(), 8);
        assert_eq!(walked.last(), Some(CellCoord::new(4, 4)));
    }

    #[test]
    fn test_path_recomputes_walkability_each_call() {
        let grid = Grid::new(3, 1);
        let start = CellCoord::new(0, 0);
        let end = CellCoord::new(2, 0);

        assert!(grid.path(vec![CellCoord::new(1, 0)], start, end).is_empty());
        assert_eq!(grid.path(Vec::new(), start, end).len(), 3);
    }

    #[test]
    fn test_cluster_radius_is_exclusive() {
        let grid = Grid::new(5, 5);
        let origin = CellCoord::new(2, 2);

        let cluster = grid.cluster(origin, 1.0);
        assert_eq!(cluster.cells(), &[origin]);

        let cluster = grid.cluster(origin, 1.5);
        assert_eq!(cluster.len(), 9);
        assert!(!cluster.contains(CellCoord::new(0, 2)));
    }

    #[test]
    fn test_mask_treats_out_of_bounds_as_blocked() {
        let mut mask = WalkabilityMask::open(2, 2);
        mask.block(CellCoord::new(9, 9));
        assert!(mask.is_blocked(CellCoord::new(2, 0)));
        assert!(mask.is_walkable(CellCoord::new(1, 1)));
    }
}
