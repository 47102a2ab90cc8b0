//! Cell groups produced by grid queries: paths and clusters

use std::ops::ControlFlow;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::CellCoord;

/// Drives a path one cell at a time
///
/// Each call is a suspension point: `follow` does not touch the next cell until
/// the returned future completes. Returning `Break` ends the walk early.
#[allow(async_fn_in_trait)]
pub trait StepDriver {
    async fn step(&mut self, cell: CellCoord) -> ControlFlow<()>;
}

/// Ordered cells from a start towards a destination
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    cells: Vec<CellCoord>,
}

impl Path {
    pub fn new(cells: Vec<CellCoord>) -> Self {
        Self { cells }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Steps between the first and last cell
    pub fn step_count(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    pub fn first(&self) -> Option<CellCoord> {
        self.cells.first().copied()
    }

    pub fn last(&self) -> Option<CellCoord> {
        self.cells.last().copied()
    }

    /// Keep only the first `length` cells
    pub fn limit(mut self, length: usize) -> Self {
        self.cells.truncate(length);
        self
    }

    /// Drop the first `count` cells
    pub fn shift(mut self, count: usize) -> Self {
        let count = count.min(self.cells.len());
        self.cells.drain(..count);
        self
    }

    /// Walk the path through `driver`, consuming it
    ///
    /// Returns the last cell handed to the driver, or None for an empty path.
    pub async fn follow<D: StepDriver>(self, driver: &mut D) -> Option<CellCoord> {
        let mut last = None;

        for cell in self.cells {
            last = Some(cell);
            if driver.step(cell).await.is_break() {
                break;
            }
        }

        last
    }
}

/// Unordered cells around an origin
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cluster {
    cells: Vec<CellCoord>,
}

impl Cluster {
    pub fn new(cells: Vec<CellCoord>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: CellCoord) -> bool {
        self.cells.contains(&cell)
    }

    /// Keep the cells matching `predicate`
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: FnMut(&CellCoord) -> bool,
    {
        self.cells.retain(predicate);
        self
    }

    /// Order cells by distance from `origin`, nearest first
    pub fn nearest_first(mut self, origin: CellCoord) -> Self {
        self.cells.sort_by(|a, b| {
            a.distance_to(origin)
                .total_cmp(&b.distance_to(origin))
                .then_with(|| (a.y, a.x).cmp(&(b.y, b.x)))
        });
        self
    }

    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<CellCoord> {
        self.cells.choose(rng).copied()
    }

    /// Remove and return a random cell
    pub fn take_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<CellCoord> {
        if self.cells.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.cells.len());
        Some(self.cells.swap_remove(index))
    }
}
