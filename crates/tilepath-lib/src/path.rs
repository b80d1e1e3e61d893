use serde::Serialize;

use crate::cost::Cost;
use crate::error::Result;
use crate::grid::{Cell, Grid};
use crate::pathfinder::Pathfinder;

/// Ordered sequence of cells from a start to a target plus the total cost of
/// entering every cell after the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Path {
    pub cells: Vec<Cell>,
    pub cost: Cost,
}

impl Path {
    pub fn new(cells: Vec<Cell>, cost: Cost) -> Self {
        Self { cells, cost }
    }

    /// Number of moves in the path.
    pub fn step_count(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    pub fn end(&self) -> Option<Cell> {
        self.cells.last().copied()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// The same path walked backwards. Costs on a grid depend on the entered
    /// cell, so the reversed cost is recomputed against `grid`.
    pub fn reversed(&self, grid: &Grid) -> Path {
        let cells: Vec<Cell> = self.cells.iter().rev().copied().collect();
        let cost = cells.iter().skip(1).map(|cell| grid.cost_of(*cell)).sum();
        Path { cells, cost }
    }
}

/// Manhattan distance between two cells.
pub fn manhattan_distance(a: Cell, b: Cell) -> u64 {
    u64::from(a.x.abs_diff(b.x)) + u64::from(a.y.abs_diff(b.y))
}

/// Find the cheapest path between `start` and `goal` with A*.
///
/// Returns `Ok(None)` when the goal is unreachable and an error only when
/// either endpoint lies outside the grid.
pub fn find_path(grid: &Grid, start: Cell, goal: Cell) -> Result<Option<Path>> {
    let mut pathfinder = Pathfinder::with_points(grid, start, goal)?;
    Ok(pathfinder.run())
}
