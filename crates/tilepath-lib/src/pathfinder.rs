//! Incremental A* search over a [`Grid`].
//!
//! A [`Pathfinder`] owns all of its search state and advances one expansion
//! per [`Pathfinder::step`] call, so a caller can render progress between
//! steps or call [`Pathfinder::run`] to finish in one go.
//!
//! ```
//! use tilepath_lib::{Cell, Grid, Pathfinder, SearchState};
//!
//! let grid = Grid::from_rows(&["...", "...", "..."]).unwrap();
//! let mut pathfinder = Pathfinder::with_points(&grid, Cell::new(0, 0), Cell::new(2, 2)).unwrap();
//!
//! let (state, _) = pathfinder.step();
//! assert_eq!(state, SearchState::InProgress);
//!
//! let path = pathfinder.run().expect("open grid has a path");
//! assert_eq!(path.cells.len(), 5);
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::cost::Cost;
use crate::error::Result;
use crate::frontier::Frontier;
use crate::grid::{Cell, Grid, NeighbourPolicy};
use crate::path::{manhattan_distance, Path};

/// Lifecycle of a single search episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchState {
    /// Start and/or goal are not bound; stepping is a no-op.
    NotReady,
    /// Frontier seeded with the start cell, no expansion yet.
    NotStarted,
    InProgress,
    /// Goal reached; the final path is available.
    Succeeded,
    /// Frontier exhausted without reaching the goal.
    Failed,
}

impl SearchState {
    /// Whether further steps can change the search.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SearchState::NotReady | SearchState::Succeeded | SearchState::Failed
        )
    }
}

impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SearchState::NotReady => "not-ready",
            SearchState::NotStarted => "not-started",
            SearchState::InProgress => "in-progress",
            SearchState::Succeeded => "succeeded",
            SearchState::Failed => "failed",
        };
        f.write_str(value)
    }
}

/// Resumable A* search bound to one grid.
///
/// Not meant to be shared between concurrent searches; create one instance
/// per search.
#[derive(Debug, Clone)]
pub struct Pathfinder<'g> {
    grid: &'g Grid,
    frontier: Frontier,
    came_from: HashMap<Cell, Option<Cell>>,
    cost_so_far: HashMap<Cell, Cost>,
    start: Option<Cell>,
    goal: Option<Cell>,
    current: Option<Cell>,
    state: SearchState,
    final_path: Option<Path>,
    expanded: usize,
}

impl<'g> Pathfinder<'g> {
    /// Create a pathfinder with no start or goal. It stays `NotReady` until
    /// [`Pathfinder::set_points`] binds both.
    pub fn new(grid: &'g Grid) -> Self {
        Self {
            grid,
            frontier: Frontier::default(),
            came_from: HashMap::new(),
            cost_so_far: HashMap::new(),
            start: None,
            goal: None,
            current: None,
            state: SearchState::NotReady,
            final_path: None,
            expanded: 0,
        }
    }

    /// Create a pathfinder ready to search from `start` to `goal`.
    pub fn with_points(grid: &'g Grid, start: Cell, goal: Cell) -> Result<Self> {
        let mut pathfinder = Self::new(grid);
        pathfinder.set_points(Some(start), Some(goal))?;
        Ok(pathfinder)
    }

    pub fn grid(&self) -> &'g Grid {
        self.grid
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn start(&self) -> Option<Cell> {
        self.start
    }

    pub fn goal(&self) -> Option<Cell> {
        self.goal
    }

    /// Most recently expanded cell.
    pub fn current(&self) -> Option<Cell> {
        self.current
    }

    /// Path found by a successful search.
    pub fn final_path(&self) -> Option<&Path> {
        self.final_path.as_ref()
    }

    /// Number of cells expanded so far in this episode.
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// Number of entries waiting in the frontier (stale entries included).
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Best known accumulated cost for every cell reached so far.
    pub fn cost_map(&self) -> &HashMap<Cell, Cost> {
        &self.cost_so_far
    }

    /// Advance the search by one expansion.
    ///
    /// Terminal states (`NotReady`, `Succeeded`, `Failed`) are returned
    /// unchanged together with the final path, if any.
    pub fn step(&mut self) -> (SearchState, Option<Path>) {
        match self.state {
            SearchState::NotReady | SearchState::Succeeded | SearchState::Failed => {
                return (self.state, self.final_path.clone());
            }
            SearchState::NotStarted => {
                self.state = SearchState::InProgress;
            }
            SearchState::InProgress => {}
        }

        let Some(goal) = self.goal else {
            self.state = SearchState::NotReady;
            return (self.state, None);
        };

        let Some(current) = self.pop_live() else {
            return self.fail();
        };
        self.current = Some(current);
        self.expanded += 1;

        if current == goal {
            self.final_path = self.backtrack(goal);
            self.state = SearchState::Succeeded;
            tracing::debug!(
                "search reached {} after {} expansions (cost {})",
                goal,
                self.expanded,
                self.final_path
                    .as_ref()
                    .map_or(Cost::Unreachable, |path| path.cost)
            );
            return (self.state, self.final_path.clone());
        }

        let current_cost = self
            .cost_so_far
            .get(&current)
            .copied()
            .unwrap_or(Cost::Unreachable);

        for next in self.grid.neighbours(current, NeighbourPolicy::Traversable) {
            let cost_to_next = self.grid.cost_of(next);
            let new_cost = current_cost + cost_to_next;

            let improves = self
                .cost_so_far
                .get(&next)
                .map_or(true, |known| new_cost < *known);
            if !improves {
                continue;
            }

            self.cost_so_far.insert(next, new_cost);
            let priority = new_cost + Cost::Finite(manhattan_distance(goal, next));
            self.frontier.push(next, new_cost, priority.as_f64());
            self.came_from.insert(next, Some(current));
        }

        tracing::trace!(
            "expanded {} (cost {}), frontier holds {}",
            current,
            current_cost,
            self.frontier.len()
        );

        if self.frontier.is_empty() {
            return self.fail();
        }

        (SearchState::InProgress, None)
    }

    /// Step until the search leaves `NotStarted`/`InProgress` and return the
    /// final path, or `None` when no path exists or the search is not ready.
    pub fn run(&mut self) -> Option<Path> {
        loop {
            let (state, path) = self.step();
            if state.is_terminal() {
                return path;
            }
        }
    }

    /// Discard all search progress.
    ///
    /// The start cell is re-seeded if bound and traversable. The search becomes `NotStarted`
    /// when both start and goal are bound and `NotReady` otherwise.
    pub fn reset(&mut self) {
        self.frontier.clear();
        self.came_from.clear();
        self.cost_so_far.clear();
        self.current = None;
        self.final_path = None;
        self.expanded = 0;
        self.state = SearchState::NotReady;

        if let Some(start) = self.start {
            // A wall start leaves the frontier empty, so the first step fails.
            if self.grid.cost_of(start).is_finite() {
                self.frontier.push(start, Cost::ZERO, 0.0);
                self.came_from.insert(start, None);
                self.cost_so_far.insert(start, Cost::ZERO);
            }

            if self.goal.is_some() {
                self.state = SearchState::NotStarted;
            }
        }

        tracing::debug!(
            "search reset (start {:?}, goal {:?}, state {})",
            self.start,
            self.goal,
            self.state
        );
    }

    /// Replace the start and/or goal and reset the search.
    ///
    /// `None` keeps the currently bound value. Points outside the grid are
    /// rejected before any state changes.
    pub fn set_points(&mut self, start: Option<Cell>, goal: Option<Cell>) -> Result<()> {
        if let Some(cell) = start {
            self.grid.ensure_contains(cell)?;
        }
        if let Some(cell) = goal {
            self.grid.ensure_contains(cell)?;
        }

        if start.is_some() {
            self.start = start;
        }
        if goal.is_some() {
            self.goal = goal;
        }
        self.reset();
        Ok(())
    }

    /// Unbind start and goal, returning to `NotReady`.
    pub fn clear(&mut self) {
        self.start = None;
        self.goal = None;
        self.reset();
    }

    /// Walk predecessors from `cell` back to the start.
    ///
    /// Works for any cell reached so far, not only the goal, which lets a
    /// caller draw the best known route to the cell under the cursor. Returns
    /// `None` for cells the search has not reached.
    pub fn backtrack(&self, cell: Cell) -> Option<Path> {
        let mut cursor = *self.came_from.get(&cell)?;
        let mut cells = vec![cell];

        while let Some(previous) = cursor {
            // Predecessor chains are acyclic; the bound guards corrupted input.
            if cells.len() > self.came_from.len() {
                return None;
            }
            cells.push(previous);
            cursor = self.came_from.get(&previous).copied().flatten();
        }
        cells.reverse();

        let cost = self
            .cost_so_far
            .get(&cell)
            .copied()
            .unwrap_or(Cost::Unreachable);
        Some(Path::new(cells, cost))
    }

    // Pop the next entry whose cost still matches the best known cost.
    fn pop_live(&mut self) -> Option<Cell> {
        while let Some(entry) = self.frontier.pop() {
            let stale = self
                .cost_so_far
                .get(&entry.cell)
                .is_some_and(|best| entry.cost > *best);
            if !stale {
                return Some(entry.cell);
            }
        }
        None
    }

    fn fail(&mut self) -> (SearchState, Option<Path>) {
        self.state = SearchState::Failed;
        self.final_path = None;
        tracing::debug!(
            "search from {:?} to {:?} exhausted the frontier after {} expansions",
            self.start,
            self.goal,
            self.expanded
        );
        (SearchState::Failed, None)
    }
}
