//! Leg planning strategies.
//!
//! The optimizer asks a [`LegPlanner`] for the path between two overworld
//! cells many times over. [`AStarLegPlanner`] runs a fresh search every time;
//! [`CachingLegPlanner`] wraps another planner and remembers each answer.

use std::collections::HashMap;

use crate::error::Result;
use crate::grid::{Cell, Grid};
use crate::path::{find_path, Path};

/// Trait for leg planning strategies.
pub trait LegPlanner {
    /// Cheapest path from `from` to `to` on `grid`.
    ///
    /// Returns `Ok(None)` if the target cannot be reached.
    fn find_leg(&mut self, grid: &Grid, from: Cell, to: Cell) -> Result<Option<Path>>;

    /// Forget any state carried over from a previous optimisation run.
    fn reset(&mut self) {}
}

/// Runs one A* search per requested leg.
#[derive(Debug, Clone, Copy, Default)]
pub struct AStarLegPlanner;

impl LegPlanner for AStarLegPlanner {
    fn find_leg(&mut self, grid: &Grid, from: Cell, to: Cell) -> Result<Option<Path>> {
        find_path(grid, from, to)
    }
}

/// Memoises another planner's answers by `(from, to)`.
///
/// Entries are keyed by endpoints only, so one cache must only ever be used
/// with a single grid; [`LegPlanner::reset`] empties it.
#[derive(Debug, Clone, Default)]
pub struct CachingLegPlanner<P> {
    inner: P,
    cache: HashMap<(Cell, Cell), Option<Path>>,
    hits: usize,
    misses: usize,
}

impl<P: LegPlanner> CachingLegPlanner<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Number of legs answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Number of legs forwarded to the wrapped planner.
    pub fn misses(&self) -> usize {
        self.misses
    }
}

impl<P: LegPlanner> LegPlanner for CachingLegPlanner<P> {
    fn find_leg(&mut self, grid: &Grid, from: Cell, to: Cell) -> Result<Option<Path>> {
        if let Some(cached) = self.cache.get(&(from, to)) {
            self.hits += 1;
            return Ok(cached.clone());
        }

        let path = self.inner.find_leg(grid, from, to)?;
        self.misses += 1;
        self.cache.insert((from, to), path.clone());
        Ok(path)
    }

    fn reset(&mut self) {
        self.cache.clear();
        self.hits = 0;
        self.misses = 0;
        self.inner.reset();
    }
}
