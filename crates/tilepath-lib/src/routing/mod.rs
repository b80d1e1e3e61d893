//! Multi-stop route optimisation.
//!
//! This module provides:
//! - [`RouteOptimizer`] - brute-force search for the cheapest waypoint order
//! - [`Tour`] - the selected order and its total cost
//! - [`LegPlanner`] - strategy used to price overworld legs
//! - [`plan_journey`] - expands a tour into concrete legs for playback
//!
//! A tour starts at the world's home cell, visits every waypoint (walking its
//! sub-map from the internal start to the internal goal and back), and returns
//! home. Every ordering is enumerated, which is fine for the handful of
//! waypoints a world carries.
//!
//! # Example
//!
//! ```ignore
//! use tilepath_lib::{find_best_order, World};
//!
//! let world = World::load("worlds/hyrule/world.json".as_ref())?;
//! let tour = find_best_order(&world)?;
//! println!("visit {:?} for {}", tour.order, tour.cost);
//! ```

mod journey;
mod planner;

pub use journey::{plan_journey, Journey, Leg, LegKind};
pub use planner::{AStarLegPlanner, CachingLegPlanner, LegPlanner};

use serde::Serialize;

use crate::cost::Cost;
use crate::error::{Error, Result};
use crate::grid::Cell;
use crate::world::World;

/// Cheapest visiting order found by the optimizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tour {
    /// Waypoint indices in visiting order.
    pub order: Vec<usize>,
    /// Total cost of the closed tour, round trips inside waypoints included.
    pub cost: Cost,
    /// Number of orderings evaluated.
    pub evaluated: usize,
}

/// Brute-force tour optimizer.
#[derive(Debug, Clone, Default)]
pub struct RouteOptimizer<P = CachingLegPlanner<AStarLegPlanner>> {
    planner: P,
}

impl RouteOptimizer {
    /// Optimizer that memoises overworld legs across orderings.
    pub fn new() -> Self {
        Self::with_planner(CachingLegPlanner::new(AStarLegPlanner))
    }
}

impl<P: LegPlanner> RouteOptimizer<P> {
    pub fn with_planner(planner: P) -> Self {
        Self { planner }
    }

    pub fn planner(&self) -> &P {
        &self.planner
    }

    /// Find the visiting order with the strictly lowest total cost.
    ///
    /// Ties keep the first ordering produced by [`permutations`]. Returns
    /// [`Error::NoValidTour`] when every ordering is unreachable, which is
    /// distinct from a valid zero-cost tour over zero waypoints.
    pub fn find_best_order(&mut self, world: &World) -> Result<Tour> {
        self.planner.reset();
        let count = world.waypoints().len();

        if count == 0 {
            tracing::info!("world has no waypoints; tour is empty");
            return Ok(Tour {
                order: Vec::new(),
                cost: Cost::ZERO,
                evaluated: 0,
            });
        }

        let unreachable: Vec<String> = world
            .waypoints()
            .iter()
            .filter(|waypoint| waypoint.round_trip_cost().is_unreachable())
            .map(|waypoint| waypoint.name().to_string())
            .collect();
        if !unreachable.is_empty() {
            tracing::debug!("waypoints without internal path: {:?}", unreachable);
            return Err(Error::NoValidTour {
                waypoints: count,
                unreachable,
            });
        }

        let mut best: Option<(Vec<usize>, Cost)> = None;
        let mut evaluated = 0usize;
        for order in permutations(count) {
            let cost = self.evaluate_order(world, &order)?;
            evaluated += 1;
            tracing::debug!("order {:?} costs {}", order, cost);

            let improves = best
                .as_ref()
                .map_or(true, |(_, best_cost)| cost < *best_cost);
            if improves {
                best = Some((order, cost));
            }
        }

        match best {
            Some((order, cost)) if cost.is_finite() => {
                tracing::info!(
                    "best order {:?} costs {} ({} orderings evaluated)",
                    order,
                    cost,
                    evaluated
                );
                Ok(Tour {
                    order,
                    cost,
                    evaluated,
                })
            }
            _ => Err(Error::NoValidTour {
                waypoints: count,
                unreachable: Vec::new(),
            }),
        }
    }

    /// Total cost of visiting waypoints in `order`, starting and ending at home.
    ///
    /// Any unreachable leg or crossing makes the whole order
    /// [`Cost::Unreachable`].
    pub fn evaluate_order(&mut self, world: &World, order: &[usize]) -> Result<Cost> {
        let stops = order
            .iter()
            .map(|&index| world.waypoint(index))
            .collect::<Result<Vec<_>>>()?;
        let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
            return Ok(Cost::ZERO);
        };

        let mut total = self.leg_cost(world, world.home(), first.entry())?;
        for (position, waypoint) in stops.iter().enumerate() {
            if total.is_unreachable() {
                return Ok(Cost::Unreachable);
            }
            total += waypoint.round_trip_cost();

            if let Some(next) = stops.get(position + 1) {
                total += self.leg_cost(world, waypoint.entry(), next.entry())?;
            }
        }

        if total.is_unreachable() {
            return Ok(Cost::Unreachable);
        }
        total += self.leg_cost(world, last.entry(), world.home())?;
        Ok(total)
    }

    fn leg_cost(&mut self, world: &World, from: Cell, to: Cell) -> Result<Cost> {
        Ok(self
            .planner
            .find_leg(world.overworld(), from, to)?
            .map_or(Cost::Unreachable, |path| path.cost))
    }
}

/// Find the cheapest tour with the default caching optimizer.
pub fn find_best_order(world: &World) -> Result<Tour> {
    RouteOptimizer::new().find_best_order(world)
}

/// All orderings of `0..n`, produced by recursive swapping: position `l` is
/// swapped with each `i >= l` in turn, the tail is permuted, and the swap is
/// undone. The sequence is fixed for a given `n`.
pub fn permutations(n: usize) -> Vec<Vec<usize>> {
    let mut items: Vec<usize> = (0..n).collect();
    let mut out = Vec::new();
    if n > 0 {
        permute(&mut items, 0, &mut out);
    }
    out
}

fn permute(items: &mut [usize], l: usize, out: &mut Vec<Vec<usize>>) {
    if l + 1 >= items.len() {
        out.push(items.to_vec());
        return;
    }
    for i in l..items.len() {
        items.swap(l, i);
        permute(items, l + 1, out);
        items.swap(l, i);
    }
}
