//! Tilepath library entry points.
//!
//! This crate parses weighted tile grids, runs a step-able A* search over
//! them, and optimises multi-stop tours through a world made of an overworld
//! and its waypoint sub-maps. Higher-level consumers (the CLI) should only
//! depend on the items exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod cost;
pub mod error;
mod frontier;
pub mod grid;
pub mod manifest;
pub mod output;
pub mod path;
pub mod pathfinder;
pub mod routing;
pub mod world;

pub use cost::Cost;
pub use error::{Error, GridShapeError, Result};
pub use grid::{terrain_cost, Cell, Grid, NeighbourPolicy, TERRAIN_COSTS, WALL};
pub use manifest::{load_grid, MapSource, WaypointManifest, WorldManifest};
pub use output::{
    render_overlay, JourneySummary, LegSummary, PathSummary, RenderMode, TourStop, TourSummary,
};
pub use path::{find_path, manhattan_distance, Path};
pub use pathfinder::{Pathfinder, SearchState};
pub use routing::{
    find_best_order, permutations, plan_journey, AStarLegPlanner, CachingLegPlanner, Journey,
    Leg, LegKind, LegPlanner, RouteOptimizer, Tour,
};
pub use world::{MapId, Waypoint, World, OVERWORLD_NAME};
