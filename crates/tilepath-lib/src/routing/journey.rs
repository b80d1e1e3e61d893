//! Expand a [`Tour`] into the concrete legs a walker would follow.

use std::fmt;

use serde::Serialize;

use crate::cost::Cost;
use crate::error::{Error, Result};
use crate::grid::{Cell, Grid};
use crate::path::{find_path, Path};
use crate::world::{MapId, World};

use super::Tour;

/// What a leg of the journey does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LegKind {
    /// Overworld walk between home and waypoint entries.
    Travel,
    /// Inside a waypoint, from its internal start to its goal.
    Descend,
    /// Inside a waypoint, from its goal back to its internal start.
    Ascend,
    /// Final overworld walk from home to the landmark.
    Landmark,
}

impl fmt::Display for LegKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LegKind::Travel => "travel",
            LegKind::Descend => "descend",
            LegKind::Ascend => "ascend",
            LegKind::Landmark => "landmark",
        };
        f.pad(label)
    }
}

/// One path on one map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leg {
    pub map: MapId,
    pub kind: LegKind,
    pub from: Cell,
    pub to: Cell,
    pub path: Path,
}

/// Ordered legs for a tour.
///
/// Each leg is searched in the direction it is walked, so `cost` can differ
/// from [`Tour::cost`]: the tour prices every way back out of a waypoint as
/// a repeat of the way in, and never includes the landmark leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Journey {
    pub legs: Vec<Leg>,
    pub cost: Cost,
}

/// Expand `tour` into legs: travel to each waypoint in order, descend to its
/// goal and ascend back, then travel home. With `include_landmark`, a final
/// leg from home to the world's landmark is appended.
pub fn plan_journey(world: &World, tour: &Tour, include_landmark: bool) -> Result<Journey> {
    let mut legs = Vec::new();
    let mut position = world.home();

    for &index in &tour.order {
        let waypoint = world.waypoint(index)?;
        let map = MapId::Waypoint(index);

        legs.push(leg(world, MapId::Overworld, LegKind::Travel, position, waypoint.entry())?);
        legs.push(leg(world, map, LegKind::Descend, waypoint.start(), waypoint.goal())?);
        legs.push(leg(world, map, LegKind::Ascend, waypoint.goal(), waypoint.start())?);
        position = waypoint.entry();
    }

    if !tour.order.is_empty() {
        legs.push(leg(world, MapId::Overworld, LegKind::Travel, position, world.home())?);
    }
    if include_landmark {
        legs.push(leg(
            world,
            MapId::Overworld,
            LegKind::Landmark,
            world.home(),
            world.landmark(),
        )?);
    }

    let cost = legs.iter().map(|leg| leg.path.cost).sum();
    tracing::debug!("journey has {} legs costing {}", legs.len(), cost);
    Ok(Journey { legs, cost })
}

fn leg(world: &World, map: MapId, kind: LegKind, from: Cell, to: Cell) -> Result<Leg> {
    let grid: &Grid = world.grid(map)?;
    let path = match (map, kind) {
        // Descending replays the waypoint's cached crossing.
        (MapId::Waypoint(index), LegKind::Descend) => {
            world.waypoint(index)?.crossing_path().cloned()
        }
        _ => find_path(grid, from, to)?,
    };

    let path = path.ok_or_else(|| Error::RouteNotFound {
        map: world.map_name(map),
        start: from.to_string(),
        goal: to.to_string(),
    })?;

    Ok(Leg {
        map,
        kind,
        from,
        to,
        path,
    })
}
