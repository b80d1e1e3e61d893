//! World model: one overworld grid, fixed points of interest, and waypoints
//! that each carry a private sub-map.

use std::fmt;
use std::path::Path as FsPath;

use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::cost::Cost;
use crate::error::{Error, Result};
use crate::grid::{Cell, Grid};
use crate::manifest::WorldManifest;
use crate::path::{find_path, Path};

/// Name that [`World::map_id_by_name`] resolves to the overworld.
pub const OVERWORLD_NAME: &str = "overworld";

/// Identifies one of the grids in a [`World`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "index")]
pub enum MapId {
    Overworld,
    Waypoint(usize),
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapId::Overworld => f.write_str(OVERWORLD_NAME),
            MapId::Waypoint(index) => write!(f, "waypoint #{}", index),
        }
    }
}

/// A location on the overworld with its own sub-map to cross.
///
/// The crossing path (internal start to internal goal) is computed on first
/// use and cached until [`Waypoint::invalidate`] is called.
#[derive(Debug, Clone)]
pub struct Waypoint {
    name: String,
    entry: Cell,
    start: Cell,
    goal: Cell,
    grid: Grid,
    crossing: OnceCell<Option<Path>>,
}

impl Waypoint {
    /// Create a waypoint. `start` and `goal` must lie inside `grid`; `entry`
    /// is checked against the overworld by [`World::new`].
    pub fn new(
        name: impl Into<String>,
        entry: Cell,
        start: Cell,
        goal: Cell,
        grid: Grid,
    ) -> Result<Self> {
        let name = name.into();
        ensure_point(&grid, start, &format!("waypoint '{}' start", name))?;
        ensure_point(&grid, goal, &format!("waypoint '{}' goal", name))?;

        Ok(Self {
            name,
            entry,
            start,
            goal,
            grid,
            crossing: OnceCell::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Overworld cell where the waypoint is entered.
    pub fn entry(&self) -> Cell {
        self.entry
    }

    /// Internal start cell on the waypoint's own grid.
    pub fn start(&self) -> Cell {
        self.start
    }

    /// Internal goal cell on the waypoint's own grid.
    pub fn goal(&self) -> Cell {
        self.goal
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cheapest path from the internal start to the internal goal, or `None`
    /// when the goal cannot be reached.
    pub fn crossing_path(&self) -> Option<&Path> {
        self.crossing
            .get_or_init(|| {
                let path = find_path(&self.grid, self.start, self.goal).unwrap_or_else(|err| {
                    tracing::warn!("waypoint '{}' crossing failed: {}", self.name, err);
                    None
                });
                match &path {
                    Some(found) => tracing::debug!(
                        "waypoint '{}' crossing costs {} over {} steps",
                        self.name,
                        found.cost,
                        found.step_count()
                    ),
                    None => tracing::debug!("waypoint '{}' has no internal path", self.name),
                }
                path
            })
            .as_ref()
    }

    /// One-way internal cost (start to goal).
    pub fn internal_cost(&self) -> Cost {
        self.crossing_path()
            .map_or(Cost::Unreachable, |path| path.cost)
    }

    /// Cost of walking in to the goal and back out again.
    pub fn round_trip_cost(&self) -> Cost {
        let one_way = self.internal_cost();
        one_way + one_way
    }

    /// Whether the crossing path has been computed.
    pub fn is_cached(&self) -> bool {
        self.crossing.get().is_some()
    }

    /// Drop the cached crossing path so the next query recomputes it.
    pub fn invalidate(&mut self) {
        self.crossing.take();
    }
}

/// Overworld, home and landmark cells, and the ordered waypoint list.
#[derive(Debug, Clone)]
pub struct World {
    overworld: Grid,
    home: Cell,
    landmark: Cell,
    waypoints: Vec<Waypoint>,
}

impl World {
    /// Assemble a world, checking that every overworld point is in bounds.
    pub fn new(
        overworld: Grid,
        home: Cell,
        landmark: Cell,
        waypoints: Vec<Waypoint>,
    ) -> Result<Self> {
        ensure_point(&overworld, home, "home")?;
        ensure_point(&overworld, landmark, "landmark")?;
        for waypoint in &waypoints {
            ensure_point(
                &overworld,
                waypoint.entry,
                &format!("waypoint '{}' entry", waypoint.name),
            )?;
        }

        Ok(Self {
            overworld,
            home,
            landmark,
            waypoints,
        })
    }

    /// Load a world from a JSON manifest on disk.
    pub fn load(manifest_path: &FsPath) -> Result<Self> {
        WorldManifest::from_path(manifest_path)?.load_world(manifest_path.parent())
    }

    pub fn overworld(&self) -> &Grid {
        &self.overworld
    }

    pub fn home(&self) -> Cell {
        self.home
    }

    pub fn landmark(&self) -> Cell {
        self.landmark
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn waypoint(&self, index: usize) -> Result<&Waypoint> {
        self.waypoints.get(index).ok_or(Error::UnknownWaypoint {
            index,
            count: self.waypoints.len(),
        })
    }

    /// Grid addressed by `id`.
    pub fn grid(&self, id: MapId) -> Result<&Grid> {
        match id {
            MapId::Overworld => Ok(&self.overworld),
            MapId::Waypoint(index) => self.waypoint(index).map(Waypoint::grid),
        }
    }

    /// Human readable name of a map.
    pub fn map_name(&self, id: MapId) -> String {
        match id {
            MapId::Overworld => OVERWORLD_NAME.to_string(),
            MapId::Waypoint(index) => self
                .waypoints
                .get(index)
                .map_or_else(|| id.to_string(), |waypoint| waypoint.name.clone()),
        }
    }

    /// Resolve a map by name (case-insensitive). Unknown names report the
    /// closest known names as suggestions.
    pub fn map_id_by_name(&self, name: &str) -> Result<MapId> {
        if name.eq_ignore_ascii_case(OVERWORLD_NAME) {
            return Ok(MapId::Overworld);
        }
        if let Some(index) = self
            .waypoints
            .iter()
            .position(|waypoint| waypoint.name.eq_ignore_ascii_case(name))
        {
            return Ok(MapId::Waypoint(index));
        }

        Err(Error::UnknownMap {
            name: name.to_string(),
            suggestions: self.fuzzy_map_matches(name, 3),
        })
    }

    /// Drop every cached crossing path.
    pub fn invalidate_crossings(&mut self) {
        for waypoint in &mut self.waypoints {
            waypoint.invalidate();
        }
    }

    fn fuzzy_map_matches(&self, name: &str, limit: usize) -> Vec<String> {
        let needle = name.to_lowercase();
        let mut scored: Vec<(f64, &str)> = std::iter::once(OVERWORLD_NAME)
            .chain(self.waypoints.iter().map(|waypoint| waypoint.name.as_str()))
            .map(|candidate| {
                (
                    strsim::jaro_winkler(&needle, &candidate.to_lowercase()),
                    candidate,
                )
            })
            .filter(|(score, _)| *score >= 0.75)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, candidate)| candidate.to_string())
            .collect()
    }
}

fn ensure_point(grid: &Grid, cell: Cell, label: &str) -> Result<()> {
    if grid.contains(cell) {
        Ok(())
    } else {
        Err(Error::InvalidPoint {
            label: label.to_string(),
            x: cell.x,
            y: cell.y,
            width: grid.width(),
            height: grid.height(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor_waypoint(name: &str, entry: Cell) -> Waypoint {
        let grid = Grid::from_rows(&["....", "####"]).unwrap();
        Waypoint::new(name, entry, Cell::new(0, 0), Cell::new(3, 0), grid).unwrap()
    }

    fn small_world() -> World {
        let overworld = Grid::from_rows(&[".....", ".....", "....."]).unwrap();
        World::new(
            overworld,
            Cell::new(0, 0),
            Cell::new(4, 2),
            vec![
                corridor_waypoint("eastern-keep", Cell::new(4, 0)),
                corridor_waypoint("desert-vault", Cell::new(0, 2)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn crossing_cost_is_cached_until_invalidated() {
        let mut waypoint = corridor_waypoint("keep", Cell::new(0, 0));
        assert!(!waypoint.is_cached());

        assert_eq!(waypoint.internal_cost(), Cost::Finite(30));
        assert_eq!(waypoint.round_trip_cost(), Cost::Finite(60));
        assert!(waypoint.is_cached());

        waypoint.invalidate();
        assert!(!waypoint.is_cached());
        assert_eq!(waypoint.internal_cost(), Cost::Finite(30));
    }

    #[test]
    fn world_can_be_shared_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<World>();

        let world = small_world();
        let costs: Vec<Cost> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..2)
                .map(|_| scope.spawn(|| world.waypoint(0).unwrap().internal_cost()))
                .collect();
            handles.into_iter().map(|handle| handle.join().unwrap()).collect()
        });
        assert_eq!(costs, vec![Cost::Finite(30), Cost::Finite(30)]);
    }

    #[test]
    fn blocked_waypoint_is_unreachable() {
        let grid = Grid::from_rows(&[".#."]).unwrap();
        let waypoint =
            Waypoint::new("sealed", Cell::new(0, 0), Cell::new(0, 0), Cell::new(2, 0), grid)
                .unwrap();
        assert!(waypoint.crossing_path().is_none());
        assert_eq!(waypoint.internal_cost(), Cost::Unreachable);
        assert_eq!(waypoint.round_trip_cost(), Cost::Unreachable);
    }

    #[test]
    fn waypoint_rejects_points_outside_its_grid() {
        let grid = Grid::from_rows(&["..."]).unwrap();
        let err = Waypoint::new("tiny", Cell::new(0, 0), Cell::new(0, 0), Cell::new(0, 4), grid)
            .unwrap_err();
        assert!(err.to_string().contains("waypoint 'tiny' goal"));
    }

    #[test]
    fn world_rejects_entry_outside_overworld() {
        let overworld = Grid::from_rows(&["..", ".."]).unwrap();
        let result = World::new(
            overworld,
            Cell::new(0, 0),
            Cell::new(1, 1),
            vec![corridor_waypoint("far", Cell::new(9, 9))],
        );
        assert!(matches!(result, Err(Error::InvalidPoint { .. })));
    }

    #[test]
    fn grid_lookup_by_map_id() {
        let world = small_world();
        assert_eq!(world.grid(MapId::Overworld).unwrap().width(), 5);
        assert_eq!(world.grid(MapId::Waypoint(1)).unwrap().width(), 4);
        assert!(matches!(
            world.grid(MapId::Waypoint(2)),
            Err(Error::UnknownWaypoint { index: 2, count: 2 })
        ));
    }

    #[test]
    fn map_names_resolve_case_insensitively() {
        let world = small_world();
        assert_eq!(world.map_id_by_name("Overworld").unwrap(), MapId::Overworld);
        assert_eq!(
            world.map_id_by_name("DESERT-VAULT").unwrap(),
            MapId::Waypoint(1)
        );
        assert_eq!(world.map_name(MapId::Waypoint(0)), "eastern-keep");
    }

    #[test]
    fn unknown_map_name_suggests_close_matches() {
        let world = small_world();
        match world.map_id_by_name("eastern-kep") {
            Err(Error::UnknownMap { suggestions, .. }) => {
                assert_eq!(suggestions.first().map(String::as_str), Some("eastern-keep"));
            }
            other => panic!("expected unknown map error, got {:?}", other),
        }
    }

    #[test]
    fn invalidate_crossings_clears_every_waypoint() {
        let mut world = small_world();
        for waypoint in world.waypoints() {
            waypoint.crossing_path();
        }
        assert!(world.waypoints().iter().all(Waypoint::is_cached));

        world.invalidate_crossings();
        assert!(world.waypoints().iter().all(|waypoint| !waypoint.is_cached()));
    }
}
