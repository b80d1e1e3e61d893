//! JSON world manifests.
//!
//! A manifest names the overworld map file, the home and landmark cells, and
//! each waypoint's entry cell, sub-map file and internal start/goal. Map paths
//! are resolved relative to the manifest's directory.
//!
//! ```json
//! {
//!   "overworld": { "path": "overworld.txt", "width": 42, "height": 42 },
//!   "home": { "x": 24, "y": 27 },
//!   "landmark": { "x": 6, "y": 5 },
//!   "waypoints": [
//!     {
//!       "name": "courage",
//!       "entry": { "x": 5, "y": 32 },
//!       "start": { "x": 14, "y": 26 },
//!       "goal": { "x": 13, "y": 3 },
//!       "map": { "path": "dungeon1.txt" }
//!     }
//!   ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::grid::{Cell, Grid};
use crate::world::{Waypoint, World};

/// Default overworld dimensions when a manifest omits them.
pub const DEFAULT_OVERWORLD_SIZE: (usize, usize) = (42, 42);

/// Default waypoint sub-map dimensions when a manifest omits them.
pub const DEFAULT_WAYPOINT_SIZE: (usize, usize) = (28, 28);

/// Location and dimensions of a grid text file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapSource {
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<usize>,
}

impl MapSource {
    fn load(&self, base_dir: Option<&Path>, default_size: (usize, usize)) -> Result<Grid> {
        let path = match base_dir {
            Some(dir) if self.path.is_relative() => dir.join(&self.path),
            _ => self.path.clone(),
        };
        load_grid(
            &path,
            self.width.unwrap_or(default_size.0),
            self.height.unwrap_or(default_size.1),
        )
    }
}

/// Waypoint entry in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaypointManifest {
    pub name: String,
    pub entry: Cell,
    pub start: Cell,
    pub goal: Cell,
    pub map: MapSource,
}

/// Top-level manifest document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldManifest {
    pub overworld: MapSource,
    pub home: Cell,
    pub landmark: Cell,
    #[serde(default)]
    pub waypoints: Vec<WaypointManifest>,
}

impl WorldManifest {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = read_file(path)?;
        Self::from_json(&text)
    }

    /// Load every referenced map and build the [`World`].
    pub fn load_world(&self, base_dir: Option<&Path>) -> Result<World> {
        let overworld = self.overworld.load(base_dir, DEFAULT_OVERWORLD_SIZE)?;

        let waypoints = self
            .waypoints
            .iter()
            .map(|waypoint| {
                let grid = waypoint.map.load(base_dir, DEFAULT_WAYPOINT_SIZE)?;
                Waypoint::new(
                    waypoint.name.clone(),
                    waypoint.entry,
                    waypoint.start,
                    waypoint.goal,
                    grid,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            "loaded world: {}x{} overworld, {} waypoints",
            overworld.width(),
            overworld.height(),
            waypoints.len()
        );

        World::new(overworld, self.home, self.landmark, waypoints)
    }
}

/// Read a grid text file with caller supplied dimensions.
pub fn load_grid(path: &Path, width: usize, height: usize) -> Result<Grid> {
    let text = read_file(path)?;
    Grid::parse(&text, width, height)
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })
}
