//! Path command handler for single searches on one grid.

use std::path::PathBuf;

use anyhow::{Context, Result};

use tilepath_lib::manifest::DEFAULT_OVERWORLD_SIZE;
use tilepath_lib::{
    load_grid, render_overlay, Cell, Error as LibError, Grid, PathSummary, Pathfinder, World,
};

use crate::output::{OutputFormat, TraceStep};
use crate::terminal::ColorPalette;

/// Where the searched grid comes from.
#[derive(Debug, Clone)]
pub enum GridSource {
    /// A bare grid text file with explicit dimensions.
    File {
        path: PathBuf,
        width: usize,
        height: usize,
    },
    /// A named map inside a world manifest.
    World { manifest: PathBuf, grid: String },
}

/// Arguments for the path command.
#[derive(Debug, Clone)]
pub struct PathCommandArgs {
    pub source: GridSource,
    pub from: Cell,
    pub to: Cell,
    /// Record the state after every expansion.
    pub trace: bool,
    /// Print the grid with the search overlaid.
    pub show_map: bool,
}

impl GridSource {
    /// Grid file source; missing dimensions default to the overworld size.
    pub fn file(path: PathBuf, width: Option<usize>, height: Option<usize>) -> GridSource {
        GridSource::File {
            path,
            width: width.unwrap_or(DEFAULT_OVERWORLD_SIZE.0),
            height: height.unwrap_or(DEFAULT_OVERWORLD_SIZE.1),
        }
    }
}

/// Handle the path subcommand.
///
/// Runs one A* search and prints the result. Exits with an error when the
/// goal cannot be reached.
pub fn handle_path_command(
    args: &PathCommandArgs,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<()> {
    let world;
    let owned_grid;
    let (grid, map_name): (&Grid, String) = match &args.source {
        GridSource::File {
            path,
            width,
            height,
        } => {
            owned_grid = load_grid(path, *width, *height)
                .with_context(|| format!("failed to load grid from {}", path.display()))?;
            (&owned_grid, path.display().to_string())
        }
        GridSource::World { manifest, grid } => {
            world = World::load(manifest)
                .with_context(|| format!("failed to load world from {}", manifest.display()))?;
            let id = world.map_id_by_name(grid).map_err(handle_path_failure)?;
            (world.grid(id)?, world.map_name(id))
        }
    };

    let mut pathfinder =
        Pathfinder::with_points(grid, args.from, args.to).map_err(handle_path_failure)?;

    let mut trace = Vec::new();
    if args.trace {
        loop {
            let (state, _) = pathfinder.step();
            trace.push(TraceStep {
                step: trace.len() + 1,
                state,
                current: pathfinder.current(),
                frontier: pathfinder.frontier_len(),
            });
            if state.is_terminal() {
                break;
            }
        }
    } else {
        pathfinder.run();
    }

    let summary = PathSummary::from_search(map_name.clone(), &pathfinder);
    let overlay = args.show_map.then(|| {
        render_overlay(
            grid,
            Some(pathfinder.cost_map()),
            pathfinder.final_path(),
        )
    });

    format
        .render_path(&summary, &trace, overlay.as_deref(), palette)
        .context("failed to write path output")?;

    if !summary.found() {
        return Err(handle_path_failure(LibError::RouteNotFound {
            map: map_name,
            start: args.from.to_string(),
            goal: args.to.to_string(),
        }));
    }
    Ok(())
}

fn handle_path_failure(err: LibError) -> anyhow::Error {
    match err {
        LibError::RouteNotFound { map, start, goal } => anyhow::anyhow!(
            "No path found on {} between {} and {}. Check for walls enclosing either cell.",
            map,
            start,
            goal
        ),
        LibError::OutOfBounds {
            x,
            y,
            width,
            height,
        } => anyhow::anyhow!(
            "Cell ({}, {}) is outside the {}x{} grid. Coordinates are zero-based x,y.",
            x,
            y,
            width,
            height
        ),
        other => anyhow::Error::new(other),
    }
}
