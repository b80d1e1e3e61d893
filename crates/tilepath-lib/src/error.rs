use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the tilepath library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Structural problems (bad grid text, coordinates outside a grid) surface here.
/// An unreachable goal is *not* an error for the pathfinder itself; it is a
/// regular `Failed` search state.
#[derive(Debug, Error)]
pub enum Error {
    /// A coordinate query or search endpoint fell outside the grid.
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },

    /// Grid text did not match the declared dimensions.
    #[error("malformed grid: {0}")]
    MalformedGrid(#[from] GridShapeError),

    /// Raised when a map name could not be found in a world.
    #[error("unknown map name: {name}{}", format_suggestions(.suggestions))]
    UnknownMap {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a waypoint index does not exist in the world.
    #[error("waypoint index {index} is out of range (world has {count} waypoints)")]
    UnknownWaypoint { index: usize, count: usize },

    /// A point declared in a world manifest lies outside its grid.
    #[error("{label} ({x}, {y}) lies outside its {width}x{height} map")]
    InvalidPoint {
        label: String,
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },

    /// Raised when no path exists between two cells on a map.
    #[error("no route found on {map} between {start} and {goal}")]
    RouteNotFound {
        map: String,
        start: String,
        goal: String,
    },

    /// Raised when every visiting order contains an unreachable leg.
    #[error("no valid tour across {waypoints} waypoints{}", format_unreachable(.unreachable))]
    NoValidTour {
        waypoints: usize,
        unreachable: Vec<String>,
    },

    /// Raised when a manifest or map file could not be read.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for manifest parsing errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Specific ways grid text can disagree with its declared dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridShapeError {
    #[error("grid dimensions must be non-zero (got {width}x{height})")]
    ZeroDimension { width: usize, height: usize },

    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },

    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

fn format_unreachable(unreachable: &[String]) -> String {
    if unreachable.is_empty() {
        String::new()
    } else {
        format!(" (no internal path in: {})", unreachable.join(", "))
    }
}
