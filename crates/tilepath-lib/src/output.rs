use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use serde::Serialize;

use crate::cost::Cost;
use crate::error::Result;
use crate::grid::{Cell, Grid};
use crate::path::Path;
use crate::pathfinder::{Pathfinder, SearchState};
use crate::routing::{Journey, LegKind, Tour};
use crate::world::World;

/// Overlay marker for the first cell of a path.
pub const START_MARK: char = 'S';
/// Overlay marker for the last cell of a path.
pub const GOAL_MARK: char = 'G';
/// Overlay marker for intermediate path cells.
pub const PATH_MARK: char = '*';
/// Overlay marker for cells the search reached but did not use.
pub const VISITED_MARK: char = 'o';

/// Presentation style for turning a summary into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    PlainText,
    Markdown,
}

/// Structured result of a single search that callers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PathSummary {
    pub map: String,
    pub start: Option<Cell>,
    pub goal: Option<Cell>,
    pub state: SearchState,
    pub cost: Cost,
    pub steps: usize,
    pub expanded: usize,
    pub cells: Vec<Cell>,
}

impl PathSummary {
    /// Snapshot a pathfinder's current result.
    pub fn from_search(map: impl Into<String>, pathfinder: &Pathfinder<'_>) -> Self {
        let path = pathfinder.final_path();
        Self {
            map: map.into(),
            start: pathfinder.start(),
            goal: pathfinder.goal(),
            state: pathfinder.state(),
            cost: path.map_or(Cost::Unreachable, |path| path.cost),
            steps: path.map_or(0, Path::step_count),
            expanded: pathfinder.expanded(),
            cells: path.map(|path| path.cells.clone()).unwrap_or_default(),
        }
    }

    pub fn found(&self) -> bool {
        self.state == SearchState::Succeeded
    }

    pub fn render(&self, mode: RenderMode) -> String {
        let mut buffer = String::new();
        let start = display_cell(self.start);
        let goal = display_cell(self.goal);

        match mode {
            RenderMode::PlainText => {
                let _ = writeln!(
                    buffer,
                    "Path on {}: {} -> {} ({}, {} expansions)",
                    self.map, start, goal, self.state, self.expanded
                );
                if self.found() {
                    let _ = writeln!(buffer, "Cost: {} over {} steps", self.cost, self.steps);
                    let joined = self
                        .cells
                        .iter()
                        .map(Cell::to_string)
                        .collect::<Vec<_>>()
                        .join(" -> ");
                    let _ = writeln!(buffer, "{joined}");
                } else {
                    let _ = writeln!(buffer, "No path found.");
                }
            }
            RenderMode::Markdown => {
                let _ = writeln!(
                    buffer,
                    "**Path** on `{}`: _{} → {}_ ({})",
                    self.map, start, goal, self.state
                );
                if self.found() {
                    let _ = writeln!(buffer, "* cost: **{}**", self.cost);
                    let _ = writeln!(buffer, "* steps: {}", self.steps);
                }
                let _ = writeln!(buffer, "* expansions: {}", self.expanded);
            }
        }
        buffer
    }
}

/// One stop of a tour.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TourStop {
    pub position: usize,
    pub index: usize,
    pub name: String,
    pub entry: Cell,
    pub round_trip: Cost,
}

/// Structured representation of an optimised tour.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TourSummary {
    pub home: Cell,
    pub cost: Cost,
    pub evaluated: usize,
    pub stops: Vec<TourStop>,
}

impl TourSummary {
    pub fn from_tour(world: &World, tour: &Tour) -> Result<Self> {
        let stops = tour
            .order
            .iter()
            .enumerate()
            .map(|(position, &index)| {
                let waypoint = world.waypoint(index)?;
                Ok(TourStop {
                    position,
                    index,
                    name: waypoint.name().to_string(),
                    entry: waypoint.entry(),
                    round_trip: waypoint.round_trip_cost(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            home: world.home(),
            cost: tour.cost,
            evaluated: tour.evaluated,
            stops,
        })
    }

    pub fn render(&self, mode: RenderMode) -> String {
        let mut buffer = String::new();
        match mode {
            RenderMode::PlainText => {
                let _ = writeln!(
                    buffer,
                    "Tour from home {} ({} stops, {} orderings evaluated):",
                    self.home,
                    self.stops.len(),
                    self.evaluated
                );
                for stop in &self.stops {
                    let _ = writeln!(
                        buffer,
                        "{:>3}: {} at {} (round trip {})",
                        stop.position + 1,
                        stop.name,
                        stop.entry,
                        stop.round_trip
                    );
                }
                let _ = writeln!(buffer, "Total cost: {}", self.cost);
            }
            RenderMode::Markdown => {
                let _ = writeln!(
                    buffer,
                    "**Tour** from `{}`: total **{}**",
                    self.home, self.cost
                );
                for stop in &self.stops {
                    let _ = writeln!(
                        buffer,
                        "{}. **{}** `{}` (round trip {})",
                        stop.position + 1,
                        stop.name,
                        stop.entry,
                        stop.round_trip
                    );
                }
            }
        }
        buffer
    }
}

/// One leg of a journey in serialisable form.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LegSummary {
    pub index: usize,
    pub map: String,
    pub kind: LegKind,
    pub from: Cell,
    pub to: Cell,
    pub cost: Cost,
    pub steps: usize,
}

/// Structured representation of a journey.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JourneySummary {
    pub cost: Cost,
    pub legs: Vec<LegSummary>,
}

impl JourneySummary {
    pub fn from_journey(world: &World, journey: &Journey) -> Self {
        let legs = journey
            .legs
            .iter()
            .enumerate()
            .map(|(index, leg)| LegSummary {
                index,
                map: world.map_name(leg.map),
                kind: leg.kind,
                from: leg.from,
                to: leg.to,
                cost: leg.path.cost,
                steps: leg.path.step_count(),
            })
            .collect();

        Self {
            cost: journey.cost,
            legs,
        }
    }

    pub fn render(&self, mode: RenderMode) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "Journey ({} legs):", self.legs.len());
        for leg in &self.legs {
            let _ = match mode {
                RenderMode::PlainText => writeln!(
                    buffer,
                    "{:>3}: {:<8} {:<16} {} -> {} ({} over {} steps)",
                    leg.index + 1,
                    leg.kind,
                    leg.map,
                    leg.from,
                    leg.to,
                    leg.cost,
                    leg.steps
                ),
                RenderMode::Markdown => writeln!(
                    buffer,
                    "{}. _{}_ on `{}`: {} → {} (**{}**)",
                    leg.index + 1,
                    leg.kind,
                    leg.map,
                    leg.from,
                    leg.to,
                    leg.cost
                ),
            };
        }
        let _ = writeln!(buffer, "Total cost: {}", self.cost);
        buffer
    }
}

/// Draw `grid` with search progress on top.
///
/// Cells in `costs` that are not on the path become [`VISITED_MARK`]; path
/// cells become [`PATH_MARK`], with [`START_MARK`] and [`GOAL_MARK`] at the
/// ends. Other cells keep their terrain symbol.
pub fn render_overlay(
    grid: &Grid,
    costs: Option<&HashMap<Cell, Cost>>,
    path: Option<&Path>,
) -> String {
    let on_path: HashSet<Cell> = path
        .map(|path| path.cells.iter().copied().collect())
        .unwrap_or_default();
    let start = path.and_then(Path::start);
    let goal = path.and_then(Path::end);

    let mut buffer = String::with_capacity((grid.width() + 1) * grid.height());
    for (y, row) in grid.rows().enumerate() {
        for (x, symbol) in row.chars().enumerate() {
            let cell = Cell::new(x as i32, y as i32);
            let mark = if Some(cell) == start {
                START_MARK
            } else if Some(cell) == goal {
                GOAL_MARK
            } else if on_path.contains(&cell) {
                PATH_MARK
            } else if costs.is_some_and(|costs| costs.contains_key(&cell)) {
                VISITED_MARK
            } else {
                symbol
            };
            buffer.push(mark);
        }
        buffer.push('\n');
    }
    buffer
}

fn display_cell(cell: Option<Cell>) -> String {
    cell.map_or_else(|| "<unset>".to_string(), |cell| cell.to_string())
}
