//! Output formatting for path, tour and journey results.
//!
//! Formatters return strings so they can be tested without capturing stdout;
//! the `OutputFormat::render_*` methods pick one and print it.

use std::fmt::Write as _;
use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use tilepath_lib::output::{GOAL_MARK, PATH_MARK, START_MARK, VISITED_MARK};
use tilepath_lib::{
    Cell, Cost, JourneySummary, PathSummary, RenderMode, SearchState, TourSummary, WALL,
};

use crate::terminal::{group_thousands, ColorPalette};

/// Output format selected with the global `--format` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human readable text, colored when the terminal allows it.
    #[default]
    Text,
    /// One cell or waypoint per line.
    Basic,
    /// Markdown suitable for pasting into notes.
    Note,
    /// Pretty-printed JSON.
    Json,
}

/// One step of a traced search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceStep {
    pub step: usize,
    pub state: SearchState,
    pub current: Option<Cell>,
    pub frontier: usize,
}

#[derive(Serialize)]
struct PathReport<'a> {
    #[serde(flatten)]
    summary: &'a PathSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    overlay: Option<&'a str>,
    #[serde(skip_serializing_if = "no_trace")]
    trace: &'a [TraceStep],
}

fn no_trace(trace: &&[TraceStep]) -> bool {
    trace.is_empty()
}

#[derive(Serialize)]
struct TourReport<'a> {
    tour: &'a TourSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    journey: Option<&'a JourneySummary>,
}

impl OutputFormat {
    /// Print a path result, with the optional step trace and map overlay.
    pub fn render_path(
        self,
        summary: &PathSummary,
        trace: &[TraceStep],
        overlay: Option<&str>,
        palette: &ColorPalette,
    ) -> io::Result<()> {
        match self {
            OutputFormat::Json => render_json(&PathReport {
                summary,
                overlay,
                trace,
            }),
            OutputFormat::Text => {
                let mut out = format_trace(trace);
                out.push_str(&format_path_text(summary, palette));
                if let Some(overlay) = overlay {
                    out.push('\n');
                    out.push_str(&format_overlay(overlay, palette));
                }
                print_str(&out)
            }
            OutputFormat::Basic => {
                let mut out = format_trace(trace);
                out.push_str(&format_path_basic(summary));
                if let Some(overlay) = overlay {
                    out.push_str(overlay);
                }
                print_str(&out)
            }
            OutputFormat::Note => {
                let mut out = format_trace(trace);
                out.push_str(&summary.render(RenderMode::Markdown));
                if let Some(overlay) = overlay {
                    let _ = write!(out, "\n```\n{overlay}```\n");
                }
                print_str(&out)
            }
        }
    }

    /// Print a tour, followed by its journey when one was planned.
    pub fn render_tour(
        self,
        tour: &TourSummary,
        journey: Option<&JourneySummary>,
        palette: &ColorPalette,
    ) -> io::Result<()> {
        match self {
            OutputFormat::Json => render_json(&TourReport { tour, journey }),
            OutputFormat::Text => {
                let mut out = format_tour_text(tour, palette);
                if let Some(journey) = journey {
                    out.push('\n');
                    out.push_str(&format_journey_text(journey, palette));
                }
                print_str(&out)
            }
            OutputFormat::Basic => print_str(&format_tour_basic(tour)),
            OutputFormat::Note => {
                let mut out = tour.render(RenderMode::Markdown);
                if let Some(journey) = journey {
                    out.push('\n');
                    out.push_str(&journey.render(RenderMode::Markdown));
                }
                print_str(&out)
            }
        }
    }
}

/// Render any serialisable value as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if JSON serialization or writing fails.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value).map_err(io::Error::other)?;
    stdout.write_all(b"\n")?;
    Ok(())
}

fn print_str(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()
}

fn format_cost(cost: Cost) -> String {
    match cost {
        Cost::Finite(value) => group_thousands(value),
        Cost::Unreachable => cost.to_string(),
    }
}

fn format_cell(cell: Option<Cell>) -> String {
    cell.map_or_else(|| "<unset>".to_string(), |cell| cell.to_string())
}

pub fn format_trace(trace: &[TraceStep]) -> String {
    let mut out = String::new();
    for step in trace {
        let _ = writeln!(
            out,
            "step {:>4}: {:<11} current {:<10} frontier {}",
            step.step,
            step.state.to_string(),
            format_cell(step.current),
            step.frontier
        );
    }
    out
}

pub fn format_path_text(summary: &PathSummary, palette: &ColorPalette) -> String {
    let p = palette;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Path on {}{}{}: {} -> {}",
        p.white_bold,
        summary.map,
        p.reset,
        format_cell(summary.start),
        format_cell(summary.goal)
    );

    if summary.found() {
        let _ = writeln!(
            out,
            "  cost {}{}{} over {} steps {}({} expansions){}",
            p.green,
            format_cost(summary.cost),
            p.reset,
            summary.steps,
            p.gray,
            summary.expanded,
            p.reset
        );
        let cells = summary
            .cells
            .iter()
            .map(Cell::to_string)
            .collect::<Vec<_>>()
            .join(" -> ");
        let _ = writeln!(out, "  {cells}");
    } else {
        let _ = writeln!(
            out,
            "  {}{}{} {}({} expansions){}",
            p.red, summary.state, p.reset, p.gray, summary.expanded, p.reset
        );
    }
    out
}

pub fn format_path_basic(summary: &PathSummary) -> String {
    let mut out = String::new();
    for cell in &summary.cells {
        let _ = writeln!(out, "{},{}", cell.x, cell.y);
    }
    let _ = writeln!(out, "cost {}", summary.cost);
    out
}

/// Color the markers of an overlay produced by `render_overlay`.
pub fn format_overlay(overlay: &str, palette: &ColorPalette) -> String {
    let p = palette;
    let mut out = String::with_capacity(overlay.len());
    for symbol in overlay.chars() {
        let color = match symbol {
            START_MARK => p.tag_start,
            GOAL_MARK => p.tag_goal,
            PATH_MARK => p.yellow,
            VISITED_MARK => p.cyan,
            WALL => p.gray,
            _ => "",
        };
        if color.is_empty() {
            out.push(symbol);
        } else {
            let _ = write!(out, "{color}{symbol}{}", p.reset);
        }
    }
    out
}

pub fn format_tour_text(tour: &TourSummary, palette: &ColorPalette) -> String {
    let p = palette;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Tour from home {} ({} waypoints; {} orderings evaluated):",
        tour.home,
        tour.stops.len(),
        group_thousands(tour.evaluated as u64)
    );
    for stop in &tour.stops {
        let _ = writeln!(
            out,
            " {:>2}. {}{}{} at {} {}(round trip {}){}",
            stop.position + 1,
            p.white_bold,
            stop.name,
            p.reset,
            stop.entry,
            p.gray,
            format_cost(stop.round_trip),
            p.reset
        );
    }
    let _ = writeln!(
        out,
        "\nTotal cost: {}{}{}",
        p.green,
        format_cost(tour.cost),
        p.reset
    );
    out
}

pub fn format_tour_basic(tour: &TourSummary) -> String {
    let mut out = String::new();
    for stop in &tour.stops {
        let _ = writeln!(out, "{}", stop.name);
    }
    let _ = writeln!(out, "cost {}", tour.cost);
    out
}

pub fn format_journey_text(journey: &JourneySummary, palette: &ColorPalette) -> String {
    let p = palette;
    let mut out = String::new();
    let _ = writeln!(out, "Journey ({} legs):", journey.legs.len());
    for leg in &journey.legs {
        let _ = writeln!(
            out,
            " {:>2}. {:<8} {}{:<12}{} {} -> {} {}({} over {} steps){}",
            leg.index + 1,
            leg.kind.to_string(),
            p.white_bold,
            leg.map,
            p.reset,
            leg.from,
            leg.to,
            p.gray,
            format_cost(leg.cost),
            leg.steps,
            p.reset
        );
    }
    let _ = writeln!(
        out,
        "\nJourney cost: {}{}{}",
        p.green,
        format_cost(journey.cost),
        p.reset
    );
    out
}
