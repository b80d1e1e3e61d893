//! Tour command handler: cheapest order to visit every waypoint of a world.

use std::path::PathBuf;

use anyhow::{Context, Result};

use tilepath_lib::{
    plan_journey, Error as LibError, JourneySummary, RouteOptimizer, TourSummary, World,
};

use crate::output::OutputFormat;
use crate::terminal::ColorPalette;

/// Arguments for the tour command.
#[derive(Debug, Clone)]
pub struct TourCommandArgs {
    /// World manifest to load.
    pub world: PathBuf,
    /// Expand the tour into per-map legs.
    pub journey: bool,
    /// Append the home -> landmark leg to the journey.
    pub with_landmark: bool,
}

/// Handle the tour subcommand.
pub fn handle_tour_command(
    args: &TourCommandArgs,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<()> {
    let world = World::load(&args.world)
        .with_context(|| format!("failed to load world from {}", args.world.display()))?;

    let mut optimizer = RouteOptimizer::new();
    let tour = optimizer
        .find_best_order(&world)
        .map_err(handle_tour_failure)?;
    tracing::debug!(
        "leg cache: {} hits, {} misses",
        optimizer.planner().hits(),
        optimizer.planner().misses()
    );

    let summary =
        TourSummary::from_tour(&world, &tour).context("failed to build tour summary")?;

    // The landmark leg only exists as part of a journey.
    let journey = if args.journey || args.with_landmark {
        let journey =
            plan_journey(&world, &tour, args.with_landmark).map_err(handle_tour_failure)?;
        Some(JourneySummary::from_journey(&world, &journey))
    } else {
        None
    };

    format
        .render_tour(&summary, journey.as_ref(), palette)
        .context("failed to write tour output")
}

fn handle_tour_failure(err: LibError) -> anyhow::Error {
    match err {
        LibError::NoValidTour {
            waypoints,
            unreachable,
        } => {
            let mut message = format!("No valid tour visits all {} waypoints.", waypoints);
            if unreachable.is_empty() {
                message.push_str(" Some waypoint entries cannot be reached from home.");
            } else {
                message.push_str(&format!(
                    " These waypoints have no path from their start to their goal: {}.",
                    unreachable.join(", ")
                ));
            }
            anyhow::anyhow!(message)
        }
        LibError::RouteNotFound { map, start, goal } => anyhow::anyhow!(
            "Could not reconstruct the leg on {} from {} to {}.",
            map,
            start,
            goal
        ),
        other => anyhow::Error::new(other),
    }
}
