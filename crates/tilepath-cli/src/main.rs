use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tilepath_cli::commands::path::{handle_path_command, GridSource, PathCommandArgs};
use tilepath_cli::commands::tour::{handle_tour_command, TourCommandArgs};
use tilepath_cli::output::OutputFormat;
use tilepath_cli::terminal::ColorPalette;
use tilepath_lib::{Cell, OVERWORLD_NAME};

#[derive(Parser, Debug)]
#[command(author, version, about = "Weighted grid pathfinding and tour planning")]
struct Cli {
    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log search and optimizer progress (equivalent to RUST_LOG=debug).
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Disable ANSI colors even when the terminal supports them.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find the cheapest path between two cells of one grid.
    Path {
        /// Grid text file to search.
        #[arg(long, conflicts_with = "world", required_unless_present = "world")]
        map: Option<PathBuf>,
        /// Grid width in cells (defaults to 42).
        #[arg(long, requires = "map")]
        width: Option<usize>,
        /// Grid height in cells (defaults to 42).
        #[arg(long, requires = "map")]
        height: Option<usize>,
        /// World manifest to take the grid from.
        #[arg(long)]
        world: Option<PathBuf>,
        /// Map name inside the world (defaults to the overworld).
        #[arg(long, requires = "world")]
        grid: Option<String>,
        /// Start cell as `x,y`.
        #[arg(long = "from")]
        from: Cell,
        /// Goal cell as `x,y`.
        #[arg(long = "to")]
        to: Cell,
        /// Print the search state after every step.
        #[arg(long)]
        trace: bool,
        /// Print the grid with the explored cells and the path marked.
        #[arg(long)]
        show_map: bool,
    },
    /// Find the cheapest order to visit every waypoint of a world.
    Tour {
        /// World manifest (JSON).
        #[arg(long)]
        world: PathBuf,
        /// Also list every leg of the resulting journey.
        #[arg(long)]
        journey: bool,
        /// Finish the journey with the walk from home to the landmark.
        #[arg(long)]
        with_landmark: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let palette = ColorPalette::resolve(cli.no_color);

    match cli.command {
        Command::Path {
            map,
            width,
            height,
            world,
            grid,
            from,
            to,
            trace,
            show_map,
        } => {
            let source = match (map, world) {
                (Some(path), _) => GridSource::file(path, width, height),
                (None, Some(manifest)) => GridSource::World {
                    manifest,
                    grid: grid.unwrap_or_else(|| OVERWORLD_NAME.to_string()),
                },
                (None, None) => anyhow::bail!("either --map or --world is required"),
            };
            let args = PathCommandArgs {
                source,
                from,
                to,
                trace,
                show_map,
            };
            handle_path_command(&args, cli.format, &palette)
        }
        Command::Tour {
            world,
            journey,
            with_landmark,
        } => {
            let args = TourCommandArgs {
                world,
                journey,
                with_landmark,
            };
            handle_tour_command(&args, cli.format, &palette)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
