//! Shared fixture helpers for integration tests.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tilepath_lib::{Cell, Grid, World};

/// Path to the fixtures directory shared by the library and CLI tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Manifest of the three-waypoint fixture world.
#[allow(dead_code)]
pub fn world_manifest() -> PathBuf {
    fixtures_dir().join("world/world.json")
}

/// Manifest of a world whose only waypoint has no internal path.
#[allow(dead_code)]
pub fn sealed_manifest() -> PathBuf {
    fixtures_dir().join("sealed/world.json")
}

#[allow(dead_code)]
pub fn load_fixture_world() -> World {
    World::load(&world_manifest()).expect("fixture world loads")
}

/// Seeded random grid used for exhaustive comparisons.
#[allow(dead_code)]
pub fn scrambled_grid(seed: u64, width: usize, height: usize) -> Grid {
    const SYMBOLS: [char; 7] = ['.', '.', '_', 'T', '^', '~', '#'];
    let mut rng = StdRng::seed_from_u64(seed);
    let rows: Vec<String> = (0..height)
        .map(|_| {
            (0..width)
                .map(|_| *SYMBOLS.choose(&mut rng).expect("symbol table is not empty"))
                .collect()
        })
        .collect();
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    Grid::from_rows(&rows).expect("generated grid is rectangular")
}

/// Seeded random cell inside `grid`.
#[allow(dead_code)]
pub fn scrambled_cell(seed: u64, grid: &Grid) -> Cell {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    Cell::new(
        rng.gen_range(0..grid.width() as i32),
        rng.gen_range(0..grid.height() as i32),
    )
}

/// Every in-bounds cell of `grid`, row by row.
#[allow(dead_code)]
pub fn cells(grid: &Grid) -> Vec<Cell> {
    (0..grid.height() as i32)
        .flat_map(|y| (0..grid.width() as i32).map(move |x| Cell::new(x, y)))
        .collect()
}
