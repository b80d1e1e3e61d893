mod common;

use std::collections::HashMap;

use tilepath_lib::{find_path, Cell, Cost, Grid, NeighbourPolicy, Pathfinder, SearchState, WALL};

/// Relax every edge until nothing changes. Slow, but obviously correct.
fn reference_costs(grid: &Grid, start: Cell) -> HashMap<Cell, Cost> {
    let mut best = HashMap::from([(start, Cost::ZERO)]);
    loop {
        let mut changed = false;
        for cell in common::cells(grid) {
            let Some(&here) = best.get(&cell) else {
                continue;
            };
            for next in grid.neighbours(cell, NeighbourPolicy::Traversable) {
                let candidate = here + grid.cost_at(next.x, next.y).unwrap();
                if best.get(&next).map_or(true, |known| candidate < *known) {
                    best.insert(next, candidate);
                    changed = true;
                }
            }
        }
        if !changed {
            return best;
        }
    }
}

fn assert_well_formed(grid: &Grid, start: Cell, goal: Cell, cells: &[Cell], cost: Cost) {
    assert_eq!(cells.first(), Some(&start));
    assert_eq!(cells.last(), Some(&goal));

    for cell in cells {
        assert_ne!(grid.symbol_at(cell.x, cell.y).unwrap(), WALL, "path contains wall at {cell}");
    }

    let mut total = Cost::ZERO;
    for pair in cells.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        assert_eq!((a.x - b.x).abs() + (a.y - b.y).abs(), 1, "{a} -> {b} is not a step");
        total += grid.cost_at(b.x, b.y).unwrap();
    }
    assert_eq!(total, cost, "path cost is the sum of entered cells");
}

#[test]
fn search_matches_exhaustive_relaxation_on_scrambled_grids() {
    let mut wall_starts = 0;
    for seed in 0..40 {
        let grid = common::scrambled_grid(seed, 6, 5);
        // Every fourth grid starts on a wall when it has one.
        let wall = common::cells(&grid)
            .into_iter()
            .find(|cell| grid.symbol_at(cell.x, cell.y).unwrap() == WALL);
        let start = match wall {
            Some(cell) if seed % 4 == 0 => cell,
            _ => common::scrambled_cell(seed, &grid),
        };
        let start_is_wall = grid.symbol_at(start.x, start.y).unwrap() == WALL;
        if start_is_wall {
            wall_starts += 1;
        }
        let reference = reference_costs(&grid, start);

        for goal in common::cells(&grid) {
            let found = find_path(&grid, start, goal).expect("points are in bounds");
            let expected = if start_is_wall || grid.symbol_at(goal.x, goal.y).unwrap() == WALL {
                None
            } else {
                reference.get(&goal).copied()
            };

            match (found, expected) {
                (Some(path), Some(cost)) => {
                    assert_eq!(path.cost, cost, "seed {seed}, {start} -> {goal}\n{grid}");
                    assert_well_formed(&grid, start, goal, &path.cells, path.cost);
                }
                (None, None) => {}
                (found, expected) => panic!(
                    "seed {seed}, {start} -> {goal}: found {found:?}, expected {expected:?}\n{grid}"
                ),
            }
        }
    }
    assert!(wall_starts > 0, "no scrambled grid started on a wall");
}

#[test]
fn wall_start_never_yields_a_path() {
    let grid = Grid::from_rows(&["#..", "...", "..#"]).unwrap();
    for goal in common::cells(&grid) {
        assert_eq!(find_path(&grid, Cell::new(0, 0), goal).unwrap(), None, "goal {goal}");
    }

    let reverse = find_path(&grid, Cell::new(2, 0), Cell::new(0, 0)).unwrap();
    assert_eq!(reverse, None);
}

#[test]
fn stepping_and_running_agree() {
    let grid = common::scrambled_grid(7, 8, 6);
    let start = Cell::new(0, 0);
    let goal = Cell::new(7, 5);

    let mut stepped = Pathfinder::with_points(&grid, start, goal).unwrap();
    let mut steps = 0usize;
    let stepped_path = loop {
        let (state, path) = stepped.step();
        steps += 1;
        if state.is_terminal() {
            break path;
        }
        assert_eq!(state, SearchState::InProgress);
    };

    let mut ran = Pathfinder::with_points(&grid, start, goal).unwrap();
    assert_eq!(ran.run(), stepped_path);
    assert_eq!(ran.expanded(), stepped.expanded());
    assert!(steps >= stepped.expanded());
}

#[test]
fn repeated_searches_are_identical() {
    let grid = Grid::from_rows(&[
        "..........",
        ".########.",
        ".#......#.",
        ".#.####.#.",
        "..........",
    ])
    .unwrap();
    let start = Cell::new(0, 0);
    let goal = Cell::new(9, 4);

    let mut pathfinder = Pathfinder::with_points(&grid, start, goal).unwrap();
    let first = pathfinder.run().expect("path exists");
    let first_expanded = pathfinder.expanded();

    for _ in 0..5 {
        pathfinder.reset();
        assert_eq!(pathfinder.state(), SearchState::NotStarted);
        assert_eq!(pathfinder.run().as_ref(), Some(&first));
        assert_eq!(pathfinder.expanded(), first_expanded);
    }
    assert_eq!(first.cost, Cost::Finite(130));
}

#[test]
fn retargeting_reuses_the_grid() {
    let grid = Grid::from_rows(&["...", ".#.", "..."]).unwrap();
    let mut pathfinder = Pathfinder::new(&grid);
    assert_eq!(pathfinder.state(), SearchState::NotReady);
    assert_eq!(pathfinder.run(), None);

    pathfinder
        .set_points(Some(Cell::new(0, 0)), Some(Cell::new(2, 2)))
        .unwrap();
    assert_eq!(pathfinder.run().map(|path| path.cost), Some(Cost::Finite(40)));

    pathfinder.set_points(None, Some(Cell::new(2, 0))).unwrap();
    assert_eq!(pathfinder.start(), Some(Cell::new(0, 0)));
    assert_eq!(pathfinder.run().map(|path| path.cost), Some(Cost::Finite(20)));

    assert!(pathfinder.set_points(Some(Cell::new(5, 5)), None).is_err());
    assert_eq!(pathfinder.goal(), Some(Cell::new(2, 0)));
}

#[test]
fn backtrack_draws_partial_routes() {
    let grid = Grid::from_rows(&["....."]).unwrap();
    let mut pathfinder = Pathfinder::with_points(&grid, Cell::new(0, 0), Cell::new(4, 0)).unwrap();
    pathfinder.step();
    pathfinder.step();

    let partial = pathfinder.backtrack(Cell::new(2, 0)).expect("cell reached");
    assert_eq!(partial.cells, vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0)]);
    assert_eq!(partial.cost, Cost::Finite(20));
    assert!(pathfinder.backtrack(Cell::new(4, 0)).is_none());
}
