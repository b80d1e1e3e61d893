use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cost::Cost;
use crate::error::{Error, GridShapeError, Result};

/// Symbol used for impassable walls.
pub const WALL: char = '#';

/// Fixed terrain table: symbol to traversal cost. Symbols missing from the
/// table are treated as unreachable.
pub const TERRAIN_COSTS: [(char, Cost); 7] = [
    ('.', Cost::Finite(10)),
    ('_', Cost::Finite(20)),
    ('T', Cost::Finite(100)),
    ('^', Cost::Finite(150)),
    ('~', Cost::Finite(180)),
    (WALL, Cost::Unreachable),
    (' ', Cost::Finite(10)),
];

/// Look up the cost of a terrain symbol. Returns `None` for symbols that are
/// not part of the terrain table.
pub fn terrain_cost(symbol: char) -> Option<Cost> {
    TERRAIN_COSTS
        .iter()
        .find(|(known, _)| *known == symbol)
        .map(|(_, cost)| *cost)
}

/// Integer grid coordinate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl FromStr for Cell {
    type Err = String;

    /// Parse `"x,y"` (whitespace and surrounding parentheses are tolerated).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('(').trim_end_matches(')');
        let (x, y) = trimmed
            .split_once(',')
            .ok_or_else(|| format!("expected a cell as X,Y but got '{}'", s))?;
        let x = x
            .trim()
            .parse::<i32>()
            .map_err(|err| format!("invalid x coordinate '{}': {}", x.trim(), err))?;
        let y = y
            .trim()
            .parse::<i32>()
            .map_err(|err| format!("invalid y coordinate '{}': {}", y.trim(), err))?;
        Ok(Cell::new(x, y))
    }
}

/// Which neighbours [`Grid::neighbours`] keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NeighbourPolicy {
    /// Keep every orthogonal neighbour inside the grid, walls included.
    InBounds,
    /// Keep only in-bounds neighbours with a finite cost. The pathfinder uses this.
    #[default]
    Traversable,
}

/// Orthogonal offsets in expansion order: east, north, west, south.
const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (0, -1), (-1, 0), (0, 1)];

/// Rectangular terrain grid, immutable after loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    symbols: Vec<char>,
    costs: Vec<Cost>,
}

impl Grid {
    /// Parse a grid from newline separated rows of terrain symbols.
    ///
    /// The text must contain exactly `height` rows of exactly `width` symbols.
    /// A single trailing newline and `\r\n` line endings are accepted. Any
    /// other mismatch is reported as [`Error::MalformedGrid`].
    pub fn parse(text: &str, width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GridShapeError::ZeroDimension { width, height }.into());
        }

        let body = text.strip_suffix('\n').unwrap_or(text);
        let rows: Vec<&str> = body
            .split('\n')
            .map(|row| row.strip_suffix('\r').unwrap_or(row))
            .collect();

        if rows.len() != height {
            return Err(GridShapeError::RowCount {
                expected: height,
                found: rows.len(),
            }
            .into());
        }

        let mut symbols = Vec::with_capacity(width * height);
        let mut costs = Vec::with_capacity(width * height);
        for (row_index, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(GridShapeError::RowWidth {
                    row: row_index,
                    expected: width,
                    found,
                }
                .into());
            }

            for (column, symbol) in row.chars().enumerate() {
                let cost = terrain_cost(symbol).unwrap_or_else(|| {
                    tracing::warn!(
                        "unknown terrain symbol {:?} at ({}, {}); treating it as a wall",
                        symbol,
                        column,
                        row_index
                    );
                    Cost::Unreachable
                });
                symbols.push(symbol);
                costs.push(cost);
            }
        }

        Ok(Self {
            width,
            height,
            symbols,
            costs,
        })
    }

    /// Build a grid from explicit rows; each row's length defines the width.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        let width = rows.first().map(|row| row.chars().count()).unwrap_or(0);
        Self::parse(&rows.join("\n"), width, rows.len())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether `cell` lies inside the grid.
    pub fn contains(&self, cell: Cell) -> bool {
        self.index(cell).is_some()
    }

    /// Traversal cost of the tile at `(x, y)`.
    pub fn cost_at(&self, x: i32, y: i32) -> Result<Cost> {
        let index = self.checked_index(Cell::new(x, y))?;
        Ok(self.costs[index])
    }

    /// Terrain symbol at `(x, y)`.
    pub fn symbol_at(&self, x: i32, y: i32) -> Result<char> {
        let index = self.checked_index(Cell::new(x, y))?;
        Ok(self.symbols[index])
    }

    /// Validate that `cell` is inside the grid.
    pub fn ensure_contains(&self, cell: Cell) -> Result<()> {
        self.checked_index(cell).map(|_| ())
    }

    /// Orthogonal neighbours of `cell` filtered by `policy`.
    pub fn neighbours(&self, cell: Cell, policy: NeighbourPolicy) -> Vec<Cell> {
        DIRECTIONS
            .iter()
            .map(|&(dx, dy)| cell.offset(dx, dy))
            .filter(|next| match self.index(*next) {
                None => false,
                Some(index) => match policy {
                    NeighbourPolicy::InBounds => true,
                    NeighbourPolicy::Traversable => self.costs[index].is_finite(),
                },
            })
            .collect()
    }

    /// Iterate over the grid rows as strings.
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.symbols
            .chunks(self.width)
            .map(|row| row.iter().collect::<String>())
    }

    // Cost lookup for cells already known to be in bounds.
    pub(crate) fn cost_of(&self, cell: Cell) -> Cost {
        self.index(cell)
            .map(|index| self.costs[index])
            .unwrap_or(Cost::Unreachable)
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        let x = usize::try_from(cell.x).ok()?;
        let y = usize::try_from(cell.y).ok()?;
        (x < self.width && y < self.height).then(|| x + y * self.width)
    }

    fn checked_index(&self, cell: Cell) -> Result<usize> {
        self.index(cell).ok_or(Error::OutOfBounds {
            x: cell.x,
            y: cell.y,
            width: self.width,
            height: self.height,
        })
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.rows().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            f.write_str(&row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terrain_table_matches_symbols() {
        assert_eq!(terrain_cost('.'), Some(Cost::Finite(10)));
        assert_eq!(terrain_cost('_'), Some(Cost::Finite(20)));
        assert_eq!(terrain_cost('T'), Some(Cost::Finite(100)));
        assert_eq!(terrain_cost('^'), Some(Cost::Finite(150)));
        assert_eq!(terrain_cost('~'), Some(Cost::Finite(180)));
        assert_eq!(terrain_cost('#'), Some(Cost::Unreachable));
        assert_eq!(terrain_cost(' '), Some(Cost::Finite(10)));
        assert_eq!(terrain_cost('Z'), None);
    }

    #[test]
    fn parse_reads_row_major() {
        let grid = Grid::parse("._\nT^\n", 2, 2).expect("grid parses");
        assert_eq!(grid.symbol_at(1, 0).unwrap(), '_');
        assert_eq!(grid.symbol_at(0, 1).unwrap(), 'T');
        assert_eq!(grid.cost_at(1, 1).unwrap(), Cost::Finite(150));
    }

    #[test]
    fn parse_accepts_crlf() {
        let grid = Grid::parse("..\r\n#.\r\n", 2, 2).expect("grid parses");
        assert_eq!(grid.cost_at(0, 1).unwrap(), Cost::Unreachable);
    }

    #[test]
    fn parse_rejects_short_rows() {
        let err = Grid::parse("...\n..\n...", 3, 3).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedGrid(GridShapeError::RowWidth {
                row: 1,
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn parse_rejects_missing_rows() {
        let err = Grid::parse("...\n...", 3, 3).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedGrid(GridShapeError::RowCount {
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn parse_rejects_long_rows() {
        assert!(Grid::parse("....\n...", 3, 2).is_err());
    }

    #[test]
    fn parse_rejects_zero_dimensions() {
        assert!(matches!(
            Grid::parse("", 0, 0),
            Err(Error::MalformedGrid(GridShapeError::ZeroDimension { .. }))
        ));
    }

    #[test]
    fn unknown_symbols_are_unreachable() {
        let grid = Grid::parse(".Z.", 3, 1).expect("grid parses");
        assert_eq!(grid.cost_at(1, 0).unwrap(), Cost::Unreachable);
    }

    #[test]
    fn cost_at_rejects_out_of_bounds() {
        let grid = Grid::from_rows(&["...", "..."]).unwrap();
        assert!(matches!(
            grid.cost_at(3, 0),
            Err(Error::OutOfBounds {
                x: 3,
                y: 0,
                width: 3,
                height: 2
            })
        ));
        assert!(grid.cost_at(-1, 0).is_err());
        assert!(grid.cost_at(0, 2).is_err());
    }

    #[test]
    fn neighbours_follow_policy() {
        let grid = Grid::from_rows(&[".#.", "...", "..."]).unwrap();
        let origin = Cell::new(1, 1);

        let all = grid.neighbours(origin, NeighbourPolicy::InBounds);
        assert_eq!(
            all,
            vec![
                Cell::new(2, 1),
                Cell::new(1, 0),
                Cell::new(0, 1),
                Cell::new(1, 2)
            ]
        );

        let open = grid.neighbours(origin, NeighbourPolicy::Traversable);
        assert!(!open.contains(&Cell::new(1, 0)));
        assert_eq!(open.len(), 3);
    }

    #[test]
    fn neighbours_clip_at_corners() {
        let grid = Grid::from_rows(&["..", ".."]).unwrap();
        let corner = grid.neighbours(Cell::new(0, 0), NeighbourPolicy::InBounds);
        assert_eq!(corner, vec![Cell::new(1, 0), Cell::new(0, 1)]);
    }

    #[test]
    fn cell_parses_from_text() {
        assert_eq!("3,4".parse::<Cell>().unwrap(), Cell::new(3, 4));
        assert_eq!(" (10, -2) ".parse::<Cell>().unwrap(), Cell::new(10, -2));
        assert!("3;4".parse::<Cell>().is_err());
        assert!("a,4".parse::<Cell>().is_err());
    }

    #[test]
    fn display_round_trips_rows() {
        let grid = Grid::from_rows(&[".#", "~T"]).unwrap();
        assert_eq!(grid.to_string(), ".#\n~T");
    }
}
