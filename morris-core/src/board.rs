//! Board geometry: intersections, adjacency graph and mill lines

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MorrisError;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Width and height of the coordinate grid
pub const GRID_SIZE: usize = 5;

/// Valid intersections in row-major scan order (y outer, x inner)
pub const INTERSECTIONS: [Pos; 16] = [
    Pos::new(0, 0), Pos::new(2, 0), Pos::new(4, 0),
    Pos::new(1, 1), Pos::new(2, 1), Pos::new(3, 1),
    Pos::new(0, 2), Pos::new(1, 2), Pos::new(3, 2), Pos::new(4, 2),
    Pos::new(1, 3), Pos::new(2, 3), Pos::new(3, 3),
    Pos::new(0, 4), Pos::new(2, 4), Pos::new(4, 4),
];

/// Neighbors of each intersection, indexed like `INTERSECTIONS`
const ADJACENCY: [&[Pos]; 16] = [
    &[Pos::new(2, 0), Pos::new(0, 2)],
    &[Pos::new(0, 0), Pos::new(4, 0), Pos::new(2, 1)],
    &[Pos::new(2, 0), Pos::new(4, 2)],
    &[Pos::new(2, 1), Pos::new(1, 2)],
    &[Pos::new(2, 0), Pos::new(1, 1), Pos::new(3, 1)],
    &[Pos::new(2, 1), Pos::new(3, 2)],
    &[Pos::new(0, 0), Pos::new(0, 4), Pos::new(1, 2)],
    &[Pos::new(0, 2), Pos::new(1, 1), Pos::new(1, 3)],
    &[Pos::new(3, 1), Pos::new(3, 3), Pos::new(4, 2)],
    &[Pos::new(4, 0), Pos::new(4, 4), Pos::new(3, 2)],
    &[Pos::new(1, 2), Pos::new(2, 3)],
    &[Pos::new(1, 3), Pos::new(3, 3), Pos::new(2, 4)],
    &[Pos::new(3, 2), Pos::new(2, 3)],
    &[Pos::new(0, 2), Pos::new(2, 4)],
    &[Pos::new(0, 4), Pos::new(4, 4), Pos::new(2, 3)],
    &[Pos::new(2, 4), Pos::new(4, 2)],
];

/// The eight lines that form a mill, in table order
pub const MILL_LINES: [[Pos; 3]; 8] = [
    [Pos::new(0, 0), Pos::new(2, 0), Pos::new(4, 0)],
    [Pos::new(1, 1), Pos::new(2, 1), Pos::new(3, 1)],
    [Pos::new(1, 3), Pos::new(2, 3), Pos::new(3, 3)],
    [Pos::new(0, 4), Pos::new(2, 4), Pos::new(4, 4)],
    [Pos::new(0, 0), Pos::new(0, 2), Pos::new(0, 4)],
    [Pos::new(1, 1), Pos::new(1, 2), Pos::new(1, 3)],
    [Pos::new(3, 1), Pos::new(3, 2), Pos::new(3, 3)],
    [Pos::new(4, 0), Pos::new(4, 2), Pos::new(4, 4)],
];

/// Line diagram of the board; `*` marks an intersection at (col / 2, row / 2)
const DIAGRAM: [&str; 9] = [
    "*───*───*",
    "|   |   |",
    "| *─*─* |",
    "| |   | |",
    "*─*   *─*",
    "| |   | |",
    "| *─*─* |",
    "|   |   |",
    "*───*───*",
];

// ============================================================================
// POSITION
// ============================================================================

/// Grid coordinates; only the 16 `INTERSECTIONS` can ever hold a piece
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub x: u8,
    pub y: u8,
}

impl Pos {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Build a position from untrusted coordinates.
    ///
    /// Rejects anything outside the grid before any lookup happens, then
    /// anything that is not an intersection.
    pub fn from_coords(x: i32, y: i32) -> Result<Self, MorrisError> {
        let range = 0..GRID_SIZE as i32;
        if !range.contains(&x) || !range.contains(&y) {
            return Err(MorrisError::OutOfBounds { x, y });
        }
        let pos = Pos::new(x as u8, y as u8);
        if !pos.is_intersection() {
            return Err(MorrisError::NotAnIntersection(pos));
        }
        Ok(pos)
    }

    /// Check if a piece may ever stand here
    pub fn is_intersection(self) -> bool {
        node_index(self).is_some()
    }

    /// Intersections reachable with a single slide, in table order
    pub fn neighbors(self) -> &'static [Pos] {
        match node_index(self) {
            Some(index) => ADJACENCY[index],
            None => &[],
        }
    }

    pub fn is_adjacent(self, other: Pos) -> bool {
        self.neighbors().contains(&other)
    }

    /// Mill lines passing through this position
    pub fn mill_lines(self) -> impl Iterator<Item = &'static [Pos; 3]> {
        MILL_LINES.iter().filter(move |line| line.contains(&self))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

fn node_index(pos: Pos) -> Option<usize> {
    INTERSECTIONS.iter().position(|&p| p == pos)
}

// ============================================================================
// CELLS AND GRID
// ============================================================================

/// Contents of a grid cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    White,
    Black,
}

impl Cell {
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '*',
            Cell::White => 'W',
            Cell::Black => 'B',
        }
    }
}

/// 5x5 grid indexed as `cells[y][x]`
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; GRID_SIZE]; GRID_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell at `pos`.
    ///
    /// `Pos` values built by the engine are always in range; a stray
    /// out-of-range value reads as empty rather than panicking.
    pub fn get(&self, pos: Pos) -> Cell {
        self.cells
            .get(pos.y as usize)
            .and_then(|row| row.get(pos.x as usize))
            .copied()
            .unwrap_or(Cell::Empty)
    }

    pub(crate) fn set(&mut self, pos: Pos, cell: Cell) {
        debug_assert!(pos.is_intersection(), "write to non-intersection {pos}");
        self.cells[pos.y as usize][pos.x as usize] = cell;
    }

    /// Raw rows, `rows()[y][x]`
    pub fn rows(&self) -> &[[Cell; GRID_SIZE]; GRID_SIZE] {
        &self.cells
    }

    /// Number of cells holding `cell`
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().flatten().filter(|&&c| c == cell).count()
    }

    /// Intersections holding `cell`, in scan order
    pub fn positions_of(&self, cell: Cell) -> impl Iterator<Item = Pos> + '_ {
        INTERSECTIONS.into_iter().filter(move |&p| self.get(p) == cell)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, line) in DIAGRAM.iter().enumerate() {
            let rendered: String = line
                .chars()
                .enumerate()
                .map(|(col, ch)| {
                    if ch == '*' {
                        self.get(Pos::new((col / 2) as u8, (row / 2) as u8)).symbol()
                    } else {
                        ch
                    }
                })
                .collect();
            writeln!(f, "{}", rendered)?;
        }
        Ok(())
    }
}
