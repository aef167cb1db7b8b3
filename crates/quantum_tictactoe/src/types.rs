//! Core domain types for quantum tic-tac-toe.

use serde::{Deserialize, Serialize};

/// Player in the game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

/// A cell on the board, addressed by 0-indexed row and column.
///
/// Cells order row-major, so ordered maps keyed by `Cell` iterate the board
/// top-left to bottom-right.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("({row}, {col})")]
pub struct Cell {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
}

impl Cell {
    /// Creates a cell.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns true if the cell lies on a `size` × `size` board.
    pub fn in_bounds(self, size: usize) -> bool {
        self.row < size && self.col < size
    }

    /// Iterates every cell of a `size` × `size` board in row-major order.
    pub fn all(size: usize) -> impl Iterator<Item = Cell> {
        (0..size).flat_map(move |row| (0..size).map(move |col| Cell::new(row, col)))
    }
}

/// Projection of the board onto collapsed moves only.
///
/// Each cell holds the player whose move collapsed there, if any. This is
/// the board that win and draw detection look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicalBoard {
    size: usize,
    /// Cells in row-major order.
    cells: Vec<Option<Player>>,
}

impl ClassicalBoard {
    /// Creates an empty board.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Builds a board from rows of marks.
    ///
    /// Returns `None` unless `rows` is square.
    pub fn from_rows(rows: &[Vec<Option<Player>>]) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self {
            size,
            cells: rows.iter().flatten().copied().collect(),
        })
    }

    /// Board dimension.
    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        cell.in_bounds(self.size)
            .then_some(cell.row * self.size + cell.col)
    }

    /// Returns the mark at `cell`; `None` for empty or out-of-bounds cells.
    pub fn get(&self, cell: Cell) -> Option<Player> {
        self.index(cell).and_then(|i| self.cells[i])
    }

    /// Places a mark. Returns the previous occupant.
    pub(crate) fn set(&mut self, cell: Cell, player: Player) -> Option<Player> {
        let i = self.index(cell)?;
        self.cells[i].replace(player)
    }

    /// Returns the mark in row `row`, column `col`.
    pub fn at(&self, row: usize, col: usize) -> Option<Player> {
        self.get(Cell::new(row, col))
    }

    /// Number of classically occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}
