//! Game controller for quantum tic-tac-toe.
//!
//! Wraps a [`QuantumBoard`] with two-step cell selection, history recording
//! and the read projections a presentation layer needs.

use crate::board::QuantumBoard;
use crate::error::QuantumResult;
use crate::history::{CollapseEvent, GameEvent, MoveEvent, StateSnapshot};
use crate::quantum_move::{MoveId, QuantumMove};
use crate::types::{Cell, ClassicalBoard, Player};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument, warn};

/// A game of quantum tic-tac-toe.
///
/// Commands return `Ok(false)` for ordinary invalid input such as clicking
/// an occupied cell; errors are reserved for internal consistency faults.
#[derive(Debug, Clone)]
pub struct QuantumTicTacToe<R = StdRng> {
    board: QuantumBoard,
    history: Vec<GameEvent>,
    pending: Vec<Cell>,
    rng: R,
}

impl QuantumTicTacToe<StdRng> {
    /// Creates a game seeded from the operating system.
    #[instrument]
    pub fn new(size: usize) -> QuantumResult<Self> {
        Self::with_rng(size, StdRng::from_os_rng())
    }

    /// Creates a game whose collapses replay exactly for a given seed.
    #[instrument]
    pub fn with_seed(size: usize, seed: u64) -> QuantumResult<Self> {
        Self::with_rng(size, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> QuantumTicTacToe<R> {
    /// Creates a game drawing interference outcomes from `rng`.
    pub fn with_rng(size: usize, rng: R) -> QuantumResult<Self> {
        Ok(Self {
            board: QuantumBoard::new(size)?,
            history: Vec::new(),
            pending: Vec::new(),
            rng,
        })
    }

    /// Board dimension.
    pub fn board_size(&self) -> usize {
        self.board.size()
    }

    /// Player to move.
    pub fn current_player(&self) -> Player {
        self.board.current_player()
    }

    /// Returns true once the game has been won or drawn.
    pub fn is_game_over(&self) -> bool {
        self.board.is_game_over()
    }

    /// The winner; `None` while in progress and for a draw.
    pub fn winner(&self) -> Option<Player> {
        self.board.winner()
    }

    /// The underlying board.
    pub fn board(&self) -> &QuantumBoard {
        &self.board
    }

    /// Collapsed marks only.
    pub fn classical_board(&self) -> QuantumResult<ClassicalBoard> {
        self.board.classical_board()
    }

    /// Cell → moves occupying it, collapsed or not.
    pub fn quantum_board(&self) -> BTreeMap<Cell, Vec<&QuantumMove>> {
        self.board.quantum_board()
    }

    /// Cell → cells linked through superposed moves.
    pub fn entanglement_graph(&self) -> BTreeMap<Cell, BTreeSet<Cell>> {
        self.board.entanglement_graph()
    }

    /// Moves still in superposition.
    pub fn uncollapsed_moves(&self) -> Vec<&QuantumMove> {
        self.board.uncollapsed_moves()
    }

    /// Moves that have collapsed.
    pub fn collapsed_moves(&self) -> Vec<&QuantumMove> {
        self.board.collapsed_moves()
    }

    /// Looks up a move by id.
    pub fn move_by_id(&self, id: MoveId) -> Option<&QuantumMove> {
        self.board.move_by_id(id)
    }

    /// Every legal ordered pair of cells.
    pub fn valid_moves(&self) -> Vec<(Cell, Cell)> {
        self.board.valid_moves()
    }

    /// Moves collapsed on, or superposed over, `cell`.
    pub fn moves_at(&self, cell: Cell) -> Vec<&QuantumMove> {
        self.board.moves_at(cell)
    }

    /// Number of superposed moves listing `cell`.
    pub fn superposition_count(&self, cell: Cell) -> usize {
        self.board.superposition_count(cell)
    }

    /// Every recorded event, oldest first.
    pub fn history(&self) -> &[GameEvent] {
        &self.history
    }

    /// Cells picked so far for the move being assembled.
    pub fn pending_selection(&self) -> &[Cell] {
        &self.pending
    }

    /// Abandons a half-selected move.
    pub fn clear_selection(&mut self) {
        self.pending.clear();
    }

    fn is_selectable(&self, cell: Cell) -> bool {
        cell.in_bounds(self.board.size())
            && !self.board.is_occupied(cell)
            && !self.pending.contains(&cell)
    }

    /// Adds a cell to the move being assembled.
    ///
    /// The first accepted cell is buffered; the second places the move and
    /// clears the buffer. Returns `Ok(false)` when the cell is out of bounds,
    /// already collapsed-occupied, already pending, or the game is over.
    #[instrument(skip(self))]
    pub fn select_position(&mut self, row: usize, col: usize) -> QuantumResult<bool> {
        let cell = Cell::new(row, col);
        if self.is_game_over() || !self.is_selectable(cell) {
            warn!(%cell, "Cell rejected for selection");
            return Ok(false);
        }

        self.pending.push(cell);
        if self.pending.len() < 2 {
            debug!(%cell, "First cell selected");
            return Ok(true);
        }

        let (pos1, pos2) = (self.pending[0], self.pending[1]);
        self.pending.clear();
        self.make_move(pos1, pos2)
    }

    /// Places a quantum move and records it.
    ///
    /// Returns `Ok(false)`, with no state change, if the move is illegal.
    ///
    /// # Errors
    ///
    /// Internal consistency faults from the board.
    #[instrument(skip(self))]
    pub fn make_move(&mut self, pos1: Cell, pos2: Cell) -> QuantumResult<bool> {
        if self.is_game_over() || !self.board.is_valid_move(pos1, pos2) {
            warn!(%pos1, %pos2, "Move rejected");
            return Ok(false);
        }

        let before = StateSnapshot::capture(&self.board)?;
        let player = self.board.current_player();
        let collapsed = self.board.make_move(pos1, pos2, &mut self.rng)?;
        let after = StateSnapshot::capture(&self.board)?;

        self.history.push(GameEvent::Move(MoveEvent::new(
            player,
            [pos1, pos2],
            collapsed.iter().map(ToString::to_string).collect(),
            before,
            after,
        )));
        Ok(true)
    }

    /// Collapses move `id` onto `position` and records it.
    ///
    /// Returns `Ok(false)`, with no state change, if the move is unknown,
    /// already collapsed, `position` is not one of its candidates or is
    /// already occupied, or the game is over.
    ///
    /// # Errors
    ///
    /// Internal consistency faults from the board.
    #[instrument(skip(self))]
    pub fn force_collapse(&mut self, id: MoveId, position: Cell) -> QuantumResult<bool> {
        if !self.board.can_force_collapse(id, position) {
            warn!(move_id = %id, %position, "Collapse rejected");
            return Ok(false);
        }

        let before = StateSnapshot::capture(&self.board)?;
        let player = self.board.current_player();
        let collapsed = self.board.force_collapse(id, position, &mut self.rng)?;
        let after = StateSnapshot::capture(&self.board)?;

        self.history.push(GameEvent::Collapse(CollapseEvent::new(
            player,
            id,
            position,
            collapsed.iter().map(ToString::to_string).collect(),
            before,
            after,
        )));
        Ok(true)
    }

    /// Starts over on a fresh board of the same size.
    ///
    /// The random source carries on rather than restarting.
    #[instrument(skip(self))]
    pub fn reset_game(&mut self) -> QuantumResult<()> {
        self.board = QuantumBoard::new(self.board.size())?;
        self.history.clear();
        self.pending.clear();
        debug!("Game reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> QuantumTicTacToe {
        QuantumTicTacToe::with_seed(3, 1).expect("valid size")
    }

    #[test]
    fn test_select_two_cells_makes_move() {
        let mut game = game();
        assert!(game.select_position(0, 0).expect("no fault"));
        assert_eq!(game.pending_selection(), &[Cell::new(0, 0)]);
        assert!(game.uncollapsed_moves().is_empty());

        assert!(game.select_position(2, 2).expect("no fault"));
        assert!(game.pending_selection().is_empty());
        assert_eq!(game.uncollapsed_moves().len(), 1);
        assert_eq!(game.current_player(), Player::O);
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn test_select_rejects_pending_and_out_of_bounds() {
        let mut game = game();
        assert!(game.select_position(1, 1).expect("no fault"));
        assert!(!game.select_position(1, 1).expect("no fault"));
        assert!(!game.select_position(3, 0).expect("no fault"));
        assert_eq!(game.pending_selection(), &[Cell::new(1, 1)]);
        game.clear_selection();
        assert!(game.pending_selection().is_empty());
    }

    #[test]
    fn test_select_rejects_collapsed_cell() {
        let mut game = game();
        assert!(game.make_move(Cell::new(0, 0), Cell::new(0, 1)).expect("no fault"));
        assert!(game.make_move(Cell::new(2, 0), Cell::new(2, 1)).expect("no fault"));
        assert!(game.force_collapse(MoveId(1), Cell::new(0, 0)).expect("no fault"));
        assert!(!game.select_position(0, 0).expect("no fault"));
        assert!(game.select_position(0, 1).expect("no fault"));
    }

    #[test]
    fn test_force_collapse_records_history() {
        let mut game = game();
        game.make_move(Cell::new(0, 0), Cell::new(0, 1)).expect("no fault");
        game.make_move(Cell::new(1, 0), Cell::new(1, 1)).expect("no fault");
        assert!(game.force_collapse(MoveId(2), Cell::new(1, 1)).expect("no fault"));

        let GameEvent::Collapse(event) = &game.history()[2] else {
            panic!("expected a collapse event");
        };
        assert_eq!(*event.player(), Player::X);
        assert_eq!(*event.move_id(), MoveId(2));
        assert_eq!(event.collapsed_moves(), &vec!["O2@(1, 1)".to_string()]);
        assert_eq!(event.before().uncollapsed_moves().len(), 2);
        assert_eq!(event.after().collapsed_moves(), &vec!["O2@(1, 1)".to_string()]);
        assert_eq!(game.current_player(), Player::X);
    }

    #[test]
    fn test_rejected_commands_leave_no_history() {
        let mut game = game();
        assert!(!game.make_move(Cell::new(0, 0), Cell::new(0, 0)).expect("no fault"));
        assert!(!game.force_collapse(MoveId(1), Cell::new(0, 0)).expect("no fault"));
        game.make_move(Cell::new(0, 0), Cell::new(0, 1)).expect("no fault");
        assert!(!game.force_collapse(MoveId(1), Cell::new(2, 2)).expect("no fault"));
        assert_eq!(game.history().len(), 1);
        assert!(!game.move_by_id(MoveId(1)).expect("exists").is_collapsed());
    }

    #[test]
    fn test_reset_game() {
        let mut game = QuantumTicTacToe::with_seed(4, 3).expect("valid size");
        game.make_move(Cell::new(0, 0), Cell::new(3, 3)).expect("no fault");
        game.select_position(1, 1).expect("no fault");
        game.reset_game().expect("valid size");

        assert_eq!(game.board_size(), 4);
        assert!(game.history().is_empty());
        assert!(game.pending_selection().is_empty());
        assert!(game.board().moves().is_empty());
        assert_eq!(game.current_player(), Player::X);
    }
}
