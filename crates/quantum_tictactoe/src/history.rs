//! Game history records.
//!
//! Every successful command leaves one event holding the acting player,
//! what they did, which moves collapsed because of it, and a snapshot of the
//! game on either side of the change.

use crate::board::QuantumBoard;
use crate::error::QuantumResult;
use crate::quantum_move::MoveId;
use crate::types::{Cell, ClassicalBoard, Player};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Observable game state at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct StateSnapshot {
    /// Player to move.
    current_player: Player,
    /// Whether the game had ended.
    game_over: bool,
    /// Winner, if decided.
    winner: Option<Player>,
    /// Collapsed marks.
    classical_board: ClassicalBoard,
    /// Display strings of superposed moves.
    uncollapsed_moves: Vec<String>,
    /// Display strings of collapsed moves.
    collapsed_moves: Vec<String>,
}

impl StateSnapshot {
    /// Captures the current state of `board`.
    ///
    /// # Errors
    ///
    /// Propagates an internal consistency fault from the classical
    /// projection.
    pub fn capture(board: &QuantumBoard) -> QuantumResult<Self> {
        Ok(Self {
            current_player: board.current_player(),
            game_over: board.is_game_over(),
            winner: board.winner(),
            classical_board: board.classical_board()?,
            uncollapsed_moves: board
                .uncollapsed_moves()
                .iter()
                .map(ToString::to_string)
                .collect(),
            collapsed_moves: board
                .collapsed_moves()
                .iter()
                .map(ToString::to_string)
                .collect(),
        })
    }
}

/// A two-cell quantum move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct MoveEvent {
    /// Player who moved.
    player: Player,
    /// The superposed cells.
    positions: [Cell; 2],
    /// Moves collapsed by interference, as display strings.
    collapsed_moves: Vec<String>,
    /// State before the move.
    before: StateSnapshot,
    /// State after the move.
    after: StateSnapshot,
}

/// A forced collapse chosen by a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct CollapseEvent {
    /// Player whose turn it was.
    player: Player,
    /// The move that was collapsed.
    move_id: MoveId,
    /// Where it was collapsed to.
    position: Cell,
    /// Every move that collapsed, forced one first, as display strings.
    collapsed_moves: Vec<String>,
    /// State before the collapse.
    before: StateSnapshot,
    /// State after the collapse.
    after: StateSnapshot,
}

/// One entry of the game history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEvent {
    /// A quantum move was placed.
    Move(MoveEvent),
    /// A move was collapsed by choice.
    Collapse(CollapseEvent),
}

impl GameEvent {
    /// The acting player.
    pub fn player(&self) -> Player {
        match self {
            GameEvent::Move(e) => e.player,
            GameEvent::Collapse(e) => e.player,
        }
    }

    /// Moves collapsed by this event, as display strings.
    pub fn collapsed_moves(&self) -> &[String] {
        match self {
            GameEvent::Move(e) => &e.collapsed_moves,
            GameEvent::Collapse(e) => &e.collapsed_moves,
        }
    }

    /// State before the event.
    pub fn before(&self) -> &StateSnapshot {
        match self {
            GameEvent::Move(e) => &e.before,
            GameEvent::Collapse(e) => &e.before,
        }
    }

    /// State after the event.
    pub fn after(&self) -> &StateSnapshot {
        match self {
            GameEvent::Move(e) => &e.after,
            GameEvent::Collapse(e) => &e.after,
        }
    }
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameEvent::Move(e) => write!(
                f,
                "{} plays {} / {}",
                e.player, e.positions[0], e.positions[1]
            )?,
            GameEvent::Collapse(e) => write!(
                f,
                "{} collapses move {} to {}",
                e.player, e.move_id, e.position
            )?,
        }
        if !self.collapsed_moves().is_empty() {
            write!(f, " [collapsed: {}]", self.collapsed_moves().join(", "))?;
        }
        Ok(())
    }
}
