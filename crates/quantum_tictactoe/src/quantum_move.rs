//! Superposed moves.
//!
//! A quantum move is a player's mark spread over two cells. It stays in
//! superposition until something collapses it onto exactly one of them,
//! after which it behaves like an ordinary tic-tac-toe mark.

use crate::error::{QuantumError, QuantumResult};
use crate::types::{Cell, Player};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Stable identifier of a move: its sequence number.
///
/// Sequence numbers start at 1, increase strictly with every move and are
/// never reused.
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
    derive_more::From,
)]
pub struct MoveId(pub u32);

impl MoveId {
    /// The id that follows this one.
    pub fn next(self) -> Self {
        MoveId(self.0 + 1)
    }
}

/// One superposed move.
///
/// Identity (cells, player, id) is fixed at creation. The only mutation is
/// the one-way collapse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantumMove {
    positions: [Cell; 2],
    player: Player,
    id: MoveId,
    collapsed_position: Option<Cell>,
}

impl QuantumMove {
    /// Creates a move in superposition over `pos1` and `pos2`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the two cells are the same.
    #[instrument]
    pub fn new(pos1: Cell, pos2: Cell, player: Player, id: MoveId) -> QuantumResult<Self> {
        if pos1 == pos2 {
            return Err(QuantumError::invalid_argument(format!(
                "a quantum move needs two distinct cells, got {} twice",
                pos1
            )));
        }
        Ok(Self {
            positions: [pos1, pos2],
            player,
            id,
            collapsed_position: None,
        })
    }

    /// The two candidate cells, in the order they were chosen.
    pub fn positions(&self) -> [Cell; 2] {
        self.positions
    }

    /// The player who made this move.
    pub fn player(&self) -> Player {
        self.player
    }

    /// The move's sequence number.
    pub fn id(&self) -> MoveId {
        self.id
    }

    /// Returns true once the move has collapsed.
    pub fn is_collapsed(&self) -> bool {
        self.collapsed_position.is_some()
    }

    /// Where the move collapsed, if it has.
    pub fn collapsed_position(&self) -> Option<Cell> {
        self.collapsed_position
    }

    /// Collapses the move onto one of its candidates.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `position` is not a candidate or the move
    /// has already collapsed.
    #[instrument(skip(self), fields(id = %self.id))]
    pub fn collapse_to(&mut self, position: Cell) -> QuantumResult<()> {
        if let Some(existing) = self.collapsed_position {
            return Err(QuantumError::invalid_argument(format!(
                "move {} already collapsed to {}",
                self, existing
            )));
        }
        if !self.positions.contains(&position) {
            return Err(QuantumError::invalid_argument(format!(
                "cannot collapse move {} to {}, not in its superposition",
                self, position
            )));
        }
        self.collapsed_position = Some(position);
        Ok(())
    }

    /// Cells the move currently occupies: the collapsed cell, or both
    /// candidates while superposed.
    pub fn effective_positions(&self) -> Vec<Cell> {
        match self.collapsed_position {
            Some(cell) => vec![cell],
            None => self.positions.to_vec(),
        }
    }

    /// True iff the move is superposed and `position` is a candidate.
    pub fn occupies_as_superposition(&self, position: Cell) -> bool {
        !self.is_collapsed() && self.positions.contains(&position)
    }

    /// True iff the move collapsed onto `position`.
    pub fn occupies_as_collapsed(&self, position: Cell) -> bool {
        self.collapsed_position == Some(position)
    }

    /// The candidate that is not `position`, if `position` is a candidate.
    pub fn other_position(&self, position: Cell) -> Option<Cell> {
        match self.positions {
            [a, b] if a == position => Some(b),
            [a, b] if b == position => Some(a),
            _ => None,
        }
    }
}

impl std::fmt::Display for QuantumMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.collapsed_position {
            Some(cell) => write!(f, "{}{}@{}", self.player, self.id, cell),
            None => write!(
                f,
                "{}{}@({},{})",
                self.player, self.id, self.positions[0], self.positions[1]
            ),
        }
    }
}
