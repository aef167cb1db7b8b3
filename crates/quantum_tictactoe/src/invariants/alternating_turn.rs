//! Alternating turn invariant: players alternate X, O, X, O, ...

use super::Invariant;
use crate::board::QuantumBoard;
use crate::quantum_move::MoveId;
use crate::types::Player;

/// Invariant: players alternate turns and ids count up from 1.
///
/// Move `n` (1-based) belongs to X when `n` is odd. The player to move is
/// determined by the number of moves made; forced collapses never shift it.
pub struct AlternatingTurnInvariant;

impl Invariant<QuantumBoard> for AlternatingTurnInvariant {
    fn holds(board: &QuantumBoard) -> bool {
        let moves = board.moves();

        let sequenced = moves.iter().enumerate().all(|(i, mv)| {
            let expected_player = if i % 2 == 0 { Player::X } else { Player::O };
            mv.id() == MoveId(i as u32 + 1) && mv.player() == expected_player
        });

        let expected_next = if moves.len() % 2 == 0 {
            Player::X
        } else {
            Player::O
        };

        sequenced && board.current_player() == expected_next
    }

    fn description() -> &'static str {
        "Players alternate turns (X, O, X, O, ...) with consecutive move ids"
    }
}
