//! Interference-free invariant: the board rests at a resolution fixed point.

use super::Invariant;
use crate::board::QuantumBoard;
use std::collections::HashSet;

/// Invariant: no interference is left unresolved.
///
/// Every cell is a candidate of at most one superposed move, and no
/// superposed move lists a cell that already holds a collapsed mark.
pub struct InterferenceFreeInvariant;

impl Invariant<QuantumBoard> for InterferenceFreeInvariant {
    fn holds(board: &QuantumBoard) -> bool {
        let mut seen = HashSet::new();
        board
            .uncollapsed_moves()
            .into_iter()
            .flat_map(|mv| mv.positions())
            .all(|cell| !board.is_occupied(cell) && seen.insert(cell))
    }

    fn description() -> &'static str {
        "No cell is contested by two superposed moves or a superposed and a collapsed move"
    }
}
