//! Unique collapse invariant: no cell holds two collapsed moves.

use super::Invariant;
use crate::board::QuantumBoard;
use std::collections::HashSet;

/// Invariant: at most one collapsed move per cell.
///
/// The classical board is only well defined while this holds.
pub struct UniqueCollapseInvariant;

impl Invariant<QuantumBoard> for UniqueCollapseInvariant {
    fn holds(board: &QuantumBoard) -> bool {
        let mut seen = HashSet::new();
        board
            .moves()
            .iter()
            .filter_map(|mv| mv.collapsed_position())
            .all(|cell| seen.insert(cell))
    }

    fn description() -> &'static str {
        "No two collapsed moves share a cell"
    }
}
