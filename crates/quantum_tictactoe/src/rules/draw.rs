//! Draw detection logic.

use crate::types::ClassicalBoard;
use tracing::instrument;

/// Checks if every cell holds a collapsed mark.
///
/// A full board with no winner is a draw.
#[instrument(skip(board))]
pub fn is_full(board: &ClassicalBoard) -> bool {
    board.occupied_count() == board.size() * board.size()
}
