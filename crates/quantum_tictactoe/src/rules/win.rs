//! Win detection logic, generalized to `N` × `N` boards.

use crate::types::{Cell, ClassicalBoard, Player};
use tracing::instrument;

/// Every winning line of a `size` × `size` board.
///
/// Order: rows top to bottom, columns left to right, the main diagonal, then
/// the anti-diagonal. Win detection reports the first complete line in this
/// order.
pub fn lines(size: usize) -> Vec<Vec<Cell>> {
    let rows = (0..size).map(|r| (0..size).map(|c| Cell::new(r, c)).collect());
    let cols = (0..size).map(|c| (0..size).map(|r| Cell::new(r, c)).collect());
    let main = (0..size).map(|i| Cell::new(i, i)).collect();
    let anti = (0..size).map(|i| Cell::new(i, size - 1 - i)).collect();

    rows.chain(cols)
        .chain(std::iter::once(main))
        .chain(std::iter::once(anti))
        .collect()
}

/// Checks if there is a winner on the board.
///
/// Returns `Some(player)` if the player holds every cell of a row, column or
/// full diagonal, `None` otherwise.
#[instrument(skip(board))]
pub fn check_winner(board: &ClassicalBoard) -> Option<Player> {
    if board.size() == 0 {
        return None;
    }
    lines(board.size()).into_iter().find_map(|line| {
        let first = board.get(line[0])?;
        line.iter()
            .all(|&cell| board.get(cell) == Some(first))
            .then_some(first)
    })
}

/// Checks whether marking `cell` for `player` would finish a line.
///
/// Optimistic single-placement check: `cell` counts as the player's no matter
/// what it holds now, and every other cell of some line through it must
/// already carry the player's mark.
#[instrument(skip(board))]
pub fn completes_line(board: &ClassicalBoard, cell: Cell, player: Player) -> bool {
    if !cell.in_bounds(board.size()) {
        return false;
    }
    lines(board.size())
        .into_iter()
        .filter(|line| line.contains(&cell))
        .any(|line| {
            line.iter()
                .all(|&other| other == cell || board.get(other) == Some(player))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: Option<Player> = Some(Player::X);
    const O: Option<Player> = Some(Player::O);
    const E: Option<Player> = None;

    fn board(rows: &[Vec<Option<Player>>]) -> ClassicalBoard {
        ClassicalBoard::from_rows(rows).expect("square rows")
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(check_winner(&ClassicalBoard::new(3)), None);
    }

    #[test]
    fn test_winner_top_row() {
        let b = board(&[vec![X, X, X], vec![O, O, E], vec![E, E, E]]);
        assert_eq!(check_winner(&b), Some(Player::X));
    }

    #[test]
    fn test_winner_column() {
        let b = board(&[vec![X, O, E], vec![X, O, E], vec![E, O, X]]);
        assert_eq!(check_winner(&b), Some(Player::O));
    }

    #[test]
    fn test_winner_diagonal() {
        let b = board(&[vec![O, X, E], vec![X, O, E], vec![E, E, O]]);
        assert_eq!(check_winner(&b), Some(Player::O));
    }

    #[test]
    fn test_no_winner_incomplete() {
        let b = board(&[vec![X, X, E], vec![E, E, E], vec![E, E, E]]);
        assert_eq!(check_winner(&b), None);
    }

    #[test]
    fn test_even_board_diagonals() {
        let main = board(&[
            vec![X, E, E, E],
            vec![E, X, E, E],
            vec![E, E, X, E],
            vec![E, E, E, X],
        ]);
        assert_eq!(check_winner(&main), Some(Player::X));

        let anti = board(&[
            vec![E, E, E, O],
            vec![E, E, O, E],
            vec![E, O, E, E],
            vec![O, E, E, E],
        ]);
        assert_eq!(check_winner(&anti), Some(Player::O));

        // Three of four on a diagonal is not a win
        let partial = board(&[
            vec![X, E, E, E],
            vec![E, X, E, E],
            vec![E, E, X, E],
            vec![E, E, E, E],
        ]);
        assert_eq!(check_winner(&partial), None);
    }

    #[test]
    fn test_line_count() {
        assert_eq!(lines(3).len(), 8);
        assert_eq!(lines(4).len(), 10);
    }

    #[test]
    fn test_completes_line() {
        let b = board(&[vec![X, X, E], vec![O, E, E], vec![O, E, E]]);
        assert!(completes_line(&b, Cell::new(0, 2), Player::X));
        assert!(!completes_line(&b, Cell::new(1, 1), Player::X));
        // The target cell itself is ignored, even when already marked
        assert!(completes_line(&b, Cell::new(0, 0), Player::O));
        assert!(!completes_line(&b, Cell::new(2, 2), Player::O));
    }

    #[test]
    fn test_completes_line_anti_diagonal() {
        let b = board(&[vec![E, E, O], vec![E, O, E], vec![E, E, E]]);
        assert!(completes_line(&b, Cell::new(2, 0), Player::O));
        assert!(!completes_line(&b, Cell::new(2, 0), Player::X));
    }
}
