//! Game rules for quantum tic-tac-toe.
//!
//! Pure functions over the classical projection of the board. Superposed
//! marks never count here; only collapsed moves can win or fill the board.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{check_winner, completes_line, lines};
