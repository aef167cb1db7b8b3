//! Quantum tic-tac-toe rules engine.
//!
//! Every move is a superposition over two cells. When superposed moves
//! contend for a cell they interfere and collapse at random, and a player
//! may also collapse a move by choice. Only collapsed marks count toward a
//! line.
//!
//! # Architecture
//!
//! - **QuantumMove**: one superposed move and its one-way collapse
//! - **QuantumBoard**: move list, interference resolution, win/draw detection
//! - **QuantumTicTacToe**: controller with cell selection and history
//! - **AiPlayer**: easy/medium/hard computer opponent
//!
//! # Example
//!
//! ```
//! use quantum_tictactoe::{Cell, MoveId, QuantumTicTacToe};
//!
//! # fn example() -> Result<(), quantum_tictactoe::QuantumError> {
//! let mut game = QuantumTicTacToe::with_seed(3, 42)?;
//! assert!(game.select_position(0, 0)?);
//! assert!(game.select_position(1, 1)?);
//! assert!(game.force_collapse(MoveId(1), Cell::new(1, 1))?);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod ai;
mod board;
mod error;
mod game;
mod history;
pub mod invariants;
mod quantum_move;
pub mod rules;
mod types;

pub use ai::{AiAction, AiPlayer, DEFAULT_COLLAPSE_CHANCE, Difficulty};
pub use board::{MIN_BOARD_SIZE, QuantumBoard};
pub use error::{QuantumError, QuantumErrorKind, QuantumResult};
pub use game::QuantumTicTacToe;
pub use history::{CollapseEvent, GameEvent, MoveEvent, StateSnapshot};
pub use quantum_move::{MoveId, QuantumMove};
pub use types::{Cell, ClassicalBoard, Player};
