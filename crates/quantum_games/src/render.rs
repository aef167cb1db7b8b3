//! Text rendering of a game for the terminal.

use quantum_tictactoe::{Cell, QuantumMove, QuantumTicTacToe};
use rand::Rng;

/// Label for one cell: `[X3]` when collapsed, `x1,o2` for superposed
/// moves, `.` when empty.
fn cell_label(cell: Cell, moves: &[&QuantumMove]) -> String {
    if let Some(mv) = moves.iter().find(|mv| mv.occupies_as_collapsed(cell)) {
        return format!("[{}{}]", mv.player(), mv.id());
    }
    if moves.is_empty() {
        return ".".to_string();
    }
    moves
        .iter()
        .map(|mv| format!("{}{}", mv.player().to_string().to_lowercase(), mv.id()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Grid showing collapsed marks and superposed moves together.
pub fn quantum_grid<R: Rng>(game: &QuantumTicTacToe<R>) -> String {
    let size = game.board_size();
    let labels: Vec<Vec<String>> = (0..size)
        .map(|row| {
            (0..size)
                .map(|col| {
                    let cell = Cell::new(row, col);
                    cell_label(cell, &game.moves_at(cell))
                })
                .collect()
        })
        .collect();
    let width = labels
        .iter()
        .flatten()
        .map(String::len)
        .max()
        .unwrap_or(1);

    let header: Vec<String> = (0..size).map(|col| format!("{:^width$}", col)).collect();
    let mut out = format!("   {}\n", header.join("   "));
    for (row, cells) in labels.iter().enumerate() {
        let padded: Vec<String> = cells.iter().map(|l| format!("{:^width$}", l)).collect();
        out.push_str(&format!("{:>2} {}\n", row, padded.join(" | ")));
        if row + 1 < size {
            out.push_str(&format!("   {}\n", vec!["-".repeat(width); size].join("-+-")));
        }
    }
    out
}

/// Turn or result line, followed by superposed moves and any pending cell.
pub fn status<R: Rng>(game: &QuantumTicTacToe<R>) -> String {
    let mut out = if game.is_game_over() {
        match game.winner() {
            Some(player) => format!("Game over: {} wins", player),
            None => "Game over: draw".to_string(),
        }
    } else {
        format!("{} to move", game.current_player())
    };

    let superposed = game.uncollapsed_moves();
    if !superposed.is_empty() {
        let listed: Vec<String> = superposed.iter().map(ToString::to_string).collect();
        out.push_str(&format!("\nSuperposed: {}", listed.join(" ")));
    }
    if let Some(cell) = game.pending_selection().first() {
        out.push_str(&format!("\nSelected: {}", cell));
    }
    out
}
