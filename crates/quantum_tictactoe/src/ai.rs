//! Computer opponent.
//!
//! Decisions are pure functions of the game state and a caller-supplied
//! random source; the player itself only carries its configuration.

use crate::error::{QuantumError, QuantumResult};
use crate::game::QuantumTicTacToe;
use crate::quantum_move::{MoveId, QuantumMove};
use crate::rules::completes_line;
use crate::types::{Cell, ClassicalBoard, Player};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Probability that [`AiPlayer::choose_action`] collapses instead of moving.
pub const DEFAULT_COLLAPSE_CHANCE: f64 = 0.3;

/// How hard the computer tries.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Uniformly random legal moves.
    Easy,
    /// Seeks interference with the opponent's superposed moves.
    #[default]
    Medium,
    /// Takes wins, blocks, then falls back to medium and positional play.
    Hard,
}

/// One turn's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiAction {
    /// Place a quantum move over two cells.
    Move(Cell, Cell),
    /// Collapse an existing move onto one of its cells.
    Collapse(MoveId, Cell),
}

/// Computer opponent at a fixed difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiPlayer {
    difficulty: Difficulty,
    collapse_chance: f64,
}

impl Default for AiPlayer {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

impl AiPlayer {
    /// Creates an opponent with the default collapse chance.
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            collapse_chance: DEFAULT_COLLAPSE_CHANCE,
        }
    }

    /// Sets the probability of collapsing instead of moving, clamped to
    /// `[0, 1]`. NaN counts as zero.
    pub fn with_collapse_chance(mut self, chance: f64) -> Self {
        self.collapse_chance = if chance.is_nan() {
            0.0
        } else {
            chance.clamp(0.0, 1.0)
        };
        self
    }

    /// Configured difficulty.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Configured collapse probability.
    pub fn collapse_chance(&self) -> f64 {
        self.collapse_chance
    }

    /// Picks a two-cell move for the current player.
    ///
    /// # Errors
    ///
    /// `NoMovesAvailable` if the game is over or no legal move exists.
    #[instrument(skip(self, game, rng), fields(difficulty = %self.difficulty))]
    pub fn make_move<G: Rng, R: Rng>(
        &self,
        game: &QuantumTicTacToe<G>,
        rng: &mut R,
    ) -> QuantumResult<(Cell, Cell)> {
        if game.is_game_over() {
            return Err(QuantumError::no_moves("game is over"));
        }
        let valid = game.valid_moves();
        if valid.is_empty() {
            return Err(QuantumError::no_moves("no legal two-cell move remains"));
        }

        let choice = match self.difficulty {
            Difficulty::Easy => random_move(&valid, rng),
            Difficulty::Medium => interfering_move(game, &valid, rng),
            Difficulty::Hard => strategic_move(game, &valid, rng)?,
        };
        let choice = choice.ok_or_else(|| QuantumError::no_moves("no legal move chosen"))?;
        debug!(pos1 = %choice.0, pos2 = %choice.1, "AI chose move");
        Ok(choice)
    }

    /// Picks a superposed move to collapse and the cell to collapse it to.
    ///
    /// Medium and hard prefer the opponent's moves. Hard has no lookahead
    /// beyond that.
    ///
    /// # Errors
    ///
    /// `NoMovesAvailable` if the game is over or nothing can be collapsed.
    #[instrument(skip(self, game, rng), fields(difficulty = %self.difficulty))]
    pub fn decide_collapse<G: Rng, R: Rng>(
        &self,
        game: &QuantumTicTacToe<G>,
        rng: &mut R,
    ) -> QuantumResult<(MoveId, Cell)> {
        if game.is_game_over() {
            return Err(QuantumError::no_moves("game is over"));
        }
        let collapsible = collapsible_moves(game);
        if collapsible.is_empty() {
            return Err(QuantumError::no_moves("no superposed move to collapse"));
        }

        let pool: Vec<&QuantumMove> = match self.difficulty {
            Difficulty::Easy => collapsible,
            Difficulty::Medium | Difficulty::Hard => {
                let me = game.current_player();
                let theirs: Vec<&QuantumMove> = collapsible
                    .iter()
                    .copied()
                    .filter(|mv| mv.player() != me)
                    .collect();
                if theirs.is_empty() { collapsible } else { theirs }
            }
        };

        let mv = pool
            .choose(rng)
            .ok_or_else(|| QuantumError::no_moves("no superposed move to collapse"))?;
        let cells = collapse_targets(game, mv);
        let cell = cells
            .choose(rng)
            .copied()
            .ok_or_else(|| QuantumError::no_moves(format!("move {} has no free cell", mv)))?;
        debug!(move_id = %mv.id(), %cell, "AI chose collapse");
        Ok((mv.id(), cell))
    }

    /// Decides the whole turn: usually a new move, sometimes a collapse.
    ///
    /// Collapses with probability [`Self::collapse_chance`] when anything can
    /// be collapsed.
    ///
    /// # Errors
    ///
    /// `NoMovesAvailable` if neither a move nor a collapse is possible.
    #[instrument(skip(self, game, rng))]
    pub fn choose_action<G: Rng, R: Rng>(
        &self,
        game: &QuantumTicTacToe<G>,
        rng: &mut R,
    ) -> QuantumResult<AiAction> {
        let can_collapse = !game.is_game_over() && !collapsible_moves(game).is_empty();
        if can_collapse && rng.random_bool(self.collapse_chance) {
            let (id, cell) = self.decide_collapse(game, rng)?;
            return Ok(AiAction::Collapse(id, cell));
        }
        match self.make_move(game, rng) {
            Ok((a, b)) => Ok(AiAction::Move(a, b)),
            Err(_) if can_collapse => {
                let (id, cell) = self.decide_collapse(game, rng)?;
                Ok(AiAction::Collapse(id, cell))
            }
            Err(e) => Err(e),
        }
    }
}

fn collapse_targets<G: Rng>(game: &QuantumTicTacToe<G>, mv: &QuantumMove) -> Vec<Cell> {
    mv.positions()
        .into_iter()
        .filter(|&cell| game.board().can_force_collapse(mv.id(), cell))
        .collect()
}

fn collapsible_moves<G: Rng>(game: &QuantumTicTacToe<G>) -> Vec<&QuantumMove> {
    game.uncollapsed_moves()
        .into_iter()
        .filter(|mv| !collapse_targets(game, mv).is_empty())
        .collect()
}

fn random_move<R: Rng>(valid: &[(Cell, Cell)], rng: &mut R) -> Option<(Cell, Cell)> {
    valid.choose(rng).copied()
}

/// Valid moves touching a candidate cell of an opponent's superposed move.
fn interference_candidates<G: Rng>(
    game: &QuantumTicTacToe<G>,
    valid: &[(Cell, Cell)],
) -> Vec<(Cell, Cell)> {
    let me = game.current_player();
    let targets: BTreeSet<Cell> = game
        .uncollapsed_moves()
        .into_iter()
        .filter(|mv| mv.player() != me)
        .flat_map(|mv| mv.positions())
        .collect();
    valid
        .iter()
        .copied()
        .filter(|(a, b)| targets.contains(a) || targets.contains(b))
        .collect()
}

fn interfering_move<G: Rng, R: Rng>(
    game: &QuantumTicTacToe<G>,
    valid: &[(Cell, Cell)],
    rng: &mut R,
) -> Option<(Cell, Cell)> {
    let interfering = interference_candidates(game, valid);
    if interfering.is_empty() {
        random_move(valid, rng)
    } else {
        random_move(&interfering, rng)
    }
}

fn line_move(
    board: &ClassicalBoard,
    valid: &[(Cell, Cell)],
    player: Player,
) -> Option<(Cell, Cell)> {
    valid
        .iter()
        .copied()
        .find(|&(a, b)| completes_line(board, a, player) || completes_line(board, b, player))
}

fn strategic_move<G: Rng, R: Rng>(
    game: &QuantumTicTacToe<G>,
    valid: &[(Cell, Cell)],
    rng: &mut R,
) -> QuantumResult<Option<(Cell, Cell)>> {
    let board = game.classical_board()?;
    let me = game.current_player();

    if let Some(win) = line_move(&board, valid, me) {
        debug!("Taking winning line");
        return Ok(Some(win));
    }
    if let Some(block) = line_move(&board, valid, me.opponent()) {
        debug!("Blocking opponent line");
        return Ok(Some(block));
    }

    let interfering = interference_candidates(game, valid);
    if !interfering.is_empty() {
        return Ok(random_move(&interfering, rng));
    }

    let size = game.board_size();
    let last = size - 1;
    let key_cells = [
        Cell::new(size / 2, size / 2),
        Cell::new(0, 0),
        Cell::new(0, last),
        Cell::new(last, 0),
        Cell::new(last, last),
    ];
    let positional: Vec<(Cell, Cell)> = valid
        .iter()
        .copied()
        .filter(|(a, b)| key_cells.contains(a) || key_cells.contains(b))
        .collect();
    if !positional.is_empty() {
        return Ok(random_move(&positional, rng));
    }

    Ok(random_move(valid, rng))
}
