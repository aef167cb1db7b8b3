//! Interactive game: a human plays X against the AI.

use crate::config::GameConfig;
use crate::render;
use anyhow::Result;
use quantum_tictactoe::{AiAction, AiPlayer, Cell, MoveId, Player, QuantumTicTacToe};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::{BufRead, Write};
use tracing::{debug, info, instrument, warn};

const HELP: &str = "Commands: `r c` select a cell, `collapse ID r c`, `clear`, `reset`, `quit`";

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Pick a cell for the move being assembled.
    Select(usize, usize),
    /// Collapse a superposed move onto a cell.
    Collapse(MoveId, Cell),
    /// Drop a half-selected move.
    Clear,
    /// Start a new game.
    Reset,
    /// Leave.
    Quit,
}

/// Parses a command line; `None` when it is not understood.
pub fn parse_input(line: &str) -> Option<Input> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["quit" | "q" | "exit"] => Some(Input::Quit),
        ["clear"] => Some(Input::Clear),
        ["reset"] => Some(Input::Reset),
        ["collapse" | "c", id, row, col] => Some(Input::Collapse(
            MoveId(id.parse().ok()?),
            Cell::new(row.parse().ok()?, col.parse().ok()?),
        )),
        [row, col] => Some(Input::Select(row.parse().ok()?, col.parse().ok()?)),
        _ => None,
    }
}

/// State of one interactive session.
pub struct Session<G: Rng, R: Rng> {
    game: QuantumTicTacToe<G>,
    ai: AiPlayer,
    rng: R,
    human: Player,
}

impl<G: Rng, R: Rng> Session<G, R> {
    /// Creates a session with the human playing X.
    pub fn new(game: QuantumTicTacToe<G>, ai: AiPlayer, rng: R) -> Self {
        Self {
            game,
            ai,
            rng,
            human: Player::X,
        }
    }

    /// The game being played.
    pub fn game(&self) -> &QuantumTicTacToe<G> {
        &self.game
    }

    /// Lets the AI act until it is the human's turn or the game ends.
    #[instrument(skip(self, out))]
    fn ai_turn(&mut self, out: &mut impl Write) -> Result<()> {
        while !self.game.is_game_over() && self.game.current_player() != self.human {
            let action = self.ai.choose_action(&self.game, &mut self.rng)?;
            let accepted = match action {
                AiAction::Move(a, b) => {
                    writeln!(out, "AI plays {} / {}", a, b)?;
                    self.game.make_move(a, b)?
                }
                AiAction::Collapse(id, cell) => {
                    writeln!(out, "AI collapses move {} to {}", id, cell)?;
                    self.game.force_collapse(id, cell)?
                }
            };
            if !accepted {
                anyhow::bail!("AI chose a rejected action: {:?}", action);
            }
            // A collapse keeps the turn, so the AI may act again.
        }
        Ok(())
    }

    fn report(&self, out: &mut impl Write) -> Result<()> {
        writeln!(out, "\n{}", render::quantum_grid(&self.game))?;
        writeln!(out, "{}", render::status(&self.game))?;
        Ok(())
    }

    /// Applies one input. Returns false once the player quits.
    #[instrument(skip(self, out))]
    pub fn handle(&mut self, input: Input, out: &mut impl Write) -> Result<bool> {
        let accepted = match input {
            Input::Quit => return Ok(false),
            Input::Clear => {
                self.game.clear_selection();
                true
            }
            Input::Reset => {
                self.game.reset_game()?;
                info!("Game reset by player");
                true
            }
            Input::Select(row, col) => self.game.select_position(row, col)?,
            Input::Collapse(id, cell) => self.game.force_collapse(id, cell)?,
        };
        if !accepted {
            warn!(?input, "Input rejected");
            writeln!(out, "Not allowed: {:?}", input)?;
        }
        self.ai_turn(out)?;
        Ok(true)
    }

    /// Reads commands until `quit` or end of input.
    pub fn run(&mut self, input: impl BufRead, mut out: impl Write) -> Result<()> {
        writeln!(out, "{}", HELP)?;
        self.report(&mut out)?;
        for line in input.lines() {
            let line = line?;
            let Some(command) = parse_input(&line) else {
                debug!(%line, "Unparsed input");
                writeln!(out, "{}", HELP)?;
                continue;
            };
            if !self.handle(command, &mut out)? {
                break;
            }
            self.report(&mut out)?;
        }
        Ok(())
    }
}

/// Runs an interactive game on stdin and stdout.
#[instrument(skip(config))]
pub fn run(config: &GameConfig) -> Result<()> {
    let mut rng = config.rng();
    let game = QuantumTicTacToe::with_rng(*config.board_size(), StdRng::from_rng(&mut rng))?;
    let ai = AiPlayer::new(*config.difficulty()).with_collapse_chance(*config.collapse_chance());
    info!(difficulty = %ai.difficulty(), "Starting interactive game");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Session::new(game, ai, rng).run(stdin.lock(), stdout.lock())
}
