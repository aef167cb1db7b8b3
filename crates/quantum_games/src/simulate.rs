//! AI vs AI games.

use crate::config::GameConfig;
use anyhow::{Result, bail};
use derive_getters::Getters;
use quantum_tictactoe::{AiAction, AiPlayer, Player, QuantumTicTacToe};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;
use tracing::{debug, info, instrument};

/// Upper bound on commands per game; a finished game needs far fewer.
const MAX_ACTIONS: usize = 10_000;

/// Result of one finished game.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Outcome {
    /// Winner, `None` for a draw.
    winner: Option<Player>,
    /// Recorded events.
    events: usize,
    /// Moves placed.
    moves: usize,
}

/// Results across a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct Tally {
    x_wins: usize,
    o_wins: usize,
    draws: usize,
}

impl Tally {
    fn record(&mut self, outcome: &Outcome) {
        match outcome.winner {
            Some(Player::X) => self.x_wins += 1,
            Some(Player::O) => self.o_wins += 1,
            None => self.draws += 1,
        }
    }
}

/// Plays one game to the end, each side acting on its own turns.
#[instrument(skip_all)]
pub fn play_out<G: Rng, R: Rng>(
    game: &mut QuantumTicTacToe<G>,
    x: &AiPlayer,
    o: &AiPlayer,
    rng: &mut R,
) -> Result<Outcome> {
    for _ in 0..MAX_ACTIONS {
        if game.is_game_over() {
            let outcome = Outcome {
                winner: game.winner(),
                events: game.history().len(),
                moves: game.board().moves().len(),
            };
            debug!(?outcome, "Game finished");
            return Ok(outcome);
        }
        let ai = match game.current_player() {
            Player::X => x,
            Player::O => o,
        };
        let action = ai.choose_action(game, rng)?;
        let accepted = match action {
            AiAction::Move(a, b) => game.make_move(a, b)?,
            AiAction::Collapse(id, cell) => game.force_collapse(id, cell)?,
        };
        if !accepted {
            bail!("AI chose a rejected action: {:?}", action);
        }
    }
    bail!("game did not finish within {} actions", MAX_ACTIONS)
}

/// Plays `games` games and writes one line per game plus a tally.
#[instrument(skip(config, out))]
pub fn run(
    config: &GameConfig,
    games: usize,
    x: AiPlayer,
    o: AiPlayer,
    mut out: impl Write,
) -> Result<Tally> {
    let mut rng = config.rng();
    let mut tally = Tally::default();

    for index in 1..=games {
        let mut game =
            QuantumTicTacToe::with_rng(*config.board_size(), StdRng::from_rng(&mut rng))?;
        let outcome = play_out(&mut game, &x, &o, &mut rng)?;
        let result = match outcome.winner() {
            Some(player) => format!("{} wins", player),
            None => "draw".to_string(),
        };
        writeln!(
            out,
            "game {:>3}: {:<7} after {} moves, {} events",
            index,
            result,
            outcome.moves(),
            outcome.events()
        )?;
        tally.record(&outcome);
    }

    info!(?tally, "Simulation finished");
    writeln!(
        out,
        "X ({}) wins: {}, O ({}) wins: {}, draws: {}",
        x.difficulty(),
        tally.x_wins(),
        o.difficulty(),
        tally.o_wins(),
        tally.draws()
    )?;
    Ok(tally)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantum_tictactoe::Difficulty;

    fn seeded(seed: u64) -> GameConfig {
        GameConfig::default()
            .with_overrides(None, None, Some(seed))
            .expect("valid overrides")
    }

    #[test]
    fn test_tally_counts_every_game() {
        let ai = AiPlayer::new(Difficulty::Medium);
        let mut out = Vec::new();
        let tally = run(&seeded(3), 12, ai, ai, &mut out).expect("games finish");

        assert_eq!(tally.x_wins + tally.o_wins + tally.draws, 12);
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text.lines().count(), 13);
        assert!(text.lines().last().expect("tally line").starts_with("X (medium) wins:"));
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let x = AiPlayer::new(Difficulty::Hard);
        let o = AiPlayer::new(Difficulty::Easy);
        let first = run(&seeded(8), 5, x, o, std::io::sink()).expect("games finish");
        let second = run(&seeded(8), 5, x, o, std::io::sink()).expect("games finish");
        assert_eq!(first, second);
    }

    #[test]
    fn test_play_out_larger_board() {
        let mut game = QuantumTicTacToe::with_seed(4, 1).expect("valid size");
        let ai = AiPlayer::new(Difficulty::Hard).with_collapse_chance(0.5);
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = play_out(&mut game, &ai, &ai, &mut rng).expect("game finishes");
        assert!(game.is_game_over());
        assert_eq!(*outcome.winner(), game.winner());
        assert!(*outcome.moves() > 0);
    }
}
