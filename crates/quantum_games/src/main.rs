//! Quantum Games - Unified CLI
//!
//! Play quantum tic-tac-toe against the computer or watch AI vs AI.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use quantum_games::cli::{Cli, Command};
use quantum_games::{GameConfig, play, simulate};
use quantum_tictactoe::{AiPlayer, Difficulty};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    debug!(?cli, "Parsed arguments");

    match cli.command {
        Command::Play {
            config,
            size,
            difficulty,
            seed,
        } => {
            let config =
                GameConfig::load(config.as_deref())?.with_overrides(size, difficulty, seed)?;
            play::run(&config)
        }
        Command::Simulate {
            config,
            games,
            x,
            o,
            seed,
        } => {
            let config = GameConfig::load(config.as_deref())?.with_overrides(None, None, seed)?;
            let ai = |difficulty: Option<Difficulty>| {
                AiPlayer::new(difficulty.unwrap_or(*config.difficulty()))
                    .with_collapse_chance(*config.collapse_chance())
            };
            let (x, o) = (ai(x), ai(o));
            info!(games, x = %x.difficulty(), o = %o.difficulty(), "Starting simulation");
            simulate::run(&config, games, x, o, std::io::stdout().lock())?;
            Ok(())
        }
    }
}
