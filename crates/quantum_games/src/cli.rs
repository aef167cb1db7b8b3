//! Command-line interface for quantum_games.

use clap::{Parser, Subcommand};
use quantum_tictactoe::Difficulty;
use std::path::PathBuf;

/// Quantum Games - quantum tic-tac-toe in the terminal
#[derive(Parser, Debug)]
#[command(name = "quantum_games")]
#[command(about = "Quantum tic-tac-toe against a computer opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play as X against the AI on stdin
    Play {
        /// Path to a TOML game configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Board dimension
        #[arg(long)]
        size: Option<usize>,

        /// AI difficulty (easy, medium, hard)
        #[arg(short, long)]
        difficulty: Option<Difficulty>,

        /// Seed for reproducible collapses
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run AI vs AI games and print a tally
    Simulate {
        /// Path to a TOML game configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of games to play
        #[arg(short, long, default_value = "10")]
        games: usize,

        /// Difficulty of the X player; defaults to the configured difficulty
        #[arg(long)]
        x: Option<Difficulty>,

        /// Difficulty of the O player; defaults to the configured difficulty
        #[arg(long)]
        o: Option<Difficulty>,

        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },
}
