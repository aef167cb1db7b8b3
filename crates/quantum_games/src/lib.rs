//! Quantum Games - terminal front end for quantum tic-tac-toe
//!
//! # Architecture
//!
//! - **Config**: TOML game settings with command-line overrides
//! - **Play**: a human plays X against the computer on stdin
//! - **Simulate**: AI vs AI runs with a win/draw tally
//! - **Render**: text grid of collapsed and superposed marks

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
mod config;
pub mod play;
pub mod render;
pub mod simulate;

pub use config::{ConfigError, GameConfig};
