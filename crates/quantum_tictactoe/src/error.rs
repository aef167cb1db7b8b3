//! Error types for the quantum tic-tac-toe engine.

use derive_more::{Display, Error};
use tracing::instrument;

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum QuantumErrorKind {
    /// Malformed construction, e.g. identical candidate cells or collapsing
    /// to a cell outside the superposition.
    #[display("Invalid argument: {}", _0)]
    InvalidArgument(String),

    /// Out-of-bounds, occupied, duplicate or already-resolved target.
    #[display("Invalid move: {}", _0)]
    InvalidMove(String),

    /// An AI decision was requested with nothing to choose from.
    #[display("No moves available: {}", _0)]
    NoMovesAvailable(String),

    /// Two collapsed moves claim one cell, or another board invariant broke.
    #[display("Internal consistency fault: {}", _0)]
    InternalConsistencyFault(String),
}

/// Engine error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("{} at {}:{}", kind, file, line)]
pub struct QuantumError {
    /// Error classification.
    pub kind: QuantumErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl QuantumError {
    /// Creates a new error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(kind: QuantumErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Shorthand for [`QuantumErrorKind::InvalidArgument`].
    #[track_caller]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(QuantumErrorKind::InvalidArgument(message.into()))
    }

    /// Shorthand for [`QuantumErrorKind::InvalidMove`].
    #[track_caller]
    pub fn invalid_move(message: impl Into<String>) -> Self {
        Self::new(QuantumErrorKind::InvalidMove(message.into()))
    }

    /// Shorthand for [`QuantumErrorKind::NoMovesAvailable`].
    #[track_caller]
    pub fn no_moves(message: impl Into<String>) -> Self {
        Self::new(QuantumErrorKind::NoMovesAvailable(message.into()))
    }

    /// Shorthand for [`QuantumErrorKind::InternalConsistencyFault`].
    #[track_caller]
    pub fn consistency_fault(message: impl Into<String>) -> Self {
        Self::new(QuantumErrorKind::InternalConsistencyFault(message.into()))
    }
}

impl From<QuantumErrorKind> for QuantumError {
    #[track_caller]
    fn from(kind: QuantumErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Convenience alias for engine results.
pub type QuantumResult<T> = std::result::Result<T, QuantumError>;
