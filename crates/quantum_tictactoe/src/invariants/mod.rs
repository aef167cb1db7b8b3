//! First-class invariants for the quantum board.
//!
//! Invariants are logical properties that must hold after every board
//! mutation. The board checks them as a postcondition and reports a
//! violation as an internal consistency fault.

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for triples of invariants.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set.
    ///
    /// Returns Ok(()) if all invariants hold, or Err with a list of
    /// violations if any invariant fails.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }

        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }

        if !I3::holds(state) {
            violations.push(InvariantViolation::new(I3::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

pub mod alternating_turn;
pub mod interference_free;
pub mod unique_collapse;

pub use alternating_turn::AlternatingTurnInvariant;
pub use interference_free::InterferenceFreeInvariant;
pub use unique_collapse::UniqueCollapseInvariant;

/// All board invariants as a composable set.
pub type BoardInvariants = (
    UniqueCollapseInvariant,
    InterferenceFreeInvariant,
    AlternatingTurnInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::QuantumBoard;
    use crate::types::Cell;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_invariant_set_holds_for_empty_board() {
        let board = QuantumBoard::new(3).expect("valid size");
        assert!(BoardInvariants::check_all(&board).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_after_moves() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut board = QuantumBoard::new(3).expect("valid size");
        board
            .make_move(Cell::new(0, 0), Cell::new(0, 1), &mut rng)
            .expect("legal move");
        board
            .make_move(Cell::new(0, 1), Cell::new(2, 2), &mut rng)
            .expect("legal move");
        assert!(BoardInvariants::check_all(&board).is_ok());
    }

    #[test]
    fn test_invariant_set_detects_violations() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut board = QuantumBoard::new(3).expect("valid size");
        board
            .make_move(Cell::new(0, 0), Cell::new(0, 1), &mut rng)
            .expect("legal move");
        board
            .make_move(Cell::new(1, 0), Cell::new(1, 1), &mut rng)
            .expect("legal move");

        // Collapse both moves behind the board's back, then corrupt the turn
        board.moves_mut()[0]
            .collapse_to(Cell::new(0, 0))
            .expect("candidate cell");
        board.moves_mut()[1]
            .collapse_to(Cell::new(1, 1))
            .expect("candidate cell");
        board.moves_mut().swap(0, 1);

        let violations = BoardInvariants::check_all(&board).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].description,
            AlternatingTurnInvariant::description()
        );
    }
}
