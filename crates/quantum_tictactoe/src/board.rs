//! The quantum board: move list, interference resolution and game state.

use crate::error::{QuantumError, QuantumResult};
use crate::invariants::{BoardInvariants, InvariantSet};
use crate::quantum_move::{MoveId, QuantumMove};
use crate::rules::{check_winner, is_full};
use crate::types::{Cell, ClassicalBoard, Player};
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument};

/// Smallest board on which a two-cell move can be placed.
pub const MIN_BOARD_SIZE: usize = 2;

/// Quantum tic-tac-toe board.
///
/// Owns the append-only list of moves. Moves are stored in id order, so a
/// move's id doubles as a stable lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantumBoard {
    size: usize,
    moves: Vec<QuantumMove>,
    next_id: MoveId,
    current_player: Player,
    game_over: bool,
    winner: Option<Player>,
}

impl QuantumBoard {
    /// Creates an empty `size` × `size` board with X to move.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` below 2 × 2, where no two-cell move fits.
    #[instrument]
    pub fn new(size: usize) -> QuantumResult<Self> {
        if size < MIN_BOARD_SIZE {
            return Err(QuantumError::invalid_argument(format!(
                "board size must be at least {}, got {}",
                MIN_BOARD_SIZE, size
            )));
        }
        Ok(Self {
            size,
            moves: Vec::new(),
            next_id: MoveId(1),
            current_player: Player::X,
            game_over: false,
            winner: None,
        })
    }

    /// Board dimension.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Player to make the next two-cell move.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Returns true once the game has been won or drawn.
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// The winner; `None` while in progress and for a draw.
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// All moves in creation order.
    pub fn moves(&self) -> &[QuantumMove] {
        &self.moves
    }

    #[cfg(test)]
    pub(crate) fn moves_mut(&mut self) -> &mut Vec<QuantumMove> {
        &mut self.moves
    }

    fn index_of(&self, id: MoveId) -> Option<usize> {
        self.moves.binary_search_by_key(&id, QuantumMove::id).ok()
    }

    /// Looks up a move by id.
    pub fn move_by_id(&self, id: MoveId) -> Option<&QuantumMove> {
        self.index_of(id).map(|i| &self.moves[i])
    }

    /// Moves still in superposition.
    pub fn uncollapsed_moves(&self) -> Vec<&QuantumMove> {
        self.moves.iter().filter(|mv| !mv.is_collapsed()).collect()
    }

    /// Moves that have collapsed.
    pub fn collapsed_moves(&self) -> Vec<&QuantumMove> {
        self.moves.iter().filter(|mv| mv.is_collapsed()).collect()
    }

    /// The collapsed move sitting on `cell`, if any.
    pub fn occupant(&self, cell: Cell) -> Option<&QuantumMove> {
        self.moves.iter().find(|mv| mv.occupies_as_collapsed(cell))
    }

    /// Returns true if `cell` holds a collapsed mark.
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.occupant(cell).is_some()
    }

    /// Moves collapsed on, or superposed over, `cell`.
    pub fn moves_at(&self, cell: Cell) -> Vec<&QuantumMove> {
        self.moves
            .iter()
            .filter(|mv| mv.occupies_as_collapsed(cell) || mv.occupies_as_superposition(cell))
            .collect()
    }

    /// Number of superposed moves that list `cell` as a candidate.
    pub fn superposition_count(&self, cell: Cell) -> usize {
        self.moves
            .iter()
            .filter(|mv| mv.occupies_as_superposition(cell))
            .count()
    }

    fn validate_move(&self, pos1: Cell, pos2: Cell) -> QuantumResult<()> {
        for pos in [pos1, pos2] {
            if !pos.in_bounds(self.size) {
                return Err(QuantumError::invalid_move(format!(
                    "cell {} is outside the {}x{} board",
                    pos, self.size, self.size
                )));
            }
        }
        if pos1 == pos2 {
            return Err(QuantumError::invalid_move(format!(
                "both halves of the move target {}",
                pos1
            )));
        }
        for pos in [pos1, pos2] {
            if let Some(occupant) = self.occupant(pos) {
                return Err(QuantumError::invalid_move(format!(
                    "cell {} already holds collapsed move {}",
                    pos, occupant
                )));
            }
        }
        Ok(())
    }

    /// Checks whether `pos1`/`pos2` would be accepted by [`Self::make_move`],
    /// ignoring whether the game is over.
    pub fn is_valid_move(&self, pos1: Cell, pos2: Cell) -> bool {
        self.validate_move(pos1, pos2).is_ok()
    }

    /// Every legal ordered pair of cells, row-major.
    ///
    /// Quartic in the board size; intended for boards up to 5 × 5.
    pub fn valid_moves(&self) -> Vec<(Cell, Cell)> {
        let free: Vec<Cell> = Cell::all(self.size)
            .filter(|&cell| !self.is_occupied(cell))
            .collect();
        free.iter()
            .flat_map(|&a| free.iter().filter(move |&&b| b != a).map(move |&b| (a, b)))
            .collect()
    }

    /// Places a superposed move for the current player.
    ///
    /// Resolves any interference the move creates, passes the turn and
    /// updates the game state. Returns the moves collapsed as a side effect,
    /// in the order they collapsed.
    ///
    /// # Errors
    ///
    /// `InvalidMove` if a cell is out of bounds or classically occupied, the
    /// cells are equal, or the game is over. `InternalConsistencyFault` if
    /// resolution breaks a board invariant.
    #[instrument(skip(self, rng), fields(player = %self.current_player))]
    pub fn make_move<R: Rng>(
        &mut self,
        pos1: Cell,
        pos2: Cell,
        rng: &mut R,
    ) -> QuantumResult<Vec<QuantumMove>> {
        if self.game_over {
            return Err(QuantumError::invalid_move("game is already over"));
        }
        self.validate_move(pos1, pos2)?;

        let mv = QuantumMove::new(pos1, pos2, self.current_player, self.next_id)?;
        debug!(%mv, "Placing quantum move");
        self.moves.push(mv);
        self.next_id = self.next_id.next();

        let collapsed = self.resolve_interference(rng)?;

        self.current_player = self.current_player.opponent();
        self.check_game_state()?;
        self.verify()?;

        Ok(self.cloned(&collapsed))
    }

    /// Collapses move `id` onto `position` by player choice.
    ///
    /// Cascading interference is resolved the same way as after a move. The
    /// turn does not pass. Returns every move collapsed, the forced one
    /// first.
    ///
    /// # Errors
    ///
    /// `InvalidMove` if the id is unknown, the move already collapsed,
    /// `position` is not one of its candidates or already holds a collapsed
    /// mark, or the game is over.
    #[instrument(skip(self, rng))]
    pub fn force_collapse<R: Rng>(
        &mut self,
        id: MoveId,
        position: Cell,
        rng: &mut R,
    ) -> QuantumResult<Vec<QuantumMove>> {
        let index = self.validate_collapse(id, position)?;

        self.moves[index].collapse_to(position)?;
        info!(move_id = %id, %position, "Forced collapse");

        let mut collapsed = vec![id];
        collapsed.extend(self.resolve_interference(rng)?);

        self.check_game_state()?;
        self.verify()?;

        Ok(self.cloned(&collapsed))
    }

    fn validate_collapse(&self, id: MoveId, position: Cell) -> QuantumResult<usize> {
        if self.game_over {
            return Err(QuantumError::invalid_move("game is already over"));
        }
        let index = self
            .index_of(id)
            .ok_or_else(|| QuantumError::invalid_move(format!("no move with id {}", id)))?;
        let mv = &self.moves[index];
        if mv.is_collapsed() {
            return Err(QuantumError::invalid_move(format!(
                "move {} is already collapsed",
                mv
            )));
        }
        if !mv.positions().contains(&position) {
            return Err(QuantumError::invalid_move(format!(
                "cell {} is not in the superposition of move {}",
                position, mv
            )));
        }
        if let Some(occupant) = self.occupant(position) {
            return Err(QuantumError::invalid_move(format!(
                "cell {} already holds collapsed move {}",
                position, occupant
            )));
        }
        Ok(index)
    }

    /// Checks whether [`Self::force_collapse`] would accept `id`/`position`.
    pub fn can_force_collapse(&self, id: MoveId, position: Cell) -> bool {
        self.validate_collapse(id, position).is_ok()
    }

    /// Finds the first contested cell in row-major order.
    ///
    /// A cell is contested when two or more superposed moves list it, or when
    /// a superposed move lists a cell that already holds a collapsed mark.
    /// Returns the cell and the contending move ids in id order.
    fn next_interference_site(&self) -> Option<(Cell, Vec<MoveId>)> {
        let mut by_cell: BTreeMap<Cell, Vec<MoveId>> = BTreeMap::new();
        for mv in self.moves.iter().filter(|mv| !mv.is_collapsed()) {
            for cell in mv.positions() {
                by_cell.entry(cell).or_default().push(mv.id());
            }
        }
        by_cell
            .into_iter()
            .find(|(cell, ids)| ids.len() > 1 || self.is_occupied(*cell))
    }

    /// Runs interference resolution to a fixed point.
    ///
    /// Each pass collapses every move at one contested cell, so the loop
    /// ends after at most one pass per superposed move. Returns the ids
    /// collapsed, in order.
    fn resolve_interference<R: Rng>(&mut self, rng: &mut R) -> QuantumResult<Vec<MoveId>> {
        let mut collapsed = Vec::new();

        while let Some((site, contenders)) = self.next_interference_site() {
            debug!(%site, contenders = contenders.len(), "Resolving interference");

            for id in contenders {
                let index = self.index_of(id).ok_or_else(|| {
                    QuantumError::consistency_fault(format!("contending move {} vanished", id))
                })?;
                let mv = &self.moves[index];
                let free: Vec<Cell> = mv
                    .positions()
                    .into_iter()
                    .filter(|&cell| !self.is_occupied(cell))
                    .collect();

                let target = match free.as_slice() {
                    [] => {
                        return Err(QuantumError::consistency_fault(format!(
                            "move {} has no free cell left to collapse to",
                            mv
                        )));
                    }
                    [only] => *only,
                    _ if rng.random_bool(0.5) => site,
                    _ => mv.other_position(site).ok_or_else(|| {
                        QuantumError::consistency_fault(format!(
                            "move {} contends for {} without listing it",
                            mv, site
                        ))
                    })?,
                };

                self.moves[index].collapse_to(target)?;
                debug!(move_id = %id, %target, "Move collapsed");
                collapsed.push(id);
            }
        }

        if !collapsed.is_empty() {
            info!(count = collapsed.len(), "Interference resolved");
        }
        Ok(collapsed)
    }

    fn cloned(&self, ids: &[MoveId]) -> Vec<QuantumMove> {
        ids.iter()
            .filter_map(|&id| self.move_by_id(id).cloned())
            .collect()
    }

    /// Updates game-over and winner from the classical board.
    fn check_game_state(&mut self) -> QuantumResult<()> {
        if self.game_over {
            return Ok(());
        }
        let board = self.classical_board()?;

        if let Some(winner) = check_winner(&board) {
            info!(%winner, "Game won");
            self.game_over = true;
            self.winner = Some(winner);
            return Ok(());
        }

        let all_collapsed =
            !self.moves.is_empty() && self.moves.iter().all(QuantumMove::is_collapsed);
        if is_full(&board) || all_collapsed {
            info!(full = is_full(&board), all_collapsed, "Game drawn");
            self.game_over = true;
            self.winner = None;
        }
        Ok(())
    }

    fn verify(&self) -> QuantumResult<()> {
        BoardInvariants::check_all(self).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            QuantumError::consistency_fault(format!("postcondition failed: {}", descriptions))
        })
    }

    /// Projection onto collapsed moves.
    ///
    /// # Errors
    ///
    /// `InternalConsistencyFault` if two collapsed moves claim one cell.
    pub fn classical_board(&self) -> QuantumResult<ClassicalBoard> {
        let mut board = ClassicalBoard::new(self.size);
        for mv in &self.moves {
            if let Some(cell) = mv.collapsed_position() {
                if board.set(cell, mv.player()).is_some() {
                    return Err(QuantumError::consistency_fault(format!(
                        "two collapsed moves claim cell {}",
                        cell
                    )));
                }
            }
        }
        Ok(board)
    }

    /// Every cell each move currently occupies, for display.
    pub fn quantum_board(&self) -> BTreeMap<Cell, Vec<&QuantumMove>> {
        let mut map: BTreeMap<Cell, Vec<&QuantumMove>> = BTreeMap::new();
        for mv in &self.moves {
            for cell in mv.effective_positions() {
                map.entry(cell).or_default().push(mv);
            }
        }
        map
    }

    /// Cell adjacency induced by superposed moves.
    ///
    /// Every cell is present; each superposed move links its two candidates
    /// both ways.
    pub fn entanglement_graph(&self) -> BTreeMap<Cell, BTreeSet<Cell>> {
        let mut graph: BTreeMap<Cell, BTreeSet<Cell>> =
            Cell::all(self.size).map(|cell| (cell, BTreeSet::new())).collect();
        for mv in self.moves.iter().filter(|mv| !mv.is_collapsed()) {
            let [a, b] = mv.positions();
            graph.entry(a).or_default().insert(b);
            graph.entry(b).or_default().insert(a);
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuantumErrorKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn c(row: usize, col: usize) -> Cell {
        Cell::new(row, col)
    }

    #[test]
    fn test_boards_below_two_rejected() {
        for size in [0, 1] {
            let err = QuantumBoard::new(size).unwrap_err();
            assert!(matches!(err.kind, QuantumErrorKind::InvalidArgument(_)));
        }
        let board = QuantumBoard::new(2).expect("smallest playable size");
        assert_eq!(board.valid_moves().len(), 12);
    }

    #[test]
    fn test_disjoint_moves_stay_superposed() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut board = QuantumBoard::new(3).expect("valid size");
        let collapsed = board.make_move(c(0, 0), c(0, 1), &mut rng).expect("legal");
        assert!(collapsed.is_empty());
        let collapsed = board.make_move(c(1, 0), c(1, 1), &mut rng).expect("legal");
        assert!(collapsed.is_empty());

        assert_eq!(board.uncollapsed_moves().len(), 2);
        assert!(!board.is_game_over());

        let graph = board.entanglement_graph();
        assert_eq!(graph.len(), 9);
        assert_eq!(graph[&c(0, 0)], BTreeSet::from([c(0, 1)]));
        assert_eq!(graph[&c(0, 1)], BTreeSet::from([c(0, 0)]));
        assert_eq!(graph[&c(1, 0)], BTreeSet::from([c(1, 1)]));
        assert_eq!(graph[&c(1, 1)], BTreeSet::from([c(1, 0)]));
        let linked = graph.values().filter(|set| !set.is_empty()).count();
        assert_eq!(linked, 4);
    }

    #[test]
    fn test_shared_cell_collapses_both() {
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut board = QuantumBoard::new(3).expect("valid size");
            board.make_move(c(0, 0), c(0, 1), &mut rng).expect("legal");
            let collapsed = board.make_move(c(0, 1), c(0, 2), &mut rng).expect("legal");

            assert_eq!(collapsed.len(), 2, "seed {seed}");
            let x = board.move_by_id(MoveId(1)).expect("first move");
            let o = board.move_by_id(MoveId(2)).expect("second move");
            let (xc, oc) = (
                x.collapsed_position().expect("collapsed"),
                o.collapsed_position().expect("collapsed"),
            );
            assert!(x.positions().contains(&xc));
            assert!(o.positions().contains(&oc));
            assert_ne!(xc, oc, "seed {seed}");
        }
    }

    #[test]
    fn test_both_outcomes_reachable() {
        let mut first_wins_contested = false;
        let mut first_loses_contested = false;
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut board = QuantumBoard::new(3).expect("valid size");
            board.make_move(c(0, 0), c(0, 1), &mut rng).expect("legal");
            board.make_move(c(0, 1), c(0, 2), &mut rng).expect("legal");
            match board.move_by_id(MoveId(1)).and_then(QuantumMove::collapsed_position) {
                Some(cell) if cell == c(0, 1) => first_wins_contested = true,
                Some(_) => first_loses_contested = true,
                None => panic!("first move should collapse"),
            }
        }
        assert!(first_wins_contested && first_loses_contested);
    }

    #[test]
    fn test_same_pair_cycle_resolves_to_distinct_cells() {
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut board = QuantumBoard::new(3).expect("valid size");
            board.make_move(c(0, 0), c(1, 1), &mut rng).expect("legal");
            board.make_move(c(1, 1), c(0, 0), &mut rng).expect("legal");
            let classical = board.classical_board().expect("consistent");
            assert_eq!(classical.occupied_count(), 2);
        }
    }

    #[test]
    fn test_move_onto_collapsed_cell_rejected() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut board = QuantumBoard::new(3).expect("valid size");
        board.make_move(c(0, 0), c(0, 1), &mut rng).expect("legal");
        board.make_move(c(2, 2), c(2, 1), &mut rng).expect("legal");
        board.force_collapse(MoveId(1), c(0, 0), &mut rng).expect("legal collapse");

        let err = board.make_move(c(0, 0), c(1, 1), &mut rng).unwrap_err();
        assert!(matches!(err.kind, QuantumErrorKind::InvalidMove(_)));
        assert!(!board.is_valid_move(c(1, 1), c(0, 0)));
        // Superposed cells remain playable
        assert!(board.is_valid_move(c(2, 2), c(1, 1)));
    }

    #[test]
    fn test_invalid_move_shapes() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut board = QuantumBoard::new(3).expect("valid size");
        assert!(board.make_move(c(0, 0), c(0, 0), &mut rng).is_err());
        assert!(board.make_move(c(0, 0), c(3, 0), &mut rng).is_err());
        assert!(board.moves().is_empty());
        assert_eq!(board.current_player(), Player::X);
    }

    #[test]
    fn test_force_collapse_keeps_turn() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut board = QuantumBoard::new(3).expect("valid size");
        board.make_move(c(0, 0), c(0, 1), &mut rng).expect("legal");
        assert_eq!(board.current_player(), Player::O);
        let collapsed = board
            .force_collapse(MoveId(1), c(0, 1), &mut rng)
            .expect("legal collapse");
        assert_eq!(collapsed.len(), 1);
        assert_eq!(collapsed[0].id(), MoveId(1));
        assert_eq!(board.current_player(), Player::O);
    }

    #[test]
    fn test_force_collapse_rejections_leave_state() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut board = QuantumBoard::new(3).expect("valid size");
        board.make_move(c(0, 0), c(0, 1), &mut rng).expect("legal");
        board.make_move(c(1, 0), c(1, 1), &mut rng).expect("legal");
        let before = board.clone();

        for (id, cell) in [
            (MoveId(1), c(2, 2)),
            (MoveId(9), c(0, 0)),
            (MoveId(0), c(0, 0)),
        ] {
            let err = board.force_collapse(id, cell, &mut rng).unwrap_err();
            assert!(matches!(err.kind, QuantumErrorKind::InvalidMove(_)));
        }
        assert_eq!(board, before);

        board.force_collapse(MoveId(2), c(1, 0), &mut rng).expect("legal");
        assert!(board.force_collapse(MoveId(2), c(1, 1), &mut rng).is_err());
    }

    #[test]
    fn test_all_collapsed_is_draw() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut board = QuantumBoard::new(3).expect("valid size");
        board.make_move(c(0, 0), c(0, 1), &mut rng).expect("legal");
        board.force_collapse(MoveId(1), c(0, 0), &mut rng).expect("legal");
        assert!(board.is_game_over());
        assert_eq!(board.winner(), None);
        assert!(board.make_move(c(1, 1), c(2, 2), &mut rng).is_err());
    }

    #[test]
    fn test_stacked_collapse_is_fault_not_panic() {
        let mut board = QuantumBoard::new(3).expect("valid size");
        for (id, player) in [(1, Player::X), (2, Player::O)] {
            let mut mv = QuantumMove::new(c(0, 0), c(0, 1), player, MoveId(id)).expect("valid");
            mv.collapse_to(c(0, 0)).expect("candidate");
            board.moves.push(mv);
        }

        let err = board.classical_board().unwrap_err();
        assert!(matches!(err.kind, QuantumErrorKind::InternalConsistencyFault(_)));
        let err = board.verify().unwrap_err();
        assert!(matches!(err.kind, QuantumErrorKind::InternalConsistencyFault(_)));
    }

    #[test]
    fn test_quantum_board_and_counts() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut board = QuantumBoard::new(3).expect("valid size");
        board.make_move(c(0, 0), c(0, 1), &mut rng).expect("legal");
        board.make_move(c(1, 1), c(2, 2), &mut rng).expect("legal");

        let quantum = board.quantum_board();
        assert_eq!(quantum.len(), 4);
        assert_eq!(quantum[&c(0, 0)][0].id(), MoveId(1));
        assert_eq!(board.superposition_count(c(1, 1)), 1);
        assert_eq!(board.superposition_count(c(2, 0)), 0);
        assert_eq!(board.moves_at(c(2, 2)).len(), 1);
    }

    #[test]
    fn test_valid_moves_empty_board() {
        let board = QuantumBoard::new(3).expect("valid size");
        let moves = board.valid_moves();
        assert_eq!(moves.len(), 72);
        assert!(moves.iter().all(|(a, b)| a != b));
        assert_eq!(moves[0], (c(0, 0), c(0, 1)));
    }

    #[test]
    fn test_valid_moves_skip_collapsed_cells() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut board = QuantumBoard::new(3).expect("valid size");
        board.make_move(c(0, 0), c(0, 1), &mut rng).expect("legal");
        board.make_move(c(1, 1), c(2, 2), &mut rng).expect("legal");
        board.force_collapse(MoveId(1), c(0, 0), &mut rng).expect("legal");
        assert_eq!(board.valid_moves().len(), 8 * 7);
    }
}
