use arrayvec::ArrayVec;

use crate::core::{Board, MAX_LEGAL_MOVES, Move, PlayerId};

/// Snapshot of a game: the board and the player to move.
///
/// Players receive a shared reference to this value and explore hypothetical
/// continuations through [`GameState::after`], which returns a fresh copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameState {
    board: Board,
    current_player: PlayerId,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Empty board, player 0 to move.
    #[must_use]
    pub const fn new() -> Self {
        Self::from_parts(Board::EMPTY, PlayerId::Zero)
    }

    #[must_use]
    pub const fn from_parts(board: Board, current_player: PlayerId) -> Self {
        Self {
            board,
            current_player,
        }
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub const fn current_player(&self) -> PlayerId {
        self.current_player
    }

    #[must_use]
    pub fn legal_moves(&self) -> ArrayVec<Move, MAX_LEGAL_MOVES> {
        self.board.legal_moves(self.current_player)
    }

    #[must_use]
    pub fn is_legal(&self, mv: Move) -> bool {
        self.board.is_legal(mv, self.current_player)
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.board.winner()
    }

    /// Applies `mv` for the player to move and passes the turn.
    ///
    /// Returns `None` if the move is illegal.
    #[must_use]
    pub fn after(&self, mv: Move) -> Option<Self> {
        let board = self.board.with_move(mv, self.current_player)?;
        Some(Self::from_parts(board, self.current_player.opponent()))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Cell, SlideDirection};

    use super::*;

    #[test]
    fn test_after_passes_turn() {
        let state = GameState::new();
        let mv = Move::new(Cell::new(0, 0).unwrap(), SlideDirection::Right);
        let next = state.after(mv).unwrap();
        assert_eq!(next.current_player(), PlayerId::One);
        assert_eq!(
            next.board().get(Cell::new(0, 4).unwrap()),
            Some(PlayerId::Zero)
        );
        // the original snapshot is untouched
        assert_eq!(state, GameState::new());
    }

    #[test]
    fn test_after_rejects_illegal_move() {
        let state = GameState::new();
        let mv = Move::new(Cell::new(0, 0).unwrap(), SlideDirection::Top);
        assert!(!state.is_legal(mv));
        assert_eq!(state.after(mv), None);
    }
}
