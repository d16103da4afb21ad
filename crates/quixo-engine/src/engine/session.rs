use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    MoveError,
    core::{Move, PlayerId},
};

use super::{GameState, Player};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    AwaitingMove(PlayerId),
    Finished(PlayerId),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum number of rejected proposals tolerated in a single turn.
    ///
    /// `None` keeps asking forever.
    pub max_retries_per_turn: Option<u32>,
    /// Accepted moves after which an undecided game is abandoned.
    ///
    /// `None` plays until someone wins.
    pub max_moves: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SessionError {
    #[display("player {player} proposed {attempts} illegal moves in a row")]
    RetryLimitExceeded { player: PlayerId, attempts: u32 },
    #[display("no winner after {moves} moves")]
    MoveLimitReached { moves: usize },
}

/// Per-player move counters for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    accepted_moves: [usize; 2],
    rejected_moves: [usize; 2],
}

impl SessionStats {
    #[must_use]
    pub fn accepted_moves(&self, player: PlayerId) -> usize {
        self.accepted_moves[player.index()]
    }

    #[must_use]
    pub fn rejected_moves(&self, player: PlayerId) -> usize {
        self.rejected_moves[player.index()]
    }

    #[must_use]
    pub fn total_accepted_moves(&self) -> usize {
        self.accepted_moves.iter().sum()
    }
}

/// A single game between two players.
///
/// The session owns the canonical board and is the only thing that mutates it.
#[derive(Debug, Clone)]
pub struct GameSession {
    game_state: GameState,
    session_state: SessionState,
    config: SessionConfig,
    stats: SessionStats,
    history: Vec<(PlayerId, Move)>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    #[must_use]
    pub fn new() -> Self {
        Self::from_state(GameState::new())
    }

    #[must_use]
    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::new()
        }
    }

    /// Starts a session from an arbitrary position.
    ///
    /// A position that already has a winner yields a finished session.
    #[must_use]
    pub fn from_state(game_state: GameState) -> Self {
        let session_state = match game_state.winner() {
            Some(winner) => SessionState::Finished(winner),
            None => SessionState::AwaitingMove(game_state.current_player()),
        };
        Self {
            game_state,
            session_state,
            config: SessionConfig::default(),
            stats: SessionStats::default(),
            history: vec![],
        }
    }

    #[must_use]
    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Accepted moves in play order.
    #[must_use]
    pub fn history(&self) -> &[(PlayerId, Move)] {
        &self.history
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        match self.session_state {
            SessionState::Finished(winner) => Some(winner),
            SessionState::AwaitingMove(_) => None,
        }
    }

    /// Asks `player` for one move on behalf of the player to move.
    ///
    /// An accepted move is applied, recorded and followed by a winner check. A
    /// rejected move leaves the game as it was and is returned as the error. Once
    /// the session is finished this does nothing and `player` is not consulted.
    pub fn step(&mut self, player: &mut dyn Player) -> Result<SessionState, MoveError> {
        let SessionState::AwaitingMove(mover) = self.session_state else {
            return Ok(self.session_state);
        };
        let mv = player.make_move(&self.game_state);
        let mut board = *self.game_state.board();
        if let Err(e) = board.apply_move(mv, mover) {
            self.stats.rejected_moves[mover.index()] += 1;
            trace!(player = %mover, %mv, error = %e, "move rejected");
            return Err(e);
        }
        self.stats.accepted_moves[mover.index()] += 1;
        self.history.push((mover, mv));
        self.game_state = GameState::from_parts(board, mover.opponent());
        self.session_state = match board.winner() {
            Some(winner) => {
                debug!(
                    %winner,
                    moves = self.stats.total_accepted_moves(),
                    "game finished"
                );
                SessionState::Finished(winner)
            }
            None => SessionState::AwaitingMove(mover.opponent()),
        };
        Ok(self.session_state)
    }

    /// Plays until someone wins, `first` seated as player 0 and `second` as player 1.
    ///
    /// Stops early with an error when either limit of the [`SessionConfig`] is hit.
    pub fn play<'a>(
        &mut self,
        first: &'a mut dyn Player,
        second: &'a mut dyn Player,
    ) -> Result<PlayerId, SessionError> {
        let mut attempts = 0;
        loop {
            let mover = match self.session_state {
                SessionState::Finished(winner) => return Ok(winner),
                SessionState::AwaitingMove(mover) => mover,
            };
            let player = match mover {
                PlayerId::Zero => &mut *first,
                PlayerId::One => &mut *second,
            };
            if self.step(player).is_ok() {
                attempts = 0;
                let moves = self.stats.total_accepted_moves();
                if self.session_state.is_awaiting_move()
                    && self.config.max_moves.is_some_and(|limit| moves >= limit)
                {
                    debug!(moves, "move limit reached");
                    return Err(SessionError::MoveLimitReached { moves });
                }
                continue;
            }
            attempts += 1;
            if self
                .config
                .max_retries_per_turn
                .is_some_and(|limit| attempts > limit)
            {
                return Err(SessionError::RetryLimitExceeded {
                    player: mover,
                    attempts,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use crate::{Board, Cell, SlideDirection};

    use super::*;

    /// Plays a fixed list of moves, then repeats the last one.
    struct Scripted {
        moves: VecDeque<Move>,
        last: Move,
        calls: usize,
    }

    impl Scripted {
        fn new(moves: &[(u8, u8, SlideDirection)]) -> Self {
            let moves: VecDeque<Move> = moves
                .iter()
                .map(|(r, c, d)| Move::new(Cell::new(*r, *c).unwrap(), *d))
                .collect();
            let last = *moves.back().unwrap();
            Self {
                moves,
                last,
                calls: 0,
            }
        }
    }

    impl Player for Scripted {
        fn make_move(&mut self, _state: &GameState) -> Move {
            self.calls += 1;
            self.moves.pop_front().unwrap_or(self.last)
        }
    }

    #[test]
    fn test_first_mover_is_player_zero() {
        let session = GameSession::new();
        assert_eq!(
            session.session_state(),
            SessionState::AwaitingMove(PlayerId::Zero)
        );
        assert!(session.session_state().is_awaiting_move());
    }

    #[test]
    fn test_rejected_move_retries_same_player() {
        use SlideDirection::{Bottom, Right, Top};
        let mut session = GameSession::new();
        // interior cell, then an illegal corner direction, then a legal move
        let mut zero = Scripted::new(&[(2, 2, Right), (0, 0, Top), (0, 0, Bottom)]);

        assert!(session.step(&mut zero).is_err());
        assert!(session.step(&mut zero).is_err());
        assert_eq!(*session.game_state(), GameState::new());
        assert_eq!(
            session.step(&mut zero),
            Ok(SessionState::AwaitingMove(PlayerId::One))
        );

        assert_eq!(session.stats().rejected_moves(PlayerId::Zero), 2);
        assert_eq!(session.stats().accepted_moves(PlayerId::Zero), 1);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.game_state().current_player(), PlayerId::One);
    }

    #[test]
    fn test_play_until_row_completed() {
        use SlideDirection::{Left, Right};
        // Player 0 keeps pushing its bottom-left corner to the right end of row 4,
        // player 1 does the same with the top-right corner in row 0.
        let mut zero = Scripted::new(&[(4, 0, Right)]);
        let mut one = Scripted::new(&[(0, 4, Left)]);
        let mut session = GameSession::new();
        let winner = session.play(&mut zero, &mut one).unwrap();

        assert_eq!(winner, PlayerId::Zero);
        assert!(session.session_state().is_finished());
        assert_eq!(session.winner(), Some(PlayerId::Zero));
        assert_eq!(session.stats().accepted_moves(PlayerId::Zero), 5);
        assert_eq!(session.stats().accepted_moves(PlayerId::One), 4);
        assert_eq!(session.stats().rejected_moves(PlayerId::Zero), 0);
        assert_eq!(session.history().len(), 9);
        assert_eq!(session.history()[1].0, PlayerId::One);
        assert_eq!(
            session.game_state().board().to_string(),
            "1111.\n.....\n.....\n.....\n00000"
        );
    }

    #[test]
    fn test_retry_limit() {
        use SlideDirection::Right;
        let config = SessionConfig {
            max_retries_per_turn: Some(3),
            ..SessionConfig::default()
        };
        let mut session = GameSession::with_config(config);
        let mut stuck = Scripted::new(&[(2, 2, Right)]);
        let mut other = Scripted::new(&[(2, 2, Right)]);
        let err = session.play(&mut stuck, &mut other).unwrap_err();
        assert_eq!(
            err,
            SessionError::RetryLimitExceeded {
                player: PlayerId::Zero,
                attempts: 4
            }
        );
        assert_eq!(stuck.calls, 4);
        assert_eq!(other.calls, 0);
    }

    #[test]
    fn test_move_limit() {
        use SlideDirection::{Left, Right};
        let config = SessionConfig {
            max_moves: Some(3),
            ..SessionConfig::default()
        };
        let mut zero = Scripted::new(&[(4, 0, Right)]);
        let mut one = Scripted::new(&[(0, 4, Left)]);
        let mut session = GameSession::with_config(config);
        let err = session.play(&mut zero, &mut one).unwrap_err();
        assert_eq!(err, SessionError::MoveLimitReached { moves: 3 });
        assert_eq!(session.history().len(), 3);
        assert!(session.session_state().is_awaiting_move());

        // the ninth move wins, so a limit of nine still yields the winner
        let config = SessionConfig {
            max_moves: Some(9),
            ..SessionConfig::default()
        };
        let mut zero = Scripted::new(&[(4, 0, Right)]);
        let mut one = Scripted::new(&[(0, 4, Left)]);
        let mut session = GameSession::with_config(config);
        assert_eq!(session.play(&mut zero, &mut one), Ok(PlayerId::Zero));
    }

    #[test]
    fn test_finished_session_ignores_players() {
        let board: Board = "1....\n.1...\n..1..\n...1.\n....1".parse().unwrap();
        let mut session = GameSession::from_state(GameState::from_parts(board, PlayerId::Zero));
        let mut zero = Scripted::new(&[(0, 0, SlideDirection::Bottom)]);
        let mut one = Scripted::new(&[(0, 0, SlideDirection::Bottom)]);
        assert_eq!(session.play(&mut zero, &mut one), Ok(PlayerId::One));
        assert_eq!(
            session.step(&mut zero),
            Ok(SessionState::Finished(PlayerId::One))
        );
        assert_eq!(zero.calls, 0);
        assert_eq!(one.calls, 0);
    }

    #[test]
    fn test_stats_serialize() {
        let stats = SessionStats {
            accepted_moves: [3, 2],
            rejected_moves: [1, 0],
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(json, r#"{"accepted_moves":[3,2],"rejected_moves":[1,0]}"#);
    }
}
