//! Turn-taking on top of the board rules.
//!
//! - [`GameState`] - Immutable snapshot handed to players (board + player to move)
//! - [`Player`] - Anything that can propose a move for a snapshot
//! - [`GameSession`] - Drives two players to a finished game, validating every proposal
//!
//! # Game Flow
//!
//! 1. The session starts on the empty board with player 0 to move
//! 2. The current player proposes a [`Move`](crate::Move)
//! 3. Illegal proposals are rejected and the same player is asked again
//! 4. Accepted moves are applied and the board is checked for a winner
//! 5. The turn passes to the opponent until a winner appears
//!
//! # Example
//!
//! ```
//! use quixo_engine::{Board, GameSession, GameState, Move, Player, PlayerId};
//!
//! /// Plays a winning move when one exists, otherwise the first legal move.
//! struct Greedy;
//!
//! impl Player for Greedy {
//!     fn make_move(&mut self, state: &GameState) -> Move {
//!         let me = state.current_player();
//!         let moves = state.legal_moves();
//!         moves
//!             .iter()
//!             .copied()
//!             .find(|mv| state.after(*mv).is_some_and(|next| next.winner() == Some(me)))
//!             .unwrap_or(moves[0])
//!     }
//! }
//!
//! let board: Board = "0000.\n.....\n.....\n.....\n.....".parse().unwrap();
//! let mut session = GameSession::from_state(GameState::from_parts(board, PlayerId::Zero));
//! let winner = session.play(&mut Greedy, &mut Greedy).unwrap();
//! assert_eq!(winner, PlayerId::Zero);
//! assert_eq!(session.history().len(), 1);
//! ```

pub use self::{game_state::*, player::*, session::*};

mod game_state;
mod player;
mod session;
