//! Rule-based and search-based Quixo players.
//!
//! - [`RandomPlayer`] - uniformly random legal moves
//! - [`OptimalPlayer`] - one-ply lookahead with a line-count heuristic
//! - [`MinMaxPlayer`] - depth-limited alpha-beta search over the same heuristic
//!
//! All players own a seeded [`rand_pcg::Pcg32`], so a given seed always yields the
//! same game against the same opponent.

pub use self::{line_stats::*, minmax::*, optimal::*, random::*};

mod line_stats;
mod minmax;
mod optimal;
mod random;
