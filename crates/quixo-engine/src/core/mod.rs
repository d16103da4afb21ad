pub use self::{board::*, cell::*, direction::*, moves::*, player_id::*};

pub(crate) mod board;
pub(crate) mod cell;
pub(crate) mod direction;
pub(crate) mod moves;
pub(crate) mod player_id;

/// Side length of the square board.
pub const BOARD_SIZE: usize = 5;

/// Number of winnable lines: 5 rows, 5 columns and the two diagonals.
pub const LINE_COUNT: usize = 2 * BOARD_SIZE + 2;

/// Number of structurally legal moves (4 corners × 2 + 12 edge cells × 3).
///
/// This is also the size of the legal move set on the empty board, and an upper
/// bound on it for every other position.
pub const MAX_LEGAL_MOVES: usize = 44;
