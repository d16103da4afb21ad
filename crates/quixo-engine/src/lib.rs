//! Quixo rules engine.
//!
//! Quixo is played on a 5×5 board of cubes. On each turn a player picks up a
//! cube from the border that is neutral or already shows their own mark, turns
//! it to their mark and pushes it back in at the far end of its row or column,
//! shifting the intervening cubes one step. The first player to complete a row,
//! column or diagonal of five wins.
//!
//! - [`core`] holds the value types: [`Board`], [`Cell`], [`SlideDirection`], [`Move`]
//!   and [`PlayerId`].
//! - [`engine`] holds the turn-taking layer: [`GameState`], the [`Player`] trait and
//!   [`GameSession`].
//!
//! # Example
//!
//! ```
//! use quixo_engine::{Board, Cell, Move, PlayerId, SlideDirection};
//!
//! let mut board = Board::EMPTY;
//! let mv = Move::new(Cell::new(0, 0).unwrap(), SlideDirection::Right);
//! board.apply_move(mv, PlayerId::Zero).unwrap();
//!
//! assert_eq!(board.get(Cell::new(0, 4).unwrap()), Some(PlayerId::Zero));
//! assert_eq!(board.winner(), None);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Reason a take, slide or combined move was rejected.
///
/// Rejections are ordinary control flow: the session simply asks the same player again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    #[display("cell {cell} is not on the board border")]
    NotOnBorder { cell: Cell },
    #[display("cell {cell} is held by the opponent")]
    OccupiedByOpponent { cell: Cell },
    #[display("cannot slide cell {cell} towards {direction}")]
    IllegalDirection {
        cell: Cell,
        direction: SlideDirection,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid player id {value}, expected 0 or 1")]
pub struct InvalidPlayerIdError {
    pub value: u8,
}
