use serde::{Deserialize, Serialize};

use super::{Cell, SlideDirection};

/// A move: the border cell to pick up and the edge to push it to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{cell} {direction}")]
pub struct Move {
    cell: Cell,
    direction: SlideDirection,
}

impl Move {
    #[must_use]
    pub const fn new(cell: Cell, direction: SlideDirection) -> Self {
        Self { cell, direction }
    }

    #[must_use]
    pub const fn cell(self) -> Cell {
        self.cell
    }

    #[must_use]
    pub const fn direction(self) -> SlideDirection {
        self.direction
    }

    /// Returns all 100 (cell, direction) pairs, legal or not.
    ///
    /// Cells are visited in row-major order and, for each cell, directions in
    /// [`SlideDirection::ALL`] order.
    pub fn candidates() -> impl Iterator<Item = Self> {
        Cell::all().flat_map(|cell| {
            SlideDirection::ALL
                .into_iter()
                .map(move |direction| Self::new(cell, direction))
        })
    }
}
