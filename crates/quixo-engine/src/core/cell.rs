use serde::{Deserialize, Serialize};

use super::{BOARD_SIZE, SlideDirection};

#[allow(clippy::cast_possible_truncation)]
const LAST: u8 = (BOARD_SIZE - 1) as u8;

/// A coordinate on the board, `row` and `col` both in `0..5`.
///
/// Row 0 is the top edge and column 0 the left edge.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("({row}, {col})")]
pub struct Cell {
    row: u8,
    col: u8,
}

impl Cell {
    /// Creates a cell, or `None` if either coordinate is off the board.
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row > LAST || col > LAST {
            return None;
        }
        Some(Self { row, col })
    }

    pub(crate) const fn new_unchecked(row: u8, col: u8) -> Self {
        debug_assert!(row <= LAST && col <= LAST);
        Self { row, col }
    }

    /// Returns every cell in row-major order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..=LAST).flat_map(|row| (0..=LAST).map(move |col| Self { row, col }))
    }

    #[must_use]
    pub const fn row(self) -> usize {
        self.row as usize
    }

    #[must_use]
    pub const fn col(self) -> usize {
        self.col as usize
    }

    #[must_use]
    pub const fn is_border(self) -> bool {
        !matches!(self.border_class(), BorderClass::Interior)
    }

    #[must_use]
    pub const fn is_corner(self) -> bool {
        matches!(
            self.border_class(),
            BorderClass::TopLeft
                | BorderClass::TopRight
                | BorderClass::BottomLeft
                | BorderClass::BottomRight
        )
    }

    #[must_use]
    pub const fn border_class(self) -> BorderClass {
        let top = self.row == 0;
        let bottom = self.row == LAST;
        let left = self.col == 0;
        let right = self.col == LAST;
        match (top, bottom, left, right) {
            (true, _, true, _) => BorderClass::TopLeft,
            (true, _, _, true) => BorderClass::TopRight,
            (_, true, true, _) => BorderClass::BottomLeft,
            (_, true, _, true) => BorderClass::BottomRight,
            (true, ..) => BorderClass::Top,
            (_, true, ..) => BorderClass::Bottom,
            (_, _, true, _) => BorderClass::Left,
            (_, _, _, true) => BorderClass::Right,
            _ => BorderClass::Interior,
        }
    }
}

/// Position class of a cell with respect to the board border.
///
/// Slide legality depends only on the class of the picked-up cell, see
/// [`BorderClass::allows`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BorderClass {
    Interior,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    Bottom,
    Left,
    Right,
}

// Rows follow `BorderClass` declaration order, columns follow `SlideDirection::ALL`
// (top, bottom, left, right). A piece may be pushed to any edge it is not already on.
const SLIDE_TABLE: [[bool; 4]; 9] = [
    [false, false, false, false], // interior
    [false, true, false, true],   // top-left corner
    [false, true, true, false],   // top-right corner
    [true, false, false, true],   // bottom-left corner
    [true, false, true, false],   // bottom-right corner
    [false, true, true, true],    // top edge
    [true, false, true, true],    // bottom edge
    [true, true, false, true],    // left edge
    [true, true, true, false],    // right edge
];

impl BorderClass {
    /// Returns whether a piece taken from a cell of this class may be slid towards `direction`.
    #[must_use]
    pub const fn allows(self, direction: SlideDirection) -> bool {
        SLIDE_TABLE[self as usize][direction as usize]
    }
}
