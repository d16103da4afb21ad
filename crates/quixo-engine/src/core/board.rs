use std::{fmt, str::FromStr};

use arrayvec::ArrayVec;

use crate::MoveError;

use super::{BOARD_SIZE, Cell, LINE_COUNT, MAX_LEGAL_MOVES, Move, PlayerId, SlideDirection};

const LAST: usize = BOARD_SIZE - 1;

/// Every winnable line in scan order: rows top to bottom, columns left to right,
/// the main diagonal and finally the anti-diagonal.
#[allow(clippy::cast_possible_truncation)]
pub const LINES: [[Cell; BOARD_SIZE]; LINE_COUNT] = {
    let mut lines = [[Cell::new_unchecked(0, 0); BOARD_SIZE]; LINE_COUNT];
    let mut i = 0;
    while i < BOARD_SIZE {
        let mut j = 0;
        while j < BOARD_SIZE {
            lines[i][j] = Cell::new_unchecked(i as u8, j as u8);
            lines[BOARD_SIZE + i][j] = Cell::new_unchecked(j as u8, i as u8);
            j += 1;
        }
        lines[2 * BOARD_SIZE][i] = Cell::new_unchecked(i as u8, i as u8);
        lines[2 * BOARD_SIZE + 1][i] = Cell::new_unchecked(i as u8, (LAST - i) as u8);
        i += 1;
    }
    lines
};

/// The 5×5 Quixo board.
///
/// Each cell is either neutral (`None`) or marked by a player. `Board` is a small
/// `Copy` value: every hypothetical exploration (legality probing, search, fitness
/// games) works on its own copy, so the board owned by a [`GameSession`](crate::GameSession)
/// is only ever changed by the session itself.
///
/// # Example
///
/// ```
/// use quixo_engine::{Board, Cell, Move, PlayerId, SlideDirection};
///
/// let board: Board = "
///     0000.
///     .....
///     .....
///     .....
///     .....
/// "
/// .parse()
/// .unwrap();
///
/// let mv = Move::new(Cell::new(0, 4).unwrap(), SlideDirection::Bottom);
/// let next = board.with_move(mv, PlayerId::Zero).unwrap();
/// assert_eq!(next.winner(), None);
///
/// let mv = Move::new(Cell::new(0, 4).unwrap(), SlideDirection::Left);
/// let next = board.with_move(mv, PlayerId::Zero).unwrap();
/// assert_eq!(next.winner(), Some(PlayerId::Zero));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Option<PlayerId>; BOARD_SIZE]; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const EMPTY: Self = Self {
        cells: [[None; BOARD_SIZE]; BOARD_SIZE],
    };

    #[must_use]
    pub const fn get(&self, cell: Cell) -> Option<PlayerId> {
        self.cells[cell.row()][cell.col()]
    }

    fn set(&mut self, cell: Cell, value: Option<PlayerId>) {
        self.cells[cell.row()][cell.col()] = value;
    }

    /// Returns the rows of the board, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<PlayerId>; BOARD_SIZE]> {
        self.cells.iter()
    }

    /// Returns the contents of every line in [`LINES`] order.
    pub fn lines(&self) -> impl Iterator<Item = [Option<PlayerId>; BOARD_SIZE]> + '_ {
        LINES.iter().map(|line| line.map(|cell| self.get(cell)))
    }

    /// Counts the cells holding `value`.
    #[must_use]
    pub fn count(&self, value: Option<PlayerId>) -> usize {
        self.cells.iter().flatten().filter(|v| **v == value).count()
    }

    /// Claims a border cell for `player`.
    ///
    /// Fails without touching the board when the cell is not on the border or is
    /// held by the opponent.
    pub fn take(&mut self, cell: Cell, player: PlayerId) -> Result<(), MoveError> {
        if !cell.is_border() {
            return Err(MoveError::NotOnBorder { cell });
        }
        if self.get(cell) == Some(player.opponent()) {
            return Err(MoveError::OccupiedByOpponent { cell });
        }
        self.set(cell, Some(player));
        Ok(())
    }

    /// Pushes the piece at `cell` to the edge named by `direction`.
    ///
    /// Every piece between the origin and that edge shifts one step towards the
    /// vacated origin. Fails without touching the board when the cell's border
    /// class does not allow the direction.
    pub fn slide(&mut self, cell: Cell, direction: SlideDirection) -> Result<(), MoveError> {
        if !cell.border_class().allows(direction) {
            return Err(MoveError::IllegalDirection { cell, direction });
        }
        let piece = self.get(cell);
        let (row, col) = (cell.row(), cell.col());
        match direction {
            SlideDirection::Top => {
                for r in (1..=row).rev() {
                    self.cells[r][col] = self.cells[r - 1][col];
                }
                self.cells[0][col] = piece;
            }
            SlideDirection::Bottom => {
                for r in row..LAST {
                    self.cells[r][col] = self.cells[r + 1][col];
                }
                self.cells[LAST][col] = piece;
            }
            SlideDirection::Left => {
                self.cells[row].copy_within(0..col, 1);
                self.cells[row][0] = piece;
            }
            SlideDirection::Right => {
                self.cells[row].copy_within(col + 1.., col);
                self.cells[row][LAST] = piece;
            }
        }
        Ok(())
    }

    /// Applies a full move (take, then slide) for `player`.
    ///
    /// The move is transactional: if either step fails the board is left exactly as
    /// it was, including the cell that would have been taken.
    pub fn apply_move(&mut self, mv: Move, player: PlayerId) -> Result<(), MoveError> {
        let mut next = *self;
        next.take(mv.cell(), player)?;
        next.slide(mv.cell(), mv.direction())?;
        *self = next;
        Ok(())
    }

    /// Returns a copy of the board with `mv` applied, or `None` if the move is illegal.
    #[must_use]
    pub fn with_move(&self, mv: Move, player: PlayerId) -> Option<Self> {
        let mut next = *self;
        next.apply_move(mv, player).ok()?;
        Some(next)
    }

    #[must_use]
    pub fn is_legal(&self, mv: Move, player: PlayerId) -> bool {
        self.with_move(mv, player).is_some()
    }

    /// Returns every legal move for `player`, in [`Move::candidates`] order.
    #[must_use]
    pub fn legal_moves(&self, player: PlayerId) -> ArrayVec<Move, MAX_LEGAL_MOVES> {
        Move::candidates()
            .filter(|mv| self.is_legal(*mv, player))
            .collect()
    }

    /// Returns the owner of the first completed line, if any.
    ///
    /// Lines are scanned in [`LINES`] order. Lines of neutral cells never count.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.lines().find_map(|line| {
            let first = line[0]?;
            line.iter().all(|v| *v == Some(first)).then_some(first)
        })
    }

    /// Serializes the board row-major as 25 characters of `.`, `0` and `1`.
    ///
    /// Used as the state key of the reinforcement learning table.
    #[must_use]
    pub fn state_key(&self) -> String {
        self.cells.iter().flatten().map(|v| cell_symbol(*v)).collect()
    }
}

fn cell_symbol(value: Option<PlayerId>) -> char {
    value.map_or('.', PlayerId::symbol)
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for value in row {
                write!(f, "{}", cell_symbol(*value))?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("expected 5 rows, got {rows}")]
    RowCount { rows: usize },
    #[display("row {row}: expected 5 cells, got {cells}")]
    RowLength { row: usize, cells: usize },
    #[display("row {row}: unexpected character {ch:?}")]
    InvalidCharacter { row: usize, ch: char },
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parses five non-empty lines of `.`, `0` and `1`.
    ///
    /// Surrounding whitespace on each line is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        if rows.len() != BOARD_SIZE {
            return Err(ParseBoardError::RowCount { rows: rows.len() });
        }
        let mut board = Self::EMPTY;
        for (row, line) in rows.iter().enumerate() {
            let cells = line.chars().count();
            if cells != BOARD_SIZE {
                return Err(ParseBoardError::RowLength { row, cells });
            }
            for (col, ch) in line.chars().enumerate() {
                board.cells[row][col] = match ch {
                    '.' => None,
                    '0' => Some(PlayerId::Zero),
                    '1' => Some(PlayerId::One),
                    _ => return Err(ParseBoardError::InvalidCharacter { row, ch }),
                };
            }
        }
        Ok(board)
    }
}
