use std::iter;

use quixo_engine::{BOARD_SIZE, Board, LINE_COUNT, PlayerId};

/// Per-line piece counts of a board, seen from one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineStats {
    own: [u8; LINE_COUNT],
    opponent: [u8; LINE_COUNT],
}

/// Ranking key of the positional heuristic, compared as `(score, near_complete)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PositionalScore {
    pub score: u32,
    pub near_complete: usize,
}

impl LineStats {
    #[must_use]
    pub fn of(board: &Board, player: PlayerId) -> Self {
        let mut own = [0; LINE_COUNT];
        let mut opponent = [0; LINE_COUNT];
        for ((line, own), opponent) in iter::zip(iter::zip(board.lines(), &mut own), &mut opponent)
        {
            for value in line.into_iter().flatten() {
                if value == player {
                    *own += 1;
                } else {
                    *opponent += 1;
                }
            }
        }
        Self { own, opponent }
    }

    #[must_use]
    pub fn own(&self) -> &[u8; LINE_COUNT] {
        &self.own
    }

    #[must_use]
    pub fn opponent(&self) -> &[u8; LINE_COUNT] {
        &self.opponent
    }

    /// Lines holding four own pieces and no opponent piece.
    #[must_use]
    pub fn near_complete_lines(&self) -> usize {
        iter::zip(self.own, self.opponent)
            .filter(|(own, opponent)| usize::from(*own) == BOARD_SIZE - 1 && *opponent == 0)
            .count()
    }

    /// Sum of the squared own-piece counts over every line.
    #[must_use]
    pub fn square_sum(&self) -> u32 {
        self.own.iter().map(|n| u32::from(*n).pow(2)).sum()
    }

    /// Any near-complete line dominates every position without one.
    #[must_use]
    pub fn positional_score(&self) -> PositionalScore {
        let near_complete = self.near_complete_lines();
        let score = if near_complete > 0 {
            u32::MAX
        } else {
            self.square_sum()
        };
        PositionalScore {
            score,
            near_complete,
        }
    }

    /// Square sum scaled by the number of near-complete lines.
    ///
    /// One near-complete line multiplies by 1.5, `n >= 2` lines by `n`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn weighted_score(&self) -> f64 {
        let factor = match self.near_complete_lines() {
            0 => 1.0,
            1 => 1.5,
            n => n as f64,
        };
        f64::from(self.square_sum()) * factor
    }
}
