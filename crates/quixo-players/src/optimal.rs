use arrayvec::ArrayVec;
use quixo_engine::{Board, GameState, MAX_LEGAL_MOVES, Move, Player, PlayerId};
use rand::{SeedableRng, seq::IndexedRandom};
use rand_pcg::Pcg32;
use tracing::trace;

use crate::{
    line_stats::{LineStats, PositionalScore},
    random::random_legal_move,
};

/// Returns the first legal move (in enumeration order) after which `player` has won.
#[must_use]
pub fn find_winning_move(board: &Board, player: PlayerId) -> Option<Move> {
    board
        .legal_moves(player)
        .into_iter()
        .find(|mv| board.with_move(*mv, player).and_then(|b| b.winner()) == Some(player))
}

/// Returns the legal moves after which the opponent has won or can win with one move.
#[must_use]
pub fn find_losing_moves(board: &Board, player: PlayerId) -> ArrayVec<Move, MAX_LEGAL_MOVES> {
    let opponent = player.opponent();
    board
        .legal_moves(player)
        .into_iter()
        .filter(|mv| {
            let Some(next) = board.with_move(*mv, player) else {
                return false;
            };
            match next.winner() {
                Some(winner) => winner == opponent,
                None => find_winning_move(&next, opponent).is_some(),
            }
        })
        .collect()
}

/// Returns the legal moves outside `excluded` sharing the highest positional score.
#[must_use]
pub fn best_moves(
    board: &Board,
    player: PlayerId,
    excluded: &[Move],
) -> ArrayVec<Move, MAX_LEGAL_MOVES> {
    let mut best_score = None;
    let mut best = ArrayVec::new();
    for mv in board.legal_moves(player) {
        if excluded.contains(&mv) {
            continue;
        }
        let Some(next) = board.with_move(mv, player) else {
            continue;
        };
        let score: PositionalScore = LineStats::of(&next, player).positional_score();
        match best_score {
            Some(best_so_far) if score < best_so_far => {}
            Some(best_so_far) if score == best_so_far => best.push(mv),
            _ => {
                best_score = Some(score);
                best.clear();
                best.push(mv);
            }
        }
    }
    best
}

/// One-ply heuristic player.
///
/// Takes an immediate win when available, never plays a move that lets the
/// opponent win on the next turn unless every move does, and otherwise prefers
/// positions with near-complete lines and long own-piece lines.
#[derive(Debug, Clone)]
pub struct OptimalPlayer {
    rng: Pcg32,
}

impl OptimalPlayer {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl Player for OptimalPlayer {
    fn make_move(&mut self, state: &GameState) -> Move {
        let board = state.board();
        let me = state.current_player();
        if let Some(mv) = find_winning_move(board, me) {
            return mv;
        }
        let losing = find_losing_moves(board, me);
        match best_moves(board, me, &losing).choose(&mut self.rng) {
            Some(mv) => *mv,
            None => {
                trace!(player = %me, "every move loses, playing at random");
                random_legal_move(state, &mut self.rng)
            }
        }
    }
}
