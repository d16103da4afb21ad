use quixo_engine::{Board, GameState, Move, Player, PlayerId};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use tracing::trace;

use crate::{line_stats::LineStats, optimal::find_winning_move, random::random_legal_move};

/// Depth-limited minimax with alpha-beta pruning.
///
/// The maximizing side is the player to move at the root. A won position scores
/// `100 + remaining depth` for the root player (and the negation for the opponent),
/// so quicker wins and slower losses are preferred. Non-terminal leaves use a
/// line-based heuristic that always stays strictly between -100 and 100, except
/// that a leaf where the opponent is to move and can complete a line scores -100.
/// Even at depth 1 the player therefore never hands over an immediate win while
/// a safe move exists.
#[derive(Debug, Clone)]
pub struct MinMaxPlayer {
    depth: usize,
    rng: Pcg32,
}

impl MinMaxPlayer {
    pub const DEFAULT_DEPTH: usize = 3;

    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_depth(Self::DEFAULT_DEPTH, seed)
    }

    #[must_use]
    pub fn with_depth(depth: usize, seed: u64) -> Self {
        Self {
            depth,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the root move with the best backed-up value and that value.
    ///
    /// Ties keep the earliest move in enumeration order.
    #[must_use]
    pub fn search(&self, state: &GameState) -> Option<(Move, f64)> {
        let root = state.current_player();
        let board = state.board();
        let depth = self.depth.max(1);
        let mut alpha = f64::NEG_INFINITY;
        let mut best = None;
        for mv in board.legal_moves(root) {
            let Some(child) = board.with_move(mv, root) else {
                continue;
            };
            let value = alpha_beta(&child, root.opponent(), root, depth - 1, alpha, f64::INFINITY);
            if value > alpha {
                alpha = value;
                best = Some((mv, value));
            }
        }
        best
    }
}

impl Player for MinMaxPlayer {
    fn make_move(&mut self, state: &GameState) -> Move {
        if let Some((mv, value)) = self.search(state) {
            trace!(player = %state.current_player(), %mv, value, "minimax move");
            return mv;
        }
        random_legal_move(state, &mut self.rng)
    }
}

fn alpha_beta(
    board: &Board,
    mover: PlayerId,
    root: PlayerId,
    depth: usize,
    mut alpha: f64,
    mut beta: f64,
) -> f64 {
    if board.winner().is_some() {
        return evaluate(board, root, depth);
    }
    if depth == 0 {
        // an opponent to move with a line available counts as lost at the horizon
        if mover != root && find_winning_move(board, mover).is_some() {
            return -100.0;
        }
        return evaluate(board, root, 0);
    }
    let moves = board.legal_moves(mover);
    if moves.is_empty() {
        return evaluate(board, root, depth);
    }

    let children = moves.into_iter().filter_map(|mv| board.with_move(mv, mover));
    if mover == root {
        let mut value = f64::NEG_INFINITY;
        for child in children {
            value = value.max(alpha_beta(&child, mover.opponent(), root, depth - 1, alpha, beta));
            alpha = alpha.max(value);
            if alpha >= beta {
                break;
            }
        }
        value
    } else {
        let mut value = f64::INFINITY;
        for child in children {
            value = value.min(alpha_beta(&child, mover.opponent(), root, depth - 1, alpha, beta));
            beta = beta.min(value);
            if alpha >= beta {
                break;
            }
        }
        value
    }
}

#[allow(clippy::cast_precision_loss)]
fn evaluate(board: &Board, root: PlayerId, depth: usize) -> f64 {
    match board.winner() {
        Some(winner) if winner == root => 100.0 + depth as f64,
        Some(_) => -100.0 - depth as f64,
        None => {
            let own = LineStats::of(board, root).weighted_score();
            let opponent = LineStats::of(board, root.opponent()).weighted_score();
            100.0 * (own - opponent) / (own + opponent + 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RandomPlayer, optimal::find_losing_moves};

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn test_heuristic_stays_inside_terminal_range() {
        let b = board(
            "
            0000.
            0....
            0....
            0....
            .111.
            ",
        );
        for root in PlayerId::ALL {
            let value = evaluate(&b, root, 3);
            assert!(value > -100.0 && value < 100.0, "{value}");
        }
        assert!(evaluate(&b, PlayerId::Zero, 0) > 0.0);
        assert!(evaluate(&b, PlayerId::One, 0) < 0.0);
    }

    #[test]
    fn test_terminal_scores_prefer_fast_wins() {
        let won = board("00000\n.....\n.....\n.....\n.....");
        assert!((evaluate(&won, PlayerId::Zero, 2) - 102.0).abs() < f64::EPSILON);
        assert!((evaluate(&won, PlayerId::One, 2) + 102.0).abs() < f64::EPSILON);
        assert!(evaluate(&won, PlayerId::Zero, 2) > evaluate(&won, PlayerId::Zero, 0));
    }

    #[test]
    fn test_takes_immediate_win() {
        let b = board(
            "
            .....
            .....
            0000.
            .1...
            .1.1.
            ",
        );
        let state = GameState::from_parts(b, PlayerId::Zero);
        for depth in 1..=3 {
            let mut player = MinMaxPlayer::with_depth(depth, 0);
            let mv = player.make_move(&state);
            let next = state.after(mv).unwrap();
            assert_eq!(next.winner(), Some(PlayerId::Zero), "depth {depth}");
        }
    }

    #[test]
    fn test_blocks_single_threat() {
        let b = board(
            "
            .....
            1111.
            .....
            .....
            .....
            ",
        );
        let state = GameState::from_parts(b, PlayerId::Zero);
        let losing = find_losing_moves(&b, PlayerId::Zero);
        let mv = MinMaxPlayer::with_depth(2, 0).make_move(&state);
        assert!(!losing.is_empty());
        assert!(!losing.contains(&mv), "chose losing move {mv}");
    }

    #[test]
    fn test_depth_one_sees_opponent_reply() {
        let b = board(
            "
            00001
            ....1
            1....
            0...1
            01.10
            ",
        );
        let state = GameState::from_parts(b, PlayerId::One);
        let losing = find_losing_moves(&b, PlayerId::One);
        assert!(!losing.is_empty());
        assert!(losing.len() < state.legal_moves().len());

        let mv = MinMaxPlayer::with_depth(1, 0).make_move(&state);
        assert!(!losing.contains(&mv), "chose losing move {mv}");
        let (_, value) = MinMaxPlayer::with_depth(1, 0).search(&state).unwrap();
        assert!(value > -100.0, "{value}");
    }

    #[test]
    fn test_never_hands_over_immediate_win() {
        for depth in 1..=3 {
            let mut rng_player = RandomPlayer::new(11);
            for game in 0..3 {
                let mut state = GameState::new();
                for ply in 0..24 {
                    if state.winner().is_some() {
                        break;
                    }
                    let me = state.current_player();
                    let losing = find_losing_moves(state.board(), me);
                    if losing.len() < state.legal_moves().len() {
                        let mv = MinMaxPlayer::with_depth(depth, 0).make_move(&state);
                        assert!(
                            !losing.contains(&mv),
                            "depth {depth} game {game} ply {ply}: chose losing move {mv} on\n{}",
                            state.board()
                        );
                    }
                    state = state.after(rng_player.make_move(&state)).unwrap();
                }
            }
        }
    }

    #[test]
    fn test_default_depth() {
        assert_eq!(MinMaxPlayer::new(0).depth(), 3);
    }
}
