use quixo_engine::{GameState, Move, Player};
use rand::{Rng, SeedableRng, seq::IndexedRandom};
use rand_pcg::Pcg32;

/// Picks a legal move uniformly at random.
///
/// # Panics
///
/// Panics if the player to move has no legal move, which no reachable Quixo
/// position allows.
pub fn random_legal_move<R>(state: &GameState, rng: &mut R) -> Move
where
    R: Rng + ?Sized,
{
    *state
        .legal_moves()
        .choose(rng)
        .expect("every reachable position has a legal move")
}

/// Plays a uniformly random legal move every turn.
#[derive(Debug, Clone)]
pub struct RandomPlayer {
    rng: Pcg32,
}

impl RandomPlayer {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::from_rng(Pcg32::seed_from_u64(seed))
    }

    #[must_use]
    pub fn from_rng(rng: Pcg32) -> Self {
        Self { rng }
    }
}

impl Player for RandomPlayer {
    fn make_move(&mut self, state: &GameState) -> Move {
        random_legal_move(state, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use quixo_engine::{Board, PlayerId};

    use super::*;

    #[test]
    fn test_moves_are_legal() {
        let mut player = RandomPlayer::new(7);
        let mut state = GameState::new();
        for _ in 0..50 {
            if state.winner().is_some() {
                break;
            }
            let mv = player.make_move(&state);
            state = state.after(mv).unwrap();
        }
    }

    #[test]
    fn test_only_legal_move_is_chosen() {
        // Player 0 owns only (0, 0); every other border cell belongs to player 1.
        let board: Board = "
            01111
            1...1
            1...1
            1...1
            11111
        "
        .parse()
        .unwrap();
        let state = GameState::from_parts(board, PlayerId::Zero);
        assert_eq!(state.legal_moves().len(), 2);
        let mut player = RandomPlayer::new(0);
        for _ in 0..10 {
            assert!(state.legal_moves().contains(&player.make_move(&state)));
        }
    }

    #[test]
    fn test_same_seed_same_moves() {
        let state = GameState::new();
        let mut a = RandomPlayer::new(42);
        let mut b = RandomPlayer::new(42);
        for _ in 0..10 {
            assert_eq!(a.make_move(&state), b.make_move(&state));
        }
    }
}
