use crate::core::Move;

use super::GameState;

/// A move source for one seat of a [`GameSession`](super::GameSession).
///
/// Implementations should return a legal move, but the session re-validates every
/// proposal and asks again on rejection.
pub trait Player {
    fn make_move(&mut self, state: &GameState) -> Move;
}

impl<P> Player for &mut P
where
    P: Player + ?Sized,
{
    fn make_move(&mut self, state: &GameState) -> Move {
        (**self).make_move(state)
    }
}

impl<P> Player for Box<P>
where
    P: Player + ?Sized,
{
    fn make_move(&mut self, state: &GameState) -> Move {
        (**self).make_move(state)
    }
}
