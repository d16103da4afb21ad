//! Learning players for Quixo.
//!
//! - [`genetic`] evolves [`genotype::Genotype`]s, move-preference tables played by
//!   [`GeneticPlayer`]
//! - [`ReinforcedPlayer`] learns state values with tabular Q-learning
//!
//! Both train against [`quixo_players::RandomPlayer`] and are deterministic for a given
//! seed.

pub use self::{genetic_player::*, reinforced::*};

pub mod genetic;
pub mod genotype;

mod genetic_player;
mod reinforced;
