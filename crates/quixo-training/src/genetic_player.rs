use quixo_engine::{GameState, Move, Player};
use quixo_players::random_legal_move;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::{
    genetic::{self, GeneticConfig, GeneticConfigError},
    genotype::Genotype,
};

/// Plays from an evolved genotype.
///
/// Each turn the legal gene with the highest `weight × usage` wins, so only moves
/// that the individual both rated and actually played during evaluation stand out.
#[derive(Debug, Clone)]
pub struct GeneticPlayer {
    genotype: Genotype,
    rng: Pcg32,
}

impl GeneticPlayer {
    /// Evolves a genotype with `config` and wraps the fittest result.
    pub fn train(config: &GeneticConfig, seed: u64) -> Result<Self, GeneticConfigError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let best = genetic::evolve(config, &mut rng)?;
        Ok(Self {
            genotype: best.into_genotype(),
            rng,
        })
    }

    #[must_use]
    pub fn from_genotype(genotype: Genotype, seed: u64) -> Self {
        Self {
            genotype,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn genotype(&self) -> &Genotype {
        &self.genotype
    }
}

impl Player for GeneticPlayer {
    fn make_move(&mut self, state: &GameState) -> Move {
        self.genotype
            .best_by_score(state)
            .unwrap_or_else(|| random_legal_move(state, &mut self.rng))
    }
}
