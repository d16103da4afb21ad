use anyhow::Context as _;
use quixo_engine::Player;
use quixo_players::{MinMaxPlayer, OptimalPlayer, RandomPlayer};
use quixo_training::{
    GeneticPlayer, ReinforcedConfig, ReinforcedPlayer,
    genetic::{CrossoverStrategy, GeneticConfig, MutationStrategy, SelectionStrategy},
};
use serde::Serialize;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub(crate) enum PlayerKind {
    #[display("random")]
    Random,
    #[display("optimal")]
    Optimal,
    #[display("minmax")]
    MinMax,
    #[display("genetic")]
    Genetic,
    #[display("reinforced")]
    Reinforced,
}

impl PlayerKind {
    pub(crate) const ALL: [Self; 5] = [
        Self::Random,
        Self::Optimal,
        Self::MinMax,
        Self::Genetic,
        Self::Reinforced,
    ];
}

/// Tuning knobs shared by every subcommand that builds players.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayerOptions {
    /// Search depth of the minmax player
    #[arg(long, default_value_t = MinMaxPlayer::DEFAULT_DEPTH)]
    depth: usize,
    /// Population size of the genetic player
    #[arg(long, default_value_t = 10)]
    population: usize,
    /// Number of generations the genetic player evolves
    #[arg(long, default_value_t = 10)]
    generations: usize,
    /// Per-gene mutation probability of the genetic player
    #[arg(long, default_value_t = 0.1)]
    mutation_rate: f64,
    /// Parent selection: roulette or tournament
    #[arg(long, default_value = "tournament")]
    selection: SelectionStrategy,
    /// Crossover: singlepoint or twopoint
    #[arg(long, default_value = "twopoint")]
    crossover: CrossoverStrategy,
    /// Mutation: randomreset, swap or shift
    #[arg(long, default_value = "shift")]
    mutation: MutationStrategy,
    /// Matches against a random player the reinforced player trains with
    #[arg(long, default_value_t = 1000)]
    training_matches: usize,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        let genetic = GeneticConfig::default();
        Self {
            depth: MinMaxPlayer::DEFAULT_DEPTH,
            population: genetic.population_size,
            generations: genetic.generations,
            mutation_rate: genetic.mutation_rate,
            selection: genetic.selection,
            crossover: genetic.crossover,
            mutation: genetic.mutation,
            training_matches: ReinforcedConfig::default().training_matches,
        }
    }
}

impl PlayerOptions {
    pub(crate) fn genetic_config(&self) -> GeneticConfig {
        GeneticConfig {
            population_size: self.population,
            generations: self.generations,
            mutation_rate: self.mutation_rate,
            selection: self.selection,
            crossover: self.crossover,
            mutation: self.mutation,
            ..GeneticConfig::default()
        }
    }

    pub(crate) fn reinforced_config(&self) -> ReinforcedConfig {
        ReinforcedConfig {
            training_matches: self.training_matches,
            ..ReinforcedConfig::default()
        }
    }

    /// Creates a fresh player of `kind`; the genetic player is trained right away.
    pub(crate) fn build(&self, kind: PlayerKind, seed: u64) -> anyhow::Result<Box<dyn Player>> {
        let player: Box<dyn Player> = match kind {
            PlayerKind::Random => Box::new(RandomPlayer::new(seed)),
            PlayerKind::Optimal => Box::new(OptimalPlayer::new(seed)),
            PlayerKind::MinMax => Box::new(MinMaxPlayer::with_depth(self.depth, seed)),
            PlayerKind::Genetic => Box::new(
                GeneticPlayer::train(&self.genetic_config(), seed)
                    .context("Failed to train genetic player")?,
            ),
            PlayerKind::Reinforced => Box::new(ReinforcedPlayer::with_config(
                self.reinforced_config(),
                seed,
            )),
        };
        Ok(player)
    }
}
