//! Genetic algorithm over move-preference genotypes.
//!
//! Each [`Individual`] carries a [`Genotype`] and a fitness score. Fitness comes from
//! playing full games as player 1 against a [`RandomPlayer`], always choosing the
//! highest-weight legal gene.
//!
//! # Algorithm Overview
//!
//! 1. **Evaluate Fitness** - every individual plays its fitness games (in parallel)
//! 2. **Selection** - a mating pool as large as the population is drawn, either
//!    fitness-proportionally (roulette wheel) or by tournaments among the better half
//! 3. **Crossover** - two distinct pool entries produce one child genotype
//! 4. **Mutation** - the child's weights are perturbed per gene with `mutation_rate`
//! 5. **Repeat** - for `generations` rounds; the final generation is evaluated too
//!    and its fittest individual is the result
//!
//! # Fitness
//!
//! A won game is worth `1 + fitness_factor / moves`, where `moves` counts the
//! individual's own moves, so quicker wins score higher. Lost games are worth nothing.
//!
//! # Example
//!
//! ```
//! use quixo_training::genetic::{self, GeneticConfig};
//! use rand::SeedableRng;
//! use rand_pcg::Pcg32;
//!
//! let config = GeneticConfig {
//!     population_size: 4,
//!     generations: 1,
//!     ..GeneticConfig::default()
//! };
//! let mut rng = Pcg32::seed_from_u64(0);
//! let best = genetic::evolve(&config, &mut rng).unwrap();
//! assert_eq!(best.genotype().len(), 44);
//! ```

use std::thread;

use quixo_engine::{GameSession, GameState, Move, Player, PlayerId};
use quixo_players::{RandomPlayer, random_legal_move};
use rand::{Rng, SeedableRng, seq::IndexedRandom};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::genotype::{self, Genotype};

/// How parents are drawn into the mating pool.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Probability proportional to fitness.
    Roulette,
    /// Fittest of a small random group drawn from the better half.
    #[default]
    Tournament,
}

impl SelectionStrategy {
    /// Every strategy, in declaration order.
    pub const ALL: [Self; 2] = [Self::Roulette, Self::Tournament];
}

/// How two parent genotypes are combined into a child.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum CrossoverStrategy {
    /// Prefix of the first parent, suffix of the second.
    SinglePoint,
    /// Middle segment taken from the second parent.
    #[default]
    TwoPoint,
}

impl CrossoverStrategy {
    pub const ALL: [Self; 2] = [Self::SinglePoint, Self::TwoPoint];
}

/// How a child's genes are perturbed after crossover.
///
/// Each position fires independently with probability
/// [`GeneticConfig::mutation_rate`].
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum MutationStrategy {
    /// Adds a small random offset to the weight.
    RandomReset,
    /// Exchanges the weight with a random later gene.
    Swap,
    /// Rotates every weight left by a random offset.
    #[default]
    Shift,
}

impl MutationStrategy {
    pub const ALL: [Self; 3] = [Self::RandomReset, Self::Swap, Self::Shift];
}

/// Share of the population entering each selection tournament.
const TOURNAMENT_SHARE: f64 = 0.2;

/// Parameters of a genetic training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneticConfig {
    /// Individuals per generation; at least 2.
    pub population_size: usize,
    /// Number of evaluate-and-evolve rounds.
    pub generations: usize,
    /// Per-gene mutation probability.
    pub mutation_rate: f64,
    pub selection: SelectionStrategy,
    pub crossover: CrossoverStrategy,
    pub mutation: MutationStrategy,
    /// Scale of the quick-win bonus added to every won fitness game.
    pub fitness_factor: f64,
    /// Fitness games each individual plays against a random player per generation.
    pub games_per_individual: usize,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            generations: 10,
            mutation_rate: 0.1,
            selection: SelectionStrategy::default(),
            crossover: CrossoverStrategy::default(),
            mutation: MutationStrategy::default(),
            fitness_factor: 1.2,
            games_per_individual: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum GeneticConfigError {
    #[display("population size must be at least 2, got {size}")]
    PopulationTooSmall { size: usize },
    #[display("mutation rate must be within [0, 1], got {rate}")]
    InvalidMutationRate { rate: f64 },
}

impl GeneticConfig {
    pub fn validate(&self) -> Result<(), GeneticConfigError> {
        if self.population_size < 2 {
            return Err(GeneticConfigError::PopulationTooSmall {
                size: self.population_size,
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(GeneticConfigError::InvalidMutationRate {
                rate: self.mutation_rate,
            });
        }
        Ok(())
    }
}

/// A genotype together with the fitness it earned in the last evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Individual {
    genotype: Genotype,
    fitness: f64,
}

impl Individual {
    /// Creates an unevaluated individual with random weights.
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::from_genotype(Genotype::random(rng))
    }

    /// Wraps `genotype` with zero fitness.
    #[must_use]
    pub fn from_genotype(genotype: Genotype) -> Self {
        Self {
            genotype,
            fitness: 0.0,
        }
    }

    #[must_use]
    pub fn genotype(&self) -> &Genotype {
        &self.genotype
    }

    #[must_use]
    pub fn into_genotype(self) -> Genotype {
        self.genotype
    }

    /// Sum of the fitness games of the last evaluation; zero when it won none.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }
}

/// Plays the individual's side of a fitness game.
struct FitnessPlayer<'a> {
    genotype: &'a mut Genotype,
    moves: usize,
    rng: Pcg32,
}

impl Player for FitnessPlayer<'_> {
    fn make_move(&mut self, state: &GameState) -> Move {
        self.moves += 1;
        self.genotype
            .play_by_weight(state)
            .unwrap_or_else(|| random_legal_move(state, &mut self.rng))
    }
}

/// Plays one game as player 1 against a random player and returns the fitness earned.
fn play_fitness_game(genotype: &mut Genotype, factor: f64, rng: &mut Pcg32) -> f64 {
    let mut opponent = RandomPlayer::new(rng.random());
    let mut player = FitnessPlayer {
        genotype,
        moves: 0,
        rng: Pcg32::seed_from_u64(rng.random()),
    };
    let mut session = GameSession::new();
    let won = session
        .play(&mut opponent, &mut player)
        .is_ok_and(|winner| winner == PlayerId::One);
    if !won {
        return 0.0;
    }
    #[expect(clippy::cast_precision_loss)]
    let moves = player.moves.max(1) as f64;
    1.0 + factor / moves
}

/// Fitness distribution of one evaluated generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Individuals with a positive fitness, i.e. at least one won game.
    pub winners: usize,
}

/// One generation of individuals.
///
/// After [`Population::evaluate_fitness`] the individuals are sorted best first,
/// which tournament selection relies on.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Creates a population of random individuals.
    ///
    /// # Arguments
    ///
    /// * `count` - Number of individuals
    /// * `rng` - Source of the initial weights
    #[must_use]
    pub fn random<R>(count: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..count).map(|_| Individual::random(rng)).collect();
        Self { individuals }
    }

    /// Returns the individuals, best first once evaluated.
    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Evaluates every individual in parallel, then sorts the population best first.
    ///
    /// Each individual gets its own RNG seeded from `rng`, so results do not depend on
    /// thread scheduling.
    ///
    /// # Arguments
    ///
    /// * `config` - Supplies the games per individual and the quick-win factor
    /// * `rng` - Seeds the per-individual game RNGs
    pub fn evaluate_fitness<R>(&mut self, config: &GeneticConfig, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let seeds: Vec<u64> = self.individuals.iter().map(|_| rng.random()).collect();
        thread::scope(|s| {
            for (ind, seed) in self.individuals.iter_mut().zip(seeds) {
                s.spawn(move || {
                    let mut rng = Pcg32::seed_from_u64(seed);
                    ind.fitness = (0..config.games_per_individual)
                        .map(|_| {
                            play_fitness_game(&mut ind.genotype, config.fitness_factor, &mut rng)
                        })
                        .sum();
                });
            }
        });

        // sort by fitness descending
        self.individuals
            .sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
    }

    #[must_use]
    pub fn fitness_summary(&self) -> FitnessSummary {
        let fitness = self.individuals.iter().map(Individual::fitness);
        let min = fitness.clone().fold(f64::INFINITY, f64::min);
        let max = fitness.clone().fold(f64::NEG_INFINITY, f64::max);
        #[expect(clippy::cast_precision_loss)]
        let mean = fitness.clone().sum::<f64>() / self.individuals.len().max(1) as f64;
        let winners = fitness.filter(|f| *f > 0.0).count();
        FitnessSummary {
            min,
            max,
            mean,
            winners,
        }
    }

    /// Returns the fittest individual, the earliest one among equals.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals
            .iter()
            .reduce(|best, ind| if ind.fitness > best.fitness { ind } else { best })
    }
}

/// Builds the next generation from an evaluated population.
#[derive(Debug, Clone)]
pub struct PopulationEvolver {
    /// Strategy filling the mating pool.
    pub selection: SelectionStrategy,
    /// Strategy combining two pool members into a child.
    pub crossover: CrossoverStrategy,
    /// Strategy applied to each child's genes.
    pub mutation: MutationStrategy,
    /// Per-gene mutation probability.
    pub mutation_rate: f64,
}

impl PopulationEvolver {
    /// Takes the three strategies and the mutation rate from `config`.
    #[must_use]
    pub fn from_config(config: &GeneticConfig) -> Self {
        Self {
            selection: config.selection,
            crossover: config.crossover,
            mutation: config.mutation,
            mutation_rate: config.mutation_rate,
        }
    }

    /// Produces a population of the same size: selection, crossover, mutation.
    ///
    /// Children start with zero fitness and zero usage counts.
    ///
    /// # Arguments
    ///
    /// * `population` - Evaluated parents, sorted best first
    /// * `rng` - Drives selection, crossover points and mutation
    ///
    /// # Panics
    ///
    /// Panics if the population holds fewer than two individuals.
    #[must_use]
    pub fn evolve<R>(&self, population: &Population, rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        let individuals = &population.individuals;
        assert!(individuals.len() >= 2);

        let pool: Vec<&Individual> = (0..individuals.len())
            .map(|_| match self.selection {
                SelectionStrategy::Roulette => roulette_select(individuals, rng),
                SelectionStrategy::Tournament => tournament_select(individuals, rng),
            })
            .collect();

        let next = (0..individuals.len())
            .map(|_| {
                let mut parents = pool.choose_multiple(rng, 2);
                let (Some(p1), Some(p2)) = (parents.next(), parents.next()) else {
                    unreachable!("mating pool holds at least two entries");
                };
                let (p1, p2) = (p1.genotype.genes(), p2.genotype.genes());
                let mut genes = match self.crossover {
                    CrossoverStrategy::SinglePoint => genotype::crossover_single_point(p1, p2, rng),
                    CrossoverStrategy::TwoPoint => genotype::crossover_two_point(p1, p2, rng),
                };
                match self.mutation {
                    MutationStrategy::RandomReset => {
                        genotype::mutate_random_reset(&mut genes, self.mutation_rate, rng);
                    }
                    MutationStrategy::Swap => {
                        genotype::mutate_swap(&mut genes, self.mutation_rate, rng);
                    }
                    MutationStrategy::Shift => {
                        genotype::mutate_shift(&mut genes, self.mutation_rate, rng);
                    }
                }
                let mut genotype = Genotype::from_genes(genes);
                genotype.reset_usage();
                Individual::from_genotype(genotype)
            })
            .collect();

        Population { individuals: next }
    }
}

/// Selects an individual with probability proportional to its fitness.
///
/// Falls back to a uniform draw when no individual has a positive fitness.
///
/// # Arguments
///
/// * `population` - Candidates; must not be empty
/// * `rng` - Random number generator for the draw
fn roulette_select<'a, R>(population: &'a [Individual], rng: &mut R) -> &'a Individual
where
    R: Rng + ?Sized,
{
    population
        .choose_weighted(rng, |ind| ind.fitness.max(0.0))
        .ok()
        .or_else(|| population.choose(rng))
        .unwrap()
}

/// Runs a tournament among random members of the better half of the population.
///
/// The tournament size is 20% of the population, at least one and at most the
/// half size.
///
/// # Arguments
///
/// * `population` - Candidates sorted best first; needs at least two
/// * `rng` - Random number generator for picking the participants
fn tournament_select<'a, R>(population: &'a [Individual], rng: &mut R) -> &'a Individual
where
    R: Rng + ?Sized,
{
    let half = &population[..population.len() / 2];
    assert!(!half.is_empty());
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let size = ((population.len() as f64 * TOURNAMENT_SHARE) as usize).clamp(1, half.len());
    half.choose_multiple(rng, size)
        .reduce(|best, ind| if ind.fitness > best.fitness { ind } else { best })
        .unwrap()
}

/// Runs the whole algorithm and returns the fittest individual of the final generation.
///
/// Each generation is evaluated, logged at debug level and then replaced by its
/// offspring; the last generation is evaluated once more before picking the winner.
///
/// # Arguments
///
/// * `config` - Run parameters, validated before anything else happens
/// * `rng` - Single source of randomness for the whole run
///
/// # Example
///
/// ```
/// use quixo_training::genetic::{self, GeneticConfig};
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
///
/// let config = GeneticConfig {
///     population_size: 4,
///     generations: 1,
///     ..GeneticConfig::default()
/// };
/// let best = genetic::evolve(&config, &mut Pcg32::seed_from_u64(3)).unwrap();
/// assert!(best.fitness() >= 0.0);
/// assert!(!best.genotype().genes().is_empty());
/// ```
pub fn evolve<R>(config: &GeneticConfig, rng: &mut R) -> Result<Individual, GeneticConfigError>
where
    R: Rng + ?Sized,
{
    config.validate()?;
    let evolver = PopulationEvolver::from_config(config);
    let mut population = Population::random(config.population_size, rng);
    for generation in 0..config.generations {
        population.evaluate_fitness(config, rng);
        let summary = population.fitness_summary();
        debug!(
            generation,
            min = summary.min,
            max = summary.max,
            mean = summary.mean,
            winners = summary.winners,
            "generation evaluated"
        );
        population = evolver.evolve(&population, rng);
    }
    population.evaluate_fitness(config, rng);
    let best = population
        .best()
        .cloned()
        .ok_or(GeneticConfigError::PopulationTooSmall { size: 0 })?;
    trace!(fitness = best.fitness, "evolution finished");
    Ok(best)
}

#[cfg(test)]
mod tests {
    use quixo_engine::{Board, MAX_LEGAL_MOVES};

    use super::*;

    fn individual_with_fitness(fitness: f64, rng: &mut Pcg32) -> Individual {
        Individual {
            genotype: Genotype::random(rng),
            fitness,
        }
    }

    #[test]
    fn test_strategies_parse() {
        assert_eq!(
            "roulette".parse::<SelectionStrategy>().unwrap(),
            SelectionStrategy::Roulette
        );
        assert_eq!(
            "TwoPoint".parse::<CrossoverStrategy>().unwrap(),
            CrossoverStrategy::TwoPoint
        );
        assert_eq!(
            "Shift".parse::<MutationStrategy>().unwrap(),
            MutationStrategy::Shift
        );
        assert!("bogus".parse::<MutationStrategy>().is_err());
    }

    #[test]
    fn test_validate() {
        assert!(GeneticConfig::default().validate().is_ok());
        let config = GeneticConfig {
            population_size: 1,
            ..GeneticConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(GeneticConfigError::PopulationTooSmall { size: 1 })
        );
        let config = GeneticConfig {
            mutation_rate: 1.5,
            ..GeneticConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fitness_game_rewards_only_wins() {
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..10 {
            let mut genotype = Genotype::random(&mut rng);
            let fitness = play_fitness_game(&mut genotype, 1.2, &mut rng);
            let used: u32 = genotype.genes().iter().map(|g| g.usage).sum();
            assert!(used > 0);
            if fitness > 0.0 {
                // 1 + 1.2 / moves, with at least 5 moves needed to win
                assert!(fitness > 1.0 && fitness <= 1.0 + 1.2 / 5.0);
            }
        }
    }

    #[test]
    fn test_evaluate_sorts_best_first() {
        let mut rng = Pcg32::seed_from_u64(10);
        let mut population = Population::random(6, &mut rng);
        let config = GeneticConfig {
            games_per_individual: 3,
            ..GeneticConfig::default()
        };
        population.evaluate_fitness(&config, &mut rng);
        assert!(
            population
                .individuals()
                .is_sorted_by(|a, b| a.fitness() >= b.fitness())
        );
        let summary = population.fitness_summary();
        assert!(summary.min <= summary.mean && summary.mean <= summary.max);
        assert_eq!(
            population.best().unwrap().fitness(),
            population.individuals()[0].fitness()
        );
    }

    #[test]
    fn test_tournament_selects_from_better_half() {
        let mut rng = Pcg32::seed_from_u64(11);
        let population: Vec<Individual> = [5.0, 4.0, 3.0, 2.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]
            .into_iter()
            .map(|f| individual_with_fitness(f, &mut rng))
            .collect();
        for _ in 0..50 {
            let selected = tournament_select(&population, &mut rng);
            assert!(selected.fitness() >= 1.0);
        }
    }

    #[test]
    fn test_roulette_skips_zero_fitness() {
        let mut rng = Pcg32::seed_from_u64(12);
        let population: Vec<Individual> = [0.0, 2.0, 0.0]
            .into_iter()
            .map(|f| individual_with_fitness(f, &mut rng))
            .collect();
        for _ in 0..20 {
            assert!((roulette_select(&population, &mut rng).fitness() - 2.0).abs() < f64::EPSILON);
        }

        let all_zero: Vec<Individual> = (0..3).map(|_| individual_with_fitness(0.0, &mut rng)).collect();
        for _ in 0..20 {
            assert!(roulette_select(&all_zero, &mut rng).fitness().abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_evolve_resets_children() {
        let mut rng = Pcg32::seed_from_u64(13);
        let mut population = Population::random(4, &mut rng);
        population.evaluate_fitness(&GeneticConfig::default(), &mut rng);
        for strategy in [SelectionStrategy::Roulette, SelectionStrategy::Tournament] {
            let evolver = PopulationEvolver {
                selection: strategy,
                crossover: CrossoverStrategy::SinglePoint,
                mutation: MutationStrategy::RandomReset,
                mutation_rate: 0.5,
            };
            let next = evolver.evolve(&population, &mut rng);
            assert_eq!(next.individuals().len(), 4);
            for ind in next.individuals() {
                assert!(ind.fitness().abs() < f64::EPSILON);
                assert!(ind.genotype().genes().iter().all(|g| g.usage == 0));
            }
        }
    }

    #[test]
    fn test_single_generation_covers_empty_board_moves() {
        let config = GeneticConfig {
            population_size: 10,
            generations: 1,
            ..GeneticConfig::default()
        };
        let mut rng = Pcg32::seed_from_u64(42);
        let best = evolve(&config, &mut rng).unwrap();
        let moves: Vec<_> = best.genotype().genes().iter().map(|g| g.mv).collect();
        assert_eq!(moves.len(), MAX_LEGAL_MOVES);
        assert_eq!(
            moves.as_slice(),
            Board::EMPTY.legal_moves(PlayerId::Zero).as_slice()
        );
    }

    #[test]
    fn test_evolve_is_deterministic() {
        let config = GeneticConfig {
            population_size: 4,
            generations: 2,
            ..GeneticConfig::default()
        };
        let a = evolve(&config, &mut Pcg32::seed_from_u64(7)).unwrap();
        let b = evolve(&config, &mut Pcg32::seed_from_u64(7)).unwrap();
        assert_eq!(a.genotype(), b.genotype());
    }
}
