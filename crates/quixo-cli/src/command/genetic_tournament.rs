use std::path::PathBuf;

use chrono::{DateTime, Utc};
use quixo_players::RandomPlayer;
use quixo_training::{
    GeneticPlayer,
    genetic::{CrossoverStrategy, GeneticConfig, MutationStrategy, SelectionStrategy},
};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{
    report::{self, SessionOptions, Standing},
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GeneticTournamentArg {
    /// Games against the random player in each seat
    #[arg(long, default_value_t = 10)]
    games: usize,
    /// Population size used for every combination
    #[arg(long, default_value_t = 50)]
    population: usize,
    /// Generations used for every combination
    #[arg(long, default_value_t = 10)]
    generations: usize,
    /// Per-gene mutation probability used for every combination
    #[arg(long, default_value_t = 0.15)]
    mutation_rate: f64,
    /// Seed every player's randomness is derived from
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[clap(flatten)]
    session: SessionOptions,
    /// Output file path for the JSON report
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
struct Strategies {
    selection: SelectionStrategy,
    crossover: CrossoverStrategy,
    mutation: MutationStrategy,
}

impl Strategies {
    fn all() -> impl Iterator<Item = Self> {
        SelectionStrategy::ALL.into_iter().flat_map(|selection| {
            CrossoverStrategy::ALL.into_iter().flat_map(move |crossover| {
                MutationStrategy::ALL.into_iter().map(move |mutation| Self {
                    selection,
                    crossover,
                    mutation,
                })
            })
        })
    }
}

#[derive(Debug, Clone, Serialize)]
struct Entry {
    strategies: Strategies,
    #[serde(flatten)]
    standing: Standing,
}

#[derive(Debug, Clone, Serialize)]
struct GeneticTournamentReport {
    played_at: DateTime<Utc>,
    seed: u64,
    games_per_seat: usize,
    population_size: usize,
    generations: usize,
    mutation_rate: f64,
    entries: Vec<Entry>,
    best: Vec<Strategies>,
}

pub(crate) fn run(arg: &GeneticTournamentArg) -> anyhow::Result<()> {
    let GeneticTournamentArg {
        games,
        population,
        generations,
        mutation_rate,
        seed,
        session,
        output,
    } = arg;

    let mut rng = Pcg32::seed_from_u64(*seed);
    let mut entries = vec![];
    for strategies in Strategies::all() {
        eprintln!("Training {strategies:?}...");
        let config = GeneticConfig {
            population_size: *population,
            generations: *generations,
            mutation_rate: *mutation_rate,
            selection: strategies.selection,
            crossover: strategies.crossover,
            mutation: strategies.mutation,
            ..GeneticConfig::default()
        };
        let mut player = GeneticPlayer::train(&config, rng.random())?;
        let mut random = RandomPlayer::new(rng.random());
        let mut standing = Standing::default();
        report::play_both_seats(
            session.config(),
            &mut player,
            &mut random,
            *games,
            &mut standing,
        )?;
        eprintln!(
            "  => {} wins of {} games",
            standing.total_wins, standing.total_games
        );
        entries.push(Entry {
            strategies,
            standing,
        });
    }

    let best = report::best_by_wins(entries.iter().map(|e| (e.strategies, &e.standing)));
    eprintln!();
    eprintln!("Best strategy combinations:");
    for strategies in &best {
        eprintln!("  {strategies:?}");
    }

    let report = GeneticTournamentReport {
        played_at: Utc::now(),
        seed: *seed,
        games_per_seat: *games,
        population_size: *population,
        generations: *generations,
        mutation_rate: *mutation_rate,
        entries,
        best,
    };
    util::save_report(&report, output.as_deref())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_all_twelve_combinations() {
        let all: Vec<Strategies> = Strategies::all().collect();
        assert_eq!(all.len(), 12);
        let distinct: HashSet<_> = all
            .iter()
            .map(|s| (s.selection as u8, s.crossover as u8, s.mutation as u8))
            .collect();
        assert_eq!(distinct.len(), 12);
    }
}
