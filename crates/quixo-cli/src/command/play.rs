use std::path::PathBuf;

use chrono::{DateTime, Utc};
use quixo_engine::PlayerId;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{
    player_kind::{PlayerKind, PlayerOptions},
    report::{self, SessionOptions, Standing},
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Player moving first in the first seating
    #[arg(long, default_value = "random")]
    first: PlayerKind,
    /// Player moving first in the second seating
    #[arg(long, default_value = "minmax")]
    second: PlayerKind,
    /// Games per seating
    #[arg(long, default_value_t = 25)]
    games: usize,
    /// Seed every player's randomness is derived from
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[clap(flatten)]
    players: PlayerOptions,
    #[clap(flatten)]
    session: SessionOptions,
    /// Output file path for the JSON report
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Outcome {
    First,
    Second,
    Draw,
}

#[derive(Debug, Clone, Serialize)]
struct Contestant {
    kind: PlayerKind,
    #[serde(flatten)]
    standing: Standing,
}

#[derive(Debug, Clone, Serialize)]
struct PlayReport {
    played_at: DateTime<Utc>,
    seed: u64,
    games_per_seating: usize,
    first: Contestant,
    second: Contestant,
    outcome: Outcome,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        first,
        second,
        games,
        seed,
        players,
        session,
        output,
    } = arg;
    let config = session.config();

    let mut rng = Pcg32::seed_from_u64(*seed);
    eprintln!("Preparing {first} and {second}...");
    let mut first_player = players.build(*first, rng.random())?;
    let mut second_player = players.build(*second, rng.random())?;

    let mut first_standing = Standing::default();
    let mut second_standing = Standing::default();

    for _ in 0..*games {
        let winner = report::play_game(config, first_player.as_mut(), second_player.as_mut())?;
        first_standing.record(PlayerId::Zero, winner);
        second_standing.record(PlayerId::One, winner);
    }
    eprintln!(
        "Seating 1 ({first} first): {first} {} - {second} {}",
        first_standing.wins_as_first, second_standing.wins_as_second
    );

    for _ in 0..*games {
        let winner = report::play_game(config, second_player.as_mut(), first_player.as_mut())?;
        second_standing.record(PlayerId::Zero, winner);
        first_standing.record(PlayerId::One, winner);
    }
    eprintln!(
        "Seating 2 ({second} first): {second} {} - {first} {}",
        second_standing.wins_as_first, first_standing.wins_as_second
    );

    let outcome = match first_standing.total_wins.cmp(&second_standing.total_wins) {
        std::cmp::Ordering::Greater => Outcome::First,
        std::cmp::Ordering::Less => Outcome::Second,
        std::cmp::Ordering::Equal => Outcome::Draw,
    };
    let total = first_standing.total_games;
    match outcome {
        Outcome::First => eprintln!(
            "{first} wins with {} of {total} games",
            first_standing.total_wins
        ),
        Outcome::Second => eprintln!(
            "{second} wins with {} of {total} games",
            second_standing.total_wins
        ),
        Outcome::Draw => eprintln!(
            "Draw: {first} {} - {second} {} of {total} games",
            first_standing.total_wins, second_standing.total_wins
        ),
    }

    let report = PlayReport {
        played_at: Utc::now(),
        seed: *seed,
        games_per_seating: *games,
        first: Contestant {
            kind: *first,
            standing: first_standing,
        },
        second: Contestant {
            kind: *second,
            standing: second_standing,
        },
        outcome,
    };
    util::save_report(&report, output.as_deref())?;

    Ok(())
}
