use std::path::PathBuf;

use chrono::{DateTime, Utc};
use quixo_players::RandomPlayer;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{
    player_kind::{PlayerKind, PlayerOptions},
    report::{self, SessionOptions, Standing},
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TournamentArg {
    /// Games against the random player in each seat
    #[arg(long, default_value_t = 10)]
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

#[derive(Debug, Clone, Serialize)]
struct Entry {
    kind: PlayerKind,
    #[serde(flatten)]
    standing: Standing,
}

#[derive(Debug, Clone, Serialize)]
struct TournamentReport {
    played_at: DateTime<Utc>,
    seed: u64,
    games_per_seat: usize,
    entries: Vec<Entry>,
    best: Vec<PlayerKind>,
}

pub(crate) fn run(arg: &TournamentArg) -> anyhow::Result<()> {
    let TournamentArg {
        games,
        seed,
        players,
        session,
        output,
    } = arg;

    let mut rng = Pcg32::seed_from_u64(*seed);
    let mut entries = vec![];
    for kind in PlayerKind::ALL {
        eprintln!("Playing {kind} against random...");
        let mut player = players.build(kind, rng.random())?;
        let mut random = RandomPlayer::new(rng.random());
        let mut standing = Standing::default();
        report::play_both_seats(
            session.config(),
            player.as_mut(),
            &mut random,
            *games,
            &mut standing,
        )?;
        entries.push(Entry { kind, standing });
    }

    eprintln!();
    eprintln!("Tournament statistics:");
    for entry in &entries {
        eprintln!("  {}:", entry.kind);
        entry.standing.print("    ");
    }

    let best = report::best_by_wins(entries.iter().map(|e| (e.kind, &e.standing)));
    eprintln!();
    eprintln!("Best players:");
    for entry in entries.iter().filter(|e| best.contains(&e.kind)) {
        eprintln!(
            "  {} with {} wins of {} games",
            entry.kind, entry.standing.total_wins, entry.standing.total_games
        );
    }

    let report = TournamentReport {
        played_at: Utc::now(),
        seed: *seed,
        games_per_seat: *games,
        entries,
        best,
    };
    util::save_report(&report, output.as_deref())?;

    Ok(())
}
