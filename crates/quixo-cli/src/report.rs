use anyhow::Context as _;
use quixo_engine::{GameSession, Player, PlayerId, SessionConfig, SessionError};
use serde::Serialize;
use tracing::{debug, warn};

use crate::util;

/// Win record of one contestant across both seats.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub(crate) struct Standing {
    pub(crate) total_games: usize,
    pub(crate) total_wins: usize,
    pub(crate) wins_as_first: usize,
    pub(crate) wins_as_second: usize,
    /// Games abandoned at the move limit.
    pub(crate) undecided: usize,
    /// Percentage of games won.
    pub(crate) win_rate: f64,
}

impl Standing {
    pub(crate) fn record(&mut self, seat: PlayerId, winner: Option<PlayerId>) {
        self.total_games += 1;
        if winner.is_none() {
            self.undecided += 1;
        } else if winner == Some(seat) {
            self.total_wins += 1;
            match seat {
                PlayerId::Zero => self.wins_as_first += 1,
                PlayerId::One => self.wins_as_second += 1,
            }
        }
        self.win_rate = util::win_rate(self.total_wins, self.total_games);
    }

    pub(crate) fn print(&self, indent: &str) {
        eprintln!("{indent}Total wins:       {}", self.total_wins);
        eprintln!("{indent}Total games:      {}", self.total_games);
        eprintln!("{indent}Wins as player 0: {}", self.wins_as_first);
        eprintln!("{indent}Wins as player 1: {}", self.wins_as_second);
        if self.undecided > 0 {
            eprintln!("{indent}Undecided games:  {}", self.undecided);
        }
        eprintln!("{indent}Win rate:         {:.1}%", self.win_rate);
    }
}

/// Session limits shared by every subcommand that plays games.
#[derive(Debug, Clone, Copy, Default, clap::Args)]
pub(crate) struct SessionOptions {
    /// Illegal proposals tolerated in one turn before the run is aborted.
    /// Without a limit a player that only proposes illegal moves hangs the run.
    #[arg(long)]
    max_retries: Option<u32>,
    /// Moves after which an undecided game is counted as undecided and dropped.
    /// Without a limit two deterministic players can cycle forever.
    #[arg(long)]
    max_moves: Option<usize>,
}

impl SessionOptions {
    pub(crate) fn config(self) -> SessionConfig {
        SessionConfig {
            max_retries_per_turn: self.max_retries,
            max_moves: self.max_moves,
        }
    }
}

/// Plays one game and returns the winner, or `None` if it hit the move limit.
pub(crate) fn play_game(
    config: SessionConfig,
    first: &mut dyn Player,
    second: &mut dyn Player,
) -> anyhow::Result<Option<PlayerId>> {
    let mut session = GameSession::with_config(config);
    match session.play(first, second) {
        Ok(winner) => {
            debug!(
                %winner,
                moves = session.stats().total_accepted_moves(),
                "game finished"
            );
            Ok(Some(winner))
        }
        Err(SessionError::MoveLimitReached { moves }) => {
            warn!(moves, "game abandoned without a winner");
            Ok(None)
        }
        Err(e) => Err(e).context("Game was aborted before a winner emerged"),
    }
}

/// Plays `games` games of `player` against `opponent` in each seat, alternating seats.
pub(crate) fn play_both_seats(
    config: SessionConfig,
    player: &mut dyn Player,
    opponent: &mut dyn Player,
    games: usize,
    standing: &mut Standing,
) -> anyhow::Result<()> {
    for _ in 0..games {
        let winner = play_game(config, player, opponent)?;
        standing.record(PlayerId::Zero, winner);
        let winner = play_game(config, opponent, player)?;
        standing.record(PlayerId::One, winner);
    }
    Ok(())
}

/// Returns every contestant sharing the highest win count, in input order.
pub(crate) fn best_by_wins<'a, K, I>(entries: I) -> Vec<K>
where
    K: Copy + 'a,
    I: IntoIterator<Item = (K, &'a Standing)>,
    I::IntoIter: Clone,
{
    let entries = entries.into_iter();
    let Some(max_wins) = entries.clone().map(|(_, s)| s.total_wins).max() else {
        return vec![];
    };
    entries
        .filter(|(_, s)| s.total_wins == max_wins)
        .map(|(k, _)| k)
        .collect()
}
