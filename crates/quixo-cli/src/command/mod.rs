use clap::{Parser, Subcommand};

use self::{genetic_tournament::GeneticTournamentArg, play::PlayArg, tournament::TournamentArg};

mod genetic_tournament;
mod play;
mod tournament;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a series of games between two players, in both seatings
    Play(#[clap(flatten)] PlayArg),
    /// Play every player against a random player
    Tournament(#[clap(flatten)] TournamentArg),
    /// Compare genetic players trained with every strategy combination
    GeneticTournament(#[clap(flatten)] GeneticTournamentArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Tournament(arg) => tournament::run(&arg)?,
        Mode::GeneticTournament(arg) => genetic_tournament::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_play() {
        let args = CommandArgs::try_parse_from([
            "quixo", "play", "--first", "optimal", "--second", "minmax", "--games", "3",
            "--depth", "2",
        ])
        .unwrap();
        assert!(matches!(args.mode, Mode::Play(_)));
    }

    #[test]
    fn test_parse_session_limits() {
        let args = CommandArgs::try_parse_from([
            "quixo", "tournament", "--max-retries", "5", "--max-moves", "200",
        ])
        .unwrap();
        assert!(matches!(args.mode, Mode::Tournament(_)));
        assert!(
            CommandArgs::try_parse_from(["quixo", "play", "--max-retries", "-1"]).is_err()
        );
    }

    #[test]
    fn test_parse_rejects_unknown_player() {
        assert!(CommandArgs::try_parse_from(["quixo", "play", "--first", "oracle"]).is_err());
    }
}
