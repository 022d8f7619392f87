use clap::{Parser, ValueEnum};
use reversi_return::{AiControls, GameConfig, Outcome, Player, Session};
use tracing::{debug, info};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use web_time::Instant;

/// Plays computer-vs-computer games and reports the results.
#[derive(Parser)]
struct Args {
    /// How many games to play
    #[arg(short, long, default_value_t = 1)]
    num_games: usize,

    /// Colour that moves first
    #[arg(short, long, value_enum, default_value_t = Colour::Black)]
    starting_player: Colour,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Colour {
    Black,
    White,
}

impl From<Colour> for Player {
    fn from(colour: Colour) -> Self {
        match colour {
            Colour::Black => Player::Black,
            Colour::White => Player::White,
        }
    }
}

#[derive(Default)]
struct Tally {
    black: usize,
    white: usize,
    draws: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    initialize_logging(args.log_level);

    let config = GameConfig {
        starting_player: args.starting_player.into(),
        ai: AiControls::BOTH,
        ..GameConfig::default()
    };

    let mut tally = Tally::default();
    for game_idx in 0..args.num_games {
        let start = Instant::now();
        let mut session = Session::new_with_default_strategy(config)?;

        while session.step_ai().is_some() {}

        let state = session.state();
        let Some(result) = state.result() else {
            return Err(format!("game {game_idx} stalled before reaching a result").into());
        };
        debug!("final board\n{}", state.board());
        info!(
            game_idx,
            outcome = ?result.outcome,
            black = result.black_count,
            white = result.white_count,
            plies = state.history().len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "game finished"
        );
        match result.outcome {
            Outcome::Winner(Player::Black) => tally.black += 1,
            Outcome::Winner(Player::White) => tally.white += 1,
            Outcome::Draw => tally.draws += 1,
        }
    }

    info!(
        black_wins = tally.black,
        white_wins = tally.white,
        draws = tally.draws,
        "self-play finished"
    );
    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_player_is_validated_by_clap() {
        let args = Args::try_parse_from(["selfplay", "--starting-player", "white"]).unwrap();
        assert_eq!(Player::from(args.starting_player), Player::White);

        let args = Args::try_parse_from(["selfplay"]).unwrap();
        assert_eq!(Player::from(args.starting_player), Player::Black);

        assert!(Args::try_parse_from(["selfplay", "--starting-player", "red"]).is_err());
    }
}
