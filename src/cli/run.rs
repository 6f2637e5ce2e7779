//! Run command implementation.
//!
//! With no `--human` seats the game is played out by bots through the
//! tournament runner. Human seats switch to a turn-by-turn loop that reads
//! moves from stdin.

use std::io::{self, BufRead, Write};

use super::output::{format_chain, format_text, JsonGameResult};
use super::{seed_or_random, CliError, MatchOverrides, OutputFormat};
use critmass::bot::{choose_move, PlayerKind, Strategy};
use critmass::config::MatchConfig;
use critmass::game::{Coord, GameState, PlayerId, INTERACTIVE_MAX_STEPS};
use critmass::tournament::{play_game, Rng};

/// Arguments for `critmass run`.
#[derive(Debug, clap::Args)]
pub(crate) struct RunArgs {
    #[command(flatten)]
    overrides: MatchOverrides,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Print the final board
    #[arg(long)]
    show_board: bool,

    /// Seat (1-based) played from stdin instead of by its bot; repeatable
    #[arg(long = "human")]
    humans: Vec<PlayerId>,
}

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the config is invalid or the game fails to run.
pub(crate) fn execute(args: &RunArgs) -> Result<(), CliError> {
    let config = args.overrides.resolve()?;
    let seed = seed_or_random(config.seed);

    if !args.humans.is_empty() {
        let seats = seat_kinds(&config.players, &args.humans)?;
        let stdin = io::stdin();
        return play_interactive(&config, &seats, seed, &mut stdin.lock());
    }

    let (result, state) = play_game(seed, &config.players, &config.tournament())?;
    let board = args.show_board.then(|| state.board());

    match args.format {
        OutputFormat::Text => {
            print!("{}", format_text(&result, &config.players, board));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonGameResult::new(
                &result,
                &config.players,
                board,
            ))?;
            println!("{json}");
        }
    }

    Ok(())
}

/// Who controls each seat, given the configured bots and the human seats.
fn seat_kinds(lineup: &[Strategy], humans: &[PlayerId]) -> Result<Vec<PlayerKind>, CliError> {
    if let Some(&seat) = humans
        .iter()
        .find(|&&h| h == 0 || usize::from(h) > lineup.len())
    {
        return Err(CliError::new(format!(
            "--human {seat}: seats are 1..={}",
            lineup.len()
        )));
    }
    Ok(lineup
        .iter()
        .zip(1..)
        .map(|(&strategy, seat)| {
            if humans.contains(&seat) {
                PlayerKind::Human
            } else {
                PlayerKind::Ai(strategy)
            }
        })
        .collect())
}

/// Parse a `ROW,COL` move.
fn parse_coord(line: &str) -> Option<Coord> {
    let (row, col) = line.trim().split_once(',')?;
    Some(Coord::new(row.trim().parse().ok()?, col.trim().parse().ok()?))
}

/// Play one game turn by turn, asking `input` for human moves.
fn play_interactive(
    config: &MatchConfig,
    seats: &[PlayerKind],
    seed: u64,
    input: &mut impl BufRead,
) -> Result<(), CliError> {
    let players: Vec<PlayerId> = (1..).take(seats.len()).collect();
    let mut rngs: Vec<Rng> = players.iter().map(|&p| Rng::for_player(seed, p)).collect();
    let mut state =
        GameState::new(config.rows, config.cols, &players, INTERACTIVE_MAX_STEPS)?.start()?;

    while !state.is_finished() && state.moves_played() < config.max_moves {
        let Some(player) = state.current_player() else {
            break;
        };
        let seat = usize::from(player - 1);

        let coord = match seats[seat].strategy() {
            Some(strategy) => choose_move(&state, player, strategy, &mut rngs[seat])
                .ok_or_else(|| CliError::new(format!("player {player} has no legal move")))?,
            None => read_move(&state, player, input)?,
        };

        let turn = state.apply(player, coord)?;
        println!("Player {player} -> {coord}");
        print!("{}", format_chain(&turn.chain));
        for out in &turn.eliminated {
            println!("Player {out} eliminated");
        }
        state = turn.state;
    }

    println!();
    print!("{}", state.board());
    match state.winner() {
        Some(winner) => println!("Winner: Player {winner}"),
        None => println!("Draw after {} moves", state.moves_played()),
    }
    Ok(())
}

/// Prompt until `player` enters a move the engine accepts.
fn read_move(
    state: &GameState,
    player: PlayerId,
    input: &mut impl BufRead,
) -> Result<Coord, CliError> {
    loop {
        println!();
        print!("{}", state.board());
        print!("Player {player}, move as ROW,COL: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(CliError::new("input closed before the game finished"));
        }
        let Some(coord) = parse_coord(&line) else {
            eprintln!("expected ROW,COL, got '{}'", line.trim());
            continue;
        };
        match state.validate(player, coord) {
            Ok(_) => return Ok(coord),
            Err(e) => eprintln!("{e}"),
        }
    }
}
