//! Chain command implementation.
//!
//! Builds a position by hand, one placement at a time, and prints every
//! discharge round each placement sets off.

use std::str::FromStr;

use super::output::format_chain;
use super::CliError;
use critmass::game::{resolve_chain, Board, Coord, PlayerId, INTERACTIVE_MAX_STEPS};

/// One `ROW,COL:PLAYER` placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Placement {
    coord: Coord,
    player: PlayerId,
}

impl FromStr for Placement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (cell, player) = s
            .split_once(':')
            .ok_or_else(|| format!("expected ROW,COL:PLAYER, got '{s}'"))?;
        let (row, col) = cell
            .split_once(',')
            .ok_or_else(|| format!("expected ROW,COL before ':', got '{cell}'"))?;
        let parse = |part: &str, what: &str| {
            part.trim()
                .parse::<u8>()
                .map_err(|e| format!("bad {what} '{part}': {e}"))
        };
        Ok(Self {
            coord: Coord::new(parse(row, "row")?, parse(col, "column")?),
            player: parse(player, "player")?,
        })
    }
}

/// Arguments for `critmass chain`.
#[derive(Debug, clap::Args)]
pub(crate) struct ChainArgs {
    /// Board rows (3-20)
    #[arg(long, default_value = "6")]
    rows: u8,

    /// Board columns (3-20)
    #[arg(long, default_value = "9")]
    cols: u8,

    /// Placements in order, as ROW,COL:PLAYER
    #[arg(long = "place", required = true)]
    placements: Vec<Placement>,

    /// Step cap for each chain
    #[arg(long, default_value_t = INTERACTIVE_MAX_STEPS)]
    max_steps: usize,
}

/// Execute the chain command.
///
/// # Errors
///
/// Returns an error if the board size is invalid or a placement is rejected.
pub(crate) fn execute(args: &ChainArgs) -> Result<(), CliError> {
    let mut board = Board::new(args.rows, args.cols)?;

    for (i, placement) in args.placements.iter().enumerate() {
        let placed = board.place(placement.coord, placement.player)?;
        let outcome = resolve_chain(&placed, placement.player, args.max_steps);
        println!(
            "#{} player {} at {}:",
            i + 1,
            placement.player,
            placement.coord
        );
        print!("{}", format_chain(&outcome));
        board = outcome.final_board;
    }

    println!();
    println!("Final board (total charge {}):", board.total_charge());
    print!("{board}");
    Ok(())
}
