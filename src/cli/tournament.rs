//! Tournament command implementation.

use super::output::{
    format_tournament_csv, format_tournament_text, JsonTournamentResult, TournamentStats,
};
use super::{seed_or_random, CliError, MatchOverrides, TournamentFormat};
use critmass::tournament::run_game;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::time::Instant;
use tracing::warn;

/// Arguments for `critmass tournament`.
#[derive(Debug, clap::Args)]
pub(crate) struct TournamentArgs {
    #[command(flatten)]
    overrides: MatchOverrides,

    /// Number of games to run (seeds increment from the base seed)
    #[arg(short, long, default_value = "1000")]
    games: u64,

    /// Parallel threads (default: CPU count)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Output format: text, json, or csv
    #[arg(short, long, default_value = "text")]
    format: TournamentFormat,

    /// Show progress bar
    #[arg(long)]
    progress: bool,
}

/// Execute the tournament command.
///
/// # Errors
///
/// Returns an error if the config is invalid or the thread pool cannot start.
pub(crate) fn execute(args: &TournamentArgs) -> Result<(), CliError> {
    let config = args.overrides.resolve()?;
    let base_seed = seed_or_random(config.seed);
    let lineup = config.players.as_slice();
    let game_config = config.tournament();

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = args.threads {
        builder = builder.num_threads(n);
    }
    let pool = builder
        .build()
        .map_err(|e| CliError::new(format!("Failed to start thread pool: {e}")))?;

    let pb = if args.progress {
        let style = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})",
            )
            .map_err(|e| CliError::new(format!("Bad progress template: {e}")))?
            .progress_chars("=>-");
        Some(ProgressBar::new(args.games).with_style(style))
    } else {
        None
    };

    let start = Instant::now();

    // Each worker folds into its own stats; merged once at the end
    let stats = pool.install(|| {
        (0..args.games)
            .into_par_iter()
            .fold(
                || TournamentStats::new(lineup.len()),
                |mut local, i| {
                    let seed = base_seed.wrapping_add(i);
                    match run_game(seed, lineup, &game_config) {
                        Ok(result) => local.add_result(&result),
                        Err(e) => {
                            warn!(seed, error = %e, "game failed");
                            local.failures += 1;
                        }
                    }
                    if let Some(pb) = &pb {
                        pb.inc(1);
                    }
                    local
                },
            )
            .reduce(
                || TournamentStats::new(lineup.len()),
                |mut a, b| {
                    a.merge(&b);
                    a
                },
            )
    });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    #[allow(clippy::cast_precision_loss)]
    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match args.format {
        TournamentFormat::Text => {
            println!("Base seed: {base_seed}");
            print!("{}", format_tournament_text(&stats, lineup));
            println!();
            println!(
                "Duration: {:.2}s ({games_per_sec:.0} games/sec)",
                duration.as_secs_f64()
            );
        }
        TournamentFormat::Json => {
            let json =
                serde_json::to_string_pretty(&JsonTournamentResult::from_stats(&stats, lineup))?;
            println!("{json}");
        }
        TournamentFormat::Csv => {
            print!("{}", format_tournament_csv(&stats, lineup));
        }
    }

    Ok(())
}
