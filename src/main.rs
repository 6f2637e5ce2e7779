//! Critmass CLI - run, batch and inspect chain-reaction games.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Critmass - a deterministic chain-reaction grid conquest engine
#[derive(Parser, Debug)]
#[command(name = "critmass")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log engine activity at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a single game between bots, or against them with --human
    Run(cli::run::RunArgs),

    /// Run many games in parallel and aggregate statistics
    Tournament(cli::tournament::TournamentArgs),

    /// Place charges by hand and print every chain round
    Chain(cli::chain::ChainArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.command {
        Commands::Run(run) => cli::run::execute(&run),
        Commands::Tournament(tournament) => cli::tournament::execute(&tournament),
        Commands::Chain(chain) => cli::chain::execute(&chain),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
