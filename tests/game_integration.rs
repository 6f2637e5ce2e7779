//! Whole-game integration tests: bots, tournament batches and config files.
//!
//! These tests verify that complete games always end, that results are
//! reproducible from the seed, and that config files drive the same runs.
//!
//! Run with: cargo test --release game_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::io::Write;

use critmass::bot::{choose_move, legal_moves, Strategy};
use critmass::config::{ConfigError, MatchConfig};
use critmass::game::{check_invariants, check_roster, GameState, INTERACTIVE_MAX_STEPS};
use critmass::tournament::{run_batch, run_game, GameEnd, Rng, TournamentConfig};

#[test]
fn test_many_seeds_all_terminate() {
    let config = TournamentConfig::default();
    let lineup = [Strategy::Greedy, Strategy::Random, Strategy::Random, Strategy::Greedy];
    for seed in 0..25 {
        let result = run_game(seed, &lineup, &config).unwrap();
        assert!(result.moves_played <= config.max_moves);
        match result.end {
            GameEnd::Won => {
                let winner = result.winner.unwrap();
                assert_eq!(result.elimination_order.len(), lineup.len() - 1);
                assert!(!result.elimination_order.contains(&winner));
            }
            GameEnd::ChainLimit => assert_eq!(result.safety_limit_hits, 1),
            GameEnd::Stalemate | GameEnd::MoveLimit => assert!(result.winner.is_none()),
        }
    }
}

#[test]
fn test_greedy_beats_random_more_often_than_not() {
    let config = TournamentConfig {
        rows: 5,
        cols: 5,
        ..TournamentConfig::default()
    };
    let seeds: Vec<u64> = (0..40).collect();
    let results = run_batch(&seeds, &[Strategy::Greedy, Strategy::Random], &config, None).unwrap();
    let greedy = results.iter().filter(|r| r.winner == Some(1)).count();
    let random = results.iter().filter(|r| r.winner == Some(2)).count();
    assert!(greedy > random, "greedy {greedy} vs random {random}");
}

#[test]
fn test_batch_is_reproducible_across_thread_counts() {
    let config = TournamentConfig {
        rows: 4,
        cols: 6,
        ..TournamentConfig::default()
    };
    let lineup = [Strategy::Random, Strategy::Greedy, Strategy::Random];
    let seeds: Vec<u64> = (1000..1016).collect();
    let one = run_batch(&seeds, &lineup, &config, Some(1)).unwrap();
    let four = run_batch(&seeds, &lineup, &config, Some(4)).unwrap();
    assert_eq!(one, four);
}

#[test]
fn test_hand_driven_game_keeps_invariants() {
    let mut state = GameState::interactive(5, 5, &[1, 2, 3]).unwrap().start().unwrap();
    let mut rng = Rng::new(77);
    let mut moves = 0;

    while !state.is_finished() && moves < 500 {
        let player = state.current_player().unwrap();
        let coord = choose_move(&state, player, Strategy::Random, &mut rng).unwrap();
        assert!(legal_moves(state.board(), player).contains(&coord));

        let turn = state.apply(player, coord).unwrap();
        assert!(turn.chain.len() <= INTERACTIVE_MAX_STEPS);
        assert!(check_invariants(turn.state.board()).is_empty());
        assert!(check_roster(turn.state.roster()).is_empty());
        assert_eq!(turn.state.moves_played(), state.moves_played() + 1);
        state = turn.state;
        moves += 1;
    }

    if state.is_finished() {
        assert!(state.current_player().is_none());
        if let Some(winner) = state.winner() {
            assert_eq!(state.board().charge_of(winner), state.board().total_charge());
        }
    }
}

#[test]
fn test_config_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "rows = 4\ncols = 5\nplayers = [\"greedy\", \"random\"]\nmax_moves = 300\nseed = 7"
    )
    .unwrap();

    let config = MatchConfig::load(file.path()).unwrap();
    assert_eq!((config.rows, config.cols), (4, 5));
    assert_eq!(config.seed, Some(7));

    let tournament = config.tournament();
    assert_eq!(tournament.max_moves, 300);
    let a = run_game(7, &config.players, &tournament).unwrap();
    let b = run_game(7, &config.players, &tournament).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_config_file_errors() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "rows = \"six\"").unwrap();
    assert!(matches!(
        MatchConfig::load(file.path()),
        Err(ConfigError::Parse { .. })
    ));

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "players = [\"random\"]").unwrap();
    assert!(matches!(
        MatchConfig::load(file.path()),
        Err(ConfigError::Invalid { .. })
    ));

    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        MatchConfig::load(&dir.path().join("missing.toml")),
        Err(ConfigError::Io { .. })
    ));
}
