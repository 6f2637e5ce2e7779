//! Output formatting utilities for CLI.

use std::fmt::Write as _;

use critmass::bot::Strategy;
use critmass::game::{Board, ChainOutcome};
use critmass::tournament::{GameEnd, GameResult};
use serde::Serialize;

/// JSON-serializable game result.
#[derive(Debug, Serialize)]
pub(super) struct JsonGameResult<'a> {
    /// Strategy per seat, player 1 first.
    players: &'a [Strategy],
    /// Engine result.
    #[serde(flatten)]
    result: &'a GameResult,
    /// Final board, one string per row (only with `--show-board`).
    #[serde(skip_serializing_if = "Option::is_none")]
    board: Option<Vec<String>>,
}

impl<'a> JsonGameResult<'a> {
    /// Create from a result and, optionally, the final board.
    pub(super) fn new(
        result: &'a GameResult,
        players: &'a [Strategy],
        board: Option<&Board>,
    ) -> Self {
        Self {
            players,
            result,
            board: board.map(|b| b.to_string().lines().map(str::to_owned).collect()),
        }
    }
}

fn end_label(end: GameEnd) -> &'static str {
    match end {
        GameEnd::Won => "won",
        GameEnd::Stalemate => "stalemate",
        GameEnd::MoveLimit => "move limit",
        GameEnd::ChainLimit => "chain limit",
    }
}

/// Format a game result as human-readable text.
pub(super) fn format_text(
    result: &GameResult,
    players: &[Strategy],
    board: Option<&Board>,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Game Result (seed: {})", result.seed);
    if let Some(winner) = result.winner {
        let name = players
            .get(usize::from(winner).saturating_sub(1))
            .map_or_else(|| "unknown".to_string(), ToString::to_string);
        let _ = writeln!(output, "  Winner: Player {winner} ({name})");
    } else {
        let _ = writeln!(output, "  Winner: Draw ({})", end_label(result.end));
    }
    let _ = writeln!(output, "  Moves: {}", result.moves_played);
    let _ = writeln!(output, "  Longest chain: {} rounds", result.longest_chain);
    if result.safety_limit_hits > 0 {
        let _ = writeln!(output, "  Chain cap hits: {}", result.safety_limit_hits);
    }
    output.push('\n');

    for (i, strategy) in players.iter().enumerate() {
        let id = i + 1;
        let _ = write!(output, "  Player {id}: {strategy}");
        if let Some(pos) = result
            .elimination_order
            .iter()
            .position(|&p| usize::from(p) == id)
        {
            let _ = write!(output, " [eliminated #{}]", pos + 1);
        }
        output.push('\n');
    }

    if let Some(board) = board {
        let _ = write!(output, "\nFinal board:\n{board}");
    }

    output
}

/// Format every round of a chain reaction.
pub(super) fn format_chain(outcome: &ChainOutcome) -> String {
    let mut output = String::new();
    if outcome.is_empty() {
        output.push_str("  stable, no discharge\n");
        return output;
    }
    for step in &outcome.steps {
        let cells: Vec<String> = step.exploded.iter().map(ToString::to_string).collect();
        let _ = writeln!(
            output,
            "  round {}: {} discharged [{}]",
            step.index + 1,
            step.exploded.len(),
            cells.join(" ")
        );
        for line in step.board.to_string().lines() {
            let _ = writeln!(output, "    {line}");
        }
    }
    if outcome.game_won_early {
        output.push_str("  at most one player left holding charge\n");
    }
    if outcome.safety_limit_reached {
        output.push_str("  stopped at the step cap with cells still critical\n");
    }
    output
}

/// Tournament statistics for aggregated results.
#[derive(Debug, Default)]
pub(super) struct TournamentStats {
    /// Total games completed.
    pub(super) games_played: u64,
    /// Games the engine rejected.
    pub(super) failures: u64,
    /// Win count per seat.
    pub(super) wins: Vec<u64>,
    /// Games that ended without a winner.
    pub(super) draws: u64,
    /// Draws by every player losing their charge at once.
    stalemates: u64,
    /// Draws by move limit.
    move_limits: u64,
    /// Draws by chain step cap.
    chain_limits: u64,
    /// Total moves across all games.
    total_moves: u64,
    /// Longest chain seen in any game.
    longest_chain: usize,
}

impl TournamentStats {
    /// Create new stats for n players.
    pub(super) fn new(num_players: usize) -> Self {
        Self {
            wins: vec![0; num_players],
            ..Self::default()
        }
    }

    /// Add a game result to the stats.
    pub(super) fn add_result(&mut self, result: &GameResult) {
        self.games_played += 1;
        self.total_moves += u64::from(result.moves_played);
        self.longest_chain = self.longest_chain.max(result.longest_chain);

        match result.end {
            GameEnd::Won => {
                if let Some(slot) = result
                    .winner
                    .and_then(|w| self.wins.get_mut(usize::from(w).saturating_sub(1)))
                {
                    *slot += 1;
                }
            }
            GameEnd::Stalemate => self.stalemates += 1,
            GameEnd::MoveLimit => self.move_limits += 1,
            GameEnd::ChainLimit => self.chain_limits += 1,
        }
        if result.winner.is_none() {
            self.draws += 1;
        }
    }

    /// Merge another worker's stats into this one.
    pub(super) fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.failures += other.failures;
        for (a, b) in self.wins.iter_mut().zip(&other.wins) {
            *a += b;
        }
        self.draws += other.draws;
        self.stalemates += other.stalemates;
        self.move_limits += other.move_limits;
        self.chain_limits += other.chain_limits;
        self.total_moves += other.total_moves;
        self.longest_chain = self.longest_chain.max(other.longest_chain);
    }

    /// Get win rate for a seat (0.0-1.0).
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn win_rate(&self, player_idx: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins.get(player_idx).copied().unwrap_or(0) as f64 / self.games_played as f64
    }

    /// Get draw rate (0.0-1.0).
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn draw_rate(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.draws as f64 / self.games_played as f64
    }

    /// Get average game length in moves.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn avg_moves(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_moves as f64 / self.games_played as f64
    }
}

/// JSON-serializable tournament result.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentResult {
    /// Total games played.
    games_played: u64,
    /// Games the engine rejected.
    failures: u64,
    /// Per-seat statistics.
    players: Vec<JsonTournamentPlayer>,
    /// Number of draws.
    draws: u64,
    /// Draws where every player lost their charge together.
    stalemates: u64,
    /// Draws by move limit.
    move_limits: u64,
    /// Draws by chain step cap.
    chain_limits: u64,
    /// Average game length in moves.
    avg_moves: f64,
    /// Longest chain in any game.
    longest_chain: usize,
}

/// JSON-serializable per-seat tournament stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentPlayer {
    /// Player id (1-based).
    player: usize,
    /// Bot strategy.
    strategy: Strategy,
    /// Number of wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
}

impl JsonTournamentResult {
    /// Create from stats and lineup.
    pub(super) fn from_stats(stats: &TournamentStats, lineup: &[Strategy]) -> Self {
        let players = lineup
            .iter()
            .enumerate()
            .map(|(i, &strategy)| JsonTournamentPlayer {
                player: i + 1,
                strategy,
                wins: stats.wins.get(i).copied().unwrap_or(0),
                win_rate: stats.win_rate(i),
            })
            .collect();

        Self {
            games_played: stats.games_played,
            failures: stats.failures,
            players,
            draws: stats.draws,
            stalemates: stats.stalemates,
            move_limits: stats.move_limits,
            chain_limits: stats.chain_limits,
            avg_moves: stats.avg_moves(),
            longest_chain: stats.longest_chain,
        }
    }
}

/// Format tournament stats as human-readable text.
pub(super) fn format_tournament_text(stats: &TournamentStats, lineup: &[Strategy]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Tournament Results ({} games)", stats.games_played);
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for (i, strategy) in lineup.iter().enumerate() {
        let wins = stats.wins.get(i).copied().unwrap_or(0);
        let rate = stats.win_rate(i) * 100.0;
        let _ = writeln!(output, "  Player {} ({strategy}): {rate:.1}% ({wins} wins)", i + 1);
    }
    let _ = writeln!(
        output,
        "  Draws: {} ({:.1}%): {} stalemate, {} move limit, {} chain limit\n",
        stats.draws,
        stats.draw_rate() * 100.0,
        stats.stalemates,
        stats.move_limits,
        stats.chain_limits
    );

    let _ = writeln!(output, "Average Game Length: {:.0} moves", stats.avg_moves());
    let _ = writeln!(output, "Longest Chain: {} rounds", stats.longest_chain);
    if stats.failures > 0 {
        let _ = writeln!(output, "Failed Games: {}", stats.failures);
    }

    output
}

/// Format tournament stats as CSV.
pub(super) fn format_tournament_csv(stats: &TournamentStats, lineup: &[Strategy]) -> String {
    let mut output = String::new();

    output.push_str("player,strategy,wins,win_rate\n");
    for (i, strategy) in lineup.iter().enumerate() {
        let _ = writeln!(
            output,
            "{},{strategy},{},{:.4}",
            i + 1,
            stats.wins.get(i).copied().unwrap_or(0),
            stats.win_rate(i)
        );
    }
    let _ = writeln!(output, "draw,,{},{:.4}", stats.draws, stats.draw_rate());

    output
}
