//! Match command - play games between two engine players
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: validate_players(), play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use hexon_core::{
    Color, Difficulty, Engine, EngineConfig, Game, GameConfig, GameResult, MoveOutcome, PlayerKind,
};

use crate::config::parse_player_kind;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// First player (random, bridges, electric); Black in odd-numbered games
    #[arg(long, default_value = "bridges", value_parser = parse_player_kind)]
    pub first: PlayerKind,

    /// Second player (random, bridges, electric)
    #[arg(long, default_value = "random", value_parser = parse_player_kind)]
    pub second: PlayerKind,

    /// Number of games to play (will alternate colors)
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Board side length
    #[arg(long, default_value = "5")]
    pub dim: usize,

    /// Search horizon (defaults to the engine configuration)
    #[arg(long)]
    pub horizon: Option<u32>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    black: PlayerKind,
    white: PlayerKind,
    result: GameResult,
    stones: usize,
    first_won: bool,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    first_wins: usize,
    second_wins: usize,
    black_wins: usize,
    white_wins: usize,
    avg_stones: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Check both players can play unattended on this board
/// 2. Play the match (multiple games)
/// 3. Report results
pub fn run(args: MatchArgs, engine_config: EngineConfig) -> Result<()> {
    validate_players(&args)?;

    let horizon = args.horizon.unwrap_or(engine_config.horizon);
    tracing::info!(
        "Starting match: {:?} vs {:?} ({} games, {}x{}, horizon={})",
        args.first,
        args.second,
        args.games,
        args.dim,
        args.dim,
        horizon
    );

    let mut engine = Engine::new(engine_config.with_horizon(horizon));
    let results = play_match(&args, &mut engine)?;

    report_results(&results, &args);
    tracing::info!(
        "Match finished: {} wins for {:?}, {} for {:?}",
        results.first_wins,
        args.first,
        results.second_wins,
        args.second
    );

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn validate_players(args: &MatchArgs) -> Result<()> {
    if args.first == PlayerKind::Human || args.second == PlayerKind::Human {
        bail!("Matches are played between engines; use `hexon play` for human players");
    }
    GameConfig {
        dim: args.dim,
        black: args.first,
        white: args.second,
        difficulty: Difficulty::default(),
    }
    .validate()?;
    Ok(())
}

/// Play all games in the match
fn play_match(args: &MatchArgs, engine: &mut Engine) -> Result<MatchResults> {
    let progress = ProgressBar::new(args.games as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} games ({eta})")
            .context("Invalid progress bar template")?,
    );

    let mut games = Vec::with_capacity(args.games);
    for game_num in 0..args.games {
        // Alternate colors for fairness
        let swap_colors = game_num % 2 == 1;
        let (black, white) = if swap_colors {
            (args.second, args.first)
        } else {
            (args.first, args.second)
        };

        let mut record = play_single_game(black, white, args.dim, engine)?;
        record.game_number = game_num + 1;
        record.first_won = match record.result {
            GameResult::BlackWins => !swap_colors,
            GameResult::WhiteWins => swap_colors,
            GameResult::Ongoing => false,
        };

        tracing::debug!(
            "Game {}: {:?} ({} stones)",
            record.game_number,
            record.result,
            record.stones
        );

        games.push(record);
        progress.inc(1);
    }
    progress.finish_and_clear();

    Ok(compute_match_statistics(games))
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) {
    if args.json {
        print_json_results(results, args);
    } else {
        print_text_results(results, args);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game to completion. The cache starts empty every game.
fn play_single_game(
    black: PlayerKind,
    white: PlayerKind,
    dim: usize,
    engine: &mut Engine,
) -> Result<GameRecord> {
    let mut game = Game::new(dim)?;
    engine.new_game();
    let horizon = engine.config().horizon;

    loop {
        let color = game.to_move();
        let kind = match color {
            Color::Black => black,
            Color::White => white,
        };
        let strategy = kind
            .strategy()
            .context("Matches are played between engines")?;
        let at = engine
            .choose_move(strategy, game.board(), color, horizon)
            .context("Board filled up without a winner")?;

        if let MoveOutcome::Won(_) = game.play(at)? {
            break;
        }
    }

    Ok(GameRecord {
        game_number: 0,
        black,
        white,
        result: game.result(),
        stones: game.turn(),
        first_won: false,
    })
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let first_wins = games.iter().filter(|g| g.first_won).count();
    let decided = games
        .iter()
        .filter(|g| g.result != GameResult::Ongoing)
        .count();
    let black_wins = games
        .iter()
        .filter(|g| g.result == GameResult::BlackWins)
        .count();
    let white_wins = games
        .iter()
        .filter(|g| g.result == GameResult::WhiteWins)
        .count();

    let total_stones: usize = games.iter().map(|g| g.stones).sum();
    let avg_stones = if games.is_empty() {
        0.0
    } else {
        total_stones as f32 / games.len() as f32
    };

    MatchResults {
        games,
        first_wins,
        second_wins: decided - first_wins,
        black_wins,
        white_wins,
        avg_stones,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn percent(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults, args: &MatchArgs) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        black: PlayerKind,
        white: PlayerKind,
        result: GameResult,
        stones: usize,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        first: PlayerKind,
        second: PlayerKind,
        dim: usize,
        total_games: usize,
        first_wins: usize,
        second_wins: usize,
        black_wins: usize,
        white_wins: usize,
        avg_stones: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        first: args.first,
        second: args.second,
        dim: args.dim,
        total_games: results.games.len(),
        first_wins: results.first_wins,
        second_wins: results.second_wins,
        black_wins: results.black_wins,
        white_wins: results.white_wins,
        avg_stones: results.avg_stones,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                black: g.black,
                white: g.white,
                result: g.result,
                stones: g.stones,
            })
            .collect(),
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(err) => tracing::warn!("Failed to serialize match results: {}", err),
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults, args: &MatchArgs) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Total games: {}", total);
    println!(
        "{:?} (first):  {} ({:.1}%)",
        args.first,
        results.first_wins,
        percent(results.first_wins, total)
    );
    println!(
        "{:?} (second): {} ({:.1}%)",
        args.second,
        results.second_wins,
        percent(results.second_wins, total)
    );
    println!(
        "Black wins:  {} ({:.1}%)",
        results.black_wins,
        percent(results.black_wins, total)
    );
    println!(
        "White wins:  {} ({:.1}%)",
        results.white_wins,
        percent(results.white_wins, total)
    );
    println!("Avg stones:  {:.1}", results.avg_stones);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {:?} (Black) vs {:?} (White): {:?} in {} stones",
            game.game_number, game.black, game.white, game.result, game.stones
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
