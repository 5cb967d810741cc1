//! Play command - one game between humans and/or engines
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: start_session(), play_game()
//! - Level 3: next_move(), read_human_move()
//! - Level 4: parse_move(), formatting utilities

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use hexon_core::{
    Board, Color, Coord, Difficulty, Engine, EngineConfig, Game, GameConfig, MoveOutcome,
    PlayerKind, DEFAULT_HORIZON,
};

use crate::config::{parse_difficulty, parse_player_kind};
use crate::save::{SavedGame, DEFAULT_SAVE_PATH};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Board side length
    #[arg(long, default_value = "5")]
    pub dim: usize,

    /// Black player (human, random, bridges, electric); Black moves first
    #[arg(long, default_value = "human", value_parser = parse_player_kind)]
    pub black: PlayerKind,

    /// White player (human, random, bridges, electric)
    #[arg(long, default_value = "bridges", value_parser = parse_player_kind)]
    pub white: PlayerKind,

    /// Engine strength (easy, medium, hard, nash, nash-blind); sets the
    /// search horizon of engine players, overriding the configured one
    #[arg(long, default_value = "medium", value_parser = parse_difficulty)]
    pub difficulty: Difficulty,

    /// Resume a saved game (overrides dim, players and difficulty)
    #[arg(long, value_name = "FILE")]
    pub load: Option<PathBuf>,

    /// Where typing `save` writes the game
    #[arg(long, value_name = "FILE", default_value = DEFAULT_SAVE_PATH)]
    pub save_path: PathBuf,
}

/// How a game loop ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Ending {
    Won(Color),
    Saved,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Build or restore the game
/// 2. Alternate moves until a connection is made or a human saves
/// 3. Announce the result
pub fn run(args: PlayArgs, engine_config: EngineConfig) -> Result<()> {
    let (config, mut game) = start_session(&args)?;

    tracing::info!(
        "Starting {}x{} game: {:?} (Black) vs {:?} (White), {:?}",
        config.dim,
        config.dim,
        config.black,
        config.white,
        config.difficulty
    );

    if overrides_configured_horizon(&config, &engine_config) {
        tracing::warn!(
            "Configured horizon {} ignored: {:?} searches {} plies",
            engine_config.horizon,
            config.difficulty,
            config.difficulty.horizon()
        );
    }

    let mut engine = Engine::new(engine_config);
    engine.new_game();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let ending = play_game(&config, &mut game, &mut engine, &mut input)?;

    match ending {
        Ending::Won(color) => {
            println!("{}", game.board());
            println!("{} wins after {} stones", color, game.turn());
            tracing::info!("Game finished: {} wins", color);
        }
        Ending::Saved => {
            SavedGame::capture(&config, &game).store(&args.save_path)?;
            println!("Game saved to {}", args.save_path.display());
        }
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// New game from the arguments, or the saved one from `--load`
fn start_session(args: &PlayArgs) -> Result<(GameConfig, Game)> {
    if let Some(path) = &args.load {
        return SavedGame::load(path)?
            .restore()
            .with_context(|| format!("Cannot resume save file: {}", path.display()));
    }

    let config = GameConfig {
        dim: args.dim,
        black: args.black,
        white: args.white,
        difficulty: args.difficulty,
    };
    config.validate()?;
    let game = Game::new(config.dim)?;
    Ok((config, game))
}

/// Alternate moves until the game ends or a human asks to save
fn play_game<R: BufRead>(
    config: &GameConfig,
    game: &mut Game,
    engine: &mut Engine,
    input: &mut R,
) -> Result<Ending> {
    let horizon = config.difficulty.horizon();
    let show_board = !config.difficulty.is_blind();

    loop {
        let color = game.to_move();
        let kind = player_for(config, color);

        let at = next_move(kind, game, engine, horizon, show_board, input)?;
        if at.is_save_signal() {
            return Ok(Ending::Saved);
        }

        match game.play(at) {
            Ok(MoveOutcome::Won(winner)) => return Ok(Ending::Won(winner)),
            Ok(MoveOutcome::Continue) => {
                if announces_move(kind, show_board) {
                    println!("{} plays {}", color, at);
                }
            }
            Err(err) if kind == PlayerKind::Human => println!("Illegal move: {}", err),
            Err(err) => return Err(err).context("Engine produced an illegal move"),
        }
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn player_for(config: &GameConfig, color: Color) -> PlayerKind {
    match color {
        Color::Black => config.black,
        Color::White => config.white,
    }
}

/// Ask the player in charge of the side to move for a coordinate
fn next_move<R: BufRead>(
    kind: PlayerKind,
    game: &Game,
    engine: &mut Engine,
    horizon: u32,
    show_board: bool,
    input: &mut R,
) -> Result<Coord> {
    let color = game.to_move();
    match kind.strategy() {
        Some(strategy) => engine
            .choose_move(strategy, game.board(), color, horizon)
            .context("No empty cell left to play"),
        None => {
            if show_board {
                println!("{}", game.board());
            }
            read_human_move(input, game.board(), color)
        }
    }
}

/// Prompt until the human types a parseable coordinate or `save`
fn read_human_move<R: BufRead>(input: &mut R, board: &Board, color: Color) -> Result<Coord> {
    let mut line = String::new();
    loop {
        print!("{} to move (e.g. c4, or 'save'): ", color);
        io::stdout().flush().context("Failed to flush stdout")?;

        line.clear();
        let read = input.read_line(&mut line).context("Failed to read move")?;
        if read == 0 {
            bail!("Input closed before the game finished");
        }

        match parse_move(&line, board.dim()) {
            Ok(at) => return Ok(at),
            Err(msg) => println!("{}", msg),
        }
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Did the configuration ask for a horizon other than the difficulty's?
fn overrides_configured_horizon(config: &GameConfig, engine_config: &EngineConfig) -> bool {
    engine_config.horizon != DEFAULT_HORIZON && engine_config.horizon != config.difficulty.horizon()
}

/// Engine moves are echoed, except in blind games
fn announces_move(kind: PlayerKind, show_board: bool) -> bool {
    kind != PlayerKind::Human && show_board
}

/// Parse `c4` style labels (column letter, 1-based row) or `save`
fn parse_move(text: &str, dim: usize) -> Result<Coord, String> {
    let text = text.trim().to_ascii_lowercase();
    if text == "save" {
        return Ok(Coord::SAVE);
    }

    let mut chars = text.chars();
    let column = match chars.next() {
        Some(c) if c.is_ascii_lowercase() => (c as u8 - b'a') as usize,
        _ => return Err(format!("Cannot read '{}': expected a column letter", text)),
    };
    let row: usize = chars
        .as_str()
        .parse()
        .map_err(|_| format!("Cannot read '{}': expected a row number", text))?;

    if column >= dim || row == 0 || row > dim {
        return Err(format!("'{}' is off the {}x{} board", text, dim, dim));
    }
    Ok(Coord::new(column as i8, (row - 1) as i8))
}

// ============================================================================
// TESTS
// ============================================================================
