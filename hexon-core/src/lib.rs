//! HEXON Core - Hex game engine
//!
//! This crate provides the game logic and computer players for Hex:
//! - Board geometry (rhombus of hex cells in axial coordinates)
//! - Win detection by flood fill from the last stone
//! - Bridge/link structural heuristic and its lossy cache
//! - Minimax and alpha-beta search
//! - Move selection for the computer players

pub mod board;
pub mod error;
pub mod win;
pub mod eval;
pub mod cache;
pub mod search;
pub mod config;
pub mod ai;
pub mod game;

// Re-exports for convenient access
pub use board::{all_coords, Board, Cell, Color, Coord, DIRECTIONS, MAX_AI_DIM, MAX_DIM};
pub use error::HexError;
pub use win::{is_winning_move, WinDetector};
pub use eval::{bridge_score, connection_score, score_structure, BridgeEvaluator, Evaluator, RandomEvaluator, ResistanceEvaluator};
pub use cache::{digest, measure_collisions, CacheStats, CollisionReport, EvalCache};
pub use search::{Search, SearchStats, SEARCH_WINDOW, WIN_SCORE};
pub use config::{
    Difficulty, EngineConfig, GameConfig, PlayerKind, Strategy, TieBreak, DEFAULT_HORIZON,
};
pub use ai::{create_rng, Engine};
pub use game::{Game, GameResult, MoveOutcome};
