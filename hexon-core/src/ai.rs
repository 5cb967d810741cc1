//! Computer players

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::board::{Board, Color, Coord};
use crate::cache::{CacheStats, EvalCache};
use crate::config::{EngineConfig, Strategy, TieBreak};
use crate::search::{Search, SearchStats, SEARCH_WINDOW, WIN_SCORE};
use crate::win::WinDetector;

/// Create RNG from optional seed
pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Session object shared by every computer player of a program run.
///
/// Owns the evaluation cache, the win-detection scratch and the RNG. Call
/// [`Engine::new_game`] between games so cached scores never leak from one
/// game into the next.
pub struct Engine {
    config: EngineConfig,
    detector: WinDetector,
    cache: EvalCache,
    rng: ChaCha8Rng,
    last_stats: SearchStats,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let rng = create_rng(config.seed);
        Self {
            config,
            detector: WinDetector::default(),
            cache: EvalCache::new(),
            rng,
            last_stats: SearchStats::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Forget everything learned during the previous game
    pub fn new_game(&mut self) {
        self.cache.reset();
        self.last_stats = SearchStats::default();
    }

    pub fn cache(&self) -> &EvalCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Counters of the most recent `select_move`
    pub fn last_stats(&self) -> SearchStats {
        self.last_stats
    }

    /// Dispatch on the player's strategy. `None` when the board is full.
    pub fn choose_move(
        &mut self,
        strategy: Strategy,
        board: &Board,
        color: Color,
        horizon: u32,
    ) -> Option<Coord> {
        match strategy {
            Strategy::Random => self.random_move(board),
            Strategy::Bridges => self.select_move(board, color, horizon),
            Strategy::Electric => {
                tracing::debug!("electric strategy unavailable, playing at random");
                self.random_move(board)
            }
        }
    }

    /// Uniformly random empty cell
    pub fn random_move(&mut self, board: &Board) -> Option<Coord> {
        let empties: Vec<Coord> = board.empty_cells().collect();
        empties.choose(&mut self.rng).copied()
    }

    /// Pick a move for `color` by scoring every empty cell with alpha-beta
    /// `horizon` plies deep.
    ///
    /// The caller's board is left untouched; candidates are tried on a
    /// private copy.
    pub fn select_move(&mut self, board: &Board, color: Color, horizon: u32) -> Option<Coord> {
        let candidates: Vec<Coord> = board.empty_cells().collect();
        let tie_break = self.config.tie_break;

        let (mut best_move, mut best_score) = match tie_break {
            // Random incumbent carrying the losing score
            TieBreak::OneInThree => (Some(*candidates.choose(&mut self.rng)?), -WIN_SCORE),
            TieBreak::Uniform => (None, i32::MIN),
        };
        let mut ties: u32 = 0;

        let mut scratch = board.clone();
        let mut stats = SearchStats::default();

        for at in candidates {
            scratch.place(at, color);
            let mut search = Search::new(&mut scratch, color, &mut self.detector);
            let score =
                search.alpha_beta_min(at, -SEARCH_WINDOW, SEARCH_WINDOW, horizon, &mut self.cache);
            stats += search.stats();
            scratch.remove(at);

            tracing::debug!(%at, score, "candidate scored");

            let replace = if score > best_score {
                ties = 1;
                true
            } else if score == best_score {
                ties += 1;
                match tie_break {
                    TieBreak::OneInThree => self.rng.gen_range(0..3) == 0,
                    TieBreak::Uniform => self.rng.gen_range(0..ties) == 0,
                }
            } else {
                false
            };

            if replace {
                tracing::debug!(%at, score, "new best move");
                best_move = Some(at);
                best_score = score;
            }
        }

        self.last_stats = stats;
        let cache = self.cache.stats();
        if let Some(at) = best_move {
            tracing::info!(
                %color,
                %at,
                score = best_score,
                nodes = stats.nodes,
                cutoffs = stats.cutoffs,
                cache_hits = cache.hits,
                cache_misses = cache.misses,
                "engine move selected"
            );
        }
        best_move
    }
}

// ============================================================================
// TESTS
// ============================================================================
