//! Lossy evaluation cache
//!
//! Boards are keyed by a cheap 16-bit digest that collides often. A slot
//! that is already filled is returned as-is, even when it was written by a
//! different board with the same digest: the cache trades exactness for
//! speed, and callers accept that divergence.

use rand::Rng;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::board::{all_coords, Board, Cell, Color};
use crate::error::HexError;
use crate::eval::{score_structure, Evaluator};

/// Number of slots in each color's table
pub const CACHE_SLOTS: usize = 65_535;

/// 16-bit positional digest.
///
/// Every cell adds `4 + index(cell) * (row + col * dim)` with wrapping
/// arithmetic, where empty, black and white index as 0, 1 and 2.
pub fn digest(board: &Board) -> u16 {
    let dim = board.dim();
    let cells = board.cells();
    let mut acc: u16 = 0;
    for row in 0..dim {
        for col in 0..dim {
            let index: u16 = match cells[row * dim + col] {
                Cell::Empty => 0,
                Cell::Black => 1,
                Cell::White => 2,
            };
            let weight = (row + col * dim) as u16;
            acc = acc.wrapping_add(4u16.wrapping_add(index.wrapping_mul(weight)));
        }
    }
    acc
}

/// Map a digest to a slot of a `CACHE_SLOTS` table
#[inline]
fn slot(digest: u16) -> usize {
    digest as usize % CACHE_SLOTS
}

/// Hit/miss counters since the last reset
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// One fixed-size table per color, mapping digests to structural scores.
///
/// Session-scoped: allocate once, `reset` at every new game, drop at the end
/// of the session.
#[derive(Clone, Debug)]
pub struct EvalCache {
    tables: [Vec<Option<i32>>; 2],
    stats: CacheStats,
}

impl Default for EvalCache {
    fn default() -> Self {
        Self::new()
    }
}

impl EvalCache {
    pub fn new() -> Self {
        Self {
            tables: [vec![None; CACHE_SLOTS], vec![None; CACHE_SLOTS]],
            stats: CacheStats::default(),
        }
    }

    /// Forget every stored score
    pub fn reset(&mut self) {
        for table in &mut self.tables {
            table.fill(None);
        }
        self.stats = CacheStats::default();
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Number of filled slots for `color`
    pub fn occupancy(&self, color: Color) -> usize {
        self.tables[color.index()].iter().filter(|s| s.is_some()).count()
    }

    /// Structural score of `board` for `color`, served from the table when
    /// the digest slot is already filled.
    pub fn cached_score(&mut self, board: &Board, color: Color) -> i32 {
        let idx = slot(digest(board));
        let entry = &mut self.tables[color.index()][idx];
        match *entry {
            Some(score) => {
                self.stats.hits += 1;
                score
            }
            None => {
                let score = score_structure(board, color);
                *entry = Some(score);
                self.stats.misses += 1;
                score
            }
        }
    }
}

impl Evaluator for EvalCache {
    fn evaluate(&mut self, board: &Board, color: Color) -> i32 {
        self.cached_score(board, color)
    }
}

// ============================================================================
// COLLISION TEST BED
// ============================================================================

/// Outcome of [`measure_collisions`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CollisionReport {
    /// Random boards generated
    pub boards: usize,
    /// Cached scores (both colors) that differed from a fresh evaluation
    pub mismatches: usize,
    /// Distinct digests among the generated boards
    pub distinct_digests: usize,
}

impl CollisionReport {
    /// Fraction of lookups that returned a stale score
    pub fn mismatch_rate(&self) -> f64 {
        if self.boards == 0 {
            0.0
        } else {
            self.mismatches as f64 / (2 * self.boards) as f64
        }
    }
}

/// Fill random (not necessarily legal) boards, look each one up through a
/// fresh cache for both colors, and count cached scores that disagree with
/// `score_structure`.
pub fn measure_collisions<R: Rng>(
    dim: usize,
    iterations: usize,
    rng: &mut R,
) -> Result<CollisionReport, HexError> {
    let mut board = Board::new(dim)?;
    let mut cache = EvalCache::new();
    let mut digests = FxHashSet::default();
    let mut report = CollisionReport::default();

    for _ in 0..iterations {
        for at in all_coords(board.dim()) {
            match rng.gen_range(0..3) {
                0 => board.remove(at),
                1 => board.place(at, Color::Black),
                _ => board.place(at, Color::White),
            }
        }
        digests.insert(digest(&board));

        for color in [Color::Black, Color::White] {
            if cache.cached_score(&board, color) != score_structure(&board, color) {
                report.mismatches += 1;
            }
        }
        report.boards += 1;
    }

    report.distinct_digests = digests.len();
    tracing::debug!(
        boards = report.boards,
        mismatches = report.mismatches,
        distinct = report.distinct_digests,
        "collision test bed finished"
    );
    Ok(report)
}
