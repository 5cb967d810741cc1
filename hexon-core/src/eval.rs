//! Position evaluation
//!
//! The structural heuristic counts two patterns around every stone:
//! - bridges: two-step jumps to a same-colored stone (hard to cut)
//! - direct links: same-colored neighbors
//!
//! Each color weights its patterns along its own connection axis, so the two
//! weight tables are mirror images of each other.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::board::{Board, Cell, Color, Coord, DIRECTIONS};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Two-step "bridge" offsets (dx, dy)
pub const BRIDGE_OFFSETS: [(i8, i8); 6] = [
    (-1, -1),
    (1, -2),
    (2, -1),
    (1, 1),
    (-1, 2),
    (-2, 1),
];

const BLACK_BRIDGE_WEIGHTS: [i32; 6] = [2, 3, 1, 2, 3, 1];
const WHITE_BRIDGE_WEIGHTS: [i32; 6] = [2, 1, 3, 2, 1, 3];

/// Link weights follow `DIRECTIONS` (N, NE, E, S, SW, W)
const BLACK_LINK_WEIGHTS: [i32; 6] = [3, 2, 1, 3, 2, 1];
const WHITE_LINK_WEIGHTS: [i32; 6] = [1, 2, 3, 1, 2, 3];

/// Own structure is rewarded at half the rate opposing structure is punished
const OWN_BRIDGE_FACTOR: i32 = 2;
const OWN_LINK_FACTOR: i32 = 1;
const OPPONENT_BRIDGE_FACTOR: i32 = 4;
const OPPONENT_LINK_FACTOR: i32 = 2;

/// Pattern score of an empty cell
pub const EMPTY_CELL_SCORE: i32 = -1;
/// Pattern score of an off-board cell
pub const OFF_BOARD_SCORE: i32 = -2;

/// Range of the random evaluator
const RANDOM_SCORE_RANGE: std::ops::RangeInclusive<i32> = -40..=40;

// ============================================================================
// PATTERN SCORES
// ============================================================================

fn bridge_weights(color: Color) -> &'static [i32; 6] {
    match color {
        Color::Black => &BLACK_BRIDGE_WEIGHTS,
        Color::White => &WHITE_BRIDGE_WEIGHTS,
    }
}

fn link_weights(color: Color) -> &'static [i32; 6] {
    match color {
        Color::Black => &BLACK_LINK_WEIGHTS,
        Color::White => &WHITE_LINK_WEIGHTS,
    }
}

/// Sum the weights of offsets whose target holds the same color as `at`
fn weighted_pattern(
    board: &Board,
    at: Coord,
    offsets: &[(i8, i8); 6],
    weights: fn(Color) -> &'static [i32; 6],
) -> i32 {
    let color = match board.get(at) {
        None => return OFF_BOARD_SCORE,
        Some(cell) => match cell.color() {
            Some(color) => color,
            None => return EMPTY_CELL_SCORE,
        },
    };
    let stone = Cell::from(color);

    offsets
        .iter()
        .zip(weights(color))
        .filter(|&(&offset, _)| board.holds(at.offset(offset), stone))
        .map(|(_, &w)| w)
        .sum()
}

/// Weighted count of bridges around the stone at `at`.
///
/// Returns [`EMPTY_CELL_SCORE`] for an empty cell and [`OFF_BOARD_SCORE`]
/// off the board.
pub fn bridge_score(board: &Board, at: Coord) -> i32 {
    weighted_pattern(board, at, &BRIDGE_OFFSETS, bridge_weights)
}

/// Weighted count of direct same-colored neighbors of the stone at `at`.
///
/// Same sentinels as [`bridge_score`].
pub fn connection_score(board: &Board, at: Coord) -> i32 {
    weighted_pattern(board, at, &DIRECTIONS, link_weights)
}

/// Signed structural advantage of `color` (positive favors `color`)
pub fn score_structure(board: &Board, color: Color) -> i32 {
    let mut total = 0;
    for (at, owner) in board.stones() {
        let bridges = bridge_score(board, at);
        let links = connection_score(board, at);
        if owner == color {
            total += OWN_BRIDGE_FACTOR * bridges + OWN_LINK_FACTOR * links;
        } else {
            total -= OPPONENT_BRIDGE_FACTOR * bridges + OPPONENT_LINK_FACTOR * links;
        }
    }
    total
}

// ============================================================================
// EVALUATORS
// ============================================================================

/// Leaf evaluation strategy for the unpruned search
pub trait Evaluator {
    /// Score `board` from `color`'s point of view
    fn evaluate(&mut self, board: &Board, color: Color) -> i32;
}

/// Uncached structural heuristic
#[derive(Clone, Copy, Debug, Default)]
pub struct BridgeEvaluator;

impl Evaluator for BridgeEvaluator {
    fn evaluate(&mut self, board: &Board, color: Color) -> i32 {
        score_structure(board, color)
    }
}

/// Electrical-resistance evaluation. Not implemented: always 0.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResistanceEvaluator;

impl Evaluator for ResistanceEvaluator {
    fn evaluate(&mut self, _board: &Board, _color: Color) -> i32 {
        0
    }
}

/// Uniform noise in `[-40, 40]`
#[derive(Clone, Debug)]
pub struct RandomEvaluator {
    rng: ChaCha8Rng,
}

impl RandomEvaluator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Evaluator for RandomEvaluator {
    fn evaluate(&mut self, _board: &Board, _color: Color) -> i32 {
        self.rng.gen_range(RANDOM_SCORE_RANGE)
    }
}
