//! Game-tree search: unpruned minimax and alpha-beta
//!
//! Every call judges the position right after the *caller* placed a stone at
//! `last`. Its first step is the terminal check on that stone:
//! - entering a minimizing node, the stone was the root color's, so a win is
//!   `+WIN_SCORE`
//! - entering a maximizing node, the stone was the opponent's, so a win is
//!   `-WIN_SCORE`
//!
//! Leaves are always scored from the root color's point of view. The board is
//! mutated in place and every simulated stone is removed before returning.

use std::ops::AddAssign;

use serde::Serialize;

use crate::board::{all_coords, Board, Color, Coord};
use crate::cache::EvalCache;
use crate::eval::Evaluator;
use crate::win::WinDetector;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Terminal value of a decided game
pub const WIN_SCORE: i32 = 100;

/// Initial alpha-beta window is `(-SEARCH_WINDOW, SEARCH_WINDOW)`
pub const SEARCH_WINDOW: i32 = 1000;

// ============================================================================
// STATISTICS
// ============================================================================

/// Node counters for one search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Nodes entered (including leaves and terminals)
    pub nodes: u64,
    /// Nodes closed by a winning stone
    pub terminals: u64,
    /// Horizon evaluations
    pub leaves: u64,
    /// Sibling loops abandoned by a bound
    pub cutoffs: u64,
}

impl AddAssign for SearchStats {
    fn add_assign(&mut self, other: Self) {
        self.nodes += other.nodes;
        self.terminals += other.terminals;
        self.leaves += other.leaves;
        self.cutoffs += other.cutoffs;
    }
}

// ============================================================================
// SEARCH
// ============================================================================

/// Recursive tree builder over a borrowed, temporarily mutated board
pub struct Search<'a> {
    board: &'a mut Board,
    root: Color,
    detector: &'a mut WinDetector,
    stats: SearchStats,
}

impl<'a> Search<'a> {
    /// `root` is the color the search plays for
    pub fn new(board: &'a mut Board, root: Color, detector: &'a mut WinDetector) -> Self {
        Self {
            board,
            root,
            detector,
            stats: SearchStats::default(),
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    fn decided_by(&mut self, last: Coord) -> bool {
        self.stats.nodes += 1;
        let won = self.detector.connects_borders(last, self.board);
        if won {
            self.stats.terminals += 1;
        }
        won
    }

    fn leaf<E: Evaluator + ?Sized>(&mut self, eval: &mut E) -> i32 {
        self.stats.leaves += 1;
        eval.evaluate(self.board, self.root)
    }

    // ------------------------------------------------------------------------
    // Unpruned minimax
    // ------------------------------------------------------------------------

    /// Opponent to move: keep the smallest child value.
    ///
    /// Explores the whole tree to `horizon`; meant for cross-checking the
    /// pruned search, not for play.
    pub fn minimize(&mut self, last: Coord, horizon: u32, eval: &mut dyn Evaluator) -> i32 {
        if self.decided_by(last) {
            return WIN_SCORE;
        }
        if horizon == 0 {
            return self.leaf(eval);
        }

        let reply = self.root.opponent();
        let mut value = WIN_SCORE;
        for at in all_coords(self.board.dim()) {
            if !self.board.is_empty_at(at) {
                continue;
            }
            self.board.place(at, reply);
            value = value.min(self.maximize(at, horizon - 1, eval));
            self.board.remove(at);
        }
        value
    }

    /// Root color to move: keep the largest child value
    pub fn maximize(&mut self, last: Coord, horizon: u32, eval: &mut dyn Evaluator) -> i32 {
        if self.decided_by(last) {
            return -WIN_SCORE;
        }
        if horizon == 0 {
            return self.leaf(eval);
        }

        let mut value = -WIN_SCORE;
        for at in all_coords(self.board.dim()) {
            if !self.board.is_empty_at(at) {
                continue;
            }
            self.board.place(at, self.root);
            value = value.max(self.minimize(at, horizon - 1, eval));
            self.board.remove(at);
        }
        value
    }

    // ------------------------------------------------------------------------
    // Alpha-beta
    // ------------------------------------------------------------------------

    /// Minimizing half of alpha-beta. Leaves always go through `cache`.
    pub fn alpha_beta_min(
        &mut self,
        last: Coord,
        alpha: i32,
        beta: i32,
        horizon: u32,
        cache: &mut EvalCache,
    ) -> i32 {
        self.pruned_min(last, alpha, beta, horizon, cache)
    }

    /// Maximizing half of alpha-beta. Leaves always go through `cache`.
    pub fn alpha_beta_max(
        &mut self,
        last: Coord,
        alpha: i32,
        beta: i32,
        horizon: u32,
        cache: &mut EvalCache,
    ) -> i32 {
        self.pruned_max(last, alpha, beta, horizon, cache)
    }

    fn pruned_min<E: Evaluator + ?Sized>(
        &mut self,
        last: Coord,
        alpha: i32,
        mut beta: i32,
        horizon: u32,
        leaf: &mut E,
    ) -> i32 {
        if self.decided_by(last) {
            return WIN_SCORE;
        }
        if horizon == 0 {
            return self.leaf(leaf);
        }

        let reply = self.root.opponent();
        let mut value = WIN_SCORE;
        for at in all_coords(self.board.dim()) {
            if !self.board.is_empty_at(at) {
                continue;
            }
            self.board.place(at, reply);
            value = value.min(self.pruned_max(at, alpha, beta, horizon - 1, leaf));
            self.board.remove(at);

            if value <= alpha {
                self.stats.cutoffs += 1;
                return value;
            }
            beta = beta.min(value);
        }
        value
    }

    fn pruned_max<E: Evaluator + ?Sized>(
        &mut self,
        last: Coord,
        mut alpha: i32,
        beta: i32,
        horizon: u32,
        leaf: &mut E,
    ) -> i32 {
        if self.decided_by(last) {
            return -WIN_SCORE;
        }
        if horizon == 0 {
            return self.leaf(leaf);
        }

        let mut value = -WIN_SCORE;
        for at in all_coords(self.board.dim()) {
            if !self.board.is_empty_at(at) {
                continue;
            }
            self.board.place(at, self.root);
            value = value.max(self.pruned_min(at, alpha, beta, horizon - 1, leaf));
            self.board.remove(at);

            if value >= beta {
                self.stats.cutoffs += 1;
                return value;
            }
            alpha = alpha.max(value);
        }
        value
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{score_structure, BridgeEvaluator};

    fn board_with(dim: usize, stones: &[(i8, i8, Color)]) -> Board {
        let mut board = Board::new(dim).unwrap();
        for &(x, y, color) in stones {
            board.place(Coord::new(x, y), color);
        }
        board
    }

    /// Root value of alpha-beta with an arbitrary leaf evaluator
    fn pruned_root<E: Evaluator>(board: &mut Board, root: Color, last: Coord, horizon: u32, eval: &mut E) -> i32 {
        let mut detector = WinDetector::new(board.dim());
        let mut search = Search::new(board, root, &mut detector);
        search.pruned_min(last, -SEARCH_WINDOW, SEARCH_WINDOW, horizon, eval)
    }

    fn minimax_root(board: &mut Board, root: Color, last: Coord, horizon: u32) -> i32 {
        let mut detector = WinDetector::new(board.dim());
        let mut search = Search::new(board, root, &mut detector);
        search.minimize(last, horizon, &mut BridgeEvaluator)
    }

    #[test]
    fn test_winning_stone_at_min_node() {
        // Black just completed a column: entering the opponent's node sees a win
        let mut board = board_with(3, &[(1, 0, Color::Black), (1, 1, Color::Black), (1, 2, Color::Black)]);
        let mut detector = WinDetector::new(3);
        let mut search = Search::new(&mut board, Color::Black, &mut detector);
        assert_eq!(search.minimize(Coord::new(1, 2), 3, &mut BridgeEvaluator), WIN_SCORE);
        assert_eq!(search.stats().nodes, 1);
    }

    #[test]
    fn test_winning_stone_at_max_node() {
        // White just completed a row against a black root
        let mut board = board_with(3, &[(0, 1, Color::White), (1, 1, Color::White), (2, 1, Color::White)]);
        let mut detector = WinDetector::new(3);
        let mut search = Search::new(&mut board, Color::Black, &mut detector);
        assert_eq!(search.maximize(Coord::new(2, 1), 3, &mut BridgeEvaluator), -WIN_SCORE);
        let mut cache = EvalCache::new();
        assert_eq!(
            search.alpha_beta_max(Coord::new(2, 1), -SEARCH_WINDOW, SEARCH_WINDOW, 3, &mut cache),
            -WIN_SCORE
        );
    }

    #[test]
    fn test_horizon_zero_evaluates_for_root() {
        let mut board = board_with(3, &[(1, 0, Color::Black), (1, 1, Color::Black), (0, 2, Color::White)]);
        let expected = score_structure(&board, Color::White);
        let mut detector = WinDetector::new(3);
        let mut search = Search::new(&mut board, Color::White, &mut detector);
        assert_eq!(search.minimize(Coord::new(0, 2), 0, &mut BridgeEvaluator), expected);
        assert_eq!(search.stats().leaves, 1);
    }

    #[test]
    fn test_search_restores_board() {
        let mut board = board_with(3, &[(1, 1, Color::Black)]);
        let before = board.clone();
        let mut detector = WinDetector::new(3);
        let mut cache = EvalCache::new();
        {
            let mut search = Search::new(&mut board, Color::Black, &mut detector);
            search.alpha_beta_min(Coord::new(1, 1), -SEARCH_WINDOW, SEARCH_WINDOW, 3, &mut cache);
            search.minimize(Coord::new(1, 1), 2, &mut BridgeEvaluator);
        }
        assert_eq!(board, before);
    }

    #[test]
    fn test_full_board_without_win_returns_initial_bound() {
        // No empty cell and no connection through the last stone
        let mut board = board_with(
            2,
            &[(0, 0, Color::Black), (1, 0, Color::White), (0, 1, Color::White), (1, 1, Color::Black)],
        );
        let mut detector = WinDetector::new(2);
        let mut search = Search::new(&mut board, Color::Black, &mut detector);
        // (1,1) black: its group {(1,1)} touches only the bottom row
        assert_eq!(search.minimize(Coord::new(1, 1), 2, &mut BridgeEvaluator), WIN_SCORE);
        assert_eq!(search.maximize(Coord::new(1, 1), 2, &mut BridgeEvaluator), -WIN_SCORE);
    }

    #[test]
    fn test_alpha_beta_matches_minimax() {
        let positions: Vec<(usize, Vec<(i8, i8, Color)>, (i8, i8, Color))> = vec![
            (3, vec![], (1, 1, Color::Black)),
            (3, vec![(0, 0, Color::White)], (1, 0, Color::Black)),
            (3, vec![(1, 1, Color::Black), (0, 1, Color::White)], (2, 0, Color::White)),
            (4, vec![(1, 1, Color::Black), (2, 1, Color::White), (1, 2, Color::White)], (2, 2, Color::Black)),
            (4, vec![(0, 1, Color::White), (1, 1, Color::White), (2, 0, Color::Black)], (1, 2, Color::Black)),
        ];

        for (dim, stones, (x, y, root)) in positions {
            let mut board = board_with(dim, &stones);
            let last = Coord::new(x, y);
            board.place(last, root);
            for horizon in 0..=3 {
                let full = minimax_root(&mut board, root, last, horizon);
                let pruned = pruned_root(&mut board, root, last, horizon, &mut BridgeEvaluator);
                assert_eq!(full, pruned, "dim {} root {:?} horizon {}", dim, root, horizon);
            }
        }
    }

    #[test]
    fn test_alpha_beta_prunes() {
        let mut board = Board::new(3).unwrap();
        board.place(Coord::new(1, 1), Color::Black);
        let mut detector = WinDetector::new(3);
        let mut full = Search::new(&mut board, Color::Black, &mut detector);
        full.minimize(Coord::new(1, 1), 3, &mut BridgeEvaluator);
        let full_nodes = full.stats().nodes;

        let mut detector = WinDetector::new(3);
        let mut cache = EvalCache::new();
        let mut pruned = Search::new(&mut board, Color::Black, &mut detector);
        pruned.alpha_beta_min(Coord::new(1, 1), -SEARCH_WINDOW, SEARCH_WINDOW, 3, &mut cache);
        assert!(pruned.stats().cutoffs > 0);
        assert!(pruned.stats().nodes < full_nodes);
    }

    #[test]
    fn test_cached_alpha_beta_at_horizon_zero() {
        let mut board = board_with(3, &[(1, 0, Color::Black), (1, 1, Color::Black)]);
        let expected = score_structure(&board, Color::Black);
        let mut detector = WinDetector::new(3);
        let mut cache = EvalCache::new();
        let mut search = Search::new(&mut board, Color::Black, &mut detector);
        assert_eq!(
            search.alpha_beta_min(Coord::new(1, 1), -SEARCH_WINDOW, SEARCH_WINDOW, 0, &mut cache),
            expected
        );
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_finds_forced_win_in_one() {
        // Black to complete the middle column at (1,2): the min node sees it
        let mut board = board_with(3, &[(1, 0, Color::Black), (1, 1, Color::Black)]);
        let mut detector = WinDetector::new(3);
        let mut cache = EvalCache::new();
        let mut search = Search::new(&mut board, Color::Black, &mut detector);
        // White just played elsewhere; black maximizes with one ply left
        let value = search.alpha_beta_max(Coord::new(1, 1), -SEARCH_WINDOW, SEARCH_WINDOW, 1, &mut cache);
        assert_eq!(value, WIN_SCORE);
    }
}
