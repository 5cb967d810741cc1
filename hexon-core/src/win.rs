//! Terminal-state detection
//!
//! A move wins when the group containing the stone just played touches both
//! of its owner's borders. Stones are never removed, so only the group of
//! the last stone can newly complete a connection and a flood fill from that
//! stone is enough.

use crate::board::{Board, Cell, Color, Coord};

/// Win detector with a reusable `visited` grid and traversal stack
#[derive(Clone, Debug, Default)]
pub struct WinDetector {
    visited: Vec<bool>,
    stack: Vec<Coord>,
    dim: usize,
}

impl WinDetector {
    pub fn new(dim: usize) -> Self {
        Self {
            visited: vec![false; dim * dim],
            stack: Vec::with_capacity(dim * dim),
            dim,
        }
    }

    /// Did the stone just played at `at` win the game?
    ///
    /// `turn_count` is the number of stones placed so far. No connection is
    /// possible before `2 * dim - 1` stones, so earlier calls return `false`
    /// without touching the board.
    pub fn is_winning_move(&mut self, turn_count: usize, at: Coord, board: &Board) -> bool {
        if turn_count < 2 * board.dim() - 1 {
            return false;
        }
        self.connects_borders(at, board)
    }

    /// Flood fill from `at` and report whether its group spans both borders
    /// of the color occupying `at`. Empty or off-board cells never win.
    pub fn connects_borders(&mut self, at: Coord, board: &Board) -> bool {
        self.reset(board.dim());

        let color = match board.get(at).and_then(Cell::color) {
            Some(color) => color,
            None => return false,
        };

        if !has_stones_on_both_borders(board, color) {
            return false;
        }

        self.flood_fill(at, color, board)
    }

    /// Clear the scratch grid, resizing it if the board changed size
    fn reset(&mut self, dim: usize) {
        if self.dim != dim {
            self.dim = dim;
            self.visited = vec![false; dim * dim];
        } else {
            self.visited.fill(false);
        }
        self.stack.clear();
    }

    #[inline]
    fn mark(&mut self, at: Coord) -> bool {
        let idx = at.y as usize * self.dim + at.x as usize;
        let fresh = !self.visited[idx];
        self.visited[idx] = true;
        fresh
    }

    fn flood_fill(&mut self, start: Coord, color: Color, board: &Board) -> bool {
        let dim = board.dim();
        let stone = Cell::from(color);
        let mut first = false;
        let mut second = false;

        self.mark(start);
        self.stack.push(start);

        while let Some(at) = self.stack.pop() {
            first |= color.on_first_border(at);
            second |= color.on_second_border(at, dim);
            if first && second {
                return true;
            }

            for direction in 0..6 {
                let next = at.neighbor(direction);
                if board.holds(next, stone) && self.mark(next) {
                    self.stack.push(next);
                }
            }
        }

        first && second
    }
}

/// Cheap pre-filter: at least one stone of `color` on each of its borders
pub fn has_stones_on_both_borders(board: &Board, color: Color) -> bool {
    let dim = board.dim() as i8;
    let stone = Cell::from(color);
    let line = |fixed: i8| -> bool {
        (0..dim).any(|i| {
            let at = match color {
                Color::Black => Coord::new(i, fixed),
                Color::White => Coord::new(fixed, i),
            };
            board.holds(at, stone)
        })
    };
    line(0) && line(dim - 1)
}

/// One-shot convenience wrapper allocating its own scratch grid
pub fn is_winning_move(turn_count: usize, at: Coord, board: &Board) -> bool {
    WinDetector::new(board.dim()).is_winning_move(turn_count, at, board)
}
