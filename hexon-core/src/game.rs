//! Game state and turn order

use serde::{Deserialize, Serialize};

use crate::board::{Board, Color, Coord};
use crate::error::HexError;
use crate::win::WinDetector;

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    BlackWins,
    WhiteWins,
}

impl From<Color> for GameResult {
    fn from(winner: Color) -> Self {
        match winner {
            Color::Black => GameResult::BlackWins,
            Color::White => GameResult::WhiteWins,
        }
    }
}

/// What a successful `play` led to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The other color is now to move
    Continue,
    /// The stone completed a connection
    Won(Color),
}

/// A game in progress: board, side to move and stone count
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    to_move: Color,
    turn: usize,
    winner: Option<Color>,
    detector: WinDetector,
}

impl Game {
    /// Empty board, Black to move
    pub fn new(dim: usize) -> Result<Self, HexError> {
        Ok(Self {
            board: Board::new(dim)?,
            to_move: Color::Black,
            turn: 0,
            winner: None,
            detector: WinDetector::new(dim),
        })
    }

    /// Resume from a saved position. `turn` must match the stones on the
    /// board.
    pub fn from_parts(board: Board, to_move: Color, turn: usize) -> Result<Self, HexError> {
        if board.stone_count() != turn {
            return Err(HexError::MalformedBoard(format!(
                "turn count {} does not match {} stones",
                turn,
                board.stone_count()
            )));
        }
        let dim = board.dim();
        Ok(Self {
            board,
            to_move,
            turn,
            winner: None,
            detector: WinDetector::new(dim),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    /// Stones placed so far
    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn result(&self) -> GameResult {
        self.winner.map_or(GameResult::Ongoing, GameResult::from)
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Place the side to move's stone at `at`
    pub fn play(&mut self, at: Coord) -> Result<MoveOutcome, HexError> {
        if self.is_over() {
            return Err(HexError::GameOver);
        }
        let dim = self.board.dim();
        if !self.board.contains(at) {
            return Err(HexError::OutOfBounds { x: at.x, y: at.y, dim });
        }
        if !self.board.is_empty_at(at) {
            return Err(HexError::Occupied { x: at.x, y: at.y });
        }

        let color = self.to_move;
        self.board.place(at, color);
        self.turn += 1;

        if self.detector.is_winning_move(self.turn, at, &self.board) {
            self.winner = Some(color);
            return Ok(MoveOutcome::Won(color));
        }
        self.to_move = color.opponent();
        Ok(MoveOutcome::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game() {
        let game = Game::new(5).unwrap();
        assert_eq!(game.to_move(), Color::Black);
        assert_eq!(game.turn(), 0);
        assert_eq!(game.result(), GameResult::Ongoing);
        assert!(Game::new(0).is_err());
    }

    #[test]
    fn test_turns_alternate() {
        let mut game = Game::new(3).unwrap();
        assert_eq!(game.play(Coord::new(1, 1)), Ok(MoveOutcome::Continue));
        assert_eq!(game.to_move(), Color::White);
        assert_eq!(game.play(Coord::new(0, 0)), Ok(MoveOutcome::Continue));
        assert_eq!(game.to_move(), Color::Black);
        assert_eq!(game.turn(), 2);
    }

    #[test]
    fn test_illegal_moves_change_nothing() {
        let mut game = Game::new(3).unwrap();
        game.play(Coord::new(1, 1)).unwrap();
        assert_eq!(game.play(Coord::new(1, 1)), Err(HexError::Occupied { x: 1, y: 1 }));
        assert!(matches!(game.play(Coord::new(3, 0)), Err(HexError::OutOfBounds { .. })));
        assert!(matches!(game.play(Coord::SAVE), Err(HexError::OutOfBounds { .. })));
        assert_eq!(game.to_move(), Color::White);
        assert_eq!(game.turn(), 1);
    }

    #[test]
    fn test_black_wins_with_column() {
        let mut game = Game::new(3).unwrap();
        for (x, y) in [(1, 0), (0, 0), (1, 1), (0, 1)] {
            assert_eq!(game.play(Coord::new(x, y)), Ok(MoveOutcome::Continue));
        }
        assert_eq!(game.play(Coord::new(1, 2)), Ok(MoveOutcome::Won(Color::Black)));
        assert_eq!(game.result(), GameResult::BlackWins);
        assert_eq!(game.play(Coord::new(2, 2)), Err(HexError::GameOver));
    }

    #[test]
    fn test_white_wins_with_row() {
        let mut game = Game::new(3).unwrap();
        for (x, y) in [(0, 0), (0, 1), (1, 0), (1, 1), (0, 2)] {
            assert_eq!(game.play(Coord::new(x, y)), Ok(MoveOutcome::Continue));
        }
        assert_eq!(game.play(Coord::new(2, 1)), Ok(MoveOutcome::Won(Color::White)));
        assert_eq!(game.winner(), Some(Color::White));
    }

    #[test]
    fn test_from_parts() {
        let mut board = Board::new(3).unwrap();
        board.place(Coord::new(1, 1), Color::Black);
        let game = Game::from_parts(board.clone(), Color::White, 1).unwrap();
        assert_eq!(game.to_move(), Color::White);
        assert_eq!(game.board(), &board);
        assert!(Game::from_parts(board, Color::White, 4).is_err());
    }
}
