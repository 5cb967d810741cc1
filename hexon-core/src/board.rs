//! Rhombus hex board with axial coordinates
//!
//! Cells are stored row-major (`y * dim + x`). Black connects the top and
//! bottom rows, White connects the left and right columns.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::HexError;

/// Largest supported board side (columns are labelled `a`..`z`)
pub const MAX_DIM: usize = 26;

/// Largest board on which the search players are allowed to play
pub const MAX_AI_DIM: usize = 7;

/// Direction vectors in axial coordinates (dx, dy)
/// Index: 0=N, 1=NE, 2=E, 3=S, 4=SW, 5=W
pub const DIRECTIONS: [(i8, i8); 6] = [
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // E
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // W
];

// ============================================================================
// COORDINATES
// ============================================================================

/// Board coordinate (column `x`, row `y`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i8,
    pub y: i8,
}

impl Coord {
    /// Out-of-band "save and quit" signal returned by a human player.
    /// Never a legal board coordinate.
    pub const SAVE: Coord = Coord { x: -1, y: -1 };

    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    pub fn is_save_signal(&self) -> bool {
        *self == Self::SAVE
    }

    pub fn offset(&self, (dx, dy): (i8, i8)) -> Coord {
        Coord::new(self.x + dx, self.y + dy)
    }

    /// Get neighbor in direction (0-5)
    pub fn neighbor(&self, direction: u8) -> Coord {
        self.offset(DIRECTIONS[direction as usize % 6])
    }
}

impl fmt::Display for Coord {
    /// Human label: column letter then 1-based row, e.g. `c4`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_save_signal() || self.x < 0 || self.y < 0 {
            return write!(f, "({}, {})", self.x, self.y);
        }
        write!(f, "{}{}", (b'a' + self.x as u8) as char, self.y as i32 + 1)
    }
}

/// Every coordinate of a `dim` board, row by row
pub fn all_coords(dim: usize) -> impl Iterator<Item = Coord> {
    (0..dim).flat_map(move |y| (0..dim).map(move |x| Coord::new(x as i8, y as i8)))
}

// ============================================================================
// COLORS AND CELLS
// ============================================================================

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// Connects the top row to the bottom row; moves first
    Black = 0,
    /// Connects the left column to the right column
    White = 1,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Does `at` lie on the first of this color's two borders?
    pub fn on_first_border(self, at: Coord) -> bool {
        match self {
            Color::Black => at.y == 0,
            Color::White => at.x == 0,
        }
    }

    /// Does `at` lie on the second of this color's two borders?
    pub fn on_second_border(self, at: Coord, dim: usize) -> bool {
        let last = dim as i8 - 1;
        match self {
            Color::Black => at.y == last,
            Color::White => at.x == last,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => f.write_str("Black"),
            Color::White => f.write_str("White"),
        }
    }
}

/// Content of a single cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Black,
    White,
}

impl Cell {
    /// Opposing stone; empty stays empty
    pub fn opposite(self) -> Cell {
        match self {
            Cell::Black => Cell::White,
            Cell::White => Cell::Black,
            Cell::Empty => Cell::Empty,
        }
    }

    pub fn color(self) -> Option<Color> {
        match self {
            Cell::Black => Some(Color::Black),
            Cell::White => Some(Color::White),
            Cell::Empty => None,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Black => 'B',
            Cell::White => 'W',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' => Some(Cell::Empty),
            'B' => Some(Cell::Black),
            'W' => Some(Cell::White),
            _ => None,
        }
    }
}

impl From<Color> for Cell {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => Cell::Black,
            Color::White => Cell::White,
        }
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Square grid of `dim * dim` hex cells laid out as a rhombus
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BoardRows", into = "BoardRows")]
pub struct Board {
    dim: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board of side `dim`
    pub fn new(dim: usize) -> Result<Self, HexError> {
        if dim == 0 || dim > MAX_DIM {
            return Err(HexError::InvalidDimension(dim));
        }
        Ok(Self {
            dim,
            cells: vec![Cell::Empty; dim * dim],
        })
    }

    /// Rebuild a board from row-major cells
    pub fn from_cells(dim: usize, cells: Vec<Cell>) -> Result<Self, HexError> {
        let mut board = Self::new(dim)?;
        if cells.len() != dim * dim {
            return Err(HexError::MalformedBoard(format!(
                "expected {} cells, found {}",
                dim * dim,
                cells.len()
            )));
        }
        board.cells = cells;
        Ok(board)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Check if the coordinate lies within `[0, dim)` on both axes
    #[inline]
    pub fn contains(&self, at: Coord) -> bool {
        at.x >= 0 && at.y >= 0 && (at.x as usize) < self.dim && (at.y as usize) < self.dim
    }

    #[inline]
    fn index(&self, at: Coord) -> usize {
        at.y as usize * self.dim + at.x as usize
    }

    /// Cell content, `None` when off the board
    #[inline]
    pub fn get(&self, at: Coord) -> Option<Cell> {
        if self.contains(at) {
            Some(self.cells[self.index(at)])
        } else {
            None
        }
    }

    /// True only if `at` exists and holds `cell`
    #[inline]
    pub fn holds(&self, at: Coord, cell: Cell) -> bool {
        self.get(at) == Some(cell)
    }

    #[inline]
    pub fn is_empty_at(&self, at: Coord) -> bool {
        self.holds(at, Cell::Empty)
    }

    /// Checked write used by callers outside the search
    pub fn set(&mut self, at: Coord, cell: Cell) -> Result<(), HexError> {
        if !self.contains(at) {
            return Err(HexError::OutOfBounds {
                x: at.x,
                y: at.y,
                dim: self.dim,
            });
        }
        let idx = self.index(at);
        self.cells[idx] = cell;
        Ok(())
    }

    /// Put a stone on an on-board cell. Search code pairs every `place`
    /// with a `remove` on the same path.
    #[inline]
    pub fn place(&mut self, at: Coord, color: Color) {
        debug_assert!(self.contains(at));
        let idx = self.index(at);
        self.cells[idx] = Cell::from(color);
    }

    /// Clear an on-board cell
    #[inline]
    pub fn remove(&mut self, at: Coord) {
        debug_assert!(self.contains(at));
        let idx = self.index(at);
        self.cells[idx] = Cell::Empty;
    }

    /// Empty cells in row-major order (move generation)
    pub fn empty_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        all_coords(self.dim).filter(move |&at| self.cells[self.index(at)].is_empty())
    }

    /// Occupied cells with their color
    pub fn stones(&self) -> impl Iterator<Item = (Coord, Color)> + '_ {
        all_coords(self.dim)
            .filter_map(move |at| self.cells[self.index(at)].color().map(|c| (at, c)))
    }

    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Reset every cell to empty
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }
}

impl fmt::Display for Board {
    /// Rhombus rendering, each row shifted right by one more space
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "    ")?;
        for x in 0..self.dim {
            write!(f, " {}", (b'a' + x as u8) as char)?;
        }
        writeln!(f)?;
        for y in 0..self.dim {
            write!(f, "{:>3} {}", y + 1, " ".repeat(y))?;
            for x in 0..self.dim {
                let cell = self.cells[y * self.dim + x];
                write!(f, " {}", cell.to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Serialized form: dimension plus one string per row (`.`, `B`, `W`)
#[derive(Serialize, Deserialize)]
struct BoardRows {
    dim: usize,
    rows: Vec<String>,
}

impl From<Board> for BoardRows {
    fn from(board: Board) -> Self {
        let rows = board
            .cells
            .chunks(board.dim)
            .map(|row| row.iter().map(|c| c.to_char()).collect())
            .collect();
        Self {
            dim: board.dim,
            rows,
        }
    }
}

impl TryFrom<BoardRows> for Board {
    type Error = HexError;

    fn try_from(data: BoardRows) -> Result<Self, Self::Error> {
        if data.rows.len() != data.dim {
            return Err(HexError::MalformedBoard(format!(
                "expected {} rows, found {}",
                data.dim,
                data.rows.len()
            )));
        }
        let mut cells = Vec::with_capacity(data.dim * data.dim);
        for (y, row) in data.rows.iter().enumerate() {
            let before = cells.len();
            for c in row.chars() {
                let cell = Cell::from_char(c).ok_or_else(|| {
                    HexError::MalformedBoard(format!("unknown cell '{}' in row {}", c, y + 1))
                })?;
                cells.push(cell);
            }
            if cells.len() - before != data.dim {
                return Err(HexError::MalformedBoard(format!(
                    "row {} has {} cells, expected {}",
                    y + 1,
                    cells.len() - before,
                    data.dim
                )));
            }
        }
        Board::from_cells(data.dim, cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_bounds() {
        let board = Board::new(5).unwrap();
        assert!(board.contains(Coord::new(0, 0)));
        assert!(board.contains(Coord::new(4, 4)));
        assert!(!board.contains(Coord::new(5, 0)));
        assert!(!board.contains(Coord::new(0, -1)));
        assert!(!board.contains(Coord::SAVE));
        assert_eq!(board.get(Coord::new(-1, 2)), None);
    }

    #[test]
    fn test_invalid_dimension() {
        assert_eq!(Board::new(0), Err(HexError::InvalidDimension(0)));
        assert!(Board::new(MAX_DIM + 1).is_err());
        assert!(Board::new(MAX_DIM).is_ok());
    }

    #[test]
    fn test_place_and_remove_restore_board() {
        let mut board = Board::new(4).unwrap();
        let before = board.clone();
        board.place(Coord::new(2, 1), Color::White);
        assert_eq!(board.get(Coord::new(2, 1)), Some(Cell::White));
        assert_eq!(board.stone_count(), 1);
        board.remove(Coord::new(2, 1));
        assert_eq!(board, before);
    }

    #[test]
    fn test_empty_cells_row_major() {
        let mut board = Board::new(2).unwrap();
        board.place(Coord::new(1, 0), Color::Black);
        let empties: Vec<Coord> = board.empty_cells().collect();
        assert_eq!(empties, vec![Coord::new(0, 0), Coord::new(0, 1), Coord::new(1, 1)]);
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut board = Board::new(3).unwrap();
        assert!(matches!(
            board.set(Coord::new(3, 0), Cell::Black),
            Err(HexError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_opposites() {
        assert_eq!(Color::Black.opponent(), Color::White);
        assert_eq!(Cell::White.opposite(), Cell::Black);
        assert_eq!(Cell::Empty.opposite(), Cell::Empty);
        assert_eq!(Cell::from(Color::Black).color(), Some(Color::Black));
    }

    #[test]
    fn test_borders() {
        assert!(Color::Black.on_first_border(Coord::new(3, 0)));
        assert!(Color::Black.on_second_border(Coord::new(1, 4), 5));
        assert!(Color::White.on_first_border(Coord::new(0, 2)));
        assert!(Color::White.on_second_border(Coord::new(4, 0), 5));
        assert!(!Color::White.on_second_border(Coord::new(0, 4), 5));
    }

    #[test]
    fn test_coord_label() {
        assert_eq!(Coord::new(2, 3).to_string(), "c4");
        assert_eq!(Coord::SAVE.to_string(), "(-1, -1)");
    }

    #[test]
    fn test_serde_rows() {
        let mut board = Board::new(3).unwrap();
        board.place(Coord::new(0, 0), Color::Black);
        board.place(Coord::new(2, 1), Color::White);
        let json = serde_json::to_string(&board).unwrap();
        assert!(json.contains("\"B..\""));
        assert!(json.contains("\"..W\""));
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);
    }

    #[test]
    fn test_serde_rejects_ragged_rows() {
        let json = r#"{"dim":2,"rows":["..","B"]}"#;
        assert!(serde_json::from_str::<Board>(json).is_err());
    }
}
