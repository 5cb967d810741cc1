//! Error type shared by the core crate

/// Errors raised by board construction and game-state transitions.
///
/// Board queries and heuristics never produce these: out-of-range lookups
/// answer `false`/`None`, and heuristic helpers use sentinel scores.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HexError {
    #[error("invalid board dimension {0} (expected 1 to 26)")]
    InvalidDimension(usize),

    #[error("coordinate ({x}, {y}) is off the {dim}x{dim} board")]
    OutOfBounds { x: i8, y: i8, dim: usize },

    #[error("cell ({x}, {y}) is already occupied")]
    Occupied { x: i8, y: i8 },

    #[error("the game is already over")]
    GameOver,

    #[error("a {dim}x{dim} board is too large for search players (max 7)")]
    BoardTooLargeForSearch { dim: usize },

    #[error("malformed board: {0}")]
    MalformedBoard(String),
}
