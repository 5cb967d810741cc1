//! Configuration types for engines and games

use serde::{Deserialize, Serialize};

use crate::board::{Board, MAX_AI_DIM};
use crate::error::HexError;

/// How move selection breaks ties between equally scored candidates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Each tie replaces the incumbent with probability 1/3. Later ties are
    /// favored; this is the classic engine behavior.
    #[default]
    OneInThree,
    /// Reservoir sampling: uniform over all tied candidates
    Uniform,
}

/// Search horizon used when neither a config file nor a flag sets one
pub const DEFAULT_HORIZON: u32 = 2;

/// Engine configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Plies searched below each root candidate
    pub horizon: u32,
    /// Tie-break policy of move selection
    pub tie_break: TieBreak,
    /// Random seed for reproducibility (None = entropy)
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            tie_break: TieBreak::OneInThree,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Create config searching `horizon` plies
    pub fn with_horizon(mut self, horizon: u32) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Difficulty levels offered to a human opponent
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Nash,
    /// Nash strength, and the human plays without seeing the stones
    NashBlind,
}

impl Difficulty {
    /// Plies searched by engine players in an interactive game. The blind
    /// level searches one ply deeper than Nash.
    pub fn horizon(self) -> u32 {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Medium => 6,
            Difficulty::Hard => 7,
            Difficulty::Nash => 8,
            Difficulty::NashBlind => 9,
        }
    }

    /// Should the board stay hidden from human players?
    pub fn is_blind(self) -> bool {
        self == Difficulty::NashBlind
    }
}

/// Engine move-selection strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Uniform among empty cells, no search
    Random,
    /// Alpha-beta over the cached bridge heuristic
    Bridges,
    /// Resistance-based play. Not implemented; plays like `Random`.
    Electric,
}

impl Strategy {
    /// Does this strategy build a game tree?
    pub fn searches(self) -> bool {
        matches!(self, Strategy::Bridges | Strategy::Electric)
    }
}

/// Who controls one color
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKind {
    #[default]
    Human,
    Random,
    Bridges,
    Electric,
}

impl PlayerKind {
    /// Engine strategy, `None` for a human
    pub fn strategy(self) -> Option<Strategy> {
        match self {
            PlayerKind::Human => None,
            PlayerKind::Random => Some(Strategy::Random),
            PlayerKind::Bridges => Some(Strategy::Bridges),
            PlayerKind::Electric => Some(Strategy::Electric),
        }
    }
}

/// Setup of a single game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub dim: usize,
    pub black: PlayerKind,
    pub white: PlayerKind,
    pub difficulty: Difficulty,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            dim: 5,
            black: PlayerKind::Human,
            white: PlayerKind::Bridges,
            difficulty: Difficulty::default(),
        }
    }
}

impl GameConfig {
    /// Reject impossible dimensions and search players on boards too large
    /// for them
    pub fn validate(&self) -> Result<(), HexError> {
        Board::new(self.dim)?;
        let searches = [self.black, self.white]
            .iter()
            .any(|kind| kind.strategy().is_some_and(Strategy::searches));
        if searches && self.dim > MAX_AI_DIM {
            return Err(HexError::BoardTooLargeForSearch { dim: self.dim });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.horizon, DEFAULT_HORIZON);
        assert_eq!(config.tie_break, TieBreak::OneInThree);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_engine_config_builders() {
        let config = EngineConfig::default()
            .with_horizon(4)
            .with_tie_break(TieBreak::Uniform)
            .with_seed(9);
        assert_eq!(config.horizon, 4);
        assert_eq!(config.tie_break, TieBreak::Uniform);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_engine_config_partial_json() {
        let config = EngineConfig::from_json(r#"{"tie_break":"uniform"}"#).unwrap();
        assert_eq!(config.tie_break, TieBreak::Uniform);
        assert_eq!(config.horizon, 2);
        assert!(EngineConfig::from_json(r#"{"tie_break":"sometimes"}"#).is_err());
    }

    #[test]
    fn test_difficulty_horizons() {
        assert_eq!(Difficulty::Easy.horizon(), 5);
        assert_eq!(Difficulty::Medium.horizon(), 6);
        assert_eq!(Difficulty::Hard.horizon(), 7);
        assert_eq!(Difficulty::Nash.horizon(), 8);
        assert_eq!(Difficulty::NashBlind.horizon(), Difficulty::Nash.horizon() + 1);
        assert!(Difficulty::NashBlind.is_blind());
        assert!(!Difficulty::Nash.is_blind());
    }

    #[test]
    fn test_player_kind_strategy() {
        assert_eq!(PlayerKind::Human.strategy(), None);
        assert_eq!(PlayerKind::Bridges.strategy(), Some(Strategy::Bridges));
        assert!(Strategy::Bridges.searches());
        assert!(!Strategy::Random.searches());
    }

    #[test]
    fn test_game_config_validation() {
        assert!(GameConfig::default().validate().is_ok());

        let big_search = GameConfig {
            dim: 9,
            ..Default::default()
        };
        assert_eq!(big_search.validate(), Err(HexError::BoardTooLargeForSearch { dim: 9 }));

        let big_random = GameConfig {
            dim: 11,
            black: PlayerKind::Human,
            white: PlayerKind::Random,
            difficulty: Difficulty::Easy,
        };
        assert!(big_random.validate().is_ok());

        let empty = GameConfig {
            dim: 0,
            ..Default::default()
        };
        assert_eq!(empty.validate(), Err(HexError::InvalidDimension(0)));
    }
}
