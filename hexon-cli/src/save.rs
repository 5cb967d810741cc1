//! Saved games

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hexon_core::{Board, Color, Difficulty, Game, GameConfig, PlayerKind};

/// Save file used when `--save-path` is not given
pub const DEFAULT_SAVE_PATH: &str = "hexon-save.json";

/// An interrupted game, as written to disk
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavedGame {
    pub board: Board,
    pub black: PlayerKind,
    pub white: PlayerKind,
    pub difficulty: Difficulty,
    pub to_move: Color,
    pub turn: usize,
    pub saved_at: DateTime<Utc>,
}

impl SavedGame {
    pub fn capture(config: &GameConfig, game: &Game) -> Self {
        Self {
            board: game.board().clone(),
            black: config.black,
            white: config.white,
            difficulty: config.difficulty,
            to_move: game.to_move(),
            turn: game.turn(),
            saved_at: Utc::now(),
        }
    }

    /// Rebuild the game setup and position
    pub fn restore(self) -> Result<(GameConfig, Game)> {
        let config = GameConfig {
            dim: self.board.dim(),
            black: self.black,
            white: self.white,
            difficulty: self.difficulty,
        };
        config.validate()?;
        let game = Game::from_parts(self.board, self.to_move, self.turn)?;
        Ok((config, game))
    }

    pub fn store(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize saved game")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write save file: {}", path.display()))?;
        tracing::info!("Game saved to {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read save file: {}", path.display()))?;
        let saved: SavedGame = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse save file: {}", path.display()))?;
        tracing::info!(
            "Loaded game saved at {} ({} stones)",
            saved.saved_at.to_rfc3339(),
            saved.turn
        );
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexon_core::Coord;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("hexon-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_save_and_resume() {
        let config = GameConfig {
            dim: 4,
            black: PlayerKind::Human,
            white: PlayerKind::Bridges,
            difficulty: Difficulty::Hard,
        };
        let mut game = Game::new(4).unwrap();
        game.play(Coord::new(1, 1)).unwrap();
        game.play(Coord::new(2, 2)).unwrap();
        game.play(Coord::new(0, 3)).unwrap();

        let path = temp_path("resume");
        SavedGame::capture(&config, &game).store(&path).unwrap();
        let (restored_config, restored) = SavedGame::load(&path).unwrap().restore().unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(restored_config, config);
        assert_eq!(restored.board(), game.board());
        assert_eq!(restored.to_move(), Color::White);
        assert_eq!(restored.turn(), 3);
    }

    #[test]
    fn test_load_rejects_wrong_cell_count() {
        let path = temp_path("bad-cells");
        let json = r#"{
            "board": {"dim": 3, "rows": ["...", "..B"]},
            "black": "human", "white": "random", "difficulty": "easy",
            "to_move": "White", "turn": 1,
            "saved_at": "2024-01-01T00:00:00Z"
        }"#;
        fs::write(&path, json).unwrap();
        let result = SavedGame::load(&path);
        fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn test_restore_rejects_inconsistent_turn() {
        let mut board = Board::new(3).unwrap();
        board.place(Coord::new(0, 0), Color::Black);
        let saved = SavedGame {
            board,
            black: PlayerKind::Human,
            white: PlayerKind::Random,
            difficulty: Difficulty::Easy,
            to_move: Color::White,
            turn: 2,
            saved_at: Utc::now(),
        };
        assert!(saved.restore().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(SavedGame::load(&temp_path("missing")).is_err());
    }
}
