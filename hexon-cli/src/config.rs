//! Engine configuration loading and argument parsers

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use hexon_core::{Difficulty, EngineConfig, PlayerKind, TieBreak};

/// Build the engine configuration: file first, then command-line overrides
pub fn load_engine_config(
    path: Option<&Path>,
    seed: Option<u64>,
    tie_break: Option<TieBreak>,
) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            EngineConfig::from_json(&json)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    if let Some(tie_break) = tie_break {
        config = config.with_tie_break(tie_break);
    }

    tracing::debug!(?config, "engine configuration");
    Ok(config)
}

pub fn parse_player_kind(s: &str) -> Result<PlayerKind, String> {
    match s.to_ascii_lowercase().as_str() {
        "human" => Ok(PlayerKind::Human),
        "random" => Ok(PlayerKind::Random),
        "bridges" | "losanges" => Ok(PlayerKind::Bridges),
        "electric" => Ok(PlayerKind::Electric),
        other => Err(format!(
            "unknown player '{}' (expected human, random, bridges or electric)",
            other
        )),
    }
}

pub fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    match s.to_ascii_lowercase().as_str() {
        "easy" => Ok(Difficulty::Easy),
        "medium" => Ok(Difficulty::Medium),
        "hard" => Ok(Difficulty::Hard),
        "nash" => Ok(Difficulty::Nash),
        "nash-blind" | "blind" => Ok(Difficulty::NashBlind),
        other => Err(format!("unknown difficulty '{}'", other)),
    }
}

pub fn parse_tie_break(s: &str) -> Result<TieBreak, String> {
    match s.to_ascii_lowercase().as_str() {
        "one-in-three" => Ok(TieBreak::OneInThree),
        "uniform" => Ok(TieBreak::Uniform),
        other => Err(format!("unknown tie-break '{}'", other)),
    }
}
