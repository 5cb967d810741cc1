//! HEXON CLI - Command-line interface
//!
//! Commands:
//! - play: Play one game (humans and/or engines), with save and resume
//! - match: Play a series of engine-vs-engine games
//! - collisions: Measure how often the evaluation cache returns stale scores

mod collisions_cmd;
mod config;
mod match_cmd;
mod play_cmd;
mod save;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hexon_core::TieBreak;

#[derive(Parser)]
#[command(name = "hexon")]
#[command(about = "Hex board game with alpha-beta computer players")]
struct Cli {
    /// Random seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Engine configuration JSON file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Tie-break policy of move selection (one-in-three, uniform)
    #[arg(long, global = true, value_parser = config::parse_tie_break)]
    tie_break: Option<TieBreak>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game
    Play(play_cmd::PlayArgs),
    /// Play a series of games between two engines
    Match(match_cmd::MatchArgs),
    /// Measure evaluation cache collisions on random boards
    Collisions(collisions_cmd::CollisionsArgs),
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let engine_config = config::load_engine_config(cli.config.as_deref(), cli.seed, cli.tie_break)?;

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, engine_config),
        Commands::Match(args) => match_cmd::run(args, engine_config),
        Commands::Collisions(args) => collisions_cmd::run(args, cli.seed),
    }
}
