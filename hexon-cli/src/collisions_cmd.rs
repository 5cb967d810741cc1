//! Collisions command - evaluation cache test bed
//!
//! Generates random boards and reports how often the lossy cache serves a
//! score computed for a different board.

use anyhow::Result;
use clap::Args;

use hexon_core::{create_rng, measure_collisions, CollisionReport};

#[derive(Args)]
pub struct CollisionsArgs {
    /// Board side length
    #[arg(long, default_value = "5")]
    pub dim: usize,

    /// Random boards to generate
    #[arg(long, default_value = "10000")]
    pub iterations: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run collisions command
pub fn run(args: CollisionsArgs, seed: Option<u64>) -> Result<()> {
    tracing::info!(
        "Measuring cache collisions: {} boards of {}x{}",
        args.iterations,
        args.dim,
        args.dim
    );

    let mut rng = create_rng(seed);
    let report = measure_collisions(args.dim, args.iterations, &mut rng)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text_report(&report);
    }
    Ok(())
}

fn print_text_report(report: &CollisionReport) {
    println!("\n=== Cache Collisions ===");
    println!("Boards:           {}", report.boards);
    println!("Distinct digests: {}", report.distinct_digests);
    println!(
        "Stale scores:     {} ({:.2}% of lookups)",
        report.mismatches,
        report.mismatch_rate() * 100.0
    );
}
