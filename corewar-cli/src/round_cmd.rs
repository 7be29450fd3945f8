//! Round command - play one observed round
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_round(), report_round()
//! - Level 4: progress bar setup

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use corewar_core::Program;
use corewar_tournament::{RoundRunner, RoundStats, TournamentConfig};

use crate::common::{load_programs, EnvArgs};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct RoundArgs {
    /// Program JSON files
    #[arg(required = true, value_name = "PROGRAM")]
    pub programs: Vec<PathBuf>,

    /// Placement seed
    #[arg(long, default_value = "0")]
    pub seed: u64,

    /// Show a cycle progress bar
    #[arg(long)]
    pub progress: bool,

    #[command(flatten)]
    pub env: EnvArgs,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run round command
pub fn run(args: RoundArgs) -> Result<()> {
    let env = args.env.environment()?;
    let programs = load_programs(&args.programs, &env)?;
    let config = TournamentConfig::new(env);

    tracing::info!("Playing one round: {} warriors, seed={}", programs.len(), args.seed);

    let stats = play_round(&programs, &config, args.seed, args.progress)?;
    report_round(&programs, &stats);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn play_round(
    programs: &[Program],
    config: &TournamentConfig,
    seed: u64,
    progress: bool,
) -> Result<RoundStats> {
    let runner = RoundRunner::new(config, programs);
    if !progress {
        return Ok(runner.play(seed)?);
    }

    let bar = cycle_bar(config.environment.cycles as u64);
    let stats = runner.play_observed(seed, |mars| {
        bar.set_position(mars.cycle() as u64);
        bar.set_message(format!("{} alive", mars.alive_count()));
    })?;
    bar.finish_and_clear();
    Ok(stats)
}

fn report_round(programs: &[Program], stats: &RoundStats) {
    println!("\n=== Round (seed {}) ===", stats.seed);
    println!("Cycles: {}", stats.cycles);
    println!(
        "{:<20} {:>8} {:>8} {:>8} {:>8}",
        "Warrior", "Score", "Alive", "Spawned", "Coverage"
    );
    for (i, program) in programs.iter().enumerate() {
        println!(
            "{:<20} {:>8.3} {:>8.3} {:>8} {:>8}",
            program.name,
            stats.score[i],
            stats.alive_score[i],
            stats.total_spawned_procs[i],
            stats.memory_coverage[i]
        );
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn cycle_bar(cycles: u64) -> ProgressBar {
    let bar = ProgressBar::new(cycles);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} cycles {msg}") {
        bar.set_style(style);
    }
    bar
}
