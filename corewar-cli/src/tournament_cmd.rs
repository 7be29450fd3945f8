//! Tournament command - score warriors over many rounds
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), report_results()
//! - Level 4: formatting utilities

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;

use corewar_core::Environment;
use corewar_tournament::{
    run_tournament, TournamentConfig, TournamentResult, WarriorSummary, DEFAULT_TIMEOUT_SECS,
};

use crate::common::{load_programs, EnvArgs};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct TournamentArgs {
    /// Program JSON files
    #[arg(required = true, value_name = "PROGRAM")]
    pub programs: Vec<PathBuf>,

    /// Worker threads (0 = one per CPU)
    #[arg(long, default_value = "1")]
    pub workers: usize,

    /// Timeout for the whole batch, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Base seed; round i uses seed + i
    #[arg(long, default_value = "0")]
    pub seed: u64,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub env: EnvArgs,
}

/// JSON report of a finished tournament
#[derive(Serialize)]
struct JsonReport<'a> {
    finished_at: DateTime<Utc>,
    environment: &'a Environment,
    base_seed: u64,
    summary: Vec<WarriorSummary>,
    result: &'a TournamentResult,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run tournament command
///
/// 1. Build the environment and load programs
/// 2. Run every round on the worker pool
/// 3. Report results
pub fn run(args: TournamentArgs) -> Result<()> {
    let config = build_config(&args)?;
    let programs = load_programs(&args.programs, &config.environment)?;

    let result = run_tournament(&programs, &config).context("Tournament failed")?;

    report_results(&result, &config, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn build_config(args: &TournamentArgs) -> Result<TournamentConfig> {
    Ok(TournamentConfig::new(args.env.environment()?)
        .with_workers(args.workers)
        .with_timeout(Duration::from_secs(args.timeout_secs))
        .with_seed(args.seed))
}

fn report_results(result: &TournamentResult, config: &TournamentConfig, json: bool) -> Result<()> {
    if json {
        let report = JsonReport {
            finished_at: Utc::now(),
            environment: &config.environment,
            base_seed: config.base_seed,
            summary: result.summary(),
            result,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text_results(result);
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn print_text_results(result: &TournamentResult) {
    println!("\n=== Tournament Results ({} rounds) ===", result.rounds());
    println!(
        "{:<4} {:<20} {:>10} {:>8} {:>8} {:>10} {:>10}",
        "#", "Warrior", "Score", "Std", "Alive", "Spawned", "Coverage"
    );
    for (rank, s) in result.standings().iter().enumerate() {
        println!(
            "{:<4} {:<20} {:>10.4} {:>8.4} {:>8.3} {:>10.1} {:>10.1}",
            rank + 1,
            s.name,
            s.score_mean,
            s.score_std,
            s.alive_score_mean,
            s.spawned_procs_mean,
            s.memory_coverage_mean
        );
    }
}
