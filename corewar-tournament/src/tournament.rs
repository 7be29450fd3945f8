//! Tournament execution - many independent rounds on a worker pool
//!
//! Level 1 - Orchestration and Level 2 - Phases

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

use corewar_core::{CoreError, Program};
use rayon::prelude::*;
use serde::Serialize;

use crate::config::TournamentConfig;
use crate::error::{Result, TournamentError};
use crate::round::{RoundRunner, RoundStats};

/// Per-warrior reduction of a tournament
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WarriorSummary {
    /// Index of the program in the original array
    pub index: usize,
    pub name: String,
    pub score_mean: f64,
    pub score_std: f64,
    pub alive_score_mean: f64,
    pub spawned_procs_mean: f64,
    pub memory_coverage_mean: f64,
}

/// Result of a tournament
///
/// Every matrix is indexed `[warrior][round]`, rounds in seed order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TournamentResult {
    /// Program names, in program order
    pub names: Vec<String>,
    /// Seed used for each round
    pub seeds: Vec<u64>,
    pub score: Vec<Vec<f64>>,
    pub alive_score: Vec<Vec<f64>>,
    pub total_spawned_procs: Vec<Vec<u64>>,
    pub memory_coverage: Vec<Vec<u64>>,
}

impl TournamentResult {
    /// Stack per-round statistics into warrior-by-round matrices
    pub fn from_rounds(names: Vec<String>, rounds: &[RoundStats]) -> Self {
        let n = names.len();
        let column = |pick: &dyn Fn(&RoundStats, usize) -> f64| -> Vec<Vec<f64>> {
            (0..n).map(|w| rounds.iter().map(|r| pick(r, w)).collect()).collect()
        };
        let column_u64 = |pick: &dyn Fn(&RoundStats, usize) -> u64| -> Vec<Vec<u64>> {
            (0..n).map(|w| rounds.iter().map(|r| pick(r, w)).collect()).collect()
        };

        Self {
            seeds: rounds.iter().map(|r| r.seed).collect(),
            score: column(&|r, w| r.score[w]),
            alive_score: column(&|r, w| r.alive_score[w]),
            total_spawned_procs: column_u64(&|r, w| r.total_spawned_procs[w]),
            memory_coverage: column_u64(&|r, w| r.memory_coverage[w]),
            names,
        }
    }

    pub fn warriors(&self) -> usize {
        self.names.len()
    }

    pub fn rounds(&self) -> usize {
        self.seeds.len()
    }

    /// Mean normalized score for a warrior
    pub fn mean_score(&self, warrior: usize) -> f64 {
        mean(self.score[warrior].iter().copied())
    }

    /// Mean raw alive-time score for a warrior
    pub fn mean_alive_score(&self, warrior: usize) -> f64 {
        mean(self.alive_score[warrior].iter().copied())
    }

    /// Population variance of the normalized score
    pub fn score_variance(&self, warrior: usize) -> f64 {
        variance(&self.score[warrior])
    }

    /// Per-warrior means, in program order
    pub fn summary(&self) -> Vec<WarriorSummary> {
        (0..self.warriors())
            .map(|w| WarriorSummary {
                index: w,
                name: self.names[w].clone(),
                score_mean: self.mean_score(w),
                score_std: self.score_variance(w).sqrt(),
                alive_score_mean: self.mean_alive_score(w),
                spawned_procs_mean: mean(self.total_spawned_procs[w].iter().map(|&v| v as f64)),
                memory_coverage_mean: mean(self.memory_coverage[w].iter().map(|&v| v as f64)),
            })
            .collect()
    }

    /// Summaries sorted by mean score (descending)
    pub fn standings(&self) -> Vec<WarriorSummary> {
        let mut standings = self.summary();
        standings.sort_by(|a, b| {
            b.score_mean
                .partial_cmp(&a.score_mean)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        standings
    }
}

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

/// Run a tournament on a worker pool (Level 1 orchestration)
///
/// # Arguments
/// * `programs` - Participants, in the order results are reported
/// * `config` - Environment, worker count, timeout and seeding
///
/// # Returns
/// Stacked statistics for every round, or a single error. A timeout
/// discards the whole batch.
pub fn run_tournament(programs: &[Program], config: &TournamentConfig) -> Result<TournamentResult> {
    validate(programs, config)?;

    tracing::info!(
        "Starting tournament: {} warriors, {} rounds, {} workers",
        programs.len(),
        config.environment.rounds,
        config.workers
    );

    let rounds = execute_rounds_parallel(programs, config)?;
    let result = TournamentResult::from_rounds(names(programs), &rounds);

    tracing::info!("Tournament finished: {} rounds", result.rounds());
    Ok(result)
}

/// Run every round on the calling thread, without a timeout
pub fn run_tournament_sequential(
    programs: &[Program],
    config: &TournamentConfig,
) -> Result<TournamentResult> {
    validate(programs, config)?;

    let runner = RoundRunner::new(config, programs);
    let rounds = (0..config.environment.rounds)
        .map(|round| runner.play(config.round_seed(round)))
        .collect::<Result<Vec<_>>>()?;

    Ok(TournamentResult::from_rounds(names(programs), &rounds))
}

// ============================================================================
// Level 2 - Phases
// ============================================================================

/// Reject bad input before any worker starts
fn validate(programs: &[Program], config: &TournamentConfig) -> Result<()> {
    config.environment.validate()?;
    if programs.is_empty() {
        return Err(CoreError::NoWarriors.into());
    }
    for program in programs {
        program.validate(&config.environment)?;
    }
    Ok(())
}

/// Dispatch rounds to a dedicated pool and wait under the batch timeout
fn execute_rounds_parallel(programs: &[Program], config: &TournamentConfig) -> Result<Vec<RoundStats>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()
        .map_err(|e| TournamentError::WorkerPool(e.to_string()))?;

    let cancel = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel();

    {
        let programs: Arc<[Program]> = programs.into();
        let config = config.clone();
        let cancel = Arc::clone(&cancel);
        pool.spawn(move || {
            let runner = RoundRunner::new(&config, &programs).with_cancel(&cancel);
            let rounds = (0..config.environment.rounds)
                .into_par_iter()
                .map(|round| runner.play(config.round_seed(round)))
                .collect::<Result<Vec<_>>>();
            // The receiver is gone after a timeout
            let _ = tx.send(rounds);
        });
    }

    match rx.recv_timeout(config.timeout) {
        Ok(rounds) => rounds,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            cancel.store(true, Ordering::Relaxed);
            tracing::warn!("Tournament timed out after {:?}, discarding all rounds", config.timeout);
            Err(TournamentError::Timeout(config.timeout))
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(TournamentError::WorkerDisconnected),
    }
}

// ============================================================================
// Level 4 - Utilities
// ============================================================================

fn names(programs: &[Program]) -> Vec<String> {
    programs.iter().map(|p| p.name.clone()).collect()
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values.iter().copied());
    mean(values.iter().map(|v| (v - m) * (v - m)))
}
