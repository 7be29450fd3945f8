//! Round runner - plays and scores a single round
//!
//! Level 3 - Step-level implementation

use std::sync::atomic::{AtomicBool, Ordering};

use corewar_core::{CoreEvents, Mars, Program};
use serde::Serialize;

use crate::config::TournamentConfig;
use crate::error::{Result, TournamentError};

/// Statistics of one round, one entry per warrior in program order
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoundStats {
    /// Seed the round was placed with
    pub seed: u64,
    /// Cycles recorded before the round ended
    pub cycles: u32,
    /// Survival share, rescaled so a lone survivor for the whole budget scores
    /// the warrior count
    pub score: Vec<f64>,
    /// Fraction of the cycle budget spent alive
    pub alive_score: Vec<f64>,
    /// Sum of per-cycle increases in live process count
    pub total_spawned_procs: Vec<u64>,
    /// Distinct addresses reached by the warrior's processes
    pub memory_coverage: Vec<u64>,
    /// Warriors alive when the round ended
    pub survivors: Vec<usize>,
}

/// Plays rounds for a fixed program list and configuration
pub struct RoundRunner<'a> {
    config: &'a TournamentConfig,
    programs: &'a [Program],
    cancel: Option<&'a AtomicBool>,
}

impl<'a> RoundRunner<'a> {
    /// Create a new round runner
    pub fn new(config: &'a TournamentConfig, programs: &'a [Program]) -> Self {
        Self {
            config,
            programs,
            cancel: None,
        }
    }

    /// Abort at the next cycle boundary once `flag` is set
    pub fn with_cancel(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Play one round with the given placement seed
    pub fn play(&self, seed: u64) -> Result<RoundStats> {
        self.play_observed(seed, |_| {})
    }

    /// Play one round, calling `observer` after every cycle
    pub fn play_observed<F>(&self, seed: u64, mut observer: F) -> Result<RoundStats>
    where
        F: FnMut(&Mars<'_, CoreEvents>),
    {
        let env = &self.config.environment;
        let mut mars = Mars::new(env, self.programs)?.with_round_end(self.config.round_end);
        mars.setup(seed)?;

        let n = self.programs.len();
        let budget = env.cycles as f64;
        let mut score = vec![0.0; n];
        let mut alive_score = vec![0.0; n];
        let mut total_spawned_procs = vec![0u64; n];
        let mut prev_procs = mars.process_counts();
        let mut cycles = 0;

        loop {
            if self.is_cancelled() {
                return Err(TournamentError::Cancelled);
            }

            let running = mars.step();
            observer(&mars);

            let procs = mars.process_counts();
            let n_alive = procs.iter().filter(|&&p| p > 0).count();
            if n_alive == 0 {
                break;
            }

            cycles += 1;
            for i in 0..n {
                if procs[i] > 0 {
                    score[i] += 1.0 / n_alive as f64 / budget;
                    alive_score[i] += 1.0 / budget;
                }
                total_spawned_procs[i] += procs[i].saturating_sub(prev_procs[i]) as u64;
            }
            prev_procs = procs;

            if !running {
                break;
            }
        }

        for s in score.iter_mut() {
            *s *= n as f64;
        }

        tracing::debug!("Round seed={} finished after {} cycles", seed, cycles);

        Ok(RoundStats {
            seed,
            cycles,
            score,
            alive_score,
            total_spawned_procs,
            memory_coverage: mars.coverage_counts().into_iter().map(|c| c as u64).collect(),
            survivors: mars.outcome().survivors,
        })
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Get configuration
    pub fn config(&self) -> &TournamentConfig {
        self.config
    }
}
