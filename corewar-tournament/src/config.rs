//! Configuration types for tournament play
//!
//! Level 4 - Utilities and configuration

use std::time::Duration;

use corewar_core::{Environment, RoundEnd};

/// Default batch timeout, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 900;

/// Tournament configuration
#[derive(Clone, Debug)]
pub struct TournamentConfig {
    /// Simulation constants, including the number of rounds
    pub environment: Environment,
    /// Worker threads for the round pool (0 = one per CPU)
    pub workers: usize,
    /// Budget for the whole batch; exceeding it discards every round
    pub timeout: Duration,
    /// When a round stops before its cycle budget
    pub round_end: RoundEnd,
    /// Round `i` is seeded with `base_seed + i`
    pub base_seed: u64,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            workers: 1,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            round_end: RoundEnd::AllDead,
            base_seed: 0,
        }
    }
}

impl TournamentConfig {
    /// Create config for the given environment
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            ..Default::default()
        }
    }

    /// Set worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set batch timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set base seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    /// Set round end policy
    pub fn with_round_end(mut self, round_end: RoundEnd) -> Self {
        self.round_end = round_end;
        self
    }

    /// Seed for a round index
    pub fn round_seed(&self, round: usize) -> u64 {
        self.base_seed.wrapping_add(round as u64)
    }
}
