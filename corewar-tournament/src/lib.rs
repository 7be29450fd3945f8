//! COREWAR Tournament - Scoring warriors over many seeded rounds
//!
//! This crate provides tournament infrastructure:
//! - Round play with per-cycle survival scoring
//! - Batches of rounds on a worker pool with a batch timeout
//! - Warrior-by-round statistics and their reductions
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_tournament (orchestration)
//! - Level 2: validate, execute_rounds_parallel (phases)
//! - Level 3: RoundRunner::play (steps)
//! - Level 4: utilities, configuration

mod config;
mod error;
mod round;
mod tournament;

pub use config::{TournamentConfig, DEFAULT_TIMEOUT_SECS};
pub use error::{Result, TournamentError};
pub use round::{RoundRunner, RoundStats};
pub use tournament::{run_tournament, run_tournament_sequential, TournamentResult, WarriorSummary};
