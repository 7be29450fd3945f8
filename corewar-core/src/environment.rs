//! Numeric environment shared by the parser, scheduler and tournament

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Default saturation bound for instruction numeric fields
pub const FIELD_BOUND: i64 = 999_999_999;

/// Simulation constants
///
/// Field names accept the conventional upper-case spellings (`CORESIZE`,
/// `MINDISTANCE`, ...) when deserialized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    /// Rounds per tournament
    #[serde(alias = "ROUNDS")]
    pub rounds: usize,
    /// Number of cells in the core
    #[serde(alias = "CORESIZE")]
    pub core_size: usize,
    /// Cycle budget per round
    #[serde(alias = "CYCLES")]
    pub cycles: u32,
    /// Process queue capacity per warrior
    #[serde(alias = "MAXPROCESSES")]
    pub max_processes: usize,
    /// Maximum program length
    #[serde(alias = "MAXLENGTH")]
    pub max_length: usize,
    /// Minimum separation between warriors
    #[serde(alias = "MINDISTANCE")]
    pub min_distance: usize,
    /// Numeric fields are clamped into `[-field_bound, field_bound]`
    pub field_bound: i64,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            rounds: 24,
            core_size: 8000,
            cycles: 80000,
            max_processes: 8000,
            max_length: 100,
            min_distance: 100,
            field_bound: FIELD_BOUND,
        }
    }
}

impl Environment {
    /// Environment with a given core size and cycle budget, other values default
    pub fn new(core_size: usize, cycles: u32) -> Self {
        Self {
            core_size,
            cycles,
            ..Default::default()
        }
    }

    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_max_processes(mut self, max_processes: usize) -> Self {
        self.max_processes = max_processes;
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_min_distance(mut self, min_distance: usize) -> Self {
        self.min_distance = min_distance;
        self
    }

    pub fn with_field_bound(mut self, field_bound: i64) -> Self {
        self.field_bound = field_bound;
        self
    }

    /// Reject missing (zero) values before any round is set up
    pub fn validate(&self) -> Result<()> {
        let checks: [(&'static str, bool); 6] = [
            ("rounds", self.rounds > 0),
            ("core_size", self.core_size > 0),
            ("cycles", self.cycles > 0),
            ("max_processes", self.max_processes > 0),
            ("max_length", self.max_length > 0),
            ("field_bound", self.field_bound > 0),
        ];
        match checks.iter().find(|(_, ok)| !ok) {
            Some((name, _)) => Err(CoreError::InvalidEnvironment(name)),
            None => Ok(()),
        }
    }
}
