//! Setup errors surfaced before a round starts
//!
//! Runtime faults (DAT, division by zero, overflow) are not errors; they are
//! ordinary process deaths or silent clamps.

/// Error types for round setup and program loading
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid environment: {0} must be greater than zero")]
    InvalidEnvironment(&'static str),

    #[error("program '{name}' has {len} instructions, limit is {max}")]
    ProgramTooLong { name: String, len: usize, max: usize },

    #[error("program '{0}' has no instructions")]
    EmptyProgram(String),

    #[error("program '{name}' starts at {start} but has only {len} instructions")]
    StartOutOfRange { name: String, start: usize, len: usize },

    #[error("program '{name}' does not fit in a core of {core_size} cells")]
    ProgramTooLarge { name: String, core_size: usize },

    #[error("no warriors to place")]
    NoWarriors,

    #[error(
        "could not place {warriors} warriors {min_distance} cells apart in a core of {core_size} after {attempts} attempts"
    )]
    PlacementFailed {
        warriors: usize,
        core_size: usize,
        min_distance: usize,
        attempts: usize,
    },

    #[error("expected {expected} placement offsets, got {got}")]
    OffsetCount { expected: usize, got: usize },

    #[error("failed to read program: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode program: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
