//! Tournament failures
//!
//! A failed batch never carries partial statistics.

use std::time::Duration;

use corewar_core::CoreError;

/// Error types for tournament execution
#[derive(Debug, thiserror::Error)]
pub enum TournamentError {
    #[error("round setup failed: {0}")]
    Setup(#[from] CoreError),

    #[error("tournament timed out after {0:?}")]
    Timeout(Duration),

    #[error("round cancelled")]
    Cancelled,

    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),

    #[error("worker pool stopped without reporting results")]
    WorkerDisconnected,
}

pub type Result<T> = std::result::Result<T, TournamentError>;
