//! Arguments and loading shared by every command
//!
//! Level 4 - Configuration and file I/O

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use corewar_core::{Environment, Program, ProgramSource};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

/// Simulation constants; flags override the config file
#[derive(Args, Clone, Debug, Default)]
pub struct EnvArgs {
    /// Environment JSON file (missing keys keep their defaults)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Rounds per tournament
    #[arg(long)]
    pub rounds: Option<usize>,

    /// Core size
    #[arg(long)]
    pub core_size: Option<usize>,

    /// Cycle budget per round
    #[arg(long)]
    pub cycles: Option<u32>,

    /// Process queue cap per warrior
    #[arg(long)]
    pub max_processes: Option<usize>,

    /// Maximum program length
    #[arg(long)]
    pub max_length: Option<usize>,

    /// Minimum distance between warriors at placement
    #[arg(long)]
    pub min_distance: Option<usize>,
}

impl EnvArgs {
    /// Build the environment: defaults, then the config file, then flags
    pub fn environment(&self) -> Result<Environment> {
        let mut env = match &self.config {
            Some(path) => load_environment(path)?,
            None => Environment::default(),
        };

        if let Some(rounds) = self.rounds {
            env.rounds = rounds;
        }
        if let Some(core_size) = self.core_size {
            env.core_size = core_size;
        }
        if let Some(cycles) = self.cycles {
            env.cycles = cycles;
        }
        if let Some(max_processes) = self.max_processes {
            env.max_processes = max_processes;
        }
        if let Some(max_length) = self.max_length {
            env.max_length = max_length;
        }
        if let Some(min_distance) = self.min_distance {
            env.min_distance = min_distance;
        }

        env.validate().context("Invalid environment")?;
        Ok(env)
    }
}

// ============================================================================
// LOADING
// ============================================================================

fn load_environment(path: &Path) -> Result<Environment> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read environment: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse environment: {}", path.display()))
}

/// Load and validate every program against the environment
pub fn load_programs(paths: &[PathBuf], env: &Environment) -> Result<Vec<Program>> {
    paths
        .iter()
        .map(|path| {
            path.as_path()
                .program(env)
                .with_context(|| format!("Failed to load program: {}", path.display()))
        })
        .collect()
}
