//! COREWAR CLI - Command-line interface
//!
//! Commands:
//! - round: Play a single observed round
//! - tournament: Score warriors over many seeded rounds
//! - snapshot: Dump the core after a number of cycles

mod common;
mod round_cmd;
mod snapshot_cmd;
mod tournament_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "corewar")]
#[command(about = "Core War simulator and tournament harness")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single round
    Round(round_cmd::RoundArgs),
    /// Run a tournament
    Tournament(tournament_cmd::TournamentArgs),
    /// Print the core snapshot as JSON
    Snapshot(snapshot_cmd::SnapshotArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Round(args) => round_cmd::run(args),
        Commands::Tournament(args) => tournament_cmd::run(args),
        Commands::Snapshot(args) => snapshot_cmd::run(args),
    }
}
