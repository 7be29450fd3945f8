//! Snapshot command - run a match for N cycles and dump the core
//!
//! Level 1 - run(); Level 4 - JsonSink

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use corewar_core::{CoreSnapshot, Mars, SnapshotSink};

use crate::common::{load_programs, EnvArgs};

#[derive(Args)]
pub struct SnapshotArgs {
    /// Program JSON files
    #[arg(required = true, value_name = "PROGRAM")]
    pub programs: Vec<PathBuf>,

    /// Cycles to run before taking the snapshot
    #[arg(long, default_value = "0")]
    pub steps: u32,

    /// Placement seed
    #[arg(long, default_value = "0")]
    pub seed: u64,

    /// Only print cells owned by some warrior
    #[arg(long)]
    pub owned_only: bool,

    #[command(flatten)]
    pub env: EnvArgs,
}

/// Writes snapshots as pretty JSON
struct JsonSink<W: Write> {
    out: W,
    owned_only: bool,
    error: Option<anyhow::Error>,
}

impl<W: Write> JsonSink<W> {
    fn write(&mut self, snapshot: &CoreSnapshot) -> Result<()> {
        if self.owned_only {
            let mut trimmed = snapshot.clone();
            trimmed.cells.retain(|c| c.owner.is_some());
            serde_json::to_writer_pretty(&mut self.out, &trimmed)?;
        } else {
            serde_json::to_writer_pretty(&mut self.out, snapshot)?;
        }
        writeln!(self.out)?;
        Ok(())
    }
}

impl<W: Write> SnapshotSink for JsonSink<W> {
    fn consume(&mut self, snapshot: &CoreSnapshot) {
        if let Err(e) = self.write(snapshot) {
            self.error = Some(e);
        }
    }
}

/// Run snapshot command
pub fn run(args: SnapshotArgs) -> Result<()> {
    let env = args.env.environment()?;
    let programs = load_programs(&args.programs, &env)?;

    let mut mars = Mars::new(&env, &programs)?;
    mars.setup(args.seed)?;
    while mars.cycle() < args.steps && mars.step() {}

    tracing::info!(
        "Snapshot at cycle {} ({} of {} warriors alive)",
        mars.cycle(),
        mars.alive_count(),
        programs.len()
    );

    let mut sink = JsonSink {
        out: std::io::stdout().lock(),
        owned_only: args.owned_only,
        error: None,
    };
    sink.consume(&mars.snapshot());
    match sink.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corewar_core::{Environment, Instruction, Program};

    #[test]
    fn test_json_sink_owned_only() {
        let programs = vec![Program::new("Duck", vec![Instruction::dat(0, 0)])];
        let env = Environment::new(50, 10);
        let mut mars = Mars::new(&env, &programs).unwrap();
        mars.setup(0).unwrap();

        let mut sink = JsonSink {
            out: Vec::new(),
            owned_only: true,
            error: None,
        };
        sink.consume(&mars.snapshot());
        assert!(sink.error.is_none());

        let parsed: CoreSnapshot = serde_json::from_slice(&sink.out).unwrap();
        assert_eq!(parsed.cells.len(), 1);
        assert_eq!(parsed.warriors[0].name, "Duck");
    }
}
