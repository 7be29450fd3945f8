//! Integration tests for the Core War toolchain
//!
//! Tests the full stack: program files, the simulator, the tournament
//! harness, and the `corewar` binary

use std::path::{Path, PathBuf};
use std::process::Command;

use corewar_core::{CoreSnapshot, Environment, Instruction, Modifier, Mode, Opcode, Program, ProgramSource};
use corewar_tournament::{run_tournament, TournamentConfig};

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn imp() -> Program {
    Program::new(
        "Imp",
        vec![Instruction::new(Opcode::Mov, Modifier::I, Mode::Direct, 0, Mode::Direct, 1)],
    )
    .with_author("A. K. Dewdney")
}

fn dwarf() -> Program {
    Program::new(
        "Dwarf",
        vec![
            Instruction::new(Opcode::Add, Modifier::AB, Mode::Immediate, 4, Mode::Direct, 3),
            Instruction::new(Opcode::Mov, Modifier::I, Mode::Direct, 2, Mode::IndirectB, 2),
            Instruction::new(Opcode::Jmp, Modifier::B, Mode::Direct, -2, Mode::Direct, 0),
            Instruction::dat(0, 0),
        ],
    )
}

fn write_programs(dir: &Path, programs: &[Program]) -> Vec<PathBuf> {
    programs
        .iter()
        .map(|p| {
            let path = dir.join(format!("{}.json", p.name.to_lowercase()));
            p.save(&path).unwrap();
            path
        })
        .collect()
}

fn corewar() -> Command {
    Command::new(env!("CARGO_BIN_EXE_corewar"))
}

// ============================================================================
// LIBRARY STACK
// ============================================================================

#[test]
fn test_programs_load_from_disk_and_play() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_programs(dir.path(), &[dwarf(), imp()]);

    let env = Environment::new(800, 500).with_rounds(6).with_min_distance(50);
    let programs: Vec<Program> = paths
        .iter()
        .map(|p| p.as_path().program(&env).unwrap())
        .collect();
    assert_eq!(programs[0], dwarf());
    assert_eq!(programs[1].author.as_deref(), Some("A. K. Dewdney"));

    let result = run_tournament(&programs, &TournamentConfig::new(env).with_workers(2)).unwrap();
    assert_eq!(result.names, vec!["Dwarf", "Imp"]);
    assert_eq!(result.rounds(), 6);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["score"].as_array().unwrap().len(), 2);
    assert_eq!(json["score"][0].as_array().unwrap().len(), 6);
}

#[test]
fn test_program_file_rejected_for_small_max_length() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_programs(dir.path(), &[dwarf()]);
    let env = Environment::default().with_max_length(3);
    assert!(paths[0].as_path().program(&env).is_err());
}

// ============================================================================
// BINARY
// ============================================================================

#[test]
fn test_snapshot_command_prints_core() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_programs(dir.path(), &[imp()]);

    let output = corewar()
        .arg("snapshot")
        .args(&paths)
        .args(["--steps", "5", "--core-size", "100", "--cycles", "50", "--owned-only"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let snapshot: CoreSnapshot = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(snapshot.cycle, 5);
    assert_eq!(snapshot.cells.len(), 6);
    assert_eq!(snapshot.warriors[0].processes, 1);
}

#[test]
fn test_tournament_command_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_programs(dir.path(), &[imp(), dwarf()]);

    let output = corewar()
        .arg("tournament")
        .args(&paths)
        .args(["--rounds", "3", "--core-size", "800", "--cycles", "200", "--min-distance", "50"])
        .args(["--workers", "2", "--seed", "7", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["base_seed"], 7);
    assert_eq!(report["environment"]["core_size"], 800);
    assert_eq!(report["summary"].as_array().unwrap().len(), 2);
    assert_eq!(report["result"]["seeds"], serde_json::json!([7, 8, 9]));
    assert!(report["finished_at"].is_string());
}

#[test]
fn test_missing_program_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = corewar()
        .arg("round")
        .arg(dir.path().join("missing.json"))
        .output()
        .unwrap();
    assert!(!output.status.success());
}
