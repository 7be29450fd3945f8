//! COREWAR Core - Redcode execution kernel
//!
//! This crate provides the virtual machine that runs competing warriors:
//! - Instruction model (opcodes, modifiers, addressing modes)
//! - Circular core memory with per-cell ownership
//! - Addressing & opcode engine (one instruction per call)
//! - Core event hook (field clamping, coverage)
//! - Match scheduler with randomized, separated placement
//! - Read-only snapshots for presentation

pub mod engine;
pub mod environment;
pub mod error;
pub mod events;
pub mod instruction;
pub mod mars;
pub mod memory;
pub mod program;
pub mod snapshot;
pub mod warrior;

// Re-exports for convenient access
pub use engine::{execute, Successors};
pub use environment::{Environment, FIELD_BOUND};
pub use error::{CoreError, Result};
pub use events::{CoreEventHook, CoreEvents, Coverage};
pub use instruction::{Field, Instruction, Modifier, Mode, Opcode};
pub use mars::{Mars, MatchOutcome, MatchState, RoundEnd, PLACEMENT_ATTEMPTS};
pub use memory::{Core, WarriorId};
pub use program::{Program, ProgramSource};
pub use snapshot::{CellView, CoreSnapshot, SnapshotSink, WarriorView};
pub use warrior::Warrior;
