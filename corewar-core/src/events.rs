//! Core event hook - intercepts every cell write and process enqueue

use crate::instruction::Instruction;
use crate::memory::WarriorId;

/// Synchronous callback invoked by the scheduler and opcode engine
///
/// `on_write` runs before a cell mutation is committed and may adjust the
/// cell. `on_enqueue` runs after a process address has been accepted into a
/// warrior's queue (dropped enqueues are not reported).
pub trait CoreEventHook {
    fn on_write(&mut self, warrior: WarriorId, address: usize, cell: &mut Instruction);

    fn on_enqueue(&mut self, _warrior: WarriorId, _address: usize) {}

    /// Called when a round is loaded into the core
    fn reset(&mut self, _warriors: usize, _core_size: usize) {}
}

// ============================================================================
// COVERAGE
// ============================================================================

/// Set of core addresses one warrior's processes have reached this round
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coverage {
    bits: Vec<bool>,
    count: usize,
}

impl Coverage {
    pub fn new(core_size: usize) -> Self {
        Self {
            bits: vec![false; core_size],
            count: 0,
        }
    }

    /// Set the bit at `address`; returns true if it was newly set
    pub fn mark(&mut self, address: usize) -> bool {
        let len = self.bits.len();
        let slot = &mut self.bits[address % len];
        if *slot {
            false
        } else {
            *slot = true;
            self.count += 1;
            true
        }
    }

    pub fn contains(&self, address: usize) -> bool {
        self.bits[address % self.bits.len()]
    }

    /// Number of distinct addresses covered
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }
}

// ============================================================================
// DEFAULT POLICY
// ============================================================================

/// Default hook: saturate numeric fields and record per-warrior coverage
#[derive(Clone, Debug)]
pub struct CoreEvents {
    field_bound: i64,
    coverage: Vec<Coverage>,
}

impl CoreEvents {
    pub fn new(warriors: usize, core_size: usize, field_bound: i64) -> Self {
        Self {
            field_bound,
            coverage: (0..warriors).map(|_| Coverage::new(core_size)).collect(),
        }
    }

    pub fn field_bound(&self) -> i64 {
        self.field_bound
    }

    pub fn coverage(&self, warrior: WarriorId) -> &Coverage {
        &self.coverage[warrior]
    }

    /// Covered address count per warrior, in warrior order
    pub fn coverage_counts(&self) -> Vec<usize> {
        self.coverage.iter().map(Coverage::count).collect()
    }
}

impl CoreEventHook for CoreEvents {
    /// Clamps only; coverage is recorded on enqueue, not on write
    fn on_write(&mut self, _warrior: WarriorId, _address: usize, cell: &mut Instruction) {
        cell.clamp_fields(self.field_bound);
    }

    fn on_enqueue(&mut self, warrior: WarriorId, address: usize) {
        if let Some(coverage) = self.coverage.get_mut(warrior) {
            coverage.mark(address);
        }
    }

    fn reset(&mut self, warriors: usize, core_size: usize) {
        self.coverage = (0..warriors).map(|_| Coverage::new(core_size)).collect();
    }
}
