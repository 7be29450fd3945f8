//! Core memory - fixed-size circular array of instructions

use crate::events::CoreEventHook;
use crate::instruction::Instruction;

/// Index of a warrior in the match's warrior list
pub type WarriorId = usize;

/// The shared core all warriors execute in
///
/// Every address is taken modulo the core size. Each cell also remembers the
/// last warrior that wrote it, for presentation.
#[derive(Clone, Debug)]
pub struct Core {
    cells: Vec<Instruction>,
    owners: Vec<Option<WarriorId>>,
}

impl Core {
    /// Create a core of `size` empty cells
    pub fn new(size: usize) -> Self {
        Self {
            cells: vec![Instruction::default(); size],
            owners: vec![None; size],
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reduce a raw address into `0..len`
    pub fn trim(&self, address: i64) -> usize {
        address.rem_euclid(self.cells.len() as i64) as usize
    }

    /// `base + delta`, wrapped
    pub fn offset(&self, base: usize, delta: i64) -> usize {
        let size = self.cells.len() as i64;
        (base as i64 + delta.rem_euclid(size)).rem_euclid(size) as usize
    }

    /// Forward gap from `from` to `to`
    pub fn gap(&self, from: usize, to: usize) -> usize {
        let size = self.cells.len();
        (to % size + size - from % size) % size
    }

    /// Cyclic distance: the shorter of the two directional gaps
    pub fn distance(&self, a: usize, b: usize) -> usize {
        self.gap(a, b).min(self.gap(b, a))
    }

    pub fn get(&self, address: usize) -> &Instruction {
        &self.cells[address % self.cells.len()]
    }

    /// Last warrior to write the cell, if any
    pub fn owner(&self, address: usize) -> Option<WarriorId> {
        self.owners[address % self.cells.len()]
    }

    pub fn cells(&self) -> &[Instruction] {
        &self.cells
    }

    /// Mutate a cell on behalf of `warrior`
    ///
    /// The hook sees the written cell before the write is committed.
    pub fn store<H, F>(&mut self, address: usize, warrior: WarriorId, hook: &mut H, write: F)
    where
        H: CoreEventHook + ?Sized,
        F: FnOnce(&mut Instruction),
    {
        let address = address % self.cells.len();
        let mut cell = self.cells[address];
        write(&mut cell);
        hook.on_write(warrior, address, &mut cell);
        self.cells[address] = cell;
        self.owners[address] = Some(warrior);
    }

    /// Reset every cell to `DAT.F #0, #0` with no owner
    pub fn clear(&mut self) {
        self.cells.fill(Instruction::default());
        self.owners.fill(None);
    }
}
