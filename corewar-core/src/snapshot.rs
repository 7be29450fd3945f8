//! Read-only view of a match for presentation layers

use serde::{Deserialize, Serialize};

use crate::instruction::Instruction;
use crate::memory::WarriorId;

/// One core cell as seen by a renderer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub instruction: Instruction,
    /// Last warrior to load or write the cell
    pub owner: Option<WarriorId>,
}

/// Per-warrior state as seen by a renderer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarriorView {
    pub id: WarriorId,
    pub name: String,
    pub offset: usize,
    pub processes: usize,
    pub alive: bool,
    /// Address the warrior executes next, if alive
    pub next: Option<usize>,
}

/// Owned copy of the core and queues at a cycle boundary
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreSnapshot {
    pub cycle: u32,
    pub cells: Vec<CellView>,
    pub warriors: Vec<WarriorView>,
}

impl CoreSnapshot {
    /// Number of cells owned by each warrior
    pub fn owned_cells(&self) -> Vec<usize> {
        let mut counts = vec![0; self.warriors.len()];
        for owner in self.cells.iter().filter_map(|c| c.owner) {
            if let Some(count) = counts.get_mut(owner) {
                *count += 1;
            }
        }
        counts
    }
}

/// A presentation collaborator that consumes snapshots
pub trait SnapshotSink {
    fn consume(&mut self, snapshot: &CoreSnapshot);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_cells() {
        let cell = |owner| CellView {
            instruction: Instruction::default(),
            owner,
        };
        let warrior = |id| WarriorView {
            id,
            name: format!("w{}", id),
            offset: 0,
            processes: 1,
            alive: true,
            next: Some(0),
        };
        let snapshot = CoreSnapshot {
            cycle: 3,
            cells: vec![cell(Some(0)), cell(None), cell(Some(1)), cell(Some(1))],
            warriors: vec![warrior(0), warrior(1)],
        };
        assert_eq!(snapshot.owned_cells(), vec![1, 2]);
    }
}
