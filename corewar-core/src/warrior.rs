//! Warrior - a program plus its per-round execution state

use std::collections::VecDeque;

use crate::memory::WarriorId;
use crate::program::Program;

/// A competing program inside one round
///
/// The program is borrowed read-only; placement and the process queue are
/// rebuilt every round.
#[derive(Clone, Debug)]
pub struct Warrior<'p> {
    id: WarriorId,
    program: &'p Program,
    offset: usize,
    queue: VecDeque<usize>,
}

impl<'p> Warrior<'p> {
    pub fn new(id: WarriorId, program: &'p Program) -> Self {
        Self {
            id,
            program,
            offset: 0,
            queue: VecDeque::new(),
        }
    }

    pub fn id(&self) -> WarriorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.program.name
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }

    /// Core address of the first instruction
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Place the warrior and reset its queue to the single entry point
    pub(crate) fn reset(&mut self, offset: usize, core_size: usize) {
        self.offset = offset;
        self.queue.clear();
        self.queue.push_back((offset + self.program.start) % core_size);
    }

    /// Pending instruction pointers, head first
    pub fn processes(&self) -> impl Iterator<Item = usize> + '_ {
        self.queue.iter().copied()
    }

    pub fn process_count(&self) -> usize {
        self.queue.len()
    }

    pub fn is_alive(&self) -> bool {
        !self.queue.is_empty()
    }

    pub(crate) fn pop(&mut self) -> Option<usize> {
        self.queue.pop_front()
    }

    /// Append a process unless the queue is at `max_processes`
    ///
    /// Returns false when the enqueue was dropped.
    pub(crate) fn push(&mut self, address: usize, max_processes: usize) -> bool {
        if self.queue.len() < max_processes {
            self.queue.push_back(address);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::Instruction;

    #[test]
    fn test_reset_enqueues_entry_point() {
        let program = Program::new("Two", vec![Instruction::default(); 2]).with_start(1);
        let mut warrior = Warrior::new(0, &program);
        assert!(!warrior.is_alive());

        warrior.reset(99, 100);
        assert_eq!(warrior.offset(), 99);
        assert_eq!(warrior.processes().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_push_respects_cap() {
        let program = Program::new("P", vec![Instruction::default()]);
        let mut warrior = Warrior::new(0, &program);
        warrior.reset(0, 10);

        assert!(warrior.push(1, 2));
        assert!(!warrior.push(2, 2));
        assert_eq!(warrior.process_count(), 2);

        assert_eq!(warrior.pop(), Some(0));
        assert_eq!(warrior.pop(), Some(1));
        assert_eq!(warrior.pop(), None);
        assert!(!warrior.is_alive());
    }
}
