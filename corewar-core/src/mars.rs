//! Match scheduler - places warriors and round-robins their processes
//!
//! ## Lifecycle
//!
//! `Unplaced` --place--> `Ready` --start--> `Running` --step*--> `RoundOver`
//!
//! One cycle executes the head process of every live warrior, in warrior
//! order. The successors of each executed instruction are appended to the
//! tail of that warrior's queue.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::engine;
use crate::environment::Environment;
use crate::error::{CoreError, Result};
use crate::events::{CoreEventHook, CoreEvents};
use crate::memory::{Core, WarriorId};
use crate::program::Program;
use crate::snapshot::{CellView, CoreSnapshot, WarriorView};
use crate::warrior::Warrior;

/// Full placement draws before setup gives up
pub const PLACEMENT_ATTEMPTS: usize = 64;

// ============================================================================
// TYPES
// ============================================================================

/// Scheduler state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchState {
    Unplaced,
    Ready,
    Running,
    RoundOver,
}

/// When a running match ends before the cycle budget
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEnd {
    /// Stop once at most one warrior is alive (a solo warrior runs until it dies)
    #[default]
    LastSurvivor,
    /// Stop only when every warrior is dead
    AllDead,
}

/// Result of a finished match
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Cycles executed
    pub cycles: u32,
    /// Warriors with a non-empty queue at the end
    pub survivors: Vec<WarriorId>,
}

impl MatchOutcome {
    /// The unique survivor, if there is exactly one
    pub fn winner(&self) -> Option<WarriorId> {
        match self.survivors.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// More than one survivor
    pub fn is_tie(&self) -> bool {
        self.survivors.len() > 1
    }
}

// ============================================================================
// SCHEDULER
// ============================================================================

/// Memory Array Redcode Simulator for one round
pub struct Mars<'p, H: CoreEventHook = CoreEvents> {
    env: Environment,
    core: Core,
    warriors: Vec<Warrior<'p>>,
    offsets: Vec<usize>,
    hook: H,
    cycle: u32,
    state: MatchState,
    round_end: RoundEnd,
}

impl<'p> Mars<'p, CoreEvents> {
    /// Scheduler with the default clamping/coverage hook
    pub fn new(env: &Environment, programs: &'p [Program]) -> Result<Self> {
        let hook = CoreEvents::new(programs.len(), env.core_size, env.field_bound);
        Self::with_hook(env, programs, hook)
    }

    /// Covered address count per warrior
    pub fn coverage_counts(&self) -> Vec<usize> {
        self.hook.coverage_counts()
    }
}

impl<'p, H: CoreEventHook> Mars<'p, H> {
    /// Scheduler with a custom event hook
    ///
    /// Fails fast on an invalid environment or a program that breaks its
    /// limits; no round is set up in that case.
    pub fn with_hook(env: &Environment, programs: &'p [Program], hook: H) -> Result<Self> {
        env.validate()?;
        if programs.is_empty() {
            return Err(CoreError::NoWarriors);
        }
        for program in programs {
            program.validate(env)?;
        }

        Ok(Self {
            env: env.clone(),
            core: Core::new(env.core_size),
            warriors: programs
                .iter()
                .enumerate()
                .map(|(id, program)| Warrior::new(id, program))
                .collect(),
            offsets: Vec::new(),
            hook,
            cycle: 0,
            state: MatchState::Unplaced,
            round_end: RoundEnd::default(),
        })
    }

    pub fn with_round_end(mut self, round_end: RoundEnd) -> Self {
        self.round_end = round_end;
        self
    }

    // ------------------------------------------------------------------------
    // Setup
    // ------------------------------------------------------------------------

    /// Place and start in one call
    pub fn setup(&mut self, seed: u64) -> Result<()> {
        self.place(seed)?;
        self.start();
        Ok(())
    }

    /// Choose random, separated offsets for every warrior
    ///
    /// A draw is retried only when a warrior after the second finds no room;
    /// if the second warrior has no legal offset, none exists for any draw.
    pub fn place(&mut self, seed: u64) -> Result<()> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut attempts = 0;

        while attempts < PLACEMENT_ATTEMPTS {
            attempts += 1;
            match self.draw_offsets(&mut rng) {
                Ok(offsets) => {
                    tracing::debug!("Placed {} warriors at {:?} (attempt {})", offsets.len(), offsets, attempts);
                    self.offsets = offsets;
                    self.state = MatchState::Ready;
                    return Ok(());
                }
                Err(1) => break,
                Err(_) => {}
            }
        }

        Err(CoreError::PlacementFailed {
            warriors: self.warriors.len(),
            core_size: self.env.core_size,
            min_distance: self.env.min_distance,
            attempts,
        })
    }

    /// Place warriors at explicit offsets
    ///
    /// Separation is not checked; the caller owns the layout.
    pub fn place_at(&mut self, offsets: &[usize]) -> Result<()> {
        if offsets.len() != self.warriors.len() {
            return Err(CoreError::OffsetCount {
                expected: self.warriors.len(),
                got: offsets.len(),
            });
        }
        self.offsets = offsets.iter().map(|&o| o % self.env.core_size).collect();
        self.state = MatchState::Ready;
        Ok(())
    }

    /// Load programs into a clean core and give each warrior one process
    ///
    /// Does nothing unless the scheduler is `Ready`.
    pub fn start(&mut self) {
        if self.state != MatchState::Ready {
            return;
        }

        let size = self.env.core_size;
        self.core.clear();
        self.hook.reset(self.warriors.len(), size);

        for (warrior, &offset) in self.warriors.iter_mut().zip(&self.offsets) {
            warrior.reset(offset, size);
            let id = warrior.id();
            for (i, instruction) in warrior.program().instructions.iter().enumerate() {
                self.core.store(offset + i, id, &mut self.hook, |cell| *cell = *instruction);
            }
        }

        self.cycle = 0;
        self.state = MatchState::Running;
    }

    // ------------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------------

    /// Execute one cycle; returns true while the match keeps running
    pub fn step(&mut self) -> bool {
        if self.state != MatchState::Running {
            return false;
        }

        let max_processes = self.env.max_processes;
        for warrior in self.warriors.iter_mut() {
            let Some(pc) = warrior.pop() else {
                continue;
            };
            let id = warrior.id();
            for address in engine::execute(&mut self.core, pc, id, &mut self.hook) {
                if warrior.push(address, max_processes) {
                    self.hook.on_enqueue(id, address);
                }
            }
        }

        self.cycle += 1;
        if self.is_finished() {
            tracing::debug!(
                "Round over after {} cycles, {} alive",
                self.cycle,
                self.alive_count()
            );
            self.state = MatchState::RoundOver;
        }
        self.state == MatchState::Running
    }

    /// Drive the match to `RoundOver`, starting it first if it is `Ready`
    pub fn run(&mut self) -> MatchOutcome {
        self.start();
        while self.step() {}
        self.outcome()
    }

    fn is_finished(&self) -> bool {
        if self.cycle >= self.env.cycles {
            return true;
        }
        let alive = self.alive_count();
        match self.round_end {
            RoundEnd::AllDead => alive == 0,
            RoundEnd::LastSurvivor => alive == 0 || (self.warriors.len() > 1 && alive <= 1),
        }
    }

    // ------------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------------

    pub fn outcome(&self) -> MatchOutcome {
        MatchOutcome {
            cycles: self.cycle,
            survivors: self
                .warriors
                .iter()
                .filter(|w| w.is_alive())
                .map(Warrior::id)
                .collect(),
        }
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn hook(&self) -> &H {
        &self.hook
    }

    pub fn warriors(&self) -> &[Warrior<'p>] {
        &self.warriors
    }

    /// Offsets chosen by the last placement
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn alive_count(&self) -> usize {
        self.warriors.iter().filter(|w| w.is_alive()).count()
    }

    /// Live process count per warrior, in warrior order
    pub fn process_counts(&self) -> Vec<usize> {
        self.warriors.iter().map(Warrior::process_count).collect()
    }

    /// Owned copy of the current core and queues
    pub fn snapshot(&self) -> CoreSnapshot {
        let cells = self
            .core
            .cells()
            .iter()
            .enumerate()
            .map(|(address, instruction)| CellView {
                instruction: *instruction,
                owner: self.core.owner(address),
            })
            .collect();

        let warriors = self
            .warriors
            .iter()
            .map(|w| WarriorView {
                id: w.id(),
                name: w.name().to_string(),
                offset: w.offset(),
                processes: w.process_count(),
                alive: w.is_alive(),
                next: w.processes().next(),
            })
            .collect();

        CoreSnapshot {
            cycle: self.cycle,
            cells,
            warriors,
        }
    }

    // ------------------------------------------------------------------------
    // Placement
    // ------------------------------------------------------------------------

    /// One placement draw; `Err(i)` when warrior `i` has no legal offset
    ///
    /// The first warrior lands anywhere. Each later warrior is drawn from the
    /// offsets that keep every forward gap at least the minimum distance and
    /// at least the length of the program it follows.
    fn draw_offsets(&self, rng: &mut ChaCha8Rng) -> std::result::Result<Vec<usize>, usize> {
        let size = self.env.core_size;
        let lengths: Vec<usize> = self.warriors.iter().map(|w| w.program().len()).collect();
        let mut offsets = Vec::with_capacity(lengths.len());
        offsets.push(rng.gen_range(0..size));

        for (index, &len) in lengths.iter().enumerate().skip(1) {
            let candidates: Vec<usize> = (0..size)
                .filter(|&candidate| {
                    offsets
                        .iter()
                        .zip(&lengths)
                        .all(|(&placed, &placed_len)| self.separated(placed, placed_len, candidate, len))
                })
                .collect();
            if candidates.is_empty() {
                return Err(index);
            }
            offsets.push(candidates[rng.gen_range(0..candidates.len())]);
        }

        Ok(offsets)
    }

    fn separated(&self, a: usize, a_len: usize, b: usize, b_len: usize) -> bool {
        let min = self.env.min_distance;
        self.core.gap(a, b) >= min.max(a_len) && self.core.gap(b, a) >= min.max(b_len)
    }
}
