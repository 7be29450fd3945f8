//! Addressing & opcode engine - executes one instruction against the core
//!
//! Evaluation follows the ICWS'94 order: the A operand is resolved in full
//! (including its post-increment) before the B operand, then the opcode body
//! runs on copies of the two operand cells.

use crate::events::CoreEventHook;
use crate::instruction::{Field, Instruction, Modifier, Mode, Opcode};
use crate::memory::{Core, WarriorId};

// ============================================================================
// RESULT
// ============================================================================

/// Instruction pointers to append to the executing warrior's queue
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Successors {
    /// The process dies
    None,
    One(usize),
    /// `SPL`: continuation first, new process second
    Two(usize, usize),
}

impl Successors {
    pub fn len(self) -> usize {
        match self {
            Successors::None => 0,
            Successors::One(_) => 1,
            Successors::Two(_, _) => 2,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Successors::None
    }
}

impl IntoIterator for Successors {
    type Item = usize;
    type IntoIter = std::iter::Flatten<std::array::IntoIter<Option<usize>, 2>>;

    fn into_iter(self) -> Self::IntoIter {
        let pair = match self {
            Successors::None => [None, None],
            Successors::One(a) => [Some(a), None],
            Successors::Two(a, b) => [Some(a), Some(b)],
        };
        pair.into_iter().flatten()
    }
}

// ============================================================================
// OPERANDS
// ============================================================================

/// A resolved operand: the effective address and a copy of the cell there
#[derive(Clone, Copy, Debug)]
struct Operand {
    pointer: usize,
    register: Instruction,
}

/// Resolve one operand of the instruction at `pc`
///
/// Pre-decrement and post-increment are the only side effects of addressing.
fn resolve<H>(
    core: &mut Core,
    pc: usize,
    mode: Mode,
    number: i64,
    warrior: WarriorId,
    hook: &mut H,
) -> Operand
where
    H: CoreEventHook + ?Sized,
{
    if mode == Mode::Immediate {
        return Operand {
            pointer: pc,
            register: *core.get(pc),
        };
    }

    let target = core.offset(pc, number);
    let Some(field) = mode.indirect_field() else {
        return Operand {
            pointer: target,
            register: *core.get(target),
        };
    };

    if mode.is_predecrement() {
        core.store(target, warrior, hook, |cell| {
            let value = cell.field_mut(field);
            *value = value.saturating_sub(1);
        });
    }

    let pointer = core.offset(target, core.get(target).field(field));
    let register = *core.get(pointer);

    if mode.is_postincrement() {
        core.store(target, warrior, hook, |cell| {
            let value = cell.field_mut(field);
            *value = value.saturating_add(1);
        });
    }

    Operand { pointer, register }
}

// ============================================================================
// FIELD SELECTION
// ============================================================================

/// `(destination, source)` field pairs a modifier acts on
///
/// Destination fields belong to the B operand, source fields to the A operand.
fn field_pairs(modifier: Modifier) -> &'static [(Field, Field)] {
    match modifier {
        Modifier::A => &[(Field::A, Field::A)],
        Modifier::B => &[(Field::B, Field::B)],
        Modifier::AB => &[(Field::B, Field::A)],
        Modifier::BA => &[(Field::A, Field::B)],
        Modifier::F | Modifier::I => &[(Field::A, Field::A), (Field::B, Field::B)],
        Modifier::X => &[(Field::A, Field::B), (Field::B, Field::A)],
    }
}

/// True when every destination field of `cell` is zero
fn all_zero(cell: &Instruction, modifier: Modifier) -> bool {
    field_pairs(modifier)
        .iter()
        .all(|&(dst, _)| cell.field(dst) == 0)
}

// ============================================================================
// EXECUTION
// ============================================================================

/// Execute the instruction at `pc` for `warrior`
///
/// Every cell mutation goes through `hook`. Returns the addresses to enqueue.
pub fn execute<H>(core: &mut Core, pc: usize, warrior: WarriorId, hook: &mut H) -> Successors
where
    H: CoreEventHook + ?Sized,
{
    let ir = *core.get(pc);
    let a = resolve(core, pc, ir.a_mode, ir.a_number, warrior, hook);
    let b = resolve(core, pc, ir.b_mode, ir.b_number, warrior, hook);
    let next = core.offset(pc, 1);
    let skip = core.offset(pc, 2);
    let modifier = ir.modifier;

    match ir.opcode {
        Opcode::Dat => Successors::None,
        Opcode::Nop => Successors::One(next),
        Opcode::Mov => {
            core.store(b.pointer, warrior, hook, |cell| {
                if modifier == Modifier::I {
                    *cell = a.register;
                } else {
                    for &(dst, src) in field_pairs(modifier) {
                        *cell.field_mut(dst) = a.register.field(src);
                    }
                }
            });
            Successors::One(next)
        }
        Opcode::Add => arithmetic(core, &a, &b, modifier, warrior, hook, i64::saturating_add, next),
        Opcode::Sub => arithmetic(core, &a, &b, modifier, warrior, hook, i64::saturating_sub, next),
        Opcode::Mul => arithmetic(core, &a, &b, modifier, warrior, hook, i64::saturating_mul, next),
        Opcode::Div => divide(core, &a, &b, modifier, warrior, hook, floor_div, next),
        Opcode::Mod => divide(core, &a, &b, modifier, warrior, hook, floor_mod, next),
        Opcode::Jmp => Successors::One(a.pointer),
        Opcode::Jmz => {
            if all_zero(&b.register, modifier) {
                Successors::One(a.pointer)
            } else {
                Successors::One(next)
            }
        }
        Opcode::Jmn => {
            if all_zero(&b.register, modifier) {
                Successors::One(next)
            } else {
                Successors::One(a.pointer)
            }
        }
        Opcode::Djn => {
            let mut decremented = b.register;
            core.store(b.pointer, warrior, hook, |cell| {
                for &(dst, _) in field_pairs(modifier) {
                    let value = cell.field_mut(dst);
                    *value = value.saturating_sub(1);
                    let copy = decremented.field_mut(dst);
                    *copy = copy.saturating_sub(1);
                }
            });
            if all_zero(&decremented, modifier) {
                Successors::One(next)
            } else {
                Successors::One(a.pointer)
            }
        }
        Opcode::Spl => Successors::Two(next, a.pointer),
        Opcode::Cmp | Opcode::Seq => {
            if operands_equal(&a.register, &b.register, modifier) {
                Successors::One(skip)
            } else {
                Successors::One(next)
            }
        }
        Opcode::Sne => {
            if operands_equal(&a.register, &b.register, modifier) {
                Successors::One(next)
            } else {
                Successors::One(skip)
            }
        }
        Opcode::Slt => {
            let less = field_pairs(modifier)
                .iter()
                .all(|&(dst, src)| a.register.field(src) < b.register.field(dst));
            if less {
                Successors::One(skip)
            } else {
                Successors::One(next)
            }
        }
    }
}

/// Combine destination and source fields and write into the B target
#[allow(clippy::too_many_arguments)]
fn arithmetic<H>(
    core: &mut Core,
    a: &Operand,
    b: &Operand,
    modifier: Modifier,
    warrior: WarriorId,
    hook: &mut H,
    op: fn(i64, i64) -> i64,
    next: usize,
) -> Successors
where
    H: CoreEventHook + ?Sized,
{
    core.store(b.pointer, warrior, hook, |cell| {
        for &(dst, src) in field_pairs(modifier) {
            *cell.field_mut(dst) = op(b.register.field(dst), a.register.field(src));
        }
    });
    Successors::One(next)
}

/// Like `arithmetic`, but a zero divisor skips its field and kills the process
#[allow(clippy::too_many_arguments)]
fn divide<H>(
    core: &mut Core,
    a: &Operand,
    b: &Operand,
    modifier: Modifier,
    warrior: WarriorId,
    hook: &mut H,
    op: fn(i64, i64) -> i64,
    next: usize,
) -> Successors
where
    H: CoreEventHook + ?Sized,
{
    let pairs = field_pairs(modifier);
    let by_zero = pairs.iter().any(|&(_, src)| a.register.field(src) == 0);
    let writable = pairs.iter().any(|&(_, src)| a.register.field(src) != 0);

    if writable {
        core.store(b.pointer, warrior, hook, |cell| {
            for &(dst, src) in pairs {
                let divisor = a.register.field(src);
                if divisor != 0 {
                    *cell.field_mut(dst) = op(b.register.field(dst), divisor);
                }
            }
        });
    }

    if by_zero {
        Successors::None
    } else {
        Successors::One(next)
    }
}

fn operands_equal(a: &Instruction, b: &Instruction, modifier: Modifier) -> bool {
    if modifier == Modifier::I {
        return a == b;
    }
    field_pairs(modifier)
        .iter()
        .all(|&(dst, src)| a.field(src) == b.field(dst))
}

/// Quotient rounded towards negative infinity
fn floor_div(x: i64, y: i64) -> i64 {
    let q = x.wrapping_div(y);
    if x.wrapping_rem(y) != 0 && ((x < 0) != (y < 0)) {
        q.saturating_sub(1)
    } else {
        q
    }
}

/// Remainder with the sign of the divisor
fn floor_mod(x: i64, y: i64) -> i64 {
    let r = x.wrapping_rem(y);
    if r != 0 && ((r < 0) != (y < 0)) {
        r + y
    } else {
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CoreEvents;
    use crate::instruction::Mode::{Direct, Immediate, IndirectA, IndirectB, PostincrementB, PredecrementB};

    const SIZE: usize = 100;

    fn ins(opcode: Opcode, modifier: Modifier, a_mode: Mode, a: i64, b_mode: Mode, b: i64) -> Instruction {
        Instruction::new(opcode, modifier, a_mode, a, b_mode, b)
    }

    /// Core with `cells` loaded at address 10
    fn setup(cells: &[Instruction]) -> (Core, CoreEvents) {
        let mut core = Core::new(SIZE);
        let mut hook = CoreEvents::new(1, SIZE, 999_999_999);
        for (i, cell) in cells.iter().enumerate() {
            core.store(10 + i, 0, &mut hook, |c| *c = *cell);
        }
        (core, hook)
    }

    fn run(core: &mut Core, hook: &mut CoreEvents, pc: usize) -> Successors {
        execute(core, pc, 0, hook)
    }

    #[test]
    fn test_dat_kills() {
        let (mut core, mut hook) = setup(&[Instruction::dat(0, 0)]);
        assert_eq!(run(&mut core, &mut hook, 10), Successors::None);
    }

    #[test]
    fn test_imp_copies_itself_forward() {
        let imp = ins(Opcode::Mov, Modifier::I, Direct, 0, Direct, 1);
        let (mut core, mut hook) = setup(&[imp]);

        assert_eq!(run(&mut core, &mut hook, 10), Successors::One(11));
        assert_eq!(core.get(11), &imp);
    }

    #[test]
    fn test_mov_ab_immediate() {
        let (mut core, mut hook) = setup(&[ins(Opcode::Mov, Modifier::AB, Immediate, 7, Direct, 1)]);
        run(&mut core, &mut hook, 10);
        assert_eq!(core.get(11).b_number, 7);
        assert_eq!(core.get(11).a_number, 0);
    }

    #[test]
    fn test_mov_x_swaps_fields() {
        let (mut core, mut hook) = setup(&[
            ins(Opcode::Mov, Modifier::X, Direct, 1, Direct, 2),
            Instruction::dat(3, 4),
            Instruction::dat(0, 0),
        ]);
        run(&mut core, &mut hook, 10);
        assert_eq!(core.get(12).a_number, 4);
        assert_eq!(core.get(12).b_number, 3);
    }

    #[test]
    fn test_add_f_and_ab() {
        let (mut core, mut hook) = setup(&[
            ins(Opcode::Add, Modifier::F, Direct, 2, Direct, 3),
            ins(Opcode::Add, Modifier::AB, Immediate, 5, Direct, 2),
            Instruction::dat(1, 2),
            Instruction::dat(10, 20),
        ]);
        run(&mut core, &mut hook, 10);
        assert_eq!(core.get(13), &Instruction::dat(11, 22));

        run(&mut core, &mut hook, 11);
        assert_eq!(core.get(13), &Instruction::dat(11, 27));
    }

    #[test]
    fn test_sub_and_mul() {
        let (mut core, mut hook) = setup(&[
            ins(Opcode::Sub, Modifier::B, Immediate, 3, Direct, 2),
            ins(Opcode::Mul, Modifier::BA, Direct, 1, Direct, 1),
            Instruction::dat(6, 4),
        ]);
        // B-field of #3 is the SUB's own B-number, 2
        run(&mut core, &mut hook, 10);
        assert_eq!(core.get(12), &Instruction::dat(6, 2));

        // a = 6 * 2
        run(&mut core, &mut hook, 11);
        assert_eq!(core.get(12), &Instruction::dat(12, 2));
    }

    #[test]
    fn test_arithmetic_clamps_through_hook() {
        let (mut core, mut hook) = setup(&[
            ins(Opcode::Mul, Modifier::F, Direct, 1, Direct, 1),
            Instruction::dat(999_999_999, -999_999_999),
        ]);
        run(&mut core, &mut hook, 10);
        assert_eq!(core.get(11), &Instruction::dat(999_999_999, 999_999_999));
    }

    #[test]
    fn test_div_by_zero_kills_but_writes_other_field() {
        let (mut core, mut hook) = setup(&[
            ins(Opcode::Div, Modifier::F, Direct, 1, Direct, 2),
            Instruction::dat(0, 3),
            Instruction::dat(10, 10),
        ]);
        assert_eq!(run(&mut core, &mut hook, 10), Successors::None);
        assert_eq!(core.get(12), &Instruction::dat(10, 3));
    }

    #[test]
    fn test_div_mod_floor_semantics() {
        assert_eq!(floor_div(7, 2), 3);
        assert_eq!(floor_div(-7, 2), -4);
        assert_eq!(floor_div(7, -2), -4);
        assert_eq!(floor_mod(-7, 2), 1);
        assert_eq!(floor_mod(7, -2), -1);
        assert_eq!(floor_mod(6, 3), 0);

        let (mut core, mut hook) = setup(&[
            ins(Opcode::Mod, Modifier::A, Immediate, 4, Direct, 1),
            Instruction::dat(10, 0),
        ]);
        assert_eq!(run(&mut core, &mut hook, 10), Successors::One(11));
        assert_eq!(core.get(11).a_number, 2);
    }

    #[test]
    fn test_jmp_and_spl() {
        let (mut core, mut hook) = setup(&[
            ins(Opcode::Jmp, Modifier::B, Direct, -5, Direct, 0),
            ins(Opcode::Spl, Modifier::B, Direct, 3, Direct, 0),
        ]);
        assert_eq!(run(&mut core, &mut hook, 10), Successors::One(5));
        assert_eq!(run(&mut core, &mut hook, 11), Successors::Two(12, 14));
    }

    #[test]
    fn test_jmp_wraps_around_core() {
        let (mut core, mut hook) = setup(&[ins(Opcode::Jmp, Modifier::B, Direct, -15, Direct, 0)]);
        assert_eq!(run(&mut core, &mut hook, 10), Successors::One(95));
    }

    #[test]
    fn test_jmz_jmn() {
        let (mut core, mut hook) = setup(&[
            ins(Opcode::Jmz, Modifier::B, Direct, 5, Direct, 2),
            ins(Opcode::Jmn, Modifier::B, Direct, 5, Direct, 1),
            Instruction::dat(1, 0),
        ]);
        assert_eq!(run(&mut core, &mut hook, 10), Successors::One(15));
        assert_eq!(run(&mut core, &mut hook, 11), Successors::One(12));

        let (mut core, mut hook) = setup(&[
            ins(Opcode::Jmz, Modifier::F, Direct, 5, Direct, 1),
            Instruction::dat(1, 0),
        ]);
        assert_eq!(run(&mut core, &mut hook, 10), Successors::One(11));
    }

    #[test]
    fn test_djn_decrements_then_branches() {
        let (mut core, mut hook) = setup(&[
            ins(Opcode::Djn, Modifier::B, Direct, -1, Direct, 1),
            Instruction::dat(0, 2),
        ]);
        assert_eq!(run(&mut core, &mut hook, 10), Successors::One(9));
        assert_eq!(core.get(11).b_number, 1);

        assert_eq!(run(&mut core, &mut hook, 10), Successors::One(11));
        assert_eq!(core.get(11).b_number, 0);
    }

    #[test]
    fn test_compare_skips() {
        let (mut core, mut hook) = setup(&[
            ins(Opcode::Seq, Modifier::I, Direct, 3, Direct, 4),
            ins(Opcode::Sne, Modifier::A, Direct, 2, Direct, 3),
            ins(Opcode::Slt, Modifier::AB, Immediate, 1, Direct, 2),
            Instruction::dat(1, 5),
            Instruction::dat(1, 5),
        ]);
        assert_eq!(run(&mut core, &mut hook, 10), Successors::One(12));
        assert_eq!(run(&mut core, &mut hook, 11), Successors::One(12));
        // #1 < B-field of cell 14 (5)
        assert_eq!(run(&mut core, &mut hook, 12), Successors::One(14));
    }

    #[test]
    fn test_cmp_x() {
        let (mut core, mut hook) = setup(&[
            ins(Opcode::Cmp, Modifier::X, Direct, 1, Direct, 2),
            Instruction::dat(1, 2),
            Instruction::dat(2, 1),
        ]);
        assert_eq!(run(&mut core, &mut hook, 10), Successors::One(12));
    }

    #[test]
    fn test_b_indirect() {
        // MOV 1, @2 writes to cell 12 + its B-field (3) = 15
        let (mut core, mut hook) = setup(&[
            ins(Opcode::Mov, Modifier::I, Direct, 1, IndirectB, 2),
            Instruction::dat(7, 7),
            Instruction::dat(0, 3),
        ]);
        run(&mut core, &mut hook, 10);
        assert_eq!(core.get(15), &Instruction::dat(7, 7));
    }

    #[test]
    fn test_a_indirect() {
        let (mut core, mut hook) = setup(&[
            ins(Opcode::Mov, Modifier::I, Direct, 1, IndirectA, 2),
            Instruction::dat(7, 7),
            Instruction::dat(4, 0),
        ]);
        run(&mut core, &mut hook, 10);
        assert_eq!(core.get(16), &Instruction::dat(7, 7));
    }

    #[test]
    fn test_predecrement_before_use() {
        let (mut core, mut hook) = setup(&[
            ins(Opcode::Mov, Modifier::I, Direct, 1, PredecrementB, 2),
            Instruction::dat(7, 7),
            Instruction::dat(0, 3),
        ]);
        run(&mut core, &mut hook, 10);
        assert_eq!(core.get(12).b_number, 2);
        assert_eq!(core.get(14), &Instruction::dat(7, 7));
    }

    #[test]
    fn test_postincrement_after_use() {
        let (mut core, mut hook) = setup(&[
            ins(Opcode::Mov, Modifier::I, Direct, 1, PostincrementB, 2),
            Instruction::dat(7, 7),
            Instruction::dat(0, 3),
        ]);
        run(&mut core, &mut hook, 10);
        assert_eq!(core.get(12).b_number, 4);
        assert_eq!(core.get(15), &Instruction::dat(7, 7));
        assert_eq!(core.get(16), &Instruction::default());
    }

    #[test]
    fn test_successors_iterate_in_order() {
        let addresses: Vec<usize> = Successors::Two(4, 9).into_iter().collect();
        assert_eq!(addresses, vec![4, 9]);
        assert_eq!(Successors::None.into_iter().count(), 0);
        assert_eq!(Successors::One(3).len(), 1);
        assert!(Successors::None.is_empty());
    }
}
