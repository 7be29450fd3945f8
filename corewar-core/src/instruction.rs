//! Instruction model: opcodes, modifiers, addressing modes

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// OPCODES
// ============================================================================

/// Operation performed by an instruction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Opcode {
    Dat,
    Mov,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Jmp,
    Jmz,
    Jmn,
    Djn,
    Spl,
    Slt,
    Cmp,
    Seq,
    Sne,
    Nop,
}

impl Opcode {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Dat => "DAT",
            Opcode::Mov => "MOV",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Mod => "MOD",
            Opcode::Jmp => "JMP",
            Opcode::Jmz => "JMZ",
            Opcode::Jmn => "JMN",
            Opcode::Djn => "DJN",
            Opcode::Spl => "SPL",
            Opcode::Slt => "SLT",
            Opcode::Cmp => "CMP",
            Opcode::Seq => "SEQ",
            Opcode::Sne => "SNE",
            Opcode::Nop => "NOP",
        }
    }
}

// ============================================================================
// MODIFIERS
// ============================================================================

/// Which sub-fields an operation reads and writes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modifier {
    A,
    B,
    AB,
    BA,
    F,
    X,
    I,
}

impl Modifier {
    pub fn name(self) -> &'static str {
        match self {
            Modifier::A => "A",
            Modifier::B => "B",
            Modifier::AB => "AB",
            Modifier::BA => "BA",
            Modifier::F => "F",
            Modifier::X => "X",
            Modifier::I => "I",
        }
    }
}

// ============================================================================
// ADDRESSING MODES
// ============================================================================

/// Operand addressing mode
///
/// Serialized as the conventional one-character sigil.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "#")]
    Immediate,
    #[serde(rename = "$")]
    Direct,
    #[serde(rename = "@")]
    IndirectB,
    #[serde(rename = "<")]
    PredecrementB,
    #[serde(rename = ">")]
    PostincrementB,
    #[serde(rename = "*")]
    IndirectA,
    #[serde(rename = "{")]
    PredecrementA,
    #[serde(rename = "}")]
    PostincrementA,
}

/// Field of a cell an indirect mode chases
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    A,
    B,
}

impl Mode {
    pub fn sigil(self) -> char {
        match self {
            Mode::Immediate => '#',
            Mode::Direct => '$',
            Mode::IndirectB => '@',
            Mode::PredecrementB => '<',
            Mode::PostincrementB => '>',
            Mode::IndirectA => '*',
            Mode::PredecrementA => '{',
            Mode::PostincrementA => '}',
        }
    }

    /// The field followed by an indirect mode, `None` for immediate/direct
    pub fn indirect_field(self) -> Option<Field> {
        match self {
            Mode::Immediate | Mode::Direct => None,
            Mode::IndirectB | Mode::PredecrementB | Mode::PostincrementB => Some(Field::B),
            Mode::IndirectA | Mode::PredecrementA | Mode::PostincrementA => Some(Field::A),
        }
    }

    pub fn is_predecrement(self) -> bool {
        matches!(self, Mode::PredecrementA | Mode::PredecrementB)
    }

    pub fn is_postincrement(self) -> bool {
        matches!(self, Mode::PostincrementA | Mode::PostincrementB)
    }
}

// ============================================================================
// INSTRUCTION
// ============================================================================

/// One core cell
///
/// Numeric fields hold raw values; addresses are only reduced modulo the
/// core size when an operand is resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instruction {
    pub opcode: Opcode,
    pub modifier: Modifier,
    pub a_mode: Mode,
    pub a_number: i64,
    pub b_mode: Mode,
    pub b_number: i64,
}

impl Instruction {
    pub const fn new(
        opcode: Opcode,
        modifier: Modifier,
        a_mode: Mode,
        a_number: i64,
        b_mode: Mode,
        b_number: i64,
    ) -> Self {
        Self {
            opcode,
            modifier,
            a_mode,
            a_number,
            b_mode,
            b_number,
        }
    }

    /// `DAT.F #a, #b`
    pub const fn dat(a_number: i64, b_number: i64) -> Self {
        Self::new(
            Opcode::Dat,
            Modifier::F,
            Mode::Immediate,
            a_number,
            Mode::Immediate,
            b_number,
        )
    }

    pub fn field(&self, field: Field) -> i64 {
        match field {
            Field::A => self.a_number,
            Field::B => self.b_number,
        }
    }

    pub fn field_mut(&mut self, field: Field) -> &mut i64 {
        match field {
            Field::A => &mut self.a_number,
            Field::B => &mut self.b_number,
        }
    }

    /// Saturate both numeric fields into `[-bound, bound]`
    pub fn clamp_fields(&mut self, bound: i64) {
        self.a_number = self.a_number.clamp(-bound, bound);
        self.b_number = self.b_number.clamp(-bound, bound);
    }
}

/// Empty core cell: `DAT.F #0, #0`
impl Default for Instruction {
    fn default() -> Self {
        Self::dat(0, 0)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} {}{}, {}{}",
            self.opcode.mnemonic(),
            self.modifier.name(),
            self.a_mode.sigil(),
            self.a_number,
            self.b_mode.sigil(),
            self.b_number
        )
    }
}
