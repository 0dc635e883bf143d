//! Monkey VM opcodes - Variable-width Big-Endian Format
//!
//! Every instruction is a single opcode byte followed by zero or more operands.
//! Operand widths are fixed per opcode and declared in the [`Definition`] table:
//!
//! ```text
//! ┌──────────┬───────────────┬───────────────┐
//! │  Opcode  │  Operand 0    │  Operand 1    │
//! │ (1 byte) │ (1 or 2 bytes)│ (1 or 2 bytes)│
//! └──────────┴───────────────┴───────────────┘
//! ```
//!
//! Multi-byte operands are big-endian. Jump operands are absolute byte offsets
//! into the instruction buffer of the function that contains them.
//!
//! # Stack Discipline
//!
//! Stack effect notation: `[..., operand1, operand2] -> [..., result]`

use core::fmt;

use crate::code::CodeError;

/// A single-byte operation tag.
///
/// The discriminants are part of the compiler/VM contract and must never be
/// reordered.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Opcode {
    /// Push constant from pool
    /// Operand: u16 index | Stack: [...] -> [..., value]
    Constant = 0,

    /// Stack: [..., a, b] -> [..., a + b]
    Add = 1,

    /// Pop top value
    /// Stack: [..., a] -> [...]
    Pop = 2,

    /// Stack: [..., a, b] -> [..., a - b]
    Sub = 3,

    /// Stack: [..., a, b] -> [..., a * b]
    Mul = 4,

    /// Stack: [..., a, b] -> [..., a / b]
    Div = 5,

    True = 6,
    False = 7,

    /// Stack: [..., a, b] -> [..., a == b]
    Equal = 8,

    /// Stack: [..., a, b] -> [..., a != b]
    NotEqual = 9,

    /// Stack: [..., a, b] -> [..., a > b]
    GreaterThan = 10,

    /// Integer negation
    /// Stack: [..., a] -> [..., -a]
    Minus = 11,

    /// Logical not over truthiness
    /// Stack: [..., a] -> [..., !a]
    Bang = 12,

    /// Pop and jump if the popped value is falsy
    /// Operand: u16 absolute offset | Stack: [..., cond] -> [...]
    JumpNotTruthy = 13,

    /// Unconditional jump
    /// Operand: u16 absolute offset
    Jump = 14,

    Null = 15,

    /// Operand: u16 global index | Stack: [...] -> [..., value]
    GetGlobal = 16,

    /// Operand: u16 global index | Stack: [..., value] -> [...]
    SetGlobal = 17,

    /// Operand: u16 element count | Stack: [..., e1, ..., eN] -> [..., array]
    Array = 18,

    /// Operand: u16 count of keys plus values
    /// Stack: [..., k1, v1, ..., kN, vN] -> [..., hash]
    Hash = 19,

    /// Stack: [..., container, index] -> [..., element]
    Index = 20,

    /// Operand: u8 argument count
    /// Stack: [..., callee, a1, ..., aN] -> [..., result]
    Call = 21,

    /// Return the value on top of the stack from the current function
    ReturnValue = 22,

    /// Return null from the current function
    Return = 23,

    /// Operand: u8 local slot | Stack: [...] -> [..., value]
    GetLocal = 24,

    /// Operand: u8 local slot | Stack: [..., value] -> [...]
    SetLocal = 25,

    /// Operand: u8 builtin index | Stack: [...] -> [..., builtin]
    GetBuiltin = 26,

    /// Operands: u16 constant index, u8 free variable count
    /// Stack: [..., free1, ..., freeN] -> [..., closure]
    Closure = 27,

    /// Operand: u8 free variable index | Stack: [...] -> [..., value]
    GetFree = 28,
}
static_assertions::assert_eq_size!(Opcode, u8);

/// Static description of an opcode: its disassembly name and operand widths
/// in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Definition {
    pub opcode: Opcode,
    pub name: &'static str,
    pub operand_widths: &'static [usize],
}

impl Definition {
    const fn new(opcode: Opcode, name: &'static str, operand_widths: &'static [usize]) -> Self {
        Definition {
            opcode,
            name,
            operand_widths,
        }
    }

    /// Encoded length of an instruction with this definition, opcode included.
    pub fn instruction_len(&self) -> usize {
        1 + self.operand_widths.iter().sum::<usize>()
    }
}

/// Dense table indexed by opcode byte.
static DEFINITIONS: [Definition; Opcode::COUNT] = [
    Definition::new(Opcode::Constant, "OpConstant", &[2]),
    Definition::new(Opcode::Add, "OpAdd", &[]),
    Definition::new(Opcode::Pop, "OpPop", &[]),
    Definition::new(Opcode::Sub, "OpSub", &[]),
    Definition::new(Opcode::Mul, "OpMul", &[]),
    Definition::new(Opcode::Div, "OpDiv", &[]),
    Definition::new(Opcode::True, "OpTrue", &[]),
    Definition::new(Opcode::False, "OpFalse", &[]),
    Definition::new(Opcode::Equal, "OpEqual", &[]),
    Definition::new(Opcode::NotEqual, "OpNotEqual", &[]),
    Definition::new(Opcode::GreaterThan, "OpGreaterThan", &[]),
    Definition::new(Opcode::Minus, "OpMinus", &[]),
    Definition::new(Opcode::Bang, "OpBang", &[]),
    Definition::new(Opcode::JumpNotTruthy, "OpJumpNotTruthy", &[2]),
    Definition::new(Opcode::Jump, "OpJump", &[2]),
    Definition::new(Opcode::Null, "OpNull", &[]),
    Definition::new(Opcode::GetGlobal, "OpGetGlobal", &[2]),
    Definition::new(Opcode::SetGlobal, "OpSetGlobal", &[2]),
    Definition::new(Opcode::Array, "OpArray", &[2]),
    Definition::new(Opcode::Hash, "OpHash", &[2]),
    Definition::new(Opcode::Index, "OpIndex", &[]),
    Definition::new(Opcode::Call, "OpCall", &[1]),
    Definition::new(Opcode::ReturnValue, "OpReturnValue", &[]),
    Definition::new(Opcode::Return, "OpReturn", &[]),
    Definition::new(Opcode::GetLocal, "OpGetLocal", &[1]),
    Definition::new(Opcode::SetLocal, "OpSetLocal", &[1]),
    Definition::new(Opcode::GetBuiltin, "OpGetBuiltin", &[1]),
    Definition::new(Opcode::Closure, "OpClosure", &[2, 1]),
    Definition::new(Opcode::GetFree, "OpGetFree", &[1]),
];

impl Opcode {
    /// Number of defined opcodes. Valid opcode bytes are `0..COUNT`.
    pub const COUNT: usize = Opcode::GetFree as usize + 1;

    /// All opcodes in byte order.
    pub const ALL: [Opcode; Opcode::COUNT] = [
        Opcode::Constant,
        Opcode::Add,
        Opcode::Pop,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Div,
        Opcode::True,
        Opcode::False,
        Opcode::Equal,
        Opcode::NotEqual,
        Opcode::GreaterThan,
        Opcode::Minus,
        Opcode::Bang,
        Opcode::JumpNotTruthy,
        Opcode::Jump,
        Opcode::Null,
        Opcode::GetGlobal,
        Opcode::SetGlobal,
        Opcode::Array,
        Opcode::Hash,
        Opcode::Index,
        Opcode::Call,
        Opcode::ReturnValue,
        Opcode::Return,
        Opcode::GetLocal,
        Opcode::SetLocal,
        Opcode::GetBuiltin,
        Opcode::Closure,
        Opcode::GetFree,
    ];

    #[inline]
    pub fn definition(self) -> &'static Definition {
        &DEFINITIONS[self as usize]
    }

    #[inline]
    pub fn name(self) -> &'static str {
        self.definition().name
    }

    /// Check if this opcode carries an absolute jump target
    pub const fn is_jump(self) -> bool {
        matches!(self, Opcode::Jump | Opcode::JumpNotTruthy)
    }
}

// Opcode bytes are 0..=28; appending an opcode means bumping the image format.
static_assertions::const_assert_eq!(Opcode::COUNT, 29);

impl TryFrom<u8> for Opcode {
    type Error = CodeError;

    #[inline]
    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Opcode::ALL
            .get(byte as usize)
            .copied()
            .ok_or(CodeError::UndefinedOpcode { opcode: byte })
    }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> u8 {
        op as u8
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Look up the definition for a raw opcode byte.
pub fn lookup(byte: u8) -> Result<&'static Definition, CodeError> {
    Opcode::try_from(byte).map(Opcode::definition)
}
