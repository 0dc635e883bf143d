//! Instruction encoding and decoding errors.

use thiserror::Error;

use crate::code::Opcode;

/// Errors raised while encoding or decoding instructions.
///
/// These indicate a mismatch between the compiler and the VM (or a corrupted
/// instruction buffer); a well-formed program never produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodeError {
    /// The byte does not name a known operation.
    #[error("opcode {opcode} undefined")]
    UndefinedOpcode { opcode: u8 },

    /// Wrong number of operands for the opcode's definition.
    #[error("operand len {got} does not match defined {expected} for {opcode}")]
    OperandArityMismatch {
        opcode: Opcode,
        expected: usize,
        got: usize,
    },

    /// Operand does not fit its declared width.
    #[error("operand {operand} does not fit in {width} byte(s) for {opcode}")]
    OperandOutOfRange {
        opcode: Opcode,
        operand: usize,
        width: usize,
    },

    /// The buffer ends before all operands of the instruction were read.
    #[error("{opcode} needs {expected} operand byte(s) but only {available} remain")]
    TruncatedInstruction {
        opcode: Opcode,
        expected: usize,
        available: usize,
    },
}
