//! Packing and unpacking of single instructions.

use smallvec::SmallVec;

use crate::Vec;
use crate::code::{CodeError, Definition, Opcode};

/// Decoded operands of one instruction. No opcode has more than two.
pub type Operands = SmallVec<[usize; 2]>;

/// Encode one instruction.
///
/// Each operand is written big-endian in its declared width. Operands that
/// don't fit their width are rejected rather than truncated.
pub fn make(op: Opcode, operands: &[usize]) -> Result<Vec<u8>, CodeError> {
    let def = op.definition();
    if operands.len() != def.operand_widths.len() {
        return Err(CodeError::OperandArityMismatch {
            opcode: op,
            expected: def.operand_widths.len(),
            got: operands.len(),
        });
    }

    let mut instruction = Vec::with_capacity(def.instruction_len());
    instruction.push(op as u8);

    for (&operand, &width) in operands.iter().zip(def.operand_widths) {
        if operand > max_operand(width) {
            return Err(CodeError::OperandOutOfRange {
                opcode: op,
                operand,
                width,
            });
        }
        for shift in (0..width).rev() {
            instruction.push((operand >> (8 * shift)) as u8);
        }
    }

    Ok(instruction)
}

/// Decode the operands that follow an opcode byte.
///
/// `ins` starts right after the opcode. Returns the operands and the number of
/// bytes they occupied, so the caller can advance past the instruction.
pub fn read_operands(def: &Definition, ins: &[u8]) -> Result<(Operands, usize), CodeError> {
    let expected: usize = def.operand_widths.iter().sum();
    if ins.len() < expected {
        return Err(CodeError::TruncatedInstruction {
            opcode: def.opcode,
            expected,
            available: ins.len(),
        });
    }

    let mut operands = Operands::new();
    let mut offset = 0;
    for &width in def.operand_widths {
        // Every operand in the definition table is one or two bytes wide.
        let operand = match width {
            1 => read_u8(&ins[offset..]) as usize,
            _ => read_u16(&ins[offset..]) as usize,
        };
        operands.push(operand);
        offset += width;
    }

    Ok((operands, offset))
}

/// Read a big-endian `u16`.
///
/// # Panics
///
/// Panics if `ins` holds fewer than two bytes.
#[inline]
pub fn read_u16(ins: &[u8]) -> u16 {
    u16::from_be_bytes([ins[0], ins[1]])
}

/// # Panics
///
/// Panics if `ins` is empty.
#[inline]
pub fn read_u8(ins: &[u8]) -> u8 {
    ins[0]
}

fn max_operand(width: usize) -> usize {
    (1usize << (8 * width)) - 1
}
