//! Instruction set shared by the compiler and the VM.
//!
//! This module owns the binary contract between the two: the opcode table,
//! the encoder ([`make`]), the decoder ([`read_operands`]) and the
//! disassembler (`Display` for [`Instructions`]).

mod encoding;
mod error;
mod instructions;
mod opcode;

#[cfg(test)]
mod encoding_test;

pub use encoding::{Operands, make, read_operands, read_u8, read_u16};
pub use error::CodeError;
pub use instructions::{Decoded, Instructions, Iter};
pub use opcode::{Definition, Opcode, lookup};
