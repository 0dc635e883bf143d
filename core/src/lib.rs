#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

//! Execution core of the Monkey language: the bytecode instruction set and
//! the stack-based virtual machine that runs compiled programs.
//!
//! The VM consumes a [`Bytecode`] produced by an external compiler. It never
//! parses source or resolves names.

extern crate alloc;

// Re-export for convenience so other modules don't need alloc:: prefix
#[allow(unused_imports)]
pub(crate) use alloc::{format, string::String, vec, vec::Vec};

pub mod builtins;
pub mod bytecode;
pub mod code;
pub mod values;
pub mod vm;

pub use bytecode::Bytecode;
pub use values::Value;
pub use vm::{ErrorKind, VM, VmError, VmOptions};

/// Run `bytecode` with default options and builtins, returning the value of
/// the program's last expression statement.
pub fn run(bytecode: &Bytecode) -> Result<Value, VmError> {
    VM::execute(bytecode)
}
