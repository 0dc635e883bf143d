//! Runtime errors.
//!
//! Execution is fail-fast: the first error aborts the run. There is no
//! in-program recovery; errors a program is meant to handle are ordinary
//! [`Value::Error`](crate::values::Value::Error) values instead.
//!
//! # Error Categories
//!
//! - **Malformed programs**: bad opcodes, out-of-range indices. These mean the
//!   compiler and the VM disagree about the instruction set or the program
//!   was corrupted.
//! - **Ill-typed programs**: operators applied to unsupported kinds of values,
//!   calls to non-functions, wrong argument counts.
//! - **Resource exceeded**: operand stack or call depth limits.

use thiserror::Error;

use crate::code::{CodeError, Opcode};
use crate::vm::stack::StackError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("opcode {opcode} undefined")]
    UndefinedOpcode { opcode: u8 },

    #[error("malformed instruction: {0}")]
    Decode(CodeError),

    #[error("constant index {index} out of range (pool has {len})")]
    ConstantIndexOutOfRange { index: usize, len: usize },

    #[error("global index {index} out of range (capacity {capacity})")]
    GlobalIndexOutOfRange { index: usize, capacity: usize },

    #[error("local index {index} out of range (frame has {num_locals})")]
    LocalIndexOutOfRange { index: usize, num_locals: usize },

    #[error("free variable index {index} out of range (closure has {len})")]
    FreeIndexOutOfRange { index: usize, len: usize },

    #[error("builtin index {index} out of range (registry has {len})")]
    BuiltinIndexOutOfRange { index: usize, len: usize },

    #[error("unsupported types for {op}: {left} {right}")]
    UnsupportedOperandTypes {
        op: Opcode,
        left: &'static str,
        right: &'static str,
    },

    #[error("unsupported type for {op}: {operand}")]
    UnsupportedOperandType { op: Opcode, operand: &'static str },

    #[error("hash literal needs an even number of keys and values, got {count}")]
    OddHashOperandCount { count: usize },

    #[error("unusable as hash key: {type_name}")]
    UnusableAsHashKey { type_name: &'static str },

    #[error("division by zero")]
    DivisionByZero,

    #[error("calling non-function and non-built-in: {type_name}")]
    NotCallable { type_name: &'static str },

    #[error("not a function: {type_name}")]
    NotAFunction { type_name: &'static str },

    #[error("wrong number of arguments: want={expected}, got={got}")]
    ArgumentCountMismatch { expected: usize, got: usize },

    #[error("call stack overflow: depth exceeds {max_depth}")]
    CallStackOverflow { max_depth: usize },

    #[error("stack overflow: capacity {capacity} exceeded")]
    OperandStackOverflow { capacity: usize },

    #[error("stack underflow")]
    OperandStackUnderflow,

    #[error("return outside of a function")]
    ReturnOutsideFunction,

    #[error("program already ran")]
    AlreadyRun,
}

impl ErrorKind {
    /// Resource limit violations, as opposed to malformed or ill-typed programs.
    pub fn is_resource_exceeded(&self) -> bool {
        matches!(
            self,
            ErrorKind::CallStackOverflow { .. } | ErrorKind::OperandStackOverflow { .. }
        )
    }
}

impl From<CodeError> for ErrorKind {
    fn from(e: CodeError) -> Self {
        match e {
            CodeError::UndefinedOpcode { opcode } => ErrorKind::UndefinedOpcode { opcode },
            other => ErrorKind::Decode(other),
        }
    }
}

impl From<StackError> for ErrorKind {
    fn from(e: StackError) -> Self {
        match e {
            StackError::Overflow { capacity } => ErrorKind::OperandStackOverflow { capacity },
            StackError::Underflow => ErrorKind::OperandStackUnderflow,
        }
    }
}

/// A runtime error together with where it happened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (at offset {offset:04}, call depth {depth})")]
pub struct VmError {
    pub kind: ErrorKind,
    /// Byte offset of the failing instruction within its function.
    pub offset: usize,
    /// Number of active frames when the error was raised.
    pub depth: usize,
}

impl VmError {
    pub fn new(kind: ErrorKind, offset: usize, depth: usize) -> Self {
        VmError {
            kind,
            offset,
            depth,
        }
    }
}
